//! Helpers for reading cell parameters out of a device description.

use tritsim_common::TritVector;
use tritsim_ir::{ConstantSpec, DeviceDesc};

use crate::error::CellError;

/// Width of `port`, falling back to one bit.
pub(crate) fn width(desc: &DeviceDesc, port: &str) -> u32 {
    desc.width_of(port).unwrap_or(1)
}

/// Parses a binary-trit literal parameter.
pub(crate) fn trits(desc: &DeviceDesc, param: &str, text: &str) -> Result<TritVector, CellError> {
    TritVector::from_binary_str(text).ok_or_else(|| {
        CellError::invalid(
            &desc.celltype,
            format!("{param} '{text}' is not a binary-trit string"),
        )
    })
}

/// Parses a binary-trit literal that must be exactly `width` trits long.
pub(crate) fn trits_of_width(
    desc: &DeviceDesc,
    param: &str,
    text: &str,
    width: u32,
) -> Result<TritVector, CellError> {
    let value = trits(desc, param, text)?;
    if value.width() != width {
        return Err(CellError::invalid(
            &desc.celltype,
            format!("{param} has {} trits, expected {width}", value.width()),
        ));
    }
    Ok(value)
}

/// Reads the `constant` parameter as an operand of `width` bits.
pub(crate) fn constant_operand(
    desc: &DeviceDesc,
    width: u32,
    signed: bool,
) -> Result<Option<TritVector>, CellError> {
    match &desc.constant {
        None => Ok(None),
        Some(ConstantSpec::Number(n)) => Ok(Some(TritVector::from_i64(*n, width))),
        Some(ConstantSpec::Bits(text)) => {
            let value = trits(desc, "constant", text)?;
            if !value.is_fully_defined() {
                return Err(CellError::invalid(
                    &desc.celltype,
                    "constant operand must not contain x",
                ));
            }
            Ok(Some(value.resize(width, signed)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_defaults_to_one() {
        assert_eq!(width(&DeviceDesc::new("$not"), "in"), 1);
        assert_eq!(width(&DeviceDesc::new("$not").with_bits(5), "in"), 5);
    }

    #[test]
    fn trits_rejects_garbage() {
        let desc = DeviceDesc::new("$dff");
        assert!(trits(&desc, "initial", "01x").is_ok());
        let err = trits(&desc, "initial", "012").unwrap_err();
        assert!(matches!(err, CellError::InvalidParameter { .. }));
    }

    #[test]
    fn trits_of_width_checks_length() {
        let desc = DeviceDesc::new("$dff");
        assert!(trits_of_width(&desc, "initial", "000", 3).is_ok());
        assert!(trits_of_width(&desc, "initial", "00", 3).is_err());
    }

    #[test]
    fn constant_operand_forms() {
        let mut desc = DeviceDesc::new("$add");
        assert_eq!(constant_operand(&desc, 4, false).unwrap(), None);

        desc.constant = Some(ConstantSpec::Number(-1));
        assert_eq!(
            constant_operand(&desc, 4, true).unwrap(),
            Some(TritVector::ones(4))
        );

        desc.constant = Some(ConstantSpec::Bits("10".into()));
        assert_eq!(
            constant_operand(&desc, 4, true).unwrap().unwrap().to_string(),
            "1110"
        );

        desc.constant = Some(ConstantSpec::Bits("1x".into()));
        assert!(constant_operand(&desc, 4, false).is_err());
    }
}
