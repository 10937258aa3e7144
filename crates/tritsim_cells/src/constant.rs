//! Constant drivers.

use tritsim_common::TritVector;
use tritsim_ir::{ConstantSpec, DeviceDesc};

use crate::cell::Combinational;
use crate::error::CellError;
use crate::params;
use crate::ports::Signature;

/// Drives a fixed vector on `out`. Has no inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    value: TritVector,
}

impl Constant {
    /// Creates a constant driver.
    pub fn new(value: TritVector) -> Self {
        Self { value }
    }

    /// The driven value.
    pub fn value(&self) -> &TritVector {
        &self.value
    }

    pub(crate) fn from_desc(desc: &DeviceDesc) -> Result<Self, CellError> {
        let value = match &desc.constant {
            Some(ConstantSpec::Bits(text)) => params::trits(desc, "constant", text)?,
            Some(ConstantSpec::Number(n)) => {
                let width = desc.width_of("out").ok_or_else(|| {
                    CellError::invalid(&desc.celltype, "numeric constant needs 'bits'")
                })?;
                TritVector::from_i64(*n, width)
            }
            None => return Err(CellError::missing(&desc.celltype, "constant")),
        };
        Ok(Self::new(value))
    }
}

impl Combinational for Constant {
    fn signature(&self) -> Signature {
        Signature::new().output("out", self.value.width())
    }

    fn initial_outputs(&self) -> Vec<TritVector> {
        vec![self.value.clone()]
    }

    fn evaluate(&self, _inputs: &[TritVector]) -> Vec<TritVector> {
        vec![self.value.clone()]
    }
}
