//! Reference models for the numeric and selection cells.
//!
//! These work on the binary-trit text of a vector and on exact integers, and
//! share no code with the simulator's own arithmetic.

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};
use tritsim_common::TritVector;

/// Reads `value` as an integer, or `None` if it contains `x`.
pub fn to_int(value: &TritVector, signed: bool) -> Option<BigInt> {
    let text = value.to_string();
    if text.contains('x') {
        return None;
    }
    if text.is_empty() {
        return Some(BigInt::zero());
    }
    let magnitude = BigInt::parse_bytes(text.as_bytes(), 2)?;
    if signed && text.starts_with('1') {
        Some(magnitude - (BigInt::one() << text.len()))
    } else {
        Some(magnitude)
    }
}

/// Writes the low `width` bits of the two's-complement form of `value`.
pub fn from_int(value: &BigInt, width: u32) -> TritVector {
    if width == 0 {
        return TritVector::zeros(0);
    }
    let modulus = BigInt::one() << width as usize;
    let wrapped = ((value % &modulus) + &modulus) % &modulus;
    let digits = wrapped.to_str_radix(2);
    let text = format!("{}{digits}", "0".repeat(width as usize - digits.len()));
    TritVector::from_binary_str(&text).unwrap_or_else(|| TritVector::xes(width))
}

/// One-bit comparison result, `x` if either operand is undefined.
pub fn compare(
    lhs: &TritVector,
    rhs: &TritVector,
    signed: bool,
    op: impl Fn(&BigInt, &BigInt) -> bool,
) -> TritVector {
    match (to_int(lhs, signed), to_int(rhs, signed)) {
        (Some(a), Some(b)) => TritVector::from_bool(op(&a, &b)),
        _ => TritVector::xes(1),
    }
}

/// Binary arithmetic result at `width` bits, all-`x` if either operand is
/// undefined.
pub fn arith(
    lhs: &TritVector,
    rhs: &TritVector,
    signed: bool,
    width: u32,
    op: impl Fn(BigInt, BigInt) -> BigInt,
) -> TritVector {
    match (to_int(lhs, signed), to_int(rhs, signed)) {
        (Some(a), Some(b)) => from_int(&op(a, b), width),
        _ => TritVector::xes(width),
    }
}

/// Unary arithmetic result at `width` bits.
pub fn arith1(value: &TritVector, signed: bool, width: u32, op: impl Fn(BigInt) -> BigInt) -> TritVector {
    match to_int(value, signed) {
        Some(a) => from_int(&op(a), width),
        None => TritVector::xes(width),
    }
}

/// Division rounding toward zero; a zero divisor returns the dividend.
pub fn div(a: BigInt, b: BigInt) -> BigInt {
    if b.is_zero() {
        return a;
    }
    let q = a.abs() / b.abs();
    if a.is_negative() != b.is_negative() {
        -q
    } else {
        q
    }
}

/// Remainder with the sign of the dividend; a zero divisor returns the
/// dividend.
pub fn rem(a: BigInt, b: BigInt) -> BigInt {
    if b.is_zero() {
        return a;
    }
    let r = a.abs() % b.abs();
    if a.is_negative() {
        -r
    } else {
        r
    }
}

/// Integer power with the conventions for `1`, `-1` and negative exponents.
///
/// Exponents are expected to be small.
pub fn pow(a: BigInt, b: BigInt) -> BigInt {
    if a.is_one() {
        BigInt::one()
    } else if a == -BigInt::one() {
        if (&b % 2i32).is_zero() {
            BigInt::one()
        } else {
            -BigInt::one()
        }
    } else if b.is_negative() {
        BigInt::zero()
    } else {
        let exp = b.to_u32().unwrap_or(u32::MAX);
        a.pow(exp)
    }
}

/// Shifts `value` left by `amount` bits (right when negative), cut to
/// `width` bits.
///
/// Bits entering from above copy the sign bit when `signed`, otherwise they
/// are `0`; bits entering from below are `0`.
pub fn shift(value: &TritVector, amount: i64, signed: bool, width: u32) -> TritVector {
    let text = value.to_string();
    let fill = match text.chars().next() {
        Some(c) if signed => c,
        _ => '0',
    };
    let width = width as usize;
    let dropped = if amount < 0 {
        (amount.unsigned_abs() as usize).min(text.len())
    } else {
        0
    };
    let prefix_len = width.max(amount.min(0).unsigned_abs() as usize);
    let mut full = String::new();
    full.extend(std::iter::repeat(fill).take(prefix_len));
    full.push_str(&text[..text.len() - dropped]);
    full.extend(std::iter::repeat('0').take(amount.max(0) as usize));
    let cut = &full[full.len() - width..];
    TritVector::from_binary_str(cut).unwrap_or_else(|| TritVector::xes(width as u32))
}

/// `$shl` reference: undefined amounts give all-`x`.
pub fn shift_left(
    value: &TritVector,
    amount: &TritVector,
    value_signed: bool,
    amount_signed: bool,
    width: u32,
) -> TritVector {
    match to_int(amount, amount_signed).and_then(|a| a.to_i64()) {
        Some(a) => shift(value, a, value_signed, width),
        None => TritVector::xes(width),
    }
}

/// `$shr` reference.
pub fn shift_right(
    value: &TritVector,
    amount: &TritVector,
    value_signed: bool,
    amount_signed: bool,
    width: u32,
) -> TritVector {
    match to_int(amount, amount_signed).and_then(|a| a.to_i64()) {
        Some(a) => shift(value, -a, value_signed, width),
        None => TritVector::xes(width),
    }
}

/// `$mux` reference: `data[sel]`, all-`x` unless `sel` is defined.
pub fn mux(data: &[&TritVector], sel: &TritVector) -> TritVector {
    let width = data[0].width();
    match to_int(sel, false).and_then(|s| s.to_usize()) {
        Some(index) => data[index].clone(),
        None => TritVector::xes(width),
    }
}

/// `$pmux` reference: `data[0]` when no select bit is set, `data[p + 1]`
/// when only bit `p` is set, all-`x` otherwise.
pub fn pmux(data: &[&TritVector], sel: &TritVector) -> TritVector {
    let width = data[0].width();
    let text = sel.to_string();
    if text.contains('x') || text.matches('1').count() > 1 {
        return TritVector::xes(width);
    }
    // position of the set bit counted from the LSB
    match text.chars().rev().position(|c| c == '1') {
        Some(p) => data[p + 1].clone(),
        None => data[0].clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bin(s: &str) -> TritVector {
        TritVector::from_binary_str(s).unwrap()
    }

    #[test]
    fn int_round_trip() {
        assert_eq!(to_int(&bin("111"), true), Some(BigInt::from(-1)));
        assert_eq!(to_int(&bin("111"), false), Some(BigInt::from(7)));
        assert_eq!(to_int(&bin("1x1"), false), None);
        assert_eq!(from_int(&BigInt::from(-2), 4).to_string(), "1110");
        assert_eq!(from_int(&BigInt::from(18), 4).to_string(), "0010");
    }

    #[test]
    fn truncating_division() {
        assert_eq!(div(BigInt::from(-7), BigInt::from(2)), BigInt::from(-3));
        assert_eq!(rem(BigInt::from(-7), BigInt::from(2)), BigInt::from(-1));
        assert_eq!(rem(BigInt::from(7), BigInt::from(-2)), BigInt::from(1));
        assert_eq!(div(BigInt::from(5), BigInt::zero()), BigInt::from(5));
    }

    #[test]
    fn power_conventions() {
        assert_eq!(pow(BigInt::from(-1), BigInt::from(-3)), BigInt::from(-1));
        assert_eq!(pow(BigInt::from(2), BigInt::from(-1)), BigInt::zero());
        assert_eq!(pow(BigInt::from(0), BigInt::from(0)), BigInt::one());
        assert_eq!(pow(BigInt::from(-2), BigInt::from(3)), BigInt::from(-8));
    }

    #[test]
    fn shift_text_model() {
        assert_eq!(shift(&bin("1011"), 1, false, 4).to_string(), "0110");
        assert_eq!(shift(&bin("1011"), -1, false, 4).to_string(), "0101");
        assert_eq!(shift(&bin("1011"), -1, true, 4).to_string(), "1101");
        assert_eq!(shift(&bin("1011"), -9, true, 4).to_string(), "1111");
        assert_eq!(shift(&bin("1011"), 0, true, 6).to_string(), "111011");
    }

    #[test]
    fn selection_models() {
        let a = bin("00");
        let b = bin("01");
        let c = bin("10");
        assert_eq!(mux(&[&a, &b], &bin("1")), b);
        assert_eq!(mux(&[&a, &b], &bin("x")), TritVector::xes(2));
        assert_eq!(pmux(&[&a, &b, &c], &bin("00")), a);
        assert_eq!(pmux(&[&a, &b, &c], &bin("10")), c);
        assert_eq!(pmux(&[&a, &b, &c], &bin("11")), TritVector::xes(2));
    }
}
