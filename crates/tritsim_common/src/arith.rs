//! Numeric interpretation of trit vectors: arithmetic, comparison and shifts.
//!
//! Operands are read as two's-complement signed or unsigned integers and
//! evaluated exactly (arbitrary precision), then the result is truncated or
//! extended to the requested output width. Any `x` in an operand poisons the
//! whole result: arithmetic yields an all-`x` vector, comparisons yield a
//! single `x` trit.

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::trit::Trit;
use crate::trit_vec::TritVector;

/// Binary arithmetic operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithOp {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Truncating division; division by zero yields the dividend.
    Div,
    /// Remainder with the sign of the dividend; modulo zero yields the dividend.
    Mod,
    /// Exponentiation.
    Pow,
}

impl ArithOp {
    /// Evaluates `lhs op rhs` and writes the result at `width` bits.
    pub fn apply(self, lhs: &TritVector, rhs: &TritVector, signed: bool, width: u32) -> TritVector {
        match (lhs.to_bigint(signed), rhs.to_bigint(signed)) {
            (Some(a), Some(b)) => {
                let result = match self {
                    ArithOp::Add => a + b,
                    ArithOp::Sub => a - b,
                    ArithOp::Mul => a * b,
                    ArithOp::Div if b.is_zero() => a,
                    ArithOp::Div => a / b,
                    ArithOp::Mod if b.is_zero() => a,
                    ArithOp::Mod => a % b,
                    ArithOp::Pow => power(&a, &b, width),
                };
                TritVector::from_bigint(&result, width)
            }
            _ => TritVector::xes(width),
        }
    }
}

/// `a ** b` reduced modulo `2^width`.
///
/// `1 ** b` is 1, `(-1) ** b` alternates by parity, and any other base raised
/// to a negative exponent is 0.
fn power(a: &BigInt, b: &BigInt, width: u32) -> BigInt {
    if a.is_one() {
        BigInt::one()
    } else if *a == -BigInt::one() {
        if b.bit(0) {
            -BigInt::one()
        } else {
            BigInt::one()
        }
    } else if b.is_negative() {
        BigInt::zero()
    } else {
        let modulus = BigInt::one() << width as usize;
        a.modpow(b, &modulus)
    }
}

/// Comparison operators producing a single trit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
}

impl CompareOp {
    /// Compares the numeric values of `lhs` and `rhs`, which may differ in width.
    pub fn apply(self, lhs: &TritVector, rhs: &TritVector, signed: bool) -> Trit {
        let (Some(a), Some(b)) = (lhs.to_bigint(signed), rhs.to_bigint(signed)) else {
            return Trit::X;
        };
        let ord = a.cmp(&b);
        Trit::from_bool(match self {
            CompareOp::Eq => ord == Ordering::Equal,
            CompareOp::Ne => ord != Ordering::Equal,
            CompareOp::Lt => ord == Ordering::Less,
            CompareOp::Le => ord != Ordering::Greater,
            CompareOp::Gt => ord == Ordering::Greater,
            CompareOp::Ge => ord != Ordering::Less,
        })
    }
}

/// Signedness used when two operands meet: signed only if both are signed.
pub fn common_signedness(lhs_signed: bool, rhs_signed: bool) -> bool {
    lhs_signed && rhs_signed
}

/// Two's-complement negation written at `width` bits.
pub fn negate(value: &TritVector, signed: bool, width: u32) -> TritVector {
    match value.to_bigint(signed) {
        Some(v) => TritVector::from_bigint(&-v, width),
        None => TritVector::xes(width),
    }
}

/// Unary plus: the numeric value rewritten at `width` bits.
pub fn identity(value: &TritVector, signed: bool, width: u32) -> TritVector {
    if value.is_fully_defined() {
        value.resize(width, signed)
    } else {
        TritVector::xes(width)
    }
}

/// Shifts `value` left by `amount` (negative amounts shift right).
///
/// See [`shift_right`] for the fill rules.
pub fn shift_left(
    value: &TritVector,
    amount: &TritVector,
    value_signed: bool,
    amount_signed: bool,
    width: u32,
) -> TritVector {
    shift_by(value, amount, value_signed, amount_signed, width, false)
}

/// Shifts `value` right by `amount` (negative amounts shift left).
///
/// The value is conceptually extended without bound (sign bit when
/// `value_signed`, `0` otherwise), bits shifted in from below are `0`, and the
/// result is cut to `width` bits. Trits of `value` move with the shift, `x`
/// included. An undefined `amount` makes the whole result `x`.
pub fn shift_right(
    value: &TritVector,
    amount: &TritVector,
    value_signed: bool,
    amount_signed: bool,
    width: u32,
) -> TritVector {
    shift_by(value, amount, value_signed, amount_signed, width, true)
}

fn shift_by(
    value: &TritVector,
    amount: &TritVector,
    value_signed: bool,
    amount_signed: bool,
    width: u32,
    negate: bool,
) -> TritVector {
    let Some(amount) = amount.to_bigint(amount_signed) else {
        return TritVector::xes(width);
    };
    let amount = if negate { -amount } else { amount };
    // Anything beyond this moves every bit out of view.
    let bound = i64::from(value.width()) + i64::from(width) + 1;
    let amount = amount
        .to_i64()
        .unwrap_or(if amount.is_negative() { -bound } else { bound })
        .clamp(-bound, bound);
    let fill = match value.msb() {
        Some(t) if value_signed => t,
        _ => Trit::Zero,
    };
    (0..width)
        .map(|i| {
            let src = i64::from(i) - amount;
            if src < 0 {
                Trit::Zero
            } else if src < i64::from(value.width()) {
                value.get(src as u32)
            } else {
                fill
            }
        })
        .collect()
}
