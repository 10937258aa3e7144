//! Three-valued logic values with truth-table-based operators.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

/// A single three-valued logic value.
///
/// The three states represent:
/// - `Zero`: logic low
/// - `One`: logic high
/// - `X`: unknown or uninitialized value
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Trit {
    /// Logic low (0).
    Zero = 0,
    /// Logic high (1).
    One = 1,
    /// Unknown or uninitialized.
    #[default]
    X = 2,
}

impl Trit {
    /// Converts a character to a [`Trit`] value.
    ///
    /// Accepts '0', '1' and 'x'/'X'.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Trit::Zero),
            '1' => Some(Trit::One),
            'x' | 'X' => Some(Trit::X),
            _ => None,
        }
    }

    /// Returns the character used in binary-trit strings.
    pub fn to_char(self) -> char {
        match self {
            Trit::Zero => '0',
            Trit::One => '1',
            Trit::X => 'x',
        }
    }

    /// Maps a boolean to `One`/`Zero`.
    pub fn from_bool(value: bool) -> Self {
        if value {
            Trit::One
        } else {
            Trit::Zero
        }
    }

    /// Returns the boolean value, or `None` for `X`.
    pub fn to_bool(self) -> Option<bool> {
        match self {
            Trit::Zero => Some(false),
            Trit::One => Some(true),
            Trit::X => None,
        }
    }

    /// Returns `true` unless the value is `X`.
    pub fn is_defined(self) -> bool {
        self != Trit::X
    }

    /// Returns `true` if this trit is exactly the level `active` stands for.
    ///
    /// Used for control inputs (enable, reset) where `X` is never active.
    pub fn is_active(self, active: bool) -> bool {
        self == Trit::from_bool(active)
    }

    pub(crate) fn from_bits(bits: u64) -> Self {
        match bits {
            0 => Trit::Zero,
            1 => Trit::One,
            _ => Trit::X,
        }
    }
}

impl From<bool> for Trit {
    fn from(value: bool) -> Self {
        Trit::from_bool(value)
    }
}

impl fmt::Display for Trit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Ternary AND truth table:
/// ```text
///     0  1  X
/// 0 | 0  0  0
/// 1 | 0  1  X
/// X | 0  X  X
/// ```
impl BitAnd for Trit {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        use Trit::*;
        match (self, rhs) {
            (Zero, _) | (_, Zero) => Zero,
            (One, One) => One,
            _ => X,
        }
    }
}

/// Ternary OR truth table:
/// ```text
///     0  1  X
/// 0 | 0  1  X
/// 1 | 1  1  1
/// X | X  1  X
/// ```
impl BitOr for Trit {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        use Trit::*;
        match (self, rhs) {
            (One, _) | (_, One) => One,
            (Zero, Zero) => Zero,
            _ => X,
        }
    }
}

/// Ternary XOR truth table:
/// ```text
///     0  1  X
/// 0 | 0  1  X
/// 1 | 1  0  X
/// X | X  X  X
/// ```
impl BitXor for Trit {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        use Trit::*;
        match (self, rhs) {
            (Zero, Zero) | (One, One) => Zero,
            (Zero, One) | (One, Zero) => One,
            _ => X,
        }
    }
}

/// Ternary NOT:
/// - `!0 = 1`, `!1 = 0`, `!X = X`
impl Not for Trit {
    type Output = Self;

    fn not(self) -> Self {
        use Trit::*;
        match self {
            Zero => One,
            One => Zero,
            X => X,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Trit::*;

    #[test]
    fn and_truth_table() {
        // Zero dominates
        assert_eq!(Zero & Zero, Zero);
        assert_eq!(Zero & One, Zero);
        assert_eq!(Zero & X, Zero);
        assert_eq!(One & Zero, Zero);
        assert_eq!(X & Zero, Zero);
        // One & One
        assert_eq!(One & One, One);
        // Unknown cases
        assert_eq!(One & X, X);
        assert_eq!(X & One, X);
        assert_eq!(X & X, X);
    }

    #[test]
    fn or_truth_table() {
        // One dominates
        assert_eq!(One | Zero, One);
        assert_eq!(One | One, One);
        assert_eq!(One | X, One);
        assert_eq!(Zero | One, One);
        assert_eq!(X | One, One);
        assert_eq!(Zero | Zero, Zero);
        assert_eq!(Zero | X, X);
        assert_eq!(X | Zero, X);
        assert_eq!(X | X, X);
    }

    #[test]
    fn xor_truth_table() {
        assert_eq!(Zero ^ Zero, Zero);
        assert_eq!(Zero ^ One, One);
        assert_eq!(One ^ Zero, One);
        assert_eq!(One ^ One, Zero);
        assert_eq!(Zero ^ X, X);
        assert_eq!(One ^ X, X);
        assert_eq!(X ^ Zero, X);
        assert_eq!(X ^ X, X);
    }

    #[test]
    fn not_values() {
        assert_eq!(!Zero, One);
        assert_eq!(!One, Zero);
        assert_eq!(!X, X);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{Zero}"), "0");
        assert_eq!(format!("{One}"), "1");
        assert_eq!(format!("{X}"), "x");
    }

    #[test]
    fn from_char_valid() {
        use super::Trit;
        assert_eq!(Trit::from_char('0'), Some(Zero));
        assert_eq!(Trit::from_char('1'), Some(One));
        assert_eq!(Trit::from_char('x'), Some(X));
        assert_eq!(Trit::from_char('X'), Some(X));
    }

    #[test]
    fn from_char_invalid() {
        use super::Trit;
        assert_eq!(Trit::from_char('z'), None);
        assert_eq!(Trit::from_char('2'), None);
    }

    #[test]
    fn active_levels() {
        assert!(One.is_active(true));
        assert!(Zero.is_active(false));
        assert!(!X.is_active(true));
        assert!(!X.is_active(false));
        assert!(!Zero.is_active(true));
    }

    #[test]
    fn bool_conversions() {
        use super::Trit;
        assert_eq!(Trit::from(true), One);
        assert_eq!(Trit::from_bool(false), Zero);
        assert_eq!(One.to_bool(), Some(true));
        assert_eq!(X.to_bool(), None);
    }
}
