//! Packed fixed-width vectors of three-valued logic.

use crate::trit::Trit;
use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

/// A fixed-width vector of [`Trit`] values packed for efficient storage.
///
/// Each trit occupies 2 bits, with 32 values packed per `u64` word. Bit 0 is
/// the least significant. The width never changes after construction; every
/// operation returns a fresh vector.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TritVector {
    width: u32,
    /// Packed storage: 2 bits per trit, 32 trits per u64.
    data: Vec<u64>,
}

/// Number of trits packed per u64 word.
const VALUES_PER_WORD: u32 = 32;

impl TritVector {
    /// Creates a vector of the given width with every trit set to `value`.
    pub fn filled(width: u32, value: Trit) -> Self {
        let pattern = match value {
            Trit::Zero => 0,
            Trit::One => 0x5555_5555_5555_5555,
            Trit::X => 0xAAAA_AAAA_AAAA_AAAA,
        };
        let mut v = Self {
            width,
            data: vec![pattern; word_count(width)],
        };
        v.clear_padding();
        v
    }

    /// Creates a vector with all trits set to `Zero`.
    pub fn zeros(width: u32) -> Self {
        Self::filled(width, Trit::Zero)
    }

    /// Creates a vector with all trits set to `One`.
    pub fn ones(width: u32) -> Self {
        Self::filled(width, Trit::One)
    }

    /// Creates a fully undefined vector.
    pub fn xes(width: u32) -> Self {
        Self::filled(width, Trit::X)
    }

    /// Creates a single-trit vector from a boolean.
    pub fn from_bool(value: bool) -> Self {
        Self::filled(1, Trit::from_bool(value))
    }

    /// Creates a vector from booleans, index 0 being the least significant bit.
    pub fn from_bools(bits: &[bool]) -> Self {
        bits.iter().map(|&b| Trit::from_bool(b)).collect()
    }

    /// Creates a vector from trits, index 0 being the least significant bit.
    pub fn from_trits(trits: &[Trit]) -> Self {
        trits.iter().copied().collect()
    }

    /// Creates a vector from a `u64` value with the given width.
    ///
    /// Bits beyond the given width are dropped; bits beyond 64 are zero.
    pub fn from_u64(value: u64, width: u32) -> Self {
        let mut v = Self::zeros(width);
        for i in 0..width.min(64) {
            if (value >> i) & 1 != 0 {
                v.set(i, Trit::One);
            }
        }
        v
    }

    /// Creates a two's-complement vector from an `i64` value with the given width.
    pub fn from_i64(value: i64, width: u32) -> Self {
        Self::from_bigint(&BigInt::from(value), width)
    }

    /// Creates a two's-complement vector from an arbitrary-precision integer.
    ///
    /// The value is truncated to `width` bits (reduced modulo `2^width`).
    pub fn from_bigint(value: &BigInt, width: u32) -> Self {
        let mut v = Self::zeros(width);
        for i in 0..width {
            if value.bit(u64::from(i)) {
                v.set(i, Trit::One);
            }
        }
        v
    }

    /// Parses a binary-trit string like `"10x"` into a vector.
    ///
    /// The leftmost character is the most significant bit. The empty string
    /// yields a zero-width vector. Returns `None` on any character other than
    /// `0`, `1`, `x` or `X`.
    pub fn from_binary_str(s: &str) -> Option<Self> {
        let mut v = Self::zeros(s.chars().count() as u32);
        for (i, c) in s.chars().rev().enumerate() {
            v.set(i as u32, Trit::from_char(c)?);
        }
        Some(v)
    }

    /// Returns the number of trits in this vector.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Gets the trit at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn get(&self, index: u32) -> Trit {
        assert!(
            index < self.width,
            "index {index} out of bounds for width {}",
            self.width
        );
        let word_idx = (index / VALUES_PER_WORD) as usize;
        let bit_offset = (index % VALUES_PER_WORD) * 2;
        Trit::from_bits((self.data[word_idx] >> bit_offset) & 0b11)
    }

    /// Sets the trit at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn set(&mut self, index: u32, value: Trit) {
        assert!(
            index < self.width,
            "index {index} out of bounds for width {}",
            self.width
        );
        let word_idx = (index / VALUES_PER_WORD) as usize;
        let bit_offset = (index % VALUES_PER_WORD) * 2;
        let mask = !(0b11u64 << bit_offset);
        self.data[word_idx] = (self.data[word_idx] & mask) | ((value as u64) << bit_offset);
    }

    /// Iterates over the trits from least to most significant.
    pub fn iter(&self) -> impl Iterator<Item = Trit> + '_ {
        (0..self.width).map(move |i| self.get(i))
    }

    /// Returns the most significant trit, or `None` for a zero-width vector.
    pub fn msb(&self) -> Option<Trit> {
        self.width.checked_sub(1).map(|i| self.get(i))
    }

    /// Returns `true` if the vector contains no `X`.
    pub fn is_fully_defined(&self) -> bool {
        self.iter().all(Trit::is_defined)
    }

    /// Returns `true` if every trit is `One`.
    pub fn is_all_one(&self) -> bool {
        self.iter().all(|t| t == Trit::One)
    }

    /// Converts the vector to a `u64`, if all trits are defined.
    ///
    /// Returns `None` if the vector contains `X` or is wider than 64 bits.
    pub fn to_u64(&self) -> Option<u64> {
        if self.width > 64 {
            return None;
        }
        let mut result = 0u64;
        for i in 0..self.width {
            match self.get(i) {
                Trit::Zero => {}
                Trit::One => result |= 1 << i,
                Trit::X => return None,
            }
        }
        Some(result)
    }

    /// Interprets the vector as a signed (two's-complement) or unsigned integer.
    ///
    /// Returns `None` if the vector is not fully defined. A zero-width vector
    /// is the integer 0.
    pub fn to_bigint(&self, signed: bool) -> Option<BigInt> {
        let mut digits = vec![0u32; self.width.div_ceil(32) as usize];
        for i in 0..self.width {
            match self.get(i) {
                Trit::Zero => {}
                Trit::One => digits[(i / 32) as usize] |= 1 << (i % 32),
                Trit::X => return None,
            }
        }
        let magnitude = BigInt::from(BigUint::new(digits));
        if signed && self.msb() == Some(Trit::One) {
            Some(magnitude - (BigInt::from(1u8) << self.width as usize))
        } else {
            Some(magnitude)
        }
    }

    /// Interprets the vector as a signed integer, if defined and in range.
    pub fn to_i64(&self) -> Option<i64> {
        use num_traits::ToPrimitive;
        self.to_bigint(true)?.to_i64()
    }

    /// Bitwise AND.
    pub fn and(&self, rhs: &Self) -> Self {
        self.zip_with(rhs, "AND", |a, b| a & b)
    }

    /// Bitwise OR.
    pub fn or(&self, rhs: &Self) -> Self {
        self.zip_with(rhs, "OR", |a, b| a | b)
    }

    /// Bitwise XOR.
    pub fn xor(&self, rhs: &Self) -> Self {
        self.zip_with(rhs, "XOR", |a, b| a ^ b)
    }

    /// Bitwise NAND.
    pub fn nand(&self, rhs: &Self) -> Self {
        self.zip_with(rhs, "NAND", |a, b| !(a & b))
    }

    /// Bitwise NOR.
    pub fn nor(&self, rhs: &Self) -> Self {
        self.zip_with(rhs, "NOR", |a, b| !(a | b))
    }

    /// Bitwise XNOR.
    pub fn xnor(&self, rhs: &Self) -> Self {
        self.zip_with(rhs, "XNOR", |a, b| !(a ^ b))
    }

    /// Bitwise NOT.
    pub fn not(&self) -> Self {
        self.iter().map(|t| !t).collect()
    }

    /// AND of all trits. The empty vector reduces to `One`.
    pub fn reduce_and(&self) -> Trit {
        self.iter().fold(Trit::One, |acc, t| acc & t)
    }

    /// OR of all trits. The empty vector reduces to `Zero`.
    pub fn reduce_or(&self) -> Trit {
        self.iter().fold(Trit::Zero, |acc, t| acc | t)
    }

    /// XOR of all trits. The empty vector reduces to `Zero`.
    pub fn reduce_xor(&self) -> Trit {
        self.iter().fold(Trit::Zero, |acc, t| acc ^ t)
    }

    /// Negated [`reduce_and`](Self::reduce_and).
    pub fn reduce_nand(&self) -> Trit {
        !self.reduce_and()
    }

    /// Negated [`reduce_or`](Self::reduce_or).
    pub fn reduce_nor(&self) -> Trit {
        !self.reduce_or()
    }

    /// Negated [`reduce_xor`](Self::reduce_xor).
    pub fn reduce_xnor(&self) -> Trit {
        !self.reduce_xor()
    }

    /// Extracts trits `start..end` as a new vector.
    ///
    /// # Panics
    ///
    /// Panics if `start > end` or `end > self.width()`.
    pub fn slice(&self, start: u32, end: u32) -> Self {
        assert!(
            start <= end && end <= self.width,
            "slice {start}..{end} out of bounds for width {}",
            self.width
        );
        (start..end).map(|i| self.get(i)).collect()
    }

    /// Concatenates `high` above `self`, so `self` keeps the low bits.
    pub fn concat(&self, high: &Self) -> Self {
        self.iter().chain(high.iter()).collect()
    }

    /// Concatenates vectors, the first one ending up in the lowest bits.
    pub fn concat_all<'a>(parts: impl IntoIterator<Item = &'a TritVector>) -> Self {
        parts.into_iter().flat_map(|p| p.iter()).collect()
    }

    /// Pads the high end with `Zero` up to `width`.
    ///
    /// # Panics
    ///
    /// Panics if `width` is smaller than the current width.
    pub fn zero_extend(&self, width: u32) -> Self {
        assert!(width >= self.width, "cannot zero-extend {} to {width}", self.width);
        self.resize(width, false)
    }

    /// Pads the high end by replicating the most significant trit up to `width`.
    ///
    /// A zero-width vector is padded with `Zero`.
    ///
    /// # Panics
    ///
    /// Panics if `width` is smaller than the current width.
    pub fn sign_extend(&self, width: u32) -> Self {
        assert!(width >= self.width, "cannot sign-extend {} to {width}", self.width);
        self.resize(width, true)
    }

    /// Truncates or extends to `width`, replicating the sign when `signed`.
    pub fn resize(&self, width: u32, signed: bool) -> Self {
        let fill = match self.msb() {
            Some(t) if signed => t,
            _ => Trit::Zero,
        };
        (0..width)
            .map(|i| if i < self.width { self.get(i) } else { fill })
            .collect()
    }

    /// Applies `op` trit-wise to two vectors of equal width.
    fn zip_with(&self, rhs: &Self, name: &str, op: impl Fn(Trit, Trit) -> Trit) -> Self {
        assert_eq!(self.width, rhs.width, "TritVector width mismatch in {name}");
        self.iter().zip(rhs.iter()).map(|(a, b)| op(a, b)).collect()
    }

    /// Zeroes the unused high bits of the last word so equal vectors compare equal.
    fn clear_padding(&mut self) {
        let used = self.width % VALUES_PER_WORD;
        if used != 0 {
            if let Some(last) = self.data.last_mut() {
                *last &= (1u64 << (used * 2)) - 1;
            }
        }
    }
}

impl FromIterator<Trit> for TritVector {
    fn from_iter<T: IntoIterator<Item = Trit>>(iter: T) -> Self {
        let trits: Vec<Trit> = iter.into_iter().collect();
        let mut v = Self::zeros(trits.len() as u32);
        for (i, t) in trits.into_iter().enumerate() {
            v.set(i as u32, t);
        }
        v
    }
}

impl From<Trit> for TritVector {
    fn from(value: Trit) -> Self {
        Self::filled(1, value)
    }
}

impl fmt::Display for TritVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.width).rev() {
            write!(f, "{}", self.get(i))?;
        }
        Ok(())
    }
}

impl fmt::Debug for TritVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TritVector({self})")
    }
}

impl BitAnd for &TritVector {
    type Output = TritVector;

    fn bitand(self, rhs: Self) -> TritVector {
        self.and(rhs)
    }
}

impl BitOr for &TritVector {
    type Output = TritVector;

    fn bitor(self, rhs: Self) -> TritVector {
        self.or(rhs)
    }
}

impl BitXor for &TritVector {
    type Output = TritVector;

    fn bitxor(self, rhs: Self) -> TritVector {
        self.xor(rhs)
    }
}

impl Not for &TritVector {
    type Output = TritVector;

    fn not(self) -> TritVector {
        TritVector::not(self)
    }
}

/// Returns the number of u64 words needed to store `width` trits.
fn word_count(width: u32) -> usize {
    width.div_ceil(VALUES_PER_WORD) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bin(s: &str) -> TritVector {
        TritVector::from_binary_str(s).unwrap()
    }

    fn trit_vector(max_width: u32) -> impl Strategy<Value = TritVector> {
        prop::collection::vec(
            prop_oneof![Just(Trit::Zero), Just(Trit::One), Just(Trit::X)],
            0..=max_width as usize,
        )
        .prop_map(|trits| TritVector::from_trits(&trits))
    }

    #[test]
    fn filled_and_width() {
        let v = TritVector::xes(8);
        assert_eq!(v.width(), 8);
        assert_eq!(v.to_string(), "xxxxxxxx");
        assert_eq!(TritVector::ones(3).to_string(), "111");
        assert_eq!(TritVector::zeros(2).to_string(), "00");
    }

    #[test]
    fn filled_equals_set_by_hand() {
        let mut v = TritVector::zeros(40);
        for i in 0..40 {
            v.set(i, Trit::X);
        }
        assert_eq!(v, TritVector::xes(40));
    }

    #[test]
    fn set_get_roundtrip() {
        let mut v = TritVector::zeros(3);
        v.set(0, Trit::Zero);
        v.set(1, Trit::One);
        v.set(2, Trit::X);
        assert_eq!(v.get(0), Trit::Zero);
        assert_eq!(v.get(1), Trit::One);
        assert_eq!(v.get(2), Trit::X);
    }

    #[test]
    fn from_binary_str() {
        let v = bin("10x");
        assert_eq!(v.width(), 3);
        assert_eq!(v.get(2), Trit::One); // MSB
        assert_eq!(v.get(1), Trit::Zero);
        assert_eq!(v.get(0), Trit::X); // LSB
    }

    #[test]
    fn from_binary_str_invalid() {
        assert!(TritVector::from_binary_str("10z1").is_none());
    }

    #[test]
    fn empty_string_is_zero_width() {
        let v = bin("");
        assert_eq!(v.width(), 0);
        assert_eq!(v.to_string(), "");
        assert!(v.is_fully_defined());
    }

    #[test]
    fn bitwise_ops() {
        let a = bin("1100x");
        let b = bin("10100");
        assert_eq!((&a & &b).to_string(), "10000");
        assert_eq!((&a | &b).to_string(), "1110x");
        assert_eq!((&a ^ &b).to_string(), "0110x");
        assert_eq!(a.nand(&b).to_string(), "01111");
        assert_eq!(a.nor(&b).to_string(), "0001x");
        assert_eq!(a.xnor(&b).to_string(), "1001x");
        assert_eq!((!&a).to_string(), "0011x");
    }

    #[test]
    fn and_with_x() {
        assert_eq!(bin("x").and(&bin("0")), bin("0"));
        assert_eq!(bin("x").and(&bin("1")), bin("x"));
        assert_eq!(bin("x").and(&bin("x")), bin("x"));
    }

    #[test]
    #[should_panic(expected = "width mismatch")]
    fn bitwise_width_mismatch_panics() {
        let _ = bin("10").and(&bin("1"));
    }

    #[test]
    fn reductions() {
        assert_eq!(bin("111").reduce_and(), Trit::One);
        assert_eq!(bin("1x1").reduce_and(), Trit::X);
        assert_eq!(bin("1x0").reduce_and(), Trit::Zero);
        assert_eq!(bin("0x0").reduce_or(), Trit::X);
        assert_eq!(bin("0x1").reduce_or(), Trit::One);
        assert_eq!(bin("110").reduce_xor(), Trit::Zero);
        assert_eq!(bin("100").reduce_xor(), Trit::One);
        assert_eq!(bin("1x0").reduce_xor(), Trit::X);
        assert_eq!(bin("100").reduce_xnor(), Trit::Zero);
        assert_eq!(bin("000").reduce_nor(), Trit::One);
        assert_eq!(bin("111").reduce_nand(), Trit::Zero);
    }

    #[test]
    fn slice_and_concat() {
        let v = bin("1x0110");
        assert_eq!(v.slice(0, 3).to_string(), "110");
        assert_eq!(v.slice(3, 6).to_string(), "1x0");
        assert_eq!(v.slice(2, 2).width(), 0);
        let low = bin("01");
        let high = bin("1x");
        assert_eq!(low.concat(&high).to_string(), "1x01");
        assert_eq!(
            TritVector::concat_all([&low, &high, &bin("0")]).to_string(),
            "01x01"
        );
    }

    #[test]
    fn extension() {
        let v = bin("1x");
        assert_eq!(v.zero_extend(4).to_string(), "001x");
        assert_eq!(v.sign_extend(4).to_string(), "111x");
        assert_eq!(bin("x0").sign_extend(4).to_string(), "xxx0");
        assert_eq!(bin("").sign_extend(2).to_string(), "00");
        assert_eq!(bin("1010").resize(2, true).to_string(), "10");
    }

    #[test]
    fn numeric_conversions() {
        assert_eq!(TritVector::from_u64(5, 4).to_string(), "0101");
        assert_eq!(TritVector::from_i64(-1, 4).to_string(), "1111");
        assert_eq!(TritVector::from_i64(-6, 4).to_string(), "1010");
        assert_eq!(bin("1010").to_u64(), Some(10));
        assert_eq!(bin("1010").to_i64(), Some(-6));
        assert_eq!(bin("1x10").to_u64(), None);
        assert_eq!(bin("1010").to_bigint(false), Some(BigInt::from(10)));
        assert_eq!(bin("1010").to_bigint(true), Some(BigInt::from(-6)));
        assert_eq!(bin("").to_bigint(true), Some(BigInt::from(0)));
    }

    #[test]
    fn wide_bigint_roundtrip() {
        let value = (BigInt::from(1u8) << 90usize) - BigInt::from(3);
        let v = TritVector::from_bigint(&value, 96);
        assert_eq!(v.to_bigint(false), Some(value));
        assert!(TritVector::from_bigint(&BigInt::from(-1), 96).is_all_one());
    }

    #[test]
    fn large_width_spanning_words() {
        let mut v = TritVector::zeros(100);
        v.set(0, Trit::One);
        v.set(50, Trit::X);
        v.set(99, Trit::One);
        assert_eq!(v.get(0), Trit::One);
        assert_eq!(v.get(50), Trit::X);
        assert_eq!(v.get(99), Trit::One);
        assert_eq!(v.get(1), Trit::Zero);
    }

    #[test]
    fn serde_roundtrip() {
        let v = bin("10x01010");
        let json = serde_json::to_string(&v).unwrap();
        let back: TritVector = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }

    proptest! {
        #[test]
        fn binary_string_roundtrip(v in trit_vector(80)) {
            let back = TritVector::from_binary_str(&v.to_string()).unwrap();
            prop_assert_eq!(back, v);
        }

        #[test]
        fn double_not_is_identity(v in trit_vector(80)) {
            prop_assert_eq!(v.not().not(), v);
        }

        #[test]
        fn zero_extend_then_slice_recovers(bits in prop::collection::vec(any::<bool>(), 0..70), pad in 0u32..10) {
            let v = TritVector::from_bools(&bits);
            let w = v.width();
            prop_assert_eq!(v.zero_extend(w + pad).slice(0, w), v);
        }

        #[test]
        fn defined_and_matches_boolean(a in any::<u64>(), b in any::<u64>()) {
            let va = TritVector::from_u64(a, 64);
            let vb = TritVector::from_u64(b, 64);
            prop_assert_eq!(va.and(&vb).to_u64(), Some(a & b));
            prop_assert_eq!(va.or(&vb).to_u64(), Some(a | b));
            prop_assert_eq!(va.xor(&vb).to_u64(), Some(a ^ b));
            prop_assert_eq!(va.nand(&vb).to_u64(), Some(!(a & b)));
        }
    }
}
