//! Stimulus sequences over a set of input ports.
//!
//! Both sequences are pure functions of an index (and a seed for the random
//! one), so they can be restarted, sliced or replayed without keeping state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tritsim_common::{Trit, TritVector};

use crate::Assignment;

/// Spreads the trial index over the seed space.
const INDEX_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// The input ports a stimulus assigns, in a fixed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSpace {
    ports: Vec<(String, u32)>,
    random_x: bool,
}

impl PortSpace {
    /// Creates a space over `(name, width)` ports.
    ///
    /// With `random_x` every bit ranges over `{0, 1, x}`, otherwise over
    /// `{0, 1}`.
    pub fn new(ports: impl IntoIterator<Item = (String, u32)>, random_x: bool) -> Self {
        Self {
            ports: ports.into_iter().collect(),
            random_x,
        }
    }

    /// Sum of the port widths.
    pub fn total_bits(&self) -> u32 {
        self.ports.iter().map(|(_, w)| w).sum()
    }

    fn base(&self) -> u64 {
        if self.random_x {
            3
        } else {
            2
        }
    }

    /// Number of distinct assignments, saturating at `u64::MAX`.
    pub fn exhaustive_len(&self) -> u64 {
        self.base()
            .checked_pow(self.total_bits())
            .unwrap_or(u64::MAX)
    }

    /// The `index`-th assignment of the complete enumeration.
    ///
    /// Bits are read as base-2 or base-3 digits of `index`, least significant
    /// first, walking the ports in order.
    pub fn nth_exhaustive(&self, index: u64) -> Assignment {
        let base = self.base();
        let mut rest = index;
        self.build(|| {
            let digit = rest % base;
            rest /= base;
            digit
        })
    }

    /// Every assignment, in index order.
    pub fn exhaustive(&self) -> impl Iterator<Item = Assignment> + '_ {
        (0..self.exhaustive_len()).map(move |i| self.nth_exhaustive(i))
    }

    /// The `index`-th random assignment for `seed`.
    pub fn nth_random(&self, seed: u64, index: u64) -> Assignment {
        let mut rng = StdRng::seed_from_u64(seed ^ index.wrapping_mul(INDEX_MIX));
        let base = self.base();
        self.build(|| rng.gen_range(0..base))
    }

    /// `count` random assignments for `seed`.
    pub fn random(&self, seed: u64, count: usize) -> impl Iterator<Item = Assignment> + '_ {
        (0..count as u64).map(move |i| self.nth_random(seed, i))
    }

    fn build(&self, mut digit: impl FnMut() -> u64) -> Assignment {
        self.ports
            .iter()
            .map(|(name, width)| {
                let value: TritVector = (0..*width)
                    .map(|_| match digit() {
                        0 => Trit::Zero,
                        1 => Trit::One,
                        _ => Trit::X,
                    })
                    .collect();
                (name.clone(), value)
            })
            .collect()
    }
}
