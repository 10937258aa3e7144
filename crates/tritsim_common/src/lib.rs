//! Shared value types for the tritsim circuit simulator.
//!
//! This crate provides the three-valued [`Trit`] (`0`, `1`, `x`), the
//! fixed-width [`TritVector`] bus value built from it, and the numeric
//! algebra (arithmetic, comparison, shifting) that cells evaluate with.

#![warn(missing_docs)]

pub mod arith;
pub mod trit;
pub mod trit_vec;

pub use arith::{ArithOp, CompareOp};
pub use trit::Trit;
pub use trit_vec::TritVector;
