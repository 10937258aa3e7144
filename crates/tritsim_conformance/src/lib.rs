//! Conformance test helpers for the tritsim circuit simulator.
//!
//! Wraps a single cell in a circuit of `$input`/`$output` devices, drives it
//! with exhaustive or seeded random stimulus, and compares every output with
//! a reference model. The integration tests under `tests/` use this to check
//! the logic table of every built-in celltype.

#![warn(missing_docs)]

pub mod fixture;
pub mod models;
pub mod stimulus;

use std::collections::BTreeMap;

use thiserror::Error;
use tritsim_common::TritVector;
use tritsim_sim::SimError;

pub use fixture::{SingleCellFixture, TestOptions, DEFAULT_TIMEOUT, EXHAUSTIVE_LIMIT, RANDOM_TRIALS};
pub use stimulus::PortSpace;

/// Values keyed by port name.
pub type Assignment = BTreeMap<String, TritVector>;

/// Errors reported by the conformance harness.
#[derive(Debug, Error)]
pub enum ConformanceError {
    /// Building or driving the circuit failed.
    #[error(transparent)]
    Sim(#[from] SimError),

    /// An output did not match the reference model.
    #[error("[{inputs}] output {port}: expected {expected}, got {actual}")]
    Mismatch {
        /// The applied inputs, as `name:bits` pairs.
        inputs: String,
        /// Output port that differed.
        port: String,
        /// Value predicted by the reference model.
        expected: TritVector,
        /// Value observed on the circuit.
        actual: TritVector,
    },

    /// The reference model did not predict a value for an output.
    #[error("reference model has no value for output {0}")]
    MissingExpectation(String),
}

/// Renders an assignment as `name:bits` pairs for error messages.
pub fn describe(values: &Assignment) -> String {
    values
        .iter()
        .map(|(name, value)| format!("{name}:{value}"))
        .collect::<Vec<_>>()
        .join(" ")
}
