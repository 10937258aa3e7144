//! Event-driven simulator for three-valued (`0`/`1`/`x`) digital circuits.
//!
//! A [`Circuit`] is instantiated from a `tritsim_ir` description through a
//! `tritsim_cells` registry, then driven by a [`SimKernel`]: set inputs,
//! step or settle, read outputs.
//!
//! # Usage
//!
//! ```ignore
//! use tritsim_cells::CellRegistry;
//! use tritsim_sim::SimKernel;
//!
//! let mut sim = SimKernel::from_desc(&desc, &CellRegistry::builtin())?;
//! sim.set_input("a", TritVector::from_u64(3, 4))?;
//! sim.run_until_stable()?;
//! println!("{}", sim.get_output("y")?);
//! ```
//!
//! # Modules
//!
//! - `circuit`: Devices, connectors and validation
//! - `kernel`: Tick-based event queue and the settle loop
//! - `config`: `tritsim.toml` loading
//! - `error`: Simulation error types

#![warn(missing_docs)]

pub mod circuit;
pub mod config;
pub mod error;
pub mod kernel;

pub use circuit::{Circuit, Connector, Device, Endpoint};
pub use config::{load_config, load_config_from_str, ConfigError, SimConfig, DEFAULT_SETTLE_LIMIT};
pub use error::SimError;
pub use kernel::SimKernel;
