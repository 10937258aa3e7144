//! Cell behaviour library for the tritsim circuit simulator.
//!
//! Every celltype of the circuit format is a variant of [`Cell`]. A variant
//! knows its port [`Signature`] and how to evaluate itself, either as a pure
//! [`Combinational`] function or as a [`Sequential`] state machine.
//! [`CellRegistry`] turns device descriptions into cells and can be extended
//! with [`CustomCell`] implementations.

#![warn(missing_docs)]

pub mod bus;
pub mod cell;
pub mod constant;
pub mod dff;
pub mod error;
pub mod fsm;
pub mod gates;
pub mod io;
pub mod mux;
pub mod numeric;
mod params;
pub mod ports;
pub mod registry;

pub use cell::{Cell, Combinational, CustomCell, Sequential};
pub use error::CellError;
pub use ports::{PortDirection, PortSpec, Signature};
pub use registry::{CellFactory, CellRegistry};
