//! Circuit description model for the tritsim simulator.
//!
//! Holds the serde schema of the JSON circuit format ([`CircuitDesc`]), its
//! loader, and the [`Arena`] plus typed ids ([`DeviceId`], [`ConnectorId`])
//! that the simulation graph is built on.

#![warn(missing_docs)]

pub mod arena;
pub mod description;
pub mod error;
pub mod ids;
pub mod loader;

pub use arena::{Arena, ArenaId};
pub use description::{
    CircuitDesc, ConnectorDesc, ConstantSpec, DeviceDesc, ExtendSpec, Polarity, PortRefDesc,
    RangeDesc, SignedSpec, SliceSpec, TransitionDesc, WidthSpec,
};
pub use error::DescriptionError;
pub use ids::{ConnectorId, DeviceId};
pub use loader::{load_circuit, load_circuit_from_str};
