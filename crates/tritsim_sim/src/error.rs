//! Simulation error types.
//!
//! Construction of a circuit fails fast with a [`SimError`] describing the
//! first problem found. Once built, evaluation never fails; only misuse of
//! the kernel surface (unknown names, wrong widths) and exhausted settle
//! bounds are reported.

use tritsim_cells::CellError;
use tritsim_ir::DescriptionError;

use crate::config::ConfigError;

/// Errors that can occur while building or driving a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The circuit description could not be loaded.
    #[error(transparent)]
    Description(#[from] DescriptionError),

    /// The engine configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A device could not be instantiated.
    #[error("device '{device}': {source}")]
    Cell {
        /// Device id.
        device: String,
        /// Why the cell could not be built.
        source: CellError,
    },

    /// A name does not refer to any device.
    #[error("unknown device '{0}'")]
    UnknownDevice(String),

    /// A device has no port of that name.
    #[error("device '{device}' has no port '{port}'")]
    UnknownPort {
        /// Device id.
        device: String,
        /// Requested port name.
        port: String,
    },

    /// A connector endpoint uses a port in the wrong direction.
    #[error("port '{device}.{port}' cannot be used as a connector {role}")]
    PortDirection {
        /// Device id.
        device: String,
        /// Port name.
        port: String,
        /// `"source"` or `"target"`.
        role: &'static str,
    },

    /// A connector range lies outside its port.
    #[error("range {first}+{count} is outside port '{device}.{port}' of width {width}")]
    RangeOutOfBounds {
        /// Device id.
        device: String,
        /// Port name.
        port: String,
        /// First bit of the range.
        first: u32,
        /// Number of bits in the range.
        count: u32,
        /// Port width.
        width: u32,
    },

    /// The two ends of a connector differ in width.
    #[error("connector {from} ({from_width} bits) -> {to} ({to_width} bits) width mismatch")]
    WidthMismatch {
        /// Source endpoint as `device.port`.
        from: String,
        /// Source width.
        from_width: u32,
        /// Target endpoint as `device.port`.
        to: String,
        /// Target width.
        to_width: u32,
    },

    /// An input bit is driven by more than one connector.
    #[error("bit {bit} of '{device}.{port}' has more than one driver")]
    MultipleDrivers {
        /// Device id.
        device: String,
        /// Port name.
        port: String,
        /// Doubly driven bit.
        bit: u32,
    },

    /// `set_input` was called on a device that is not an `$input`.
    #[error("device '{0}' is not an $input")]
    NotAnInput(String),

    /// `get_output` was called on a device that is not an `$output`.
    #[error("device '{0}' is not an $output")]
    NotAnOutput(String),

    /// `set_input` was given a value of the wrong width.
    #[error("input '{device}' is {expected} bits wide, got {actual}")]
    InputWidth {
        /// Device id.
        device: String,
        /// Declared width.
        expected: u32,
        /// Width of the given value.
        actual: u32,
    },

    /// Events were still pending after the allowed number of steps.
    #[error("circuit did not settle within {steps} steps")]
    NonConvergent {
        /// Steps taken before giving up.
        steps: u64,
    },
}
