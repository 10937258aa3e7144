//! Typed ids for circuit entities.
//!
//! Each id is a `u32` newtype issued by an [`Arena`](crate::arena::Arena).

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an id from a raw index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Id of a device (an instantiated cell) in a circuit.
    DeviceId,
    "d"
);

define_id!(
    /// Id of a connector (a directed wire) in a circuit.
    ConnectorId,
    "c"
);
