//! Errors raised while reading a circuit description.

use std::path::PathBuf;

/// Errors that can occur when loading a circuit description.
#[derive(Debug, thiserror::Error)]
pub enum DescriptionError {
    /// The description file could not be read.
    #[error("failed to read circuit description {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The JSON content does not match the description schema.
    #[error("failed to parse circuit description: {0}")]
    Parse(#[from] serde_json::Error),
}
