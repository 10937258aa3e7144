//! Loading circuit descriptions from JSON.

use crate::description::CircuitDesc;
use crate::error::DescriptionError;
use std::path::Path;

/// Reads and parses a circuit description file.
pub fn load_circuit(path: &Path) -> Result<CircuitDesc, DescriptionError> {
    let content = std::fs::read_to_string(path).map_err(|source| DescriptionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_circuit_from_str(&content)
}

/// Parses a circuit description from a JSON string.
pub fn load_circuit_from_str(content: &str) -> Result<CircuitDesc, DescriptionError> {
    Ok(serde_json::from_str(content)?)
}
