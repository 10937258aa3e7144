//! Engine configuration loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default bound for [`SimKernel::run_until_stable`](crate::SimKernel::run_until_stable).
pub const DEFAULT_SETTLE_LIMIT: u64 = 1000;

/// Errors that can occur when loading a [`SimConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// A value is out of range.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Tunables of the simulation kernel.
///
/// ```toml
/// settle_limit = 1000
/// evaluate_on_build = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Steps [`run_until_stable`](crate::SimKernel::run_until_stable) takes
    /// before reporting non-convergence.
    pub settle_limit: u64,
    /// Whether every device is scheduled for the first step, so combinational
    /// outputs reflect their initial inputs without any `set_input`.
    pub evaluate_on_build: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            settle_limit: DEFAULT_SETTLE_LIMIT,
            evaluate_on_build: true,
        }
    }
}

/// Reads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<SimConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a TOML string.
pub fn load_config_from_str(content: &str) -> Result<SimConfig, ConfigError> {
    let config: SimConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &SimConfig) -> Result<(), ConfigError> {
    if config.settle_limit == 0 {
        return Err(ConfigError::Validation(
            "settle_limit must be at least 1".to_string(),
        ));
    }
    Ok(())
}
