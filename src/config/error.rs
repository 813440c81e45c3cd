//! Error types for machine configuration loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a [`MachineConfig`](super::MachineConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file from disk.
    #[error("Failed to read config file at {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse JSON configuration.
    #[error("Failed to parse machine config: {source}")]
    Parse { source: serde_json::Error },
}

/// Type alias for Result with ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;
