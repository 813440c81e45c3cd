//! Machine configuration.
//!
//! Hosts usually build a [`MachineConfig`] in code, but it can also be
//! loaded from JSON so debug output can be switched per entity without a
//! rebuild.
//!
//! ```rust
//! use tickstate::config::MachineConfig;
//!
//! let config = MachineConfig::from_json(r#"{ "debug": true, "name": "Guard" }"#).unwrap();
//! assert!(config.debug);
//! assert_eq!(config.name.as_deref(), Some("Guard"));
//! ```

pub mod error;

pub use error::{ConfigError, ConfigResult};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings applied to a machine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Debug flag the machine resets to when awakened. Units capture the
    /// machine's flag when they are registered.
    pub debug: bool,

    /// Name used in diagnostics instead of the controller's type name.
    pub name: Option<String>,
}

impl MachineConfig {
    /// Create the default configuration (debug off, type name).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the debug flag.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the diagnostic name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parse a configuration from a JSON document. Missing fields take
    /// their default values.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        serde_json::from_str(json).map_err(|source| ConfigError::Parse { source })
    }

    /// Read and parse a JSON configuration file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }
}
