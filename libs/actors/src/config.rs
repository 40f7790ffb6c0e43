//! Runtime Configuration
//!
//! ```toml
//! directory_name = "/ActorSys"   # name of the directory's own address
//! supervision = "unsupervised"   # or "log_and_stop"
//! ```

use crate::error::{ActorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Default name of the directory's reserved sender address
pub const DEFAULT_DIRECTORY_NAME: &str = "/ActorSys";

/// What an execution loop does when its handler fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Supervision {
    /// The failure silently ends the actor's execution context
    #[default]
    Unsupervised,
    /// Catch errors and panics, log them, stop the actor cleanly
    LogAndStop,
}

/// Actor system configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Name of the directory's own address, used as sender for `tell`
    pub directory_name: String,
    /// Handler failure policy for every actor in the system
    pub supervision: Supervision,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            directory_name: DEFAULT_DIRECTORY_NAME.to_string(),
            supervision: Supervision::Unsupervised,
        }
    }
}

impl RuntimeConfig {
    /// Load and validate configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading runtime configuration");

        let content = std::fs::read_to_string(path).map_err(|e| {
            ActorError::configuration(
                &format!("Failed to read {}: {}", path.display(), e),
                None,
            )
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            ActorError::configuration(&format!("Invalid TOML: {}", e), None)
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.directory_name.trim().is_empty() {
            return Err(ActorError::configuration(
                "Directory name must not be empty",
                Some("directory_name"),
            ));
        }
        Ok(())
    }

    pub fn with_supervision(mut self, supervision: Supervision) -> Self {
        self.supervision = supervision;
        self
    }
}
