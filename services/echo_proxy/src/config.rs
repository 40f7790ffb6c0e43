//! Echo Proxy Configuration
//!
//! ```toml
//! [runtime]
//! directory_name = "/ActorSys"
//! supervision = "unsupervised"
//!
//! [demo]
//! message = "Pass thru?"
//! settle_ms = 2000
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use switchboard_actors::RuntimeConfig;
use tracing::info;

/// Full service configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EchoProxyConfig {
    pub runtime: RuntimeConfig,
    pub demo: DemoSettings,
}

/// What the demo sends and how long it lets the actors work
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DemoSettings {
    /// Text sent to the proxy
    pub message: String,
    /// Time between the send and the shutdown broadcast
    pub settle_ms: u64,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            message: "Pass thru?".to_string(),
            settle_ms: 2000,
        }
    }
}

impl DemoSettings {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl EchoProxyConfig {
    /// Load from a TOML file, falling back to defaults for missing keys
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.runtime.validate()?;

        info!(path = %path.display(), "Loaded echo proxy configuration");
        Ok(config)
    }
}
