use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// Top-level configuration for the Lampgate application.
///
/// Loaded from `~/.lampgate/config.toml` by default. Each section corresponds
/// to one subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LampgateConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub control: ControlConfig,
    #[serde(default)]
    pub relay: RelayConfig,
}

impl LampgateConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LampgateConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Detection debounce and timer settings for the actuator controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Name of the upstream pipeline stage whose outputs are consumed.
    pub stage_name: String,
    /// Detection label that drives the actuator.
    pub target_label: String,
    /// Consecutive qualifying frames required before switching on.
    pub activation_threshold: u32,
    /// Quiet period after which the actuator is forced off, in seconds.
    pub inactivity_timeout_secs: u64,
    /// Grace period before switching off after the target disappears, in seconds.
    pub turn_off_delay_secs: u64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            stage_name: "roi_tracker".to_string(),
            target_label: "forklift".to_string(),
            activation_threshold: 10,
            inactivity_timeout_secs: 6,
            turn_off_delay_secs: 3,
        }
    }
}

impl ControlConfig {
    /// Inactivity window as a `Duration`.
    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_secs(self.inactivity_timeout_secs)
    }

    /// Turn-off grace period as a `Duration`.
    pub fn turn_off_delay(&self) -> Duration {
        Duration::from_secs(self.turn_off_delay_secs)
    }
}

/// Relay device connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Base URL of the relay device, without a trailing slash.
    pub base_url: String,
    /// Relay output address on the device.
    pub address: u8,
    /// HTTP request timeout in seconds. Bounds the worst-case stall of the
    /// frame-processing path when the device hangs.
    pub request_timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://192.168.7.145".to_string(),
            address: 1,
            request_timeout_secs: 5,
        }
    }
}

impl RelayConfig {
    /// Request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
