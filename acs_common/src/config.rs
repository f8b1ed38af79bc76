//! TOML configuration loading and validation.
//!
//! One small config file covers the whole subsystem: the bus node id, the
//! receive poll interval the control thread uses while watching for
//! shutdown, and the duty-cycle ceilings enforced by the actuator drivers.
//! Every field has a flight default, so a missing file is not fatal — the
//! binary falls back to defaults with a warning.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Highest bus node id the field-bus addressing scheme allows.
pub const NODE_ID_MAX: u8 = 0x7F;

/// Default ACS node id on the bus.
pub const NODE_ID_DEFAULT: u8 = 0x3F;

/// Configuration loading/validation error.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// File read failed.
    #[error("failed to read config: {0}")]
    Io(String),

    /// TOML parse error.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// Semantic validation failed.
    #[error("config validation: {0}")]
    Validation(String),
}

/// Subsystem configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcsConfig {
    /// Node id of this subsystem on the field bus (<= 0x7F).
    pub node_id: u8,
    /// How long a blocking receive waits before re-checking the shutdown
    /// flag, in milliseconds.
    pub recv_poll_ms: u64,
    /// Duty-cycle ceiling for the reaction wheel, percent.
    pub wheel_duty_limit: u8,
    /// Duty-cycle ceiling for the magnetorquer, percent.
    pub torquer_duty_limit: u8,
}

impl Default for AcsConfig {
    fn default() -> Self {
        Self {
            node_id: NODE_ID_DEFAULT,
            recv_poll_ms: 100,
            wheel_duty_limit: 100,
            torquer_duty_limit: 100,
        }
    }
}

impl AcsConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        let config: Self = toml::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.node_id > NODE_ID_MAX {
            return Err(ConfigError::Validation(format!(
                "node_id 0x{:02X} exceeds bus maximum 0x{NODE_ID_MAX:02X}",
                self.node_id
            )));
        }
        if self.recv_poll_ms == 0 {
            return Err(ConfigError::Validation(
                "recv_poll_ms must be non-zero".into(),
            ));
        }
        for (name, limit) in [
            ("wheel_duty_limit", self.wheel_duty_limit),
            ("torquer_duty_limit", self.torquer_duty_limit),
        ] {
            if limit > 100 {
                return Err(ConfigError::Validation(format!(
                    "{name} {limit} exceeds 100%"
                )));
            }
        }
        Ok(())
    }
}
