//! Machine configuration.
//!
//! Configuration is plain data and can be loaded from JSON:
//!
//! ```rust
//! use switchyard::{ExportStyle, MachineConfig};
//! use std::time::Duration;
//!
//! let config = MachineConfig::from_json_str(
//!     r#"{ "update_interval": "250ms", "export_style": "plain" }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.update_interval, Duration::from_millis(250));
//! assert_eq!(config.export_style, ExportStyle::Plain);
//! ```

use crate::error::ConfigError;
use crate::mermaid::ExportStyle;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for a [`StateMachine`](crate::StateMachine).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MachineConfig {
    /// Minimum time between effective `update()` calls. Zero means every
    /// call is effective.
    pub update_interval: Duration,

    /// Notation used by `to_mermaid()`.
    pub export_style: ExportStyle,
}

/// Serialized form, with the interval as a human-readable string.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    update_interval: Option<String>,
    export_style: ExportStyle,
}

impl MachineConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    /// Render this configuration as JSON accepted by [`Self::from_json_str`].
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        let raw = RawConfig {
            update_interval: Some(humantime::format_duration(self.update_interval).to_string()),
            export_style: self.export_style,
        };
        Ok(serde_json::to_string(&raw)?)
    }
}

impl TryFrom<RawConfig> for MachineConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let update_interval = match raw.update_interval {
            Some(value) => parse_interval(&value)?,
            None => Duration::ZERO,
        };
        Ok(Self {
            update_interval,
            export_style: raw.export_style,
        })
    }
}

/// Parse a humantime interval such as `"250ms"` or `"1m 30s"`.
///
/// `"0"` is accepted as zero.
pub fn parse_interval(value: &str) -> Result<Duration, ConfigError> {
    let trimmed = value.trim();
    if trimmed == "0" {
        return Ok(Duration::ZERO);
    }
    humantime::parse_duration(trimmed).map_err(|e| ConfigError::InvalidInterval {
        value: value.to_string(),
        reason: e.to_string(),
    })
}
