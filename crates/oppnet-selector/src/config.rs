//! Runtime configuration.
//!
//! Raw TOML input is deserialized into [`SelectorConfigInput`] with every
//! field optional, then resolved into a validated [`SelectorConfig`] with
//! defaults filled in and out-of-range values clamped.

use serde::Deserialize;
use thiserror::Error;

use crate::switchover::START_TOKEN;

pub const CONFIG_VERSION: u32 = 1;

const DEFAULT_CHANNEL_CAPACITY: usize = 64;
const MIN_CHANNEL_CAPACITY: usize = 8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported config version {0}")]
    UnsupportedVersion(u32),
    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SelectorConfigInput {
    pub version: u32,
    pub channel_capacity: Option<usize>,
    pub start_token: Option<u32>,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    pub version: u32,
    /// Capacity of the serialized event channel feeding the worker.
    pub channel_capacity: usize,
    /// First correlation token handed out by the switch coordinator.
    pub start_token: u32,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        SelectorConfig {
            version: CONFIG_VERSION,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            start_token: START_TOKEN,
        }
    }
}

impl SelectorConfigInput {
    pub fn resolve(self) -> Result<SelectorConfig, ConfigError> {
        let version = if self.version == 0 {
            CONFIG_VERSION
        } else {
            self.version
        };
        if version != CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion(version));
        }

        Ok(SelectorConfig {
            version,
            channel_capacity: self
                .channel_capacity
                .unwrap_or(DEFAULT_CHANNEL_CAPACITY)
                .max(MIN_CHANNEL_CAPACITY),
            start_token: self.start_token.unwrap_or(START_TOKEN).max(START_TOKEN),
        })
    }
}

impl SelectorConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        if input.trim().is_empty() {
            return Ok(SelectorConfig::default());
        }
        let parsed: SelectorConfigInput = toml::from_str(input)?;
        parsed.resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_defaults() {
        let cfg = SelectorConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.version, CONFIG_VERSION);
        assert_eq!(cfg.channel_capacity, DEFAULT_CHANNEL_CAPACITY);
        assert_eq!(cfg.start_token, START_TOKEN);
    }

    #[test]
    fn parse_toml_overrides() {
        let cfg = SelectorConfig::from_toml_str(
            r#"
            version = 1
            channel_capacity = 128
            start_token = 100
        "#,
        )
        .unwrap();
        assert_eq!(cfg.channel_capacity, 128);
        assert_eq!(cfg.start_token, 100);
    }

    #[test]
    fn tiny_channel_capacity_is_clamped() {
        let cfg = SelectorConfig::from_toml_str("channel_capacity = 1").unwrap();
        assert_eq!(cfg.channel_capacity, MIN_CHANNEL_CAPACITY);
    }

    #[test]
    fn zero_start_token_is_clamped() {
        let cfg = SelectorConfig::from_toml_str("start_token = 0").unwrap();
        assert_eq!(cfg.start_token, START_TOKEN);
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let err = SelectorConfig::from_toml_str("version = 7").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedVersion(7)));
    }

    #[test]
    fn malformed_toml_is_rejected() {
        assert!(matches!(
            SelectorConfig::from_toml_str("channel_capacity = \"lots\""),
            Err(ConfigError::Toml(_))
        ));
    }
}
