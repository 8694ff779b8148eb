//! Configuration types for Mockscribe

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::exchange::{SendOptions, DEFAULT_MAX_RESPONSE_SIZE};
use crate::render::RenderOptions;
use crate::transport::{POOL_IDLE_TIMEOUT_SECS, POOL_MAX_IDLE_PER_HOST};
use crate::{Result, ScribeError};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Resource limits for the client and transport
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Default render options
    #[serde(default)]
    pub render: RenderOptions,
}

/// Resource limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum response size in bytes
    pub max_response_size: usize,
    /// Timeout applied to sends that do not set their own, in milliseconds
    pub default_timeout_ms: Option<u64>,
    /// Seconds before an idle pooled connection is closed
    pub pool_idle_timeout_secs: u64,
    /// Maximum idle pooled connections per host
    pub pool_max_idle_per_host: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
            default_timeout_ms: None,
            pool_idle_timeout_secs: POOL_IDLE_TIMEOUT_SECS,
            pool_max_idle_per_host: POOL_MAX_IDLE_PER_HOST,
        }
    }
}

impl LimitsConfig {
    /// Send options derived from these limits
    #[must_use]
    pub fn send_options(&self) -> SendOptions {
        SendOptions {
            timeout: self.default_timeout_ms.map(Duration::from_millis),
            max_response_size: self.max_response_size,
        }
    }
}

impl Config {
    /// Parse configuration from a TOML document
    ///
    /// # Errors
    ///
    /// Returns error if the document cannot be parsed or is invalid
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ScribeError::ConfigError(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns error if configuration is invalid
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_response_size == 0 {
            return Err(ScribeError::ConfigError(
                "max_response_size must be > 0".to_string(),
            ));
        }

        if self.limits.default_timeout_ms == Some(0) {
            return Err(ScribeError::ConfigError(
                "default_timeout_ms must be > 0 when set".to_string(),
            ));
        }

        if !is_identifier(&self.render.server_binding) {
            return Err(ScribeError::ConfigError(format!(
                "server_binding is not a valid identifier: {:?}",
                self.render.server_binding
            )));
        }

        Ok(())
    }
}

/// Whether `name` can be used as a Rust binding in rendered source
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    name != "_" && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
