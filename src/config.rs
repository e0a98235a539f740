//! Configuration management for the DateTime MCP Server
//!
//! Handles environment variables and configuration loading.

use crate::error::{ConfigError, Result};

/// Environment variable overriding the advertised server name
pub const SERVER_NAME_ENV: &str = "DATETIME_MCP_SERVER_NAME";

/// Environment variable selecting the log level
pub const LOG_LEVEL_ENV: &str = "DATETIME_MCP_LOG_LEVEL";

const DEFAULT_SERVER_NAME: &str = "datetime-server";
const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration for the DateTime MCP Server
#[derive(Debug, Clone)]
pub struct Config {
    /// Name reported in the `initialize` handshake
    pub server_name: String,

    /// Version reported in the `initialize` handshake
    pub server_version: String,

    /// Log level for the stderr subscriber
    pub log_level: String,
}

impl Config {
    /// Create a new configuration from the process environment
    pub fn new() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_name = lookup(SERVER_NAME_ENV).unwrap_or_else(|| DEFAULT_SERVER_NAME.to_string());

        let log_level = lookup(LOG_LEVEL_ENV)
            .map(|level| level.trim().to_lowercase())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let config = Self {
            server_name,
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level,
        };
        config.validate()?;

        Ok(config)
    }

    /// Override the log level (e.g. from the command line)
    pub fn with_log_level(mut self, level: impl Into<String>) -> Result<Self> {
        self.log_level = level.into().trim().to_lowercase();
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.server_name.trim().is_empty() {
            return Err(ConfigError::InvalidConfig {
                message: "server name must not be empty".to_string(),
            }
            .into());
        }

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "unknown log level '{}', expected one of {}",
                    self.log_level,
                    LOG_LEVELS.join(", ")
                ),
            }
            .into());
        }

        Ok(())
    }
}
