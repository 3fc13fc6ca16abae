//! Application configuration module
//!
//! Settings common to the server and its clients. Values can be built in code
//! with [`AppConfigBuilder`] or read from a TOML file:
//!
//! ```toml
//! server_url = "http://127.0.0.1:3000"
//! long_poll_timeout = 25
//! log_filter = "xfpad=debug"
//! ```

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default long-poll window in seconds
pub const DEFAULT_LONG_POLL_SECS: u64 = 25;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Server URL
    pub server_url: Option<String>,
    /// Seconds a commit fetch may wait before the server answers "nothing yet"
    #[serde(default = "default_long_poll")]
    pub long_poll_timeout: u64,
    /// `tracing` filter directive
    pub log_filter: Option<String>,
}

fn default_long_poll() -> u64 {
    DEFAULT_LONG_POLL_SECS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            long_poll_timeout: DEFAULT_LONG_POLL_SECS,
            log_filter: None,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.server_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }
        if self.long_poll_timeout == 0 {
            return Err(ConfigError::InvalidValue {
                field: "long_poll_timeout",
                message: "must be at least one second".to_string(),
            });
        }
        Ok(())
    }

    pub fn long_poll(&self) -> Duration {
        Duration::from_secs(self.long_poll_timeout)
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    long_poll_timeout: Option<u64>,
    log_filter: Option<String>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    pub fn long_poll_timeout(mut self, seconds: u64) -> Self {
        self.long_poll_timeout = Some(seconds);
        self
    }

    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let config = AppConfig {
            server_url: self.server_url,
            long_poll_timeout: self.long_poll_timeout.unwrap_or(DEFAULT_LONG_POLL_SECS),
            log_filter: self.log_filter,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
