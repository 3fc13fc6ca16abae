/**
 * Server Configuration
 *
 * Settings are read from the environment, optionally overlaid by a TOML
 * file named in `XFPAD_CONFIG`:
 *
 * - `SERVER_PORT` - listen port (default 3000)
 * - `LONG_POLL_TIMEOUT_SECS` - how long a commit fetch may wait (default 25)
 * - `RUST_LOG` - tracing filter (default `info`)
 *
 * Unparseable environment values fall back to their defaults with a warning
 * rather than stopping the server.
 */

use crate::shared::config::{AppConfig, ConfigError, DEFAULT_LONG_POLL_SECS};
use std::net::SocketAddr;
use std::time::Duration;

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;

const DEFAULT_LOG_FILTER: &str = "info";

/// Resolved server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub long_poll_timeout: Duration,
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            long_poll_timeout: Duration::from_secs(DEFAULT_LONG_POLL_SECS),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup("XFPAD_CONFIG") {
            let file = AppConfig::load(&path)?;
            tracing::info!("[Config] Loaded {}", path);
            config.apply(&file);
        }

        if let Some(port) = lookup("SERVER_PORT") {
            match port.parse::<u16>() {
                Ok(port) => config.port = port,
                Err(e) => tracing::warn!("[Config] Ignoring SERVER_PORT={}: {}", port, e),
            }
        }
        if let Some(secs) = lookup("LONG_POLL_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) if secs > 0 => config.long_poll_timeout = Duration::from_secs(secs),
                _ => tracing::warn!("[Config] Ignoring LONG_POLL_TIMEOUT_SECS={}", secs),
            }
        }
        if let Some(filter) = lookup("RUST_LOG") {
            config.log_filter = filter;
        }

        Ok(config)
    }

    fn apply(&mut self, file: &AppConfig) {
        self.long_poll_timeout = file.long_poll();
        if let Some(filter) = &file.log_filter {
            self.log_filter = filter.clone();
        }
    }

    /// Address to bind on all interfaces
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
