use crate::client::sync::retry::BackoffStrategy;
use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};
use crate::shared::ClientId;
use std::time::Duration;

/// Default server URL
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Pause before re-trying a merge the user interrupted
const DEFAULT_RECONCILE_RETRY: Duration = Duration::from_millis(25);

/// Client configuration wrapper.
#[derive(Debug, Clone)]
pub struct Config {
    app: AppConfig,
    client_id: Option<ClientId>,
    backoff: BackoffStrategy,
    reconcile_retry_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        let server_url =
            std::env::var("CLIENT_API_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        let app = match AppConfig::builder().server_url(server_url).build() {
            Ok(app) => app,
            Err(e) => {
                tracing::warn!("[Config] Ignoring CLIENT_API_URL: {}", e);
                AppConfig::default()
            }
        };
        Self::from_app(app)
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self::from_app(builder.build()?))
    }

    fn from_app(app: AppConfig) -> Self {
        Self {
            app,
            client_id: None,
            backoff: BackoffStrategy::default(),
            reconcile_retry_delay: DEFAULT_RECONCILE_RETRY,
        }
    }

    /// Use a fixed client id instead of a fresh one per session
    pub fn with_client_id(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffStrategy) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_reconcile_retry_delay(mut self, delay: Duration) -> Self {
        self.reconcile_retry_delay = delay;
        self
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url(), path)
    }

    pub fn server_url(&self) -> &str {
        self.app.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    pub fn client_id(&self) -> Option<ClientId> {
        self.client_id
    }

    /// Delay schedule for resubmissions and failed pulls
    pub fn backoff(&self) -> BackoffStrategy {
        self.backoff
    }

    pub fn reconcile_retry_delay(&self) -> Duration {
        self.reconcile_retry_delay
    }

    /// How long the server may hold a fetch open
    pub fn long_poll(&self) -> Duration {
        self.app.long_poll()
    }
}
