/**
 * Application State Management
 *
 * `AppState` is the single state container handed to the router. The
 * `FromRef` implementations let handlers extract only the part they need,
 * following Axum's recommended pattern.
 *
 * # Example
 *
 * ```rust
 * use xfpad::backend::collab::CollabState;
 * use axum::extract::State;
 *
 * async fn handler(State(collab): State<CollabState>) {
 *     let _ = collab.list_documents().await;
 * }
 * ```
 */

use crate::backend::collab::state::CollabState;
use crate::backend::server::config::ServerConfig;
use axum::extract::FromRef;

/// Application state shared by every request handler
#[derive(Debug, Clone)]
pub struct AppState {
    /// Document registry
    pub collab: CollabState,

    /// Resolved server settings
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            collab: CollabState::new(),
            config,
        }
    }
}

impl FromRef<AppState> for CollabState {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.collab.clone()
    }
}

impl FromRef<AppState> for ServerConfig {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
