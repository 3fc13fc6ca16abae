/**
 * Server Initialization
 *
 * Builds the application state and router. The returned `AppState` shares
 * its registry with the router, so the caller can close documents on
 * shutdown.
 */

use crate::backend::routes::router::create_router;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;
use axum::Router;

/// Create and configure the Axum application
pub fn create_app(config: ServerConfig) -> (Router<()>, AppState) {
    tracing::info!(
        "[Server] Initializing (long-poll window {}s)",
        config.long_poll_timeout.as_secs()
    );

    let app_state = AppState::new(config);
    let app = create_router(app_state.clone());

    tracing::info!("[Server] Router configured");
    (app, app_state)
}
