/**
 * Router Configuration
 *
 * Assembles every route into a single Axum router.
 *
 * - `GET  /docs` - list documents
 * - `GET  /docs/{doc_id}` - attach: head index and content
 * - `PUT  /docs/{doc_id}/commits` - submit a commit
 * - `GET  /docs/{doc_id}/commits/{index}` - long-poll one commit
 * - `GET  /docs/{doc_id}/stream` - SSE stream of commits
 *
 * Unknown routes answer 404 with the standard JSON error body.
 */

use crate::backend::collab::handlers::{
    handle_commit_stream, handle_fetch_commit, handle_init_document, handle_list_documents,
    handle_submit_commit,
};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use axum::{
    http::StatusCode,
    routing::{get, put},
    Router,
};

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    Router::new()
        .route("/docs", get(handle_list_documents))
        .route("/docs/{doc_id}", get(handle_init_document))
        .route("/docs/{doc_id}/commits", put(handle_submit_commit))
        .route("/docs/{doc_id}/commits/{index}", get(handle_fetch_commit))
        .route("/docs/{doc_id}/stream", get(handle_commit_stream))
        .fallback(|| async { BackendError::request(StatusCode::NOT_FOUND, "404 Not Found") })
        .with_state(app_state)
}
