/**
 * Collaborative Editing Handlers
 *
 * HTTP shim over the document registry:
 * - GET  /docs                          - list documents
 * - GET  /docs/{doc_id}                 - head index and content
 * - PUT  /docs/{doc_id}/commits         - submit a commit
 * - GET  /docs/{doc_id}/commits/{index} - long-poll for one commit
 * - GET  /docs/{doc_id}/stream?from=N   - Server-Sent Events of commits
 *
 * A long-poll that outlives the configured window answers 204 No Content and
 * the client asks again. Nothing is lost: the commit will still be at that
 * index when it arrives.
 */

use crate::backend::collab::state::CollabState;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::{CommitReceipt, CommitRequest, DocumentMetadata, DocumentSnapshot};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures_util::stream;
use serde::Deserialize;

/// Handle document listing (GET /docs)
pub async fn handle_list_documents(State(collab): State<CollabState>) -> Json<Vec<DocumentMetadata>> {
    Json(collab.list_documents().await)
}

/// Handle client attach (GET /docs/{doc_id})
pub async fn handle_init_document(
    State(collab): State<CollabState>,
    Path(doc_id): Path<String>,
) -> Result<Json<DocumentSnapshot>, BackendError> {
    let snapshot = collab.init_document(&doc_id).await?;
    tracing::info!("[Collab] {}: client attached at head {}", doc_id, snapshot.head);
    Ok(Json(snapshot))
}

/// Handle commit submission (PUT /docs/{doc_id}/commits)
///
/// The body is a `CommitRequest`. Responds with the appended commit and its
/// index, 409 when the parent is unknown, or 422 when the diff is corrupt.
pub async fn handle_submit_commit(
    State(collab): State<CollabState>,
    Path(doc_id): Path<String>,
    body: Bytes,
) -> Result<Json<CommitReceipt>, BackendError> {
    let request = CommitRequest::from_json(&body).map_err(|e| {
        tracing::warn!("[Collab] {}: unreadable commit ({} bytes): {}", doc_id, body.len(), e);
        BackendError::request(StatusCode::BAD_REQUEST, format!("invalid commit: {}", e))
    })?;

    let receipt = collab.submit_commit(&doc_id, request).await?;
    Ok(Json(receipt))
}

/// Handle commit long-poll (GET /docs/{doc_id}/commits/{index})
pub async fn handle_fetch_commit(
    State(app_state): State<AppState>,
    Path((doc_id, index)): Path<(String, usize)>,
) -> Result<Response, BackendError> {
    if index == 0 {
        return Err(BackendError::protocol("commit 0 is the root; fetch from 1"));
    }

    let wait = app_state.config.long_poll_timeout;
    match tokio::time::timeout(wait, app_state.collab.fetch_commit(&doc_id, index)).await {
        Ok(commit) => Ok(Json(commit?).into_response()),
        Err(_) => {
            tracing::debug!("[Collab] {}: long-poll for {} timed out", doc_id, index);
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    /// First commit index to deliver (default 1)
    pub from: Option<usize>,
}

/// Handle commit streaming (GET /docs/{doc_id}/stream)
///
/// Emits every commit from `from` onward as an SSE event named `commit`
/// whose id is the commit's index. The stream ends when the document closes.
pub async fn handle_commit_stream(
    State(collab): State<CollabState>,
    Path(doc_id): Path<String>,
    Query(query): Query<StreamQuery>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, axum::Error>>> {
    let log = collab.document(&doc_id).await;
    let from = query.from.unwrap_or(1).max(1);
    tracing::info!("[Collab] {}: stream opened from {}", doc_id, from);

    let stream = stream::unfold((log, from), |(log, index)| async move {
        match log.fetch(index).await {
            Ok(commit) => {
                let event = Event::default()
                    .event("commit")
                    .id(index.to_string())
                    .json_data(&commit);
                Some((event, (log, index + 1)))
            }
            Err(e) => {
                tracing::info!("[Collab] {}: stream ended: {}", log.id(), e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
