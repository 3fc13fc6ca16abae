/**
 * Error Conversion
 *
 * Backend errors implement `IntoResponse`, so handlers return them directly.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "stale parent 9: history head is 2",
 *   "status": 409
 * }
 * ```
 */

use crate::backend::error::types::BackendError;
use axum::{
    response::{IntoResponse, Response},
    Json,
};

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("[Http] {}", self);
        }

        let body = serde_json::json!({
            "error": self.message(),
            "status": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}
