/**
 * Backend Error Types
 *
 * Everything a version log route can answer with besides success. Log
 * failures are carried unchanged and mapped to statuses a client can act on:
 *
 * - stale parent - 409 Conflict, refetch and resubmit
 * - malformed script - 422 Unprocessable Entity, the diff is corrupt
 * - closed document - 410 Gone
 *
 * Requests the server cannot even interpret answer 400 or 404.
 */

use crate::backend::collab::log::LogError;
use axum::http::StatusCode;
use thiserror::Error;

/// Route failures
///
/// ```rust
/// use xfpad::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::request(StatusCode::NOT_FOUND, "no such route");
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request could not be routed or decoded
    #[error("Bad request ({status}): {message}")]
    Request { status: StatusCode, message: String },

    /// The request asks for something the commit protocol forbids
    #[error("Protocol violation: {0}")]
    Protocol(String),

    #[error(transparent)]
    Log(#[from] LogError),

    /// A response body could not be encoded
    #[error("Encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl BackendError {
    pub fn request(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Request {
            status,
            message: message.into(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// HTTP status for the response
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Request { status, .. } => *status,
            Self::Protocol(_) => StatusCode::BAD_REQUEST,
            Self::Log(LogError::StaleParent { .. }) => StatusCode::CONFLICT,
            Self::Log(LogError::Malformed(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Log(LogError::DocumentClosed { .. }) => StatusCode::GONE,
            Self::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text for the `error` field of the response body
    pub fn message(&self) -> String {
        match self {
            Self::Request { message, .. } | Self::Protocol(message) => message.clone(),
            Self::Log(err) => err.to_string(),
            Self::Encode(err) => err.to_string(),
        }
    }
}
