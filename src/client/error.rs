//! Client Error Types
//!
//! - `TransportError` - a request to the version log failed or was refused
//! - `SyncError` - the sync machine cannot continue for this document
//!
//! Contention is never an error here: a stale parent or a surface that
//! changed mid-merge is retried by the machine. Only corrupt commits, a
//! commit the log refuses, gaps in the pulled history, and a closed document
//! stop a session.

use crate::backend::collab::LogError;
use crate::shared::OtError;
use thiserror::Error;

/// Failures talking to the version log
#[derive(Debug, Error)]
pub enum TransportError {
    /// The commit's parent is unknown to the log
    #[error("stale parent: {0}")]
    StaleParent(String),

    /// The log refused the commit outright
    #[error("commit rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The document was closed
    #[error("document closed: {0}")]
    Closed(String),

    /// The server failed; the request may have been applied
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl TransportError {
    /// Whether the same request may be sent again unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Server { .. })
    }

    /// Whether the session cannot go on after this error.
    ///
    /// Resending a refused commit would be refused again.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Closed(_) | Self::Rejected { .. })
    }
}

impl From<LogError> for TransportError {
    fn from(err: LogError) -> Self {
        match err {
            LogError::StaleParent { .. } => Self::StaleParent(err.to_string()),
            LogError::Malformed(e) => Self::Rejected {
                status: 422,
                message: e.to_string(),
            },
            LogError::DocumentClosed { doc_id } => Self::Closed(doc_id),
        }
    }
}

/// Fatal sync session errors
#[derive(Debug, Error)]
pub enum SyncError {
    /// A commit or local diff could not be applied
    #[error(transparent)]
    Malformed(#[from] OtError),

    /// A remote commit was built on history this client never held
    #[error("commit {index} has parent {parent}, but local history starts after {base}")]
    MissingHistory {
        index: usize,
        parent: usize,
        base: usize,
    },

    /// The pull delivered commits out of sequence
    #[error("expected commit {expected}, received {received}")]
    OutOfOrder { expected: usize, received: usize },

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The session is no longer running
    #[error("session detached")]
    Detached,
}
