//! # Commit Transports
//!
//! How a sync session reaches a document's version log.
//!
//! - [`LocalTransport`] - calls an in-process [`CollabState`] directly
//! - [`HttpTransport`] - talks to `xfpad-server` over HTTP
//!
//! [`CollabState`]: crate::backend::collab::CollabState

pub mod http;
pub mod local;

pub use http::HttpTransport;
pub use local::LocalTransport;

use crate::client::error::TransportError;
use crate::shared::{Commit, CommitReceipt, CommitRequest, DocumentSnapshot};
use async_trait::async_trait;

/// Access to a version log
#[async_trait]
pub trait CommitTransport: Send + Sync {
    /// Head index and content of a document, creating it if needed
    async fn init(&self, doc_id: &str) -> Result<DocumentSnapshot, TransportError>;

    async fn submit(&self, doc_id: &str, request: CommitRequest) -> Result<CommitReceipt, TransportError>;

    /// Commit `index`, waiting for it to be appended.
    ///
    /// `Ok(None)` means the wait ran out without a commit; ask again.
    async fn fetch(&self, doc_id: &str, index: usize) -> Result<Option<Commit>, TransportError>;
}
