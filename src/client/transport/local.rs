//! In-process transport

use super::CommitTransport;
use crate::backend::collab::CollabState;
use crate::client::error::TransportError;
use crate::shared::{Commit, CommitReceipt, CommitRequest, DocumentSnapshot};
use async_trait::async_trait;

/// Transport straight into a [`CollabState`] in the same process
#[derive(Debug, Clone, Default)]
pub struct LocalTransport {
    collab: CollabState,
}

impl LocalTransport {
    pub fn new(collab: CollabState) -> Self {
        Self { collab }
    }

    pub fn collab(&self) -> &CollabState {
        &self.collab
    }
}

#[async_trait]
impl CommitTransport for LocalTransport {
    async fn init(&self, doc_id: &str) -> Result<DocumentSnapshot, TransportError> {
        Ok(self.collab.init_document(doc_id).await?)
    }

    async fn submit(&self, doc_id: &str, request: CommitRequest) -> Result<CommitReceipt, TransportError> {
        Ok(self.collab.submit_commit(doc_id, request).await?)
    }

    async fn fetch(&self, doc_id: &str, index: usize) -> Result<Option<Commit>, TransportError> {
        Ok(Some(self.collab.fetch_commit(doc_id, index).await?))
    }
}
