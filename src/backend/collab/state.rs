/**
 * Document Registry
 *
 * Maps document IDs to their version logs. Documents are created lazily on
 * first reference and live until closed. The registry lock is only held long
 * enough to look up or insert an entry; all per-document work happens on the
 * document's own lock, so unrelated documents never contend.
 */

use crate::backend::collab::log::{DocumentLog, LogError};
use crate::shared::{Commit, CommitReceipt, CommitRequest, DocumentMetadata, DocumentSnapshot};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Collaborative editing state managed by the server
///
/// Cloning is cheap; clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct CollabState {
    /// Map of document ID to its version log
    documents: Arc<RwLock<HashMap<String, Arc<DocumentLog>>>>,
}

impl CollabState {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create a document
    pub async fn document(&self, doc_id: &str) -> Arc<DocumentLog> {
        {
            let docs = self.documents.read().await;
            if let Some(log) = docs.get(doc_id) {
                return log.clone();
            }
        }

        let mut docs = self.documents.write().await;
        docs.entry(doc_id.to_string())
            .or_insert_with(|| {
                tracing::info!("[Collab] Created document {}", doc_id);
                Arc::new(DocumentLog::new(doc_id))
            })
            .clone()
    }

    /// Head index and content for an attaching client
    pub async fn init_document(&self, doc_id: &str) -> Result<DocumentSnapshot, LogError> {
        self.document(doc_id).await.snapshot().await
    }

    /// Rebase and append a client's commit
    pub async fn submit_commit(
        &self,
        doc_id: &str,
        request: CommitRequest,
    ) -> Result<CommitReceipt, LogError> {
        let log = self.document(doc_id).await;
        let result = log.submit(request).await;
        if let Err(e) = &result {
            tracing::warn!("[Collab] {}: submission rejected: {}", doc_id, e);
        }
        result
    }

    /// Commit at `index`, waiting for it if it does not exist yet
    pub async fn fetch_commit(&self, doc_id: &str, index: usize) -> Result<Commit, LogError> {
        self.document(doc_id).await.fetch(index).await
    }

    /// Get document metadata
    ///
    /// Returns None if the document was never referenced.
    pub async fn metadata(&self, doc_id: &str) -> Option<DocumentMetadata> {
        let log = self.documents.read().await.get(doc_id).cloned()?;
        Some(log.metadata().await)
    }

    /// Metadata for every live document, sorted by ID
    pub async fn list_documents(&self) -> Vec<DocumentMetadata> {
        let logs: Vec<Arc<DocumentLog>> = self.documents.read().await.values().cloned().collect();
        let mut listing = Vec::with_capacity(logs.len());
        for log in logs {
            listing.push(log.metadata().await);
        }
        listing.sort_by(|a, b| a.id.cmp(&b.id));
        listing
    }

    /// Remove a document and release its waiters
    ///
    /// Returns false if the document did not exist. A later reference to the
    /// same ID starts a fresh, empty history.
    pub async fn close_document(&self, doc_id: &str) -> bool {
        let removed = self.documents.write().await.remove(doc_id);
        match removed {
            Some(log) => {
                log.close().await;
                true
            }
            None => false,
        }
    }

    /// Close every document
    pub async fn shutdown(&self) {
        let logs: Vec<Arc<DocumentLog>> = self.documents.write().await.drain().map(|(_, log)| log).collect();
        tracing::info!("[Collab] Shutting down {} documents", logs.len());
        for log in logs {
            log.close().await;
        }
    }
}
