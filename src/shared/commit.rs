//! Commit and document wire types
//!
//! These structures travel between the version log and its clients. Field
//! names on the wire follow the established commit shape
//! `{ originID, parent, diff }`.

use crate::shared::error::OtError;
use crate::shared::ops::EditScript;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque token identifying the client a commit came from
pub type ClientId = Uuid;

/// One entry of a document's history
///
/// `diff` is expressed against the document state right after `parent`.
/// The synthetic root at index 0 has no parent and an empty diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    #[serde(rename = "originID")]
    pub origin: ClientId,
    pub parent: Option<usize>,
    pub diff: EditScript,
}

impl Commit {
    /// The synthetic root commit
    pub fn root() -> Self {
        Self {
            origin: Uuid::nil(),
            parent: None,
            diff: EditScript::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// A client's write request
///
/// `seq` is an optional per-client counter; the log treats a repeated
/// `(originID, seq)` pair as the same submission. Requests without one are
/// never deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRequest {
    #[serde(rename = "originID")]
    pub origin: ClientId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
    pub parent: usize,
    pub diff: EditScript,
}

impl CommitRequest {
    /// Decode a request from its JSON wire form
    pub fn from_json(bytes: &[u8]) -> Result<Self, OtError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Result of a successful submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    /// History index the commit was appended at
    pub index: usize,
    pub commit: Commit,
}

/// Head index and materialized content, handed to attaching clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub head: usize,
    pub content: String,
}

/// Summary of one document in the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub id: String,
    pub head: usize,
    /// Content length in characters
    pub length: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
