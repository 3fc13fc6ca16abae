/**
 * Document Version Log
 *
 * One `DocumentLog` owns a document's commit history and materialized
 * content. `submit` is the only path that mutates either, and it runs under
 * the document's write lock from validation to append, so submissions to the
 * same document are fully serialized while other documents proceed
 * independently.
 *
 * Readers waiting for a commit that does not exist yet subscribe to a
 * `watch` channel carrying the latest head index. The history itself stays
 * the source of truth: a woken waiter always re-reads it.
 */

use crate::shared::ot::{apply_diff, rebase};
use crate::shared::{ClientId, Commit, CommitReceipt, CommitRequest, DocumentMetadata, DocumentSnapshot, OtError};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::{watch, RwLock};

/// Version log errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LogError {
    /// The submission names a parent the history does not have
    #[error("stale parent {parent}: history head is {head}")]
    StaleParent { parent: usize, head: usize },

    /// The submitted diff does not fit its parent's content
    #[error(transparent)]
    Malformed(#[from] OtError),

    /// The document was torn down
    #[error("document {doc_id} is closed")]
    DocumentClosed { doc_id: String },
}

/// Latest state published to waiters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSignal {
    Head(usize),
    Closed,
}

#[derive(Debug)]
struct LogState {
    commits: Vec<Commit>,
    /// Content length in characters after each commit
    lengths: Vec<usize>,
    content: String,
    /// History index of every `(origin, seq)` submission already appended
    submissions: HashMap<(ClientId, u64), usize>,
    closed: bool,
    updated_at: DateTime<Utc>,
}

impl LogState {
    fn head(&self) -> usize {
        self.commits.len() - 1
    }
}

/// Commit history of a single document
#[derive(Debug)]
pub struct DocumentLog {
    id: String,
    created_at: DateTime<Utc>,
    state: RwLock<LogState>,
    signal: watch::Sender<LogSignal>,
}

impl DocumentLog {
    /// Create an empty document holding only the root commit
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        let (signal, _) = watch::channel(LogSignal::Head(0));
        Self {
            id: id.into(),
            created_at: now,
            state: RwLock::new(LogState {
                commits: vec![Commit::root()],
                lengths: vec![0],
                content: String::new(),
                submissions: HashMap::new(),
                closed: false,
                updated_at: now,
            }),
            signal,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Head index and current content
    pub async fn snapshot(&self) -> Result<DocumentSnapshot, LogError> {
        let state = self.state.read().await;
        if state.closed {
            return Err(self.closed_error());
        }
        Ok(DocumentSnapshot {
            head: state.head(),
            content: state.content.clone(),
        })
    }

    pub async fn metadata(&self) -> DocumentMetadata {
        let state = self.state.read().await;
        DocumentMetadata {
            id: self.id.clone(),
            head: state.head(),
            length: state.lengths[state.head()],
            created_at: self.created_at,
            updated_at: state.updated_at,
        }
    }

    /// Rebase `request.diff` over every commit after its parent and append it.
    ///
    /// Nothing is touched unless the whole chain succeeds. A repeated
    /// `(originID, seq)` pair returns the commit appended the first time.
    pub async fn submit(&self, request: CommitRequest) -> Result<CommitReceipt, LogError> {
        let mut state = self.state.write().await;
        if state.closed {
            return Err(self.closed_error());
        }

        if let Some(seq) = request.seq {
            if let Some(&index) = state.submissions.get(&(request.origin, seq)) {
                tracing::debug!(
                    "[Collab] {}: duplicate submission {}#{} already at {}",
                    self.id, request.origin, seq, index
                );
                return Ok(CommitReceipt {
                    index,
                    commit: state.commits[index].clone(),
                });
            }
        }

        let head = state.head();
        if request.parent > head {
            return Err(LogError::StaleParent {
                parent: request.parent,
                head,
            });
        }
        request.diff.validate(state.lengths[request.parent])?;

        let mut diff = request.diff;
        for commit in &state.commits[request.parent + 1..] {
            diff = rebase(&commit.diff, &diff)?;
        }
        let content = apply_diff(&state.content, &diff)?;

        let commit = Commit {
            origin: request.origin,
            parent: Some(head),
            diff,
        };
        let index = head + 1;
        state.lengths.push(content.chars().count());
        state.content = content;
        state.commits.push(commit.clone());
        if let Some(seq) = request.seq {
            state.submissions.insert((request.origin, seq), index);
        }
        state.updated_at = Utc::now();
        self.signal.send_replace(LogSignal::Head(index));

        tracing::debug!(
            "[Collab] {}: appended commit {} from {} (parent {})",
            self.id, index, request.origin, request.parent
        );
        Ok(CommitReceipt { index, commit })
    }

    /// Commit at `index`, waiting until it is appended if necessary.
    ///
    /// Every waiter for the same index resolves once the commit lands.
    /// Dropping the future releases the wait.
    pub async fn fetch(&self, index: usize) -> Result<Commit, LogError> {
        let mut signal = self.signal.subscribe();
        loop {
            {
                let state = self.state.read().await;
                if let Some(commit) = state.commits.get(index) {
                    return Ok(commit.clone());
                }
                if state.closed {
                    return Err(self.closed_error());
                }
            }
            if signal.changed().await.is_err() {
                return Err(self.closed_error());
            }
        }
    }

    /// Close the document and release every waiter
    pub async fn close(&self) {
        let mut state = self.state.write().await;
        if state.closed {
            return;
        }
        state.closed = true;
        self.signal.send_replace(LogSignal::Closed);
        tracing::info!(
            "[Collab] {}: closed at head {} ({} waiters released)",
            self.id,
            state.head(),
            self.signal.receiver_count()
        );
    }

    /// Watch the latest head index
    pub fn subscribe(&self) -> watch::Receiver<LogSignal> {
        self.signal.subscribe()
    }

    fn closed_error(&self) -> LogError {
        LogError::DocumentClosed {
            doc_id: self.id.clone(),
        }
    }
}
