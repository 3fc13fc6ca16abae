//! # Sync State Machine
//!
//! Keeps one client's editing surface converged with a document's version
//! log. The machine is pure: it consumes [`SyncMessage`]s, reads and writes
//! the surface, and answers with [`SyncAction`]s for the session to carry out.
//! It never touches the network or the clock itself.
//!
//! ## States
//!
//! - **Idle**: nothing in flight. A local edit becomes a commit.
//! - **CommitPending**: one commit is in flight. Local edits only raise the
//!   retry flag; they are committed once the pending commit comes back.
//! - **Reconciling**: a foreign commit is being merged into the surface.
//!   Incoming commits queue up behind it.
//!
//! Reconciling can overlap with a pending commit: a foreign commit may land
//! while our own is still on its way.
//!
//! ## Merging
//!
//! The selection is written into the surface text as two sentinels, the
//! local changes since the head are diffed out, rebased over the remote
//! commit, and applied to the new head. The result is offered to the surface
//! with a compare-and-set against what was read; if the user typed in
//! between, the merge is re-run later from fresh state.
//!
//! Once our own commit comes back the surface is diffed against the head
//! again, so edits deferred while it was in flight go out next.

use crate::client::error::SyncError;
use crate::client::surface::EditingSurface;
use crate::client::sync::selection::{mark_selection, unmark_selection};
use crate::shared::ot::{apply_diff, compute_diff, rebase};
use crate::shared::{ClientId, Commit, CommitRequest, DocumentSnapshot, EditScript};
use serde::Serialize;
use std::collections::VecDeque;

/// Coarse machine state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Idle,
    CommitPending,
    Reconciling,
}

/// Snapshot of the machine for observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    /// Index of the last commit folded into the local head
    pub head: usize,
    pub phase: Phase,
    /// Remote commits waiting behind a reconcile
    pub queued: usize,
    pub retry_requested: bool,
}

/// Input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncMessage {
    /// The user changed the surface
    LocalEdit,
    /// The next commit from the log
    RemoteCommit { index: usize, commit: Commit },
    /// The log refused the pending commit; a fresh one may be built
    SubmitRejected { seq: u64 },
    /// The pending commit may not have arrived; send it again
    SubmitFailed { seq: u64 },
    /// Time to re-run an interrupted merge
    ReconcileRetry,
}

/// Work for the session to carry out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// Send a new commit
    Submit(CommitRequest),
    /// Send the pending commit again after a backoff
    Resubmit(CommitRequest),
    /// Deliver [`SyncMessage::ReconcileRetry`] shortly
    ScheduleReconcile,
}

/// The client's view of one document
#[derive(Debug)]
pub struct SyncMachine {
    client_id: ClientId,
    next_seq: u64,
    /// Head index at attach; `history[i]` is commit `base + 1 + i`
    base: usize,
    history: Vec<EditScript>,
    /// Content at the last fully merged commit
    head_content: String,
    queue: VecDeque<(usize, Commit)>,
    pending: Option<CommitRequest>,
    /// Remote diff being merged into the surface
    reconciling: Option<EditScript>,
    retry_requested: bool,
}

impl SyncMachine {
    /// Start from a snapshot of the log
    pub fn new(client_id: ClientId, snapshot: DocumentSnapshot) -> Self {
        Self {
            client_id,
            next_seq: 0,
            base: snapshot.head,
            history: Vec::new(),
            head_content: snapshot.content,
            queue: VecDeque::new(),
            pending: None,
            reconciling: None,
            retry_requested: false,
        }
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Index of the newest commit accepted from the log
    pub fn head(&self) -> usize {
        self.base + self.history.len()
    }

    /// Content as of the last fully merged commit
    pub fn head_content(&self) -> &str {
        &self.head_content
    }

    pub fn pending(&self) -> Option<&CommitRequest> {
        self.pending.as_ref()
    }

    pub fn phase(&self) -> Phase {
        if self.reconciling.is_some() {
            Phase::Reconciling
        } else if self.pending.is_some() {
            Phase::CommitPending
        } else {
            Phase::Idle
        }
    }

    pub fn status(&self) -> SyncStatus {
        SyncStatus {
            head: self.head(),
            phase: self.phase(),
            queued: self.queue.len(),
            retry_requested: self.retry_requested,
        }
    }

    /// Feed one message through the machine.
    ///
    /// Errors are fatal for the session: the log handed over history that
    /// cannot be replayed.
    pub fn handle<S>(&mut self, message: SyncMessage, surface: &mut S) -> Result<Vec<SyncAction>, SyncError>
    where
        S: EditingSurface + ?Sized,
    {
        let mut actions = Vec::new();
        match self.phase() {
            Phase::Idle => self.on_idle(message, surface, &mut actions)?,
            Phase::CommitPending => self.on_commit_pending(message, &mut actions)?,
            Phase::Reconciling => self.on_reconciling(message, surface, &mut actions)?,
        }
        self.settle(surface, &mut actions)?;
        Ok(actions)
    }

    fn on_idle<S>(&mut self, message: SyncMessage, surface: &mut S, actions: &mut Vec<SyncAction>) -> Result<(), SyncError>
    where
        S: EditingSurface + ?Sized,
    {
        match message {
            SyncMessage::LocalEdit => self.try_commit(surface, actions),
            SyncMessage::RemoteCommit { index, commit } => self.enqueue(index, commit),
            SyncMessage::SubmitRejected { seq } | SyncMessage::SubmitFailed { seq } => {
                tracing::debug!("[Sync] Ignoring late submit reply for #{}", seq);
                Ok(())
            }
            SyncMessage::ReconcileRetry => Ok(()),
        }
    }

    fn on_commit_pending(&mut self, message: SyncMessage, actions: &mut Vec<SyncAction>) -> Result<(), SyncError> {
        match message {
            SyncMessage::LocalEdit => {
                self.retry_requested = true;
                Ok(())
            }
            SyncMessage::RemoteCommit { index, commit } => self.enqueue(index, commit),
            SyncMessage::SubmitRejected { seq } => {
                self.on_rejected(seq);
                Ok(())
            }
            SyncMessage::SubmitFailed { seq } => {
                self.on_failed(seq, actions);
                Ok(())
            }
            SyncMessage::ReconcileRetry => Ok(()),
        }
    }

    fn on_reconciling<S>(&mut self, message: SyncMessage, surface: &mut S, actions: &mut Vec<SyncAction>) -> Result<(), SyncError>
    where
        S: EditingSurface + ?Sized,
    {
        match message {
            SyncMessage::LocalEdit => {
                self.retry_requested = true;
                Ok(())
            }
            SyncMessage::RemoteCommit { index, commit } => self.enqueue(index, commit),
            SyncMessage::SubmitRejected { seq } => {
                self.on_rejected(seq);
                Ok(())
            }
            SyncMessage::SubmitFailed { seq } => {
                self.on_failed(seq, actions);
                Ok(())
            }
            SyncMessage::ReconcileRetry => self.reconcile(surface, actions),
        }
    }

    fn on_rejected(&mut self, seq: u64) {
        if self.pending.as_ref().and_then(|p| p.seq) == Some(seq) {
            tracing::warn!("[Sync] Commit #{} rejected, rebuilding from head {}", seq, self.head());
            self.pending = None;
            self.retry_requested = true;
        }
    }

    fn on_failed(&mut self, seq: u64, actions: &mut Vec<SyncAction>) {
        if let Some(pending) = &self.pending {
            if pending.seq == Some(seq) {
                actions.push(SyncAction::Resubmit(pending.clone()));
            }
        }
    }

    /// Drain queued commits, then commit any deferred local edit
    fn settle<S>(&mut self, surface: &mut S, actions: &mut Vec<SyncAction>) -> Result<(), SyncError>
    where
        S: EditingSurface + ?Sized,
    {
        while self.reconciling.is_none() {
            if let Some((index, commit)) = self.queue.pop_front() {
                self.incorporate(index, commit, surface, actions)?;
                continue;
            }
            if self.retry_requested && self.pending.is_none() {
                self.retry_requested = false;
                self.try_commit(surface, actions)?;
            }
            break;
        }
        Ok(())
    }

    fn enqueue(&mut self, index: usize, commit: Commit) -> Result<(), SyncError> {
        let expected = self.head() + self.queue.len() + 1;
        if index < expected {
            tracing::debug!("[Sync] Dropping duplicate commit {}", index);
            return Ok(());
        }
        if index > expected {
            return Err(SyncError::OutOfOrder {
                expected,
                received: index,
            });
        }
        self.queue.push_back((index, commit));
        Ok(())
    }

    /// Diff the surface against the head and send it, unless nothing changed
    fn try_commit<S>(&mut self, surface: &mut S, actions: &mut Vec<SyncAction>) -> Result<(), SyncError>
    where
        S: EditingSurface + ?Sized,
    {
        let live = surface.live_state();
        let diff = compute_diff(&self.head_content, &live.text);
        if diff.is_empty() {
            return Ok(());
        }

        let request = CommitRequest {
            origin: self.client_id,
            seq: Some(self.next_seq),
            parent: self.head(),
            diff,
        };
        self.next_seq += 1;
        tracing::debug!(
            "[Sync] Submitting #{} on parent {} ({} ops)",
            self.next_seq - 1,
            request.parent,
            request.diff.len()
        );
        self.pending = Some(request.clone());
        actions.push(SyncAction::Submit(request));
        Ok(())
    }

    /// Re-express a commit's diff against the local head
    fn fast_forward(&self, index: usize, commit: &Commit) -> Result<EditScript, SyncError> {
        let parent = commit.parent.unwrap_or(0);
        let unseen = parent
            .checked_sub(self.base)
            .and_then(|offset| self.history.get(offset..))
            .ok_or(SyncError::MissingHistory {
                index,
                parent,
                base: self.base,
            })?;

        let mut diff = commit.diff.clone();
        for seen in unseen {
            diff = rebase(seen, &diff)?;
        }
        Ok(diff)
    }

    fn incorporate<S>(&mut self, index: usize, commit: Commit, surface: &mut S, actions: &mut Vec<SyncAction>) -> Result<(), SyncError>
    where
        S: EditingSurface + ?Sized,
    {
        let diff = self.fast_forward(index, &commit)?;
        self.history.push(diff.clone());

        if commit.origin == self.client_id {
            // the surface already shows our own change; commit whatever the
            // log's rebase left different
            self.head_content = apply_diff(&self.head_content, &diff)?;
            self.pending = None;
            self.retry_requested = true;
            tracing::debug!("[Sync] Own commit {} confirmed", index);
            return Ok(());
        }

        tracing::debug!("[Sync] Merging commit {} from {}", index, commit.origin);
        self.reconciling = Some(diff);
        self.reconcile(surface, actions)
    }

    fn reconcile<S>(&mut self, surface: &mut S, actions: &mut Vec<SyncAction>) -> Result<(), SyncError>
    where
        S: EditingSurface + ?Sized,
    {
        let Some(remote) = &self.reconciling else {
            return Ok(());
        };

        let live = surface.live_state();
        let local = compute_diff(&self.head_content, &mark_selection(&live));
        let local = rebase(remote, &local)?;
        let new_head = apply_diff(&self.head_content, remote)?;
        let merged = apply_diff(&new_head, &local)?;
        let next = unmark_selection(&merged, (live.selection_start, live.selection_end));

        if surface.adopt_if_unchanged(&live, next) {
            self.head_content = new_head;
            self.reconciling = None;
        } else {
            tracing::debug!("[Sync] Surface changed during merge, retrying");
            actions.push(SyncAction::ScheduleReconcile);
        }
        Ok(())
    }
}
