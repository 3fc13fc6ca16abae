//! # Sync Session
//!
//! Runs a [`SyncMachine`] against a transport and an editing surface.
//!
//! ## Tasks
//!
//! - **Driver**: owns the machine and the surface and processes one message
//!   at a time from the session inbox.
//! - **Puller**: fetches commit `head + 1`, `head + 2`, ... forever and posts
//!   each to the inbox, backing off when the transport fails.
//! - **Submitters**: one short task per commit in flight. Each posts its
//!   outcome back to the inbox.
//!
//! The machine never waits on the network, so a slow submit cannot stall
//! merging of incoming commits.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use xfpad::client::{Config, HttpTransport, SharedBuffer, SyncSession};
//!
//! # async fn run() -> Result<(), xfpad::client::SyncError> {
//! let buffer = SharedBuffer::new("");
//! let transport = Arc::new(HttpTransport::new(Config::new()));
//! let handle = SyncSession::attach("notes", transport, buffer.clone(), Config::new()).await?;
//!
//! buffer.edit(|b| b.type_text("hello"));
//! handle.notify_edit()?;
//! # handle.detach().await
//! # }
//! ```

use crate::client::config::Config;
use crate::client::error::{SyncError, TransportError};
use crate::client::surface::{EditingSurface, LiveState};
use crate::client::sync::machine::{SyncAction, SyncMachine, SyncMessage, SyncStatus};
use crate::client::sync::retry::BackoffStrategy;
use crate::client::transport::CommitTransport;
use crate::shared::{ClientId, CommitRequest};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

enum Inbox {
    Sync(SyncMessage),
    Failed(SyncError),
    Detach,
}

/// Entry point for attaching a surface to a document
pub struct SyncSession;

impl SyncSession {
    /// Load the document, show it on `surface`, and start syncing.
    ///
    /// Whatever the surface held before is replaced.
    pub async fn attach<T, S>(
        doc_id: impl Into<String>,
        transport: Arc<T>,
        mut surface: S,
        config: Config,
    ) -> Result<SyncHandle, SyncError>
    where
        T: CommitTransport + 'static,
        S: EditingSurface + 'static,
    {
        let doc_id = doc_id.into();
        let client_id = config.client_id().unwrap_or_else(uuid::Uuid::new_v4);
        let snapshot = transport.init(&doc_id).await?;
        tracing::info!(
            "[Sync] {}: attached as {} at head {}",
            doc_id, client_id, snapshot.head
        );

        surface.set_live_state(LiveState::new(snapshot.content.clone()));
        let head = snapshot.head;
        let machine = SyncMachine::new(client_id, snapshot);
        let (status_tx, status_rx) = watch::channel(machine.status());
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        let puller = tokio::spawn(pull(
            transport.clone(),
            doc_id.clone(),
            head + 1,
            inbox_tx.clone(),
            config.backoff(),
        ));

        let driver = Driver {
            doc_id,
            machine,
            surface,
            transport,
            inbox: inbox_tx.clone(),
            status: status_tx,
            config,
            resubmit_attempt: 0,
        };
        let driver = tokio::spawn(driver.run(inbox_rx));

        Ok(SyncHandle {
            client_id,
            inbox: inbox_tx,
            status: status_rx,
            driver,
            puller,
        })
    }
}

/// Control of a running session
///
/// Dropping the handle stops the session.
pub struct SyncHandle {
    client_id: ClientId,
    inbox: mpsc::UnboundedSender<Inbox>,
    status: watch::Receiver<SyncStatus>,
    driver: JoinHandle<Result<(), SyncError>>,
    puller: JoinHandle<()>,
}

impl SyncHandle {
    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Tell the session the surface changed
    pub fn notify_edit(&self) -> Result<(), SyncError> {
        self.inbox
            .send(Inbox::Sync(SyncMessage::LocalEdit))
            .map_err(|_| SyncError::Detached)
    }

    pub fn status(&self) -> SyncStatus {
        self.status.borrow().clone()
    }

    /// Watch status changes
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.status.clone()
    }

    /// Whether the session stopped on its own
    pub fn is_finished(&self) -> bool {
        self.driver.is_finished()
    }

    /// Stop syncing and report how the session ended.
    ///
    /// Edits not yet confirmed by the log may be lost.
    pub async fn detach(mut self) -> Result<(), SyncError> {
        self.puller.abort();
        // the driver may already be gone; its result says why
        let _ = self.inbox.send(Inbox::Detach);
        match (&mut self.driver).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("[Sync] Driver task failed: {}", e);
                Err(SyncError::Detached)
            }
        }
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.puller.abort();
        self.driver.abort();
    }
}

struct Driver<T, S> {
    doc_id: String,
    machine: SyncMachine,
    surface: S,
    transport: Arc<T>,
    inbox: mpsc::UnboundedSender<Inbox>,
    status: watch::Sender<SyncStatus>,
    config: Config,
    resubmit_attempt: u32,
}

impl<T, S> Driver<T, S>
where
    T: CommitTransport + 'static,
    S: EditingSurface + 'static,
{
    async fn run(mut self, mut inbox: mpsc::UnboundedReceiver<Inbox>) -> Result<(), SyncError> {
        while let Some(event) = inbox.recv().await {
            let message = match event {
                Inbox::Sync(message) => message,
                Inbox::Failed(e) => {
                    tracing::error!("[Sync] {}: stopping: {}", self.doc_id, e);
                    return Err(e);
                }
                Inbox::Detach => break,
            };

            let actions = match self.machine.handle(message, &mut self.surface) {
                Ok(actions) => actions,
                Err(e) => {
                    tracing::error!("[Sync] {}: stopping: {}", self.doc_id, e);
                    return Err(e);
                }
            };
            self.status.send_replace(self.machine.status());

            for action in actions {
                self.perform(action);
            }
        }

        tracing::info!(
            "[Sync] {}: detached at head {}",
            self.doc_id,
            self.machine.head()
        );
        Ok(())
    }

    fn perform(&mut self, action: SyncAction) {
        match action {
            SyncAction::Submit(request) => {
                self.resubmit_attempt = 0;
                self.spawn_submit(request, Duration::ZERO);
            }
            SyncAction::Resubmit(request) => {
                let delay = self.config.backoff().delay(self.resubmit_attempt);
                self.resubmit_attempt = self.resubmit_attempt.saturating_add(1);
                tracing::debug!("[Sync] {}: resubmitting in {:?}", self.doc_id, delay);
                self.spawn_submit(request, delay);
            }
            SyncAction::ScheduleReconcile => {
                let inbox = self.inbox.clone();
                let delay = self.config.reconcile_retry_delay();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = inbox.send(Inbox::Sync(SyncMessage::ReconcileRetry));
                });
            }
        }
    }

    fn spawn_submit(&self, request: CommitRequest, delay: Duration) {
        let transport = self.transport.clone();
        let doc_id = self.doc_id.clone();
        let inbox = self.inbox.clone();

        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let seq = request.seq.unwrap_or_default();
            let event = match transport.submit(&doc_id, request).await {
                Ok(receipt) => {
                    tracing::debug!("[Sync] {}: #{} accepted at {}", doc_id, seq, receipt.index);
                    return;
                }
                Err(e) if e.is_fatal() => {
                    tracing::error!("[Sync] {}: #{} refused: {}", doc_id, seq, e);
                    Inbox::Failed(e.into())
                }
                Err(e) if e.is_retryable() => {
                    tracing::warn!("[Sync] {}: #{} may not have arrived: {}", doc_id, seq, e);
                    Inbox::Sync(SyncMessage::SubmitFailed { seq })
                }
                Err(e) => {
                    tracing::warn!("[Sync] {}: #{} is stale: {}", doc_id, seq, e);
                    Inbox::Sync(SyncMessage::SubmitRejected { seq })
                }
            };
            let _ = inbox.send(event);
        });
    }
}

/// Post every commit from `next` onward to the inbox
async fn pull<T>(
    transport: Arc<T>,
    doc_id: String,
    mut next: usize,
    inbox: mpsc::UnboundedSender<Inbox>,
    backoff: BackoffStrategy,
) where
    T: CommitTransport + 'static,
{
    let mut failures = 0u32;
    loop {
        match transport.fetch(&doc_id, next).await {
            Ok(Some(commit)) => {
                failures = 0;
                let message = SyncMessage::RemoteCommit {
                    index: next,
                    commit,
                };
                if inbox.send(Inbox::Sync(message)).is_err() {
                    return;
                }
                next += 1;
            }
            Ok(None) => {}
            Err(e @ TransportError::Closed(_)) => {
                tracing::info!("[Sync] {}: document closed", doc_id);
                let _ = inbox.send(Inbox::Failed(e.into()));
                return;
            }
            Err(e) => {
                let delay = backoff.delay(failures);
                failures = failures.saturating_add(1);
                tracing::warn!(
                    "[Sync] {}: fetch of {} failed, retrying in {:?}: {}",
                    doc_id, next, delay, e
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
