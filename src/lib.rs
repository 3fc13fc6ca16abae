//! XFPad - Main Library
//!
//! XFPad is a real-time collaborative plain-text editor core. Clients edit a
//! local copy of a document and exchange character-level edit scripts through
//! a per-document version log; operational transformation keeps every copy
//! converging on the same text.
//!
//! # Module Structure
//!
//! - **`shared`** - Types and algorithms used on both sides
//!   - Edit scripts and the commit wire format
//!   - `ot`: diff, apply and rebase
//!   - Configuration and error types
//!
//! - **`backend`** - The version log
//!   - `collab`: per-document logs and the document registry
//!   - `server`, `routes`, `error`: the HTTP server (`ssr` feature)
//!
//! - **`client`** - Keeps an editing surface in sync with a log
//!   - The Idle / CommitPending / Reconciling state machine
//!   - In-process and HTTP transports
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Axum server, SSE stream and the `xfpad-server`
//!   binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use xfpad::backend::collab::CollabState;
//! use xfpad::client::{Config, LocalTransport, SharedBuffer, SyncSession};
//!
//! # async fn example() -> Result<(), xfpad::client::SyncError> {
//! let transport = Arc::new(LocalTransport::new(CollabState::new()));
//! let buffer = SharedBuffer::new("");
//! let session = SyncSession::attach("notes", transport, buffer.clone(), Config::new()).await?;
//!
//! buffer.edit(|b| b.type_text("hello"));
//! session.notify_edit()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! - **Server**: each document log sits behind a `tokio::sync::RwLock`;
//!   submissions to one document are serialized, documents are independent
//! - **Client**: the state machine runs on a single driver task; surfaces
//!   shared with an editor thread use `parking_lot::Mutex`

/// Shared types and algorithms
pub mod shared;

/// Version log and server
pub mod backend;

/// Sync client
pub mod client;
