//! Collaborative Editing Module
//!
//! Server-side ownership of document histories.
//!
//! # Architecture
//!
//! - **`log`** - `DocumentLog`: one document's commits, content, and waiters
//! - **`state`** - `CollabState`: registry of documents by ID
//! - **`handlers`** - HTTP handlers (with the `ssr` feature)
//!
//! The log and registry have no HTTP dependency and can be embedded directly,
//! which is how in-process clients talk to them.
//!
//! # Example
//!
//! ```rust
//! use xfpad::backend::collab::CollabState;
//! use xfpad::shared::{ot::compute_diff, CommitRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let state = CollabState::new();
//! let snapshot = state.init_document("doc-123").await?;
//! let request = CommitRequest {
//!     origin: uuid::Uuid::new_v4(),
//!     seq: None,
//!     parent: snapshot.head,
//!     diff: compute_diff(&snapshot.content, "hello"),
//! };
//! state.submit_commit("doc-123", request).await?;
//! # Ok(())
//! # }
//! ```

/// Per-document version log
pub mod log;

/// Document registry
pub mod state;

/// HTTP handlers for the version log
#[cfg(feature = "ssr")]
pub mod handlers;

pub use log::{DocumentLog, LogError, LogSignal};
pub use state::CollabState;
