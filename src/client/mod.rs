//! Client Module
//!
//! Keeps a local editing surface converged with a document's version log.
//!
//! # Architecture
//!
//! - **`surface`** - The text and selection the user edits
//! - **`sync`** - The sync state machine and the tasks that drive it
//! - **`transport`** - In-process and HTTP access to the version log
//! - **`config`** - Server URL and retry timing
//! - **`error`** - Transport and sync errors
//!
//! # Flow
//!
//! 1. [`SyncSession::attach`] loads the document and shows it on the surface.
//! 2. The caller edits the surface and calls [`SyncHandle::notify_edit`].
//! 3. The session commits the change, pulls every other client's commits,
//!    and merges them into the surface without losing the user's selection.

pub mod config;
pub mod error;
pub mod surface;
pub mod sync;
pub mod transport;

pub use config::Config;
pub use error::{SyncError, TransportError};
pub use surface::{EditingSurface, LiveState, SharedBuffer, TextBuffer};
pub use sync::{Phase, SyncHandle, SyncSession, SyncStatus};
pub use transport::{CommitTransport, HttpTransport, LocalTransport};
