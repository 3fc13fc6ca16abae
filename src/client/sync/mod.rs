//! Client synchronization
//!
//! ```text
//! sync/
//! ├── mod.rs          - Module exports
//! ├── machine.rs      - Idle / CommitPending / Reconciling state machine
//! ├── session.rs      - Driver and puller tasks around the machine
//! ├── selection.rs    - Cursor sentinels
//! └── retry.rs        - Backoff strategies
//! ```

pub mod machine;
pub mod retry;
pub mod selection;
pub mod session;

pub use machine::{Phase, SyncAction, SyncMachine, SyncMessage, SyncStatus};
pub use retry::BackoffStrategy;
pub use session::{SyncHandle, SyncSession};
