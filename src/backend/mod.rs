//! Backend Module
//!
//! Server-side code: the document version log and the HTTP server that
//! exposes it.
//!
//! # Architecture
//!
//! - **`collab`** - Version logs and the document registry (always built)
//! - **`server`** - Application state, configuration, initialization
//! - **`routes`** - Router assembly
//! - **`error`** - HTTP error types
//!
//! Everything except `collab` needs the `ssr` feature.
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - xfpad-server binary
//! ├── collab/         - Version log, registry, handlers
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! └── error/          - Error types
//! ```
//!
//! # Consistency
//!
//! Every submission to a document is rebased against all commits its author
//! had not seen and appended under that document's exclusive lock. The
//! history is therefore a single linear order, and every client that replays
//! it arrives at the same content.

/// Collaborative editing: version logs and registry
pub mod collab;

/// Server initialization and state
#[cfg(feature = "ssr")]
pub mod server;

/// Route configuration
#[cfg(feature = "ssr")]
pub mod routes;

/// Backend error types
#[cfg(feature = "ssr")]
pub mod error;
