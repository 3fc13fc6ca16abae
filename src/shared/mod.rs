//! Shared Module
//!
//! Types and pure logic used by both the version log server and its clients:
//! edit scripts, commits, the transformation core, errors, and configuration.
//!
//! # Overview
//!
//! Nothing in this module performs I/O or holds shared state. Everything
//! here serializes to the JSON wire format the HTTP layer speaks.

/// Edit operations and scripts
pub mod ops;

/// Commit and document wire types
pub mod commit;

/// Diff, patch, and rebase
pub mod ot;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

pub use commit::{ClientId, Commit, CommitReceipt, CommitRequest, DocumentMetadata, DocumentSnapshot};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::OtError;
pub use ops::{EditScript, Operation};
