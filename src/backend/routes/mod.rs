//! Routes Module
//!
//! HTTP route configuration for the version log server.

/// Router assembly
pub mod router;

pub use router::create_router;
