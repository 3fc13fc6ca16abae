//! Shared Error Types
//!
//! Errors raised by the pure text-transformation layer. Both the server's
//! version log and the client's sync machine surface these unchanged.
//!
//! # Error Categories
//!
//! - `MalformedScript` - an edit script is out of order, overlapping, or does
//!   not fit the text it is applied to
//! - `Serialization` - JSON wire decode failures
//!
//! # Usage
//!
//! ```rust
//! use xfpad::shared::error::OtError;
//!
//! let error = OtError::malformed(2, "delete runs past the end of the text");
//! assert!(error.is_malformed());
//! ```
use thiserror::Error;

/// Errors produced while validating, applying, or transforming edit scripts
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OtError {
    /// The script violates ordering or range constraints
    #[error("Malformed edit script at operation {op}: {message}")]
    MalformedScript {
        /// Position of the offending operation inside its script
        op: usize,
        /// Human-readable error message
        message: String,
    },

    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Human-readable error message
        message: String,
    },
}

impl OtError {
    /// Create a new malformed-script error
    pub fn malformed(op: usize, message: impl Into<String>) -> Self {
        Self::MalformedScript {
            op,
            message: message.into(),
        }
    }

    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedScript { .. })
    }
}

impl From<serde_json::Error> for OtError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
