//! Operational transformation core
//!
//! Pure, stateless functions over plain strings and edit scripts. Nothing in
//! here knows about documents, clients, or the network.
//!
//! # Module Structure
//!
//! ```text
//! ot/
//! ├── mod.rs          - Re-exports and the cursor sentinel
//! ├── diff.rs         - compute_diff / apply_diff
//! └── rebase.rs       - rebase (transform one script over another)
//! ```
//!
//! # Example
//!
//! ```rust
//! use xfpad::shared::ot::{apply_diff, compute_diff, rebase};
//!
//! let base = "ab";
//! let mine = compute_diff(base, "ad");
//! let theirs = compute_diff(base, "cb");
//!
//! let after_mine = apply_diff(base, &mine).unwrap();
//! let merged = apply_diff(&after_mine, &rebase(&mine, &theirs).unwrap()).unwrap();
//! assert_eq!(merged, "cd");
//! ```

pub mod diff;
pub mod rebase;

pub use diff::{apply_diff, compute_diff};
pub use rebase::rebase;

/// Zero-width cursor marker. Inserts of this character that land inside text
/// removed by a concurrent delete survive the rebase, so a cursor is never
/// lost. Documents must not contain it.
pub const SENTINEL: char = '\0';
