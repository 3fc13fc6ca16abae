//! Property-based tests

pub mod diff_proptest;
pub mod rebase_proptest;
