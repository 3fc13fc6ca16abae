//! Version log integration tests

pub mod version_log_test;
