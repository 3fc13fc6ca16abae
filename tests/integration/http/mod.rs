//! HTTP integration tests

pub mod routes_test;
pub mod transport_test;
