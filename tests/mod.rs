//! Test suite for XFPad
//!
//! This module organizes all tests

pub mod property;
