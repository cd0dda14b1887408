//! Integration test crate for the logsift engine.
//!
//! This crate exists solely to run integration tests that span multiple logsift crates.
//! It has no public API - all functionality is in the test modules.

#![forbid(unsafe_code)]
