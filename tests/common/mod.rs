//! Shared test utilities for integration tests.
//! Included by the integration test files, not compiled as a test binary itself.
#![allow(dead_code)]

pub mod fixtures;
pub mod mock;
