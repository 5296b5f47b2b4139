//! Test Helper Utilities
//!
//! Shared utilities for testing chirp-proxy

pub mod log_capture;
pub mod stub_api;

pub use log_capture::{capture_test_logs, LogCapture};
pub use stub_api::{create_test_app, StubApi, TestApp};
