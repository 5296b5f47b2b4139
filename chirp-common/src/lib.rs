//! # chirp-common
//!
//! Shared code for the chirp proxy service:
//! - Error and result types
//! - Configuration loading (TOML file + priority resolution)
//! - Timestamp helpers used by persisted records

pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
