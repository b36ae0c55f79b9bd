//! # PRF Common Library
//!
//! Shared code for the performance-review fairness tooling:
//! - Error and result types
//! - Configuration file resolution and TOML loading
//! - Timestamp helpers

pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
