//! Error types for prf-fairness
//!
//! Degenerate arithmetic (empty groups, zero maxima, zero variance) is not an
//! error: it is normalized to 0.0 by the statistics helpers. The variants here
//! cover malformed input records and configuration problems only.

use thiserror::Error;

/// Fairness validation error type
#[derive(Debug, Error)]
pub enum FairnessError {
    /// A required field is absent from an assessment outcome or demographic record
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Input has the wrong overall shape (e.g. not a JSON array)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// prf-common error
    #[error("Common error: {0}")]
    Common(#[from] prf_common::Error),
}

/// Result type for fairness operations
pub type FairnessResult<T> = Result<T, FairnessError>;
