//! prf-fairness library interface
//!
//! Statistical fairness audit of performance-review outcomes: sentiment
//! scores and promotion recommendations are grouped by demographic
//! attributes and checked for disparate treatment.

pub mod cache;
pub mod config;
pub mod error;
pub mod grouping;
pub mod report;
pub mod sink;
pub mod stats;
pub mod types;
pub mod validator;

pub use crate::cache::{AssessmentCache, MIN_ASSESSMENTS_FOR_VALIDATION};
pub use crate::config::{FairnessConfig, FairnessThresholds};
pub use crate::error::{FairnessError, FairnessResult};
pub use crate::report::{MetricSummary, ValidationReport};
pub use crate::sink::{LogSink, MemorySink, TracingSink};
pub use crate::types::{
    AssessmentOutcome, Comparison, DemographicRecord, Detail, EmployeeId, MetricFamily,
    ValidationResult,
};
pub use crate::validator::FairnessValidator;
