//! Validation report aggregation
//!
//! A [`ValidationReport`] summarizes accumulated [`ValidationResult`]s:
//! pass/fail counts, a timestamp, and the results grouped by metric-family
//! prefix (`sentiment`, `confidence`, `performance`, `intersectional`,
//! `promotion`, `equal`). All numbers are plain finite `f64`, so the report
//! serializes to JSON without special handling.

use crate::error::FairnessResult;
use crate::sink::LogSink;
use crate::stats::finite_or_zero;
use crate::types::{Detail, ValidationResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::Level;

/// One metric as presented in a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub name: String,
    pub value: f64,
    pub threshold: f64,
    pub passed: bool,
    pub details: BTreeMap<String, Detail>,
}

impl From<&ValidationResult> for MetricSummary {
    fn from(result: &ValidationResult) -> Self {
        let details = result
            .details
            .iter()
            .map(|(key, detail)| {
                let clean = match detail {
                    Detail::Scalar(v) => Detail::scalar(*v),
                    Detail::Groups(groups) => Detail::groups(groups.clone()),
                    other => other.clone(),
                };
                (key.clone(), clean)
            })
            .collect();

        Self {
            name: result.metric_name.clone(),
            value: finite_or_zero(result.value),
            threshold: finite_or_zero(result.threshold),
            passed: result.passed,
            details,
        }
    }
}

/// Aggregated validation report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// ISO-8601 UTC generation time
    pub timestamp: String,
    pub total_validations: usize,
    pub passed_validations: usize,
    pub failed_validations: usize,
    /// Family prefix → summaries, in the order the results were produced
    pub metrics: BTreeMap<String, Vec<MetricSummary>>,
}

impl ValidationReport {
    /// Build a report stamped with the current time
    pub fn from_results(results: &[ValidationResult]) -> Self {
        Self::with_timestamp(results, prf_common::time::now_iso8601())
    }

    pub fn with_timestamp(results: &[ValidationResult], timestamp: String) -> Self {
        let passed = results.iter().filter(|r| r.passed).count();

        let mut metrics: BTreeMap<String, Vec<MetricSummary>> = BTreeMap::new();
        for result in results {
            metrics
                .entry(result.family_prefix().to_string())
                .or_default()
                .push(MetricSummary::from(result));
        }

        Self {
            timestamp,
            total_validations: results.len(),
            passed_validations: passed,
            failed_validations: results.len() - passed,
            metrics,
        }
    }

    /// Summaries that did not pass, in report order
    pub fn failed_metrics(&self) -> impl Iterator<Item = &MetricSummary> {
        self.metrics.values().flatten().filter(|m| !m.passed)
    }

    /// Look up a summary by full metric name
    pub fn metric(&self, name: &str) -> Option<&MetricSummary> {
        self.metrics.values().flatten().find(|m| m.name == name)
    }

    pub fn to_json_pretty(&self) -> FairnessResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write a human-readable trace of the report to `sink`
    pub fn log_to(&self, sink: &dyn LogSink) {
        sink.record(Level::INFO, "=== Validation Report ===");
        sink.record(Level::INFO, &format!("Total Validations: {}", self.total_validations));
        sink.record(Level::INFO, &format!("Passed: {}", self.passed_validations));
        sink.record(Level::INFO, &format!("Failed: {}", self.failed_validations));

        for (family, summaries) in &self.metrics {
            sink.record(Level::INFO, &format!("{} Metrics:", family.to_uppercase()));
            for summary in summaries {
                let (level, status) = if summary.passed {
                    (Level::INFO, "PASSED")
                } else {
                    (Level::WARN, "FAILED")
                };
                sink.record(level, &format!("- {}: {}", summary.name, status));
                sink.record(
                    Level::INFO,
                    &format!("  Value: {:.3} (Threshold: {})", summary.value, summary.threshold),
                );
                let details: Vec<String> = summary
                    .details
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect();
                sink.record(Level::INFO, &format!("  Details: {}", details.join(", ")));
            }
        }
    }
}
