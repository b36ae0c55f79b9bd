//! Fairness validator configuration
//!
//! Loaded from the resolved TOML config file (see `prf_common::config`).
//! Every table and key is optional:
//!
//! ```toml
//! min_assessments = 5
//!
//! [thresholds]
//! demographic_parity = 0.8
//! sentiment_bias = 0.2
//!
//! [logging]
//! level = "info"
//! ```

use crate::cache::MIN_ASSESSMENTS_FOR_VALIDATION;
use crate::error::FairnessResult;
use crate::types::MetricFamily;
use prf_common::config::load_toml_or_default;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-family thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FairnessThresholds {
    /// Minimum ratio between group promotion rates
    pub demographic_parity: f64,
    /// Minimum ratio between performance-normalized promotion rates
    pub equal_opportunity: f64,
    /// Declared for forward compatibility; no metric is computed from it yet
    pub predictive_parity: f64,
    /// Maximum spread of mean sentiment across groups
    pub sentiment_bias: f64,
    /// Maximum absolute sentiment/performance correlation
    pub performance_correlation: f64,
    /// Maximum spread of mean sentiment across two-attribute groups
    pub intersectional_bias: f64,
    /// Maximum spread of mean confidence across groups
    pub confidence_disparity: f64,
}

impl Default for FairnessThresholds {
    fn default() -> Self {
        Self {
            demographic_parity: 0.8,
            equal_opportunity: 0.8,
            predictive_parity: 0.8,
            sentiment_bias: 0.2,
            performance_correlation: 0.3,
            intersectional_bias: 0.25,
            confidence_disparity: 0.15,
        }
    }
}

impl FairnessThresholds {
    pub fn for_family(&self, family: MetricFamily) -> f64 {
        match family {
            MetricFamily::DemographicParity => self.demographic_parity,
            MetricFamily::EqualOpportunity => self.equal_opportunity,
            MetricFamily::PredictiveParity => self.predictive_parity,
            MetricFamily::SentimentBias => self.sentiment_bias,
            MetricFamily::PerformanceCorrelation => self.performance_correlation,
            MetricFamily::IntersectionalBias => self.intersectional_bias,
            MetricFamily::ConfidenceDisparity => self.confidence_disparity,
        }
    }

    /// All thresholds must be finite
    pub fn validate(&self) -> prf_common::Result<()> {
        let named = [
            ("demographic_parity", self.demographic_parity),
            ("equal_opportunity", self.equal_opportunity),
            ("predictive_parity", self.predictive_parity),
            ("sentiment_bias", self.sentiment_bias),
            ("performance_correlation", self.performance_correlation),
            ("intersectional_bias", self.intersectional_bias),
            ("confidence_disparity", self.confidence_disparity),
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(prf_common::Error::Config(format!(
                    "threshold {} must be finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Logging section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing level when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Top-level config file shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FairnessConfig {
    pub min_assessments: usize,
    pub thresholds: FairnessThresholds,
    pub logging: LoggingConfig,
}

impl Default for FairnessConfig {
    fn default() -> Self {
        Self {
            min_assessments: MIN_ASSESSMENTS_FOR_VALIDATION,
            thresholds: FairnessThresholds::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl FairnessConfig {
    /// Load from `path` (defaults when absent) and validate thresholds
    pub fn load(path: Option<&Path>) -> FairnessResult<Self> {
        let config: FairnessConfig = load_toml_or_default(path)?;
        config.thresholds.validate()?;
        Ok(config)
    }
}
