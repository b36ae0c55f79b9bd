//! Core data model for fairness validation
//!
//! # Inputs
//! - [`AssessmentOutcome`]: one per employee, produced by the review pipeline
//! - [`DemographicRecord`]: one per employee, produced by the employee directory
//!
//! # Outputs
//! - [`ValidationResult`]: one per computed metric
//!
//! Inputs can be built directly or decoded from the JSON shapes the review
//! pipeline emits (see [`AssessmentOutcome::from_json`]).

use crate::error::{FairnessError, FairnessResult};
use crate::stats::finite_or_zero;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Group label used when an attribute or demographic record is missing
pub const UNKNOWN_GROUP: &str = "unknown";

/// Categorical attributes audited by the validator, in iteration order
pub const TRACKED_ATTRIBUTES: [&str; 3] = ["gender", "department", "role_level"];

/// Attributes that additionally get a performance-correlation metric
pub const CORRELATION_ATTRIBUTES: [&str; 2] = ["department", "role_level"];

// ============================================================================
// Employee identity
// ============================================================================

/// Opaque employee identifier
///
/// Upstream systems use both string and integer ids; both normalize to the
/// same textual form so `"42"` and `42` refer to the same employee.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Accepts a JSON string or number; anything else is not an id.
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl From<&str> for EmployeeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EmployeeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Assessment outcome
// ============================================================================

/// Per-employee result of sentiment scoring and promotion recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentOutcome {
    pub employee_id: EmployeeId,
    /// Ordered scalar; [0,1] or [-1,1] depending on upstream convention
    pub sentiment_score: f64,
    /// Model confidence in the sentiment score (0.0-1.0)
    pub sentiment_confidence: f64,
    pub promotion_recommended: bool,
    /// Model confidence in the promotion recommendation (0.0-1.0)
    pub promotion_confidence: f64,
}

impl AssessmentOutcome {
    pub fn new(
        employee_id: impl Into<EmployeeId>,
        sentiment_score: f64,
        sentiment_confidence: f64,
        promotion_recommended: bool,
        promotion_confidence: f64,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            sentiment_score,
            sentiment_confidence,
            promotion_recommended,
            promotion_confidence,
        }
    }

    /// Decode the pipeline's nested JSON shape:
    ///
    /// ```json
    /// {
    ///   "employee_id": "emp_1",
    ///   "sentiment_analysis": { "sentiment_score": 0.8, "confidence": 0.9 },
    ///   "promotion_recommendation": { "promotion_recommended": true, "confidence_score": 0.85 }
    /// }
    /// ```
    ///
    /// `employee_id` and both sub-objects are required. Missing or
    /// non-finite scores inside a sub-object degrade to 0.0 and a missing
    /// recommendation flag degrades to `false`.
    pub fn from_json(value: &Value) -> FairnessResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| FairnessError::InvalidInput("assessment outcome must be an object".into()))?;

        let employee_id = obj
            .get("employee_id")
            .and_then(EmployeeId::from_json)
            .ok_or_else(|| FairnessError::MissingField("employee_id".into()))?;

        let sentiment = require_object(obj, "sentiment_analysis")?;
        let promotion = require_object(obj, "promotion_recommendation")?;

        Ok(Self {
            employee_id,
            sentiment_score: number_or_zero(sentiment, "sentiment_score"),
            sentiment_confidence: number_or_zero(sentiment, "confidence"),
            promotion_recommended: promotion
                .get("promotion_recommended")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            promotion_confidence: number_or_zero(promotion, "confidence_score"),
        })
    }
}

// ============================================================================
// Demographic record
// ============================================================================

/// Per-employee demographic attributes and performance baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicRecord {
    pub id: EmployeeId,
    /// Categorical attributes (gender, department, role_level, ...)
    pub attributes: BTreeMap<String, String>,
    /// Used only by opportunity and correlation metrics
    pub performance_rating: Option<f64>,
}

impl DemographicRecord {
    pub fn new(id: impl Into<EmployeeId>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
            performance_rating: None,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_performance_rating(mut self, rating: f64) -> Self {
        self.performance_rating = Some(rating);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Attribute value, or [`UNKNOWN_GROUP`] when absent
    pub fn attribute_or_unknown(&self, name: &str) -> &str {
        self.attribute(name).unwrap_or(UNKNOWN_GROUP)
    }

    /// Decode a directory record. `id` is required; every other string field
    /// becomes an attribute. Numbers and booleans under a tracked attribute key
    /// are kept in their textual form.
    pub fn from_json(value: &Value) -> FairnessResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| FairnessError::InvalidInput("demographic record must be an object".into()))?;

        let id = obj
            .get("id")
            .and_then(EmployeeId::from_json)
            .ok_or_else(|| FairnessError::MissingField("id".into()))?;

        let mut attributes = BTreeMap::new();
        for (key, field) in obj {
            if key == "id" || key == "performance_rating" {
                continue;
            }
            let text = match field {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) if TRACKED_ATTRIBUTES.contains(&key.as_str()) => Some(n.to_string()),
                Value::Bool(b) if TRACKED_ATTRIBUTES.contains(&key.as_str()) => Some(b.to_string()),
                _ => None,
            };
            if let Some(text) = text {
                attributes.insert(key.clone(), text);
            }
        }

        let performance_rating = obj
            .get("performance_rating")
            .and_then(Value::as_f64)
            .filter(|r| r.is_finite());

        Ok(Self {
            id,
            attributes,
            performance_rating,
        })
    }
}

/// Decode a JSON array of assessment outcomes
pub fn decode_outcomes(value: &Value) -> FairnessResult<Vec<AssessmentOutcome>> {
    decode_array(value, "assessment outcomes", AssessmentOutcome::from_json)
}

/// Decode a JSON array of demographic records
pub fn decode_demographics(value: &Value) -> FairnessResult<Vec<DemographicRecord>> {
    decode_array(value, "demographic records", DemographicRecord::from_json)
}

fn decode_array<T>(
    value: &Value,
    what: &str,
    decode: impl Fn(&Value) -> FairnessResult<T>,
) -> FairnessResult<Vec<T>> {
    let items = value
        .as_array()
        .ok_or_else(|| FairnessError::InvalidInput(format!("{} must be a JSON array", what)))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            decode(item).map_err(|e| match e {
                FairnessError::MissingField(field) => {
                    FairnessError::MissingField(format!("{}[{}].{}", what, index, field))
                }
                other => other,
            })
        })
        .collect()
}

fn require_object<'a>(obj: &'a Map<String, Value>, key: &str) -> FairnessResult<&'a Map<String, Value>> {
    obj.get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| FairnessError::MissingField(key.to_string()))
}

fn number_or_zero(obj: &Map<String, Value>, key: &str) -> f64 {
    obj.get(key).and_then(Value::as_f64).map(finite_or_zero).unwrap_or(0.0)
}

// ============================================================================
// Metric families and results
// ============================================================================

/// Direction in which a metric value is compared against its threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    /// Parity/ratio metrics: pass when value ≥ threshold
    AtLeast,
    /// Difference/disparity metrics: pass when value ≤ threshold
    AtMost,
}

impl Comparison {
    pub fn passes(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::AtLeast => value >= threshold,
            Comparison::AtMost => value <= threshold,
        }
    }
}

/// Metric family; each family has one configured threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricFamily {
    DemographicParity,
    EqualOpportunity,
    PredictiveParity,
    SentimentBias,
    PerformanceCorrelation,
    IntersectionalBias,
    ConfidenceDisparity,
}

impl MetricFamily {
    pub fn comparison(self) -> Comparison {
        match self {
            MetricFamily::DemographicParity
            | MetricFamily::EqualOpportunity
            | MetricFamily::PredictiveParity => Comparison::AtLeast,
            MetricFamily::SentimentBias
            | MetricFamily::PerformanceCorrelation
            | MetricFamily::IntersectionalBias
            | MetricFamily::ConfidenceDisparity => Comparison::AtMost,
        }
    }
}

/// Explanatory value attached to a [`ValidationResult`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Detail {
    Scalar(f64),
    Note(String),
    Counts(BTreeMap<String, usize>),
    Groups(BTreeMap<String, f64>),
}

impl Detail {
    /// Per-group float map, with non-finite entries replaced by 0.0
    pub fn groups(values: BTreeMap<String, f64>) -> Self {
        Detail::Groups(
            values
                .into_iter()
                .map(|(k, v)| (k, finite_or_zero(v)))
                .collect(),
        )
    }

    pub fn scalar(value: f64) -> Self {
        Detail::Scalar(finite_or_zero(value))
    }

    pub fn as_groups(&self) -> Option<&BTreeMap<String, f64>> {
        match self {
            Detail::Groups(groups) => Some(groups),
            _ => None,
        }
    }

    pub fn as_counts(&self) -> Option<&BTreeMap<String, usize>> {
        match self {
            Detail::Counts(counts) => Some(counts),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Detail::Scalar(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detail::Scalar(v) => write!(f, "{:.3}", v),
            Detail::Note(text) => f.write_str(text),
            Detail::Counts(counts) => {
                let parts: Vec<String> = counts.iter().map(|(k, n)| format!("{}: {}", k, n)).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            Detail::Groups(groups) => {
                let parts: Vec<String> = groups.iter().map(|(k, v)| format!("{}: {:.3}", k, v)).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

/// One computed fairness metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Metric family plus the attribute(s) it was computed over,
    /// e.g. `sentiment_bias_department`
    pub metric_name: String,
    pub value: f64,
    pub threshold: f64,
    pub passed: bool,
    pub details: BTreeMap<String, Detail>,
}

impl ValidationResult {
    /// Build a result, forcing `value`/`threshold` finite and deriving
    /// `passed` from the family's comparison direction.
    pub fn evaluate(
        metric_name: impl Into<String>,
        family: MetricFamily,
        value: f64,
        threshold: f64,
        details: BTreeMap<String, Detail>,
    ) -> Self {
        let value = finite_or_zero(value);
        let threshold = finite_or_zero(threshold);
        Self {
            metric_name: metric_name.into(),
            value,
            threshold,
            passed: family.comparison().passes(value, threshold),
            details,
        }
    }

    /// Presentation prefix: the text before the first `_` in the metric name
    pub fn family_prefix(&self) -> &str {
        self.metric_name.split('_').next().unwrap_or(&self.metric_name)
    }

    pub fn detail(&self, key: &str) -> Option<&Detail> {
        self.details.get(key)
    }
}
