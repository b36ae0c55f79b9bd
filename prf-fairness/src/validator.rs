//! Fairness Validator
//!
//! Audits a batch of assessment outcomes against employee demographics.
//!
//! # Metrics
//! Per tracked attribute (gender, department, role_level):
//! - `sentiment_bias_<attr>`: spread of mean sentiment across groups (≤ threshold)
//! - `confidence_disparity_<attr>`: spread of mean sentiment confidence (≤ threshold)
//! - `performance_correlation_<attr>`: |Pearson r| of sentiment vs. rating,
//!   department and role_level only (≤ threshold)
//! - `promotion_parity_<attr>`: min/max promotion rate (≥ threshold)
//! - `equal_opportunity_<attr>`: min/max rating-normalized promotion rate (≥ threshold)
//!
//! Per attribute pair:
//! - `intersectional_bias_<a1>_<a2>`: spread of mean sentiment across
//!   combined groups (≤ threshold)
//!
//! # Example
//! ```rust,ignore
//! use prf_fairness::FairnessValidator;
//!
//! let mut validator = FairnessValidator::new();
//! validator.validate_all(&outcomes, &demographics);
//! let report = validator.generate_report();
//! validator.log_results();
//! ```

use crate::config::FairnessThresholds;
use crate::grouping::{
    attribute_pairs, group_by_demographics, intersectional_sentiment, AttributeGroups,
    DemographicIndex,
};
use crate::report::ValidationReport;
use crate::sink::{LogSink, TracingSink};
use crate::stats::{mean, min_max_ratio, pearson, ratio_or_zero, spread};
use crate::types::{
    AssessmentOutcome, Detail, DemographicRecord, MetricFamily, ValidationResult,
    CORRELATION_ATTRIBUTES,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

const CORRELATION_INTERPRETATION: &str = "Higher absolute values indicate stronger bias";

/// Fairness Validator
///
/// Holds the configured thresholds, the log sink, and an accumulator of every
/// result produced since construction or the last [`reset`](Self::reset).
pub struct FairnessValidator {
    thresholds: FairnessThresholds,
    results: Vec<ValidationResult>,
    sink: Arc<dyn LogSink>,
}

impl Default for FairnessValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl FairnessValidator {
    /// Create validator with default thresholds, logging through `tracing`
    pub fn new() -> Self {
        Self::with_thresholds(FairnessThresholds::default())
    }

    pub fn with_thresholds(thresholds: FairnessThresholds) -> Self {
        Self {
            thresholds,
            results: Vec::new(),
            sink: Arc::new(TracingSink),
        }
    }

    /// Replace the log sink used by [`log_results`](Self::log_results)
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn thresholds(&self) -> &FairnessThresholds {
        &self.thresholds
    }

    /// Results accumulated so far
    pub fn results(&self) -> &[ValidationResult] {
        &self.results
    }

    /// Drop accumulated results
    pub fn reset(&mut self) {
        self.results.clear();
    }

    /// Validate sentiment analysis for group disparities.
    ///
    /// Output order: per attribute `sentiment_bias`, `confidence_disparity`,
    /// then `performance_correlation` where applicable; followed by the
    /// intersectional results. Empty input yields no results.
    pub fn validate_sentiment_analysis(
        &mut self,
        results: &[AssessmentOutcome],
        demographics: &[DemographicRecord],
    ) -> Vec<ValidationResult> {
        let index = DemographicIndex::new(demographics);
        let mut out = Vec::new();

        for (attr, groups) in group_by_demographics(results, &index) {
            if groups.is_empty() {
                continue;
            }
            out.extend(self.sentiment_metrics(attr, &groups, &index));
        }

        out.extend(self.intersectional_metrics(results, &index));

        debug!(
            outcomes = results.len(),
            records = demographics.len(),
            metrics = out.len(),
            "Sentiment validation complete"
        );

        self.results.extend(out.iter().cloned());
        out
    }

    /// Validate promotion recommendations for parity and equal opportunity.
    ///
    /// Two results per attribute, in tracked-attribute order. Empty input
    /// yields no results.
    pub fn validate_promotion_recommendations(
        &mut self,
        results: &[AssessmentOutcome],
        demographics: &[DemographicRecord],
    ) -> Vec<ValidationResult> {
        let index = DemographicIndex::new(demographics);
        let mut out = Vec::new();

        for (attr, groups) in group_by_demographics(results, &index) {
            if groups.is_empty() {
                continue;
            }
            out.extend(self.promotion_metrics(attr, &groups, &index));
        }

        debug!(
            outcomes = results.len(),
            records = demographics.len(),
            metrics = out.len(),
            "Promotion validation complete"
        );

        self.results.extend(out.iter().cloned());
        out
    }

    /// Run sentiment then promotion validation over the same batch
    pub fn validate_all(
        &mut self,
        results: &[AssessmentOutcome],
        demographics: &[DemographicRecord],
    ) -> Vec<ValidationResult> {
        let mut out = self.validate_sentiment_analysis(results, demographics);
        out.extend(self.validate_promotion_recommendations(results, demographics));
        out
    }

    /// Aggregate accumulated results into a report
    pub fn generate_report(&self) -> ValidationReport {
        ValidationReport::from_results(&self.results)
    }

    /// Write the current report to the log sink
    pub fn log_results(&self) {
        self.generate_report().log_to(self.sink.as_ref());
    }

    fn sentiment_metrics(
        &self,
        attr: &str,
        groups: &AttributeGroups<'_>,
        index: &DemographicIndex<'_>,
    ) -> Vec<ValidationResult> {
        let mut mean_scores = BTreeMap::new();
        let mut mean_confidence = BTreeMap::new();
        let mut group_sizes = BTreeMap::new();

        for (label, members) in groups {
            let scores: Vec<f64> = members.iter().map(|o| o.sentiment_score).collect();
            let confidences: Vec<f64> = members.iter().map(|o| o.sentiment_confidence).collect();
            mean_scores.insert(label.clone(), mean(&scores));
            mean_confidence.insert(label.clone(), mean(&confidences));
            group_sizes.insert(label.clone(), members.len());
        }

        let max_diff = spread(mean_scores.values().copied());
        let conf_diff = spread(mean_confidence.values().copied());

        let mut out = vec![
            self.evaluate(
                format!("sentiment_bias_{}", attr),
                MetricFamily::SentimentBias,
                max_diff,
                BTreeMap::from([
                    ("mean_scores".to_string(), Detail::groups(mean_scores)),
                    ("group_sizes".to_string(), Detail::Counts(group_sizes.clone())),
                ]),
            ),
            self.evaluate(
                format!("confidence_disparity_{}", attr),
                MetricFamily::ConfidenceDisparity,
                conf_diff,
                BTreeMap::from([
                    ("mean_confidence".to_string(), Detail::groups(mean_confidence)),
                    ("group_sizes".to_string(), Detail::Counts(group_sizes)),
                ]),
            ),
        ];

        if CORRELATION_ATTRIBUTES.contains(&attr) {
            let correlation = performance_correlation(attr, groups, index);
            out.push(self.evaluate(
                format!("performance_correlation_{}", attr),
                MetricFamily::PerformanceCorrelation,
                correlation.abs(),
                BTreeMap::from([
                    ("correlation".to_string(), Detail::scalar(correlation)),
                    (
                        "interpretation".to_string(),
                        Detail::Note(CORRELATION_INTERPRETATION.to_string()),
                    ),
                ]),
            ));
        }

        out
    }

    fn intersectional_metrics(
        &self,
        results: &[AssessmentOutcome],
        index: &DemographicIndex<'_>,
    ) -> Vec<ValidationResult> {
        let mut out = Vec::new();

        for (first, second) in attribute_pairs() {
            let buckets = intersectional_sentiment(results, index, first, second);

            let mean_scores: BTreeMap<String, f64> = buckets
                .iter()
                .filter(|(_, scores)| !scores.is_empty())
                .map(|(label, scores)| (label.clone(), mean(scores)))
                .collect();
            if mean_scores.is_empty() {
                continue;
            }

            let group_sizes: BTreeMap<String, usize> = buckets
                .iter()
                .map(|(label, scores)| (label.clone(), scores.len()))
                .collect();
            let max_diff = spread(mean_scores.values().copied());

            out.push(self.evaluate(
                format!("intersectional_bias_{}_{}", first, second),
                MetricFamily::IntersectionalBias,
                max_diff,
                BTreeMap::from([
                    ("mean_scores".to_string(), Detail::groups(mean_scores)),
                    ("group_sizes".to_string(), Detail::Counts(group_sizes)),
                ]),
            ));
        }

        out
    }

    fn promotion_metrics(
        &self,
        attr: &str,
        groups: &AttributeGroups<'_>,
        index: &DemographicIndex<'_>,
    ) -> Vec<ValidationResult> {
        let mut promotion_rates = BTreeMap::new();
        let mut mean_confidence = BTreeMap::new();
        let mut performance_ratings = BTreeMap::new();
        let mut group_sizes = BTreeMap::new();

        for (label, members) in groups {
            let promoted = members.iter().filter(|o| o.promotion_recommended).count();
            let rate = ratio_or_zero(promoted as f64, members.len() as f64);

            let confidences: Vec<f64> = members.iter().map(|o| o.promotion_confidence).collect();
            let ratings: Vec<f64> = members
                .iter()
                .filter_map(|o| index.rating_for(&o.employee_id))
                .collect();

            promotion_rates.insert(label.clone(), rate);
            mean_confidence.insert(label.clone(), mean(&confidences));
            performance_ratings.insert(label.clone(), mean(&ratings));
            group_sizes.insert(label.clone(), members.len());
        }

        let parity_ratio = min_max_ratio(promotion_rates.values().copied());

        let opportunity_scores: BTreeMap<String, f64> = promotion_rates
            .iter()
            .map(|(label, rate)| {
                let performance = performance_ratings.get(label).copied().unwrap_or(0.0);
                (label.clone(), ratio_or_zero(*rate, performance))
            })
            .collect();
        let opportunity_ratio = min_max_ratio(opportunity_scores.values().copied());

        vec![
            self.evaluate(
                format!("promotion_parity_{}", attr),
                MetricFamily::DemographicParity,
                parity_ratio,
                BTreeMap::from([
                    ("promotion_rates".to_string(), Detail::groups(promotion_rates)),
                    ("mean_confidence".to_string(), Detail::groups(mean_confidence)),
                    ("group_sizes".to_string(), Detail::Counts(group_sizes)),
                ]),
            ),
            self.evaluate(
                format!("equal_opportunity_{}", attr),
                MetricFamily::EqualOpportunity,
                opportunity_ratio,
                BTreeMap::from([
                    ("opportunity_scores".to_string(), Detail::groups(opportunity_scores)),
                    ("performance_ratings".to_string(), Detail::groups(performance_ratings)),
                ]),
            ),
        ]
    }

    fn evaluate(
        &self,
        metric_name: String,
        family: MetricFamily,
        value: f64,
        details: BTreeMap<String, Detail>,
    ) -> ValidationResult {
        ValidationResult::evaluate(
            metric_name,
            family,
            value,
            self.thresholds.for_family(family),
            details,
        )
    }
}

/// Pearson r between sentiment scores and performance ratings for one attribute.
///
/// Each score is paired with the rating of the first demographic record
/// carrying the score's group label, so every member of a group shares one
/// rating. If any group has no rated record the sequences no longer line up
/// and the result is 0.0.
fn performance_correlation(
    attr: &str,
    groups: &AttributeGroups<'_>,
    index: &DemographicIndex<'_>,
) -> f64 {
    let mut scores = Vec::new();
    let mut ratings = Vec::new();

    for (label, members) in groups {
        let rating = index.first_rating_with_label(attr, label);
        for outcome in members {
            scores.push(outcome.sentiment_score);
            if let Some(rating) = rating {
                ratings.push(rating);
            }
        }
    }

    pearson(&scores, &ratings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn find<'a>(results: &'a [ValidationResult], name: &str) -> &'a ValidationResult {
        results
            .iter()
            .find(|r| r.metric_name == name)
            .unwrap_or_else(|| panic!("missing metric {}", name))
    }

    fn two_departments() -> (Vec<AssessmentOutcome>, Vec<DemographicRecord>) {
        let outcomes = vec![
            AssessmentOutcome::new("e1", 0.9, 0.8, true, 0.9),
            AssessmentOutcome::new("e2", 0.5, 0.8, false, 0.9),
        ];
        let records = vec![
            DemographicRecord::new("e1")
                .with_attribute("gender", "Female")
                .with_attribute("department", "Engineering")
                .with_attribute("role_level", "Senior")
                .with_performance_rating(4.0),
            DemographicRecord::new("e2")
                .with_attribute("gender", "Female")
                .with_attribute("department", "Sales")
                .with_attribute("role_level", "Senior")
                .with_performance_rating(3.0),
        ];
        (outcomes, records)
    }

    #[test]
    fn test_empty_inputs_yield_nothing() {
        let mut validator = FairnessValidator::new();
        assert!(validator.validate_sentiment_analysis(&[], &[]).is_empty());
        assert!(validator.validate_promotion_recommendations(&[], &[]).is_empty());
        assert!(validator.results().is_empty());
    }

    #[test]
    fn test_department_sentiment_bias() {
        let (outcomes, records) = two_departments();
        let mut validator = FairnessValidator::new();
        let results = validator.validate_sentiment_analysis(&outcomes, &records);

        let dept = find(&results, "sentiment_bias_department");
        assert!(close(dept.value, 0.4));
        assert!(!dept.passed);

        // Both employees share gender, so no spread there
        let gender = find(&results, "sentiment_bias_gender");
        assert_eq!(gender.value, 0.0);
        assert!(gender.passed);
    }

    #[test]
    fn test_sentiment_result_order() {
        let (outcomes, records) = two_departments();
        let mut validator = FairnessValidator::new();
        let names: Vec<String> = validator
            .validate_sentiment_analysis(&outcomes, &records)
            .into_iter()
            .map(|r| r.metric_name)
            .collect();
        assert_eq!(
            names,
            vec![
                "sentiment_bias_gender",
                "confidence_disparity_gender",
                "sentiment_bias_department",
                "confidence_disparity_department",
                "performance_correlation_department",
                "sentiment_bias_role_level",
                "confidence_disparity_role_level",
                "performance_correlation_role_level",
                "intersectional_bias_gender_department",
                "intersectional_bias_gender_role_level",
                "intersectional_bias_department_role_level",
            ]
        );
    }

    #[test]
    fn test_performance_correlation_by_group_label() {
        let (outcomes, records) = two_departments();
        let mut validator = FairnessValidator::new();
        let results = validator.validate_sentiment_analysis(&outcomes, &records);

        // Engineering (0.9, 4.0), Sales (0.5, 3.0): two points, perfectly correlated
        let dept = find(&results, "performance_correlation_department");
        assert!(close(dept.value, 1.0));
        assert!(!dept.passed);
        assert!(close(dept.detail("correlation").and_then(Detail::as_scalar).unwrap(), 1.0));

        // Single role group: zero rating variance
        let role = find(&results, "performance_correlation_role_level");
        assert_eq!(role.value, 0.0);
        assert!(role.passed);
    }

    #[test]
    fn test_correlation_zero_when_group_has_no_rating() {
        let outcomes = vec![
            AssessmentOutcome::new("e1", 0.9, 0.8, true, 0.9),
            AssessmentOutcome::new("e2", 0.5, 0.8, false, 0.9),
            AssessmentOutcome::new("e3", 0.1, 0.8, false, 0.9),
        ];
        let records = vec![
            DemographicRecord::new("e1").with_attribute("department", "A").with_performance_rating(5.0),
            DemographicRecord::new("e2").with_attribute("department", "B").with_performance_rating(1.0),
            DemographicRecord::new("e3").with_attribute("department", "C"),
        ];
        let mut validator = FairnessValidator::new();
        let results = validator.validate_sentiment_analysis(&outcomes, &records);
        assert_eq!(find(&results, "performance_correlation_department").value, 0.0);
    }

    #[test]
    fn test_promotion_parity_half() {
        let outcomes = vec![
            AssessmentOutcome::new("a1", 0.5, 0.8, true, 0.9),
            AssessmentOutcome::new("a2", 0.5, 0.8, true, 0.7),
            AssessmentOutcome::new("b1", 0.5, 0.8, true, 0.9),
            AssessmentOutcome::new("b2", 0.5, 0.8, false, 0.7),
        ];
        let records = vec![
            DemographicRecord::new("a1").with_attribute("gender", "A").with_performance_rating(4.0),
            DemographicRecord::new("a2").with_attribute("gender", "A").with_performance_rating(4.0),
            DemographicRecord::new("b1").with_attribute("gender", "B").with_performance_rating(2.0),
            DemographicRecord::new("b2").with_attribute("gender", "B").with_performance_rating(2.0),
        ];
        let mut validator = FairnessValidator::new();
        let results = validator.validate_promotion_recommendations(&outcomes, &records);
        assert_eq!(results.len(), 6);

        let parity = find(&results, "promotion_parity_gender");
        assert!(close(parity.value, 0.5));
        assert!(!parity.passed);
        let rates = parity.detail("promotion_rates").and_then(Detail::as_groups).unwrap();
        assert_eq!(rates["A"], 1.0);
        assert_eq!(rates["B"], 0.5);

        // A: 1.0 / 4.0 = 0.25, B: 0.5 / 2.0 = 0.25
        let opportunity = find(&results, "equal_opportunity_gender");
        assert!(close(opportunity.value, 1.0));
        assert!(opportunity.passed);
    }

    #[test]
    fn test_no_promotions_gives_zero_parity() {
        let outcomes = vec![
            AssessmentOutcome::new("a", 0.5, 0.8, false, 0.9),
            AssessmentOutcome::new("b", 0.5, 0.8, false, 0.9),
        ];
        let records = vec![
            DemographicRecord::new("a").with_attribute("gender", "A"),
            DemographicRecord::new("b").with_attribute("gender", "B"),
        ];
        let mut validator = FairnessValidator::new();
        let results = validator.validate_promotion_recommendations(&outcomes, &records);
        let parity = find(&results, "promotion_parity_gender");
        assert_eq!(parity.value, 0.0);
        assert!(!parity.passed);
        // No ratings at all: opportunity scores are all 0
        assert_eq!(find(&results, "equal_opportunity_gender").value, 0.0);
    }

    #[test]
    fn test_custom_thresholds_applied() {
        let (outcomes, records) = two_departments();
        let thresholds = FairnessThresholds {
            sentiment_bias: 0.5,
            ..Default::default()
        };
        let mut validator = FairnessValidator::with_thresholds(thresholds);
        let results = validator.validate_sentiment_analysis(&outcomes, &records);
        let dept = find(&results, "sentiment_bias_department");
        assert_eq!(dept.threshold, 0.5);
        assert!(dept.passed);
    }

    #[test]
    fn test_results_accumulate_and_reset() {
        let (outcomes, records) = two_departments();
        let mut validator = FairnessValidator::new();
        let sentiment = validator.validate_sentiment_analysis(&outcomes, &records);
        let promotion = validator.validate_promotion_recommendations(&outcomes, &records);
        assert_eq!(validator.results().len(), sentiment.len() + promotion.len());

        let report = validator.generate_report();
        assert_eq!(report.total_validations, validator.results().len());

        validator.reset();
        assert!(validator.results().is_empty());
        assert_eq!(validator.generate_report().total_validations, 0);
    }

    #[test]
    fn test_log_results_uses_injected_sink() {
        let (outcomes, records) = two_departments();
        let sink = MemorySink::new();
        let mut validator = FairnessValidator::new().with_sink(Arc::new(sink.clone()));
        validator.validate_all(&outcomes, &records);
        validator.log_results();

        assert!(sink.contains("=== Validation Report ==="));
        assert!(sink.contains("- sentiment_bias_department: FAILED"));
        assert!(sink.contains("PROMOTION Metrics:"));
    }
}
