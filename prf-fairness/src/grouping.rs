//! Demographic grouping of assessment outcomes
//!
//! Grouping is total: every outcome lands in exactly one group per
//! attribute. Outcomes whose employee has no demographic record, or whose
//! record lacks the attribute, go to [`UNKNOWN_GROUP`]. Groups are kept in
//! sorted label order so output is reproducible.

use crate::types::{AssessmentOutcome, DemographicRecord, EmployeeId, TRACKED_ATTRIBUTES, UNKNOWN_GROUP};
use std::collections::{BTreeMap, HashMap};

/// Group label → outcomes in that group, for one attribute
pub type AttributeGroups<'a> = BTreeMap<String, Vec<&'a AssessmentOutcome>>;

/// Lookup structure over one batch of demographic records
pub struct DemographicIndex<'a> {
    records: &'a [DemographicRecord],
    by_id: HashMap<&'a EmployeeId, &'a DemographicRecord>,
}

impl<'a> DemographicIndex<'a> {
    /// Index records by id; a later record with a duplicate id replaces the earlier one
    pub fn new(records: &'a [DemographicRecord]) -> Self {
        let by_id = records.iter().map(|r| (&r.id, r)).collect();
        Self { records, by_id }
    }

    pub fn record_for(&self, id: &EmployeeId) -> Option<&'a DemographicRecord> {
        self.by_id.get(id).copied()
    }

    /// Group label of `outcome` for `attribute`
    pub fn label_for(&self, outcome: &AssessmentOutcome, attribute: &str) -> &'a str {
        self.record_for(&outcome.employee_id)
            .map(|r| r.attribute_or_unknown(attribute))
            .unwrap_or(UNKNOWN_GROUP)
    }

    /// Performance rating of the outcome's own employee.
    ///
    /// Reads the first record with this id in input order, while
    /// [`record_for`](Self::record_for) (and so group labels) sees the last.
    /// The two only differ when the directory repeats an id.
    pub fn rating_for(&self, id: &EmployeeId) -> Option<f64> {
        self.records
            .iter()
            .find(|r| &r.id == id)
            .and_then(|r| r.performance_rating)
    }

    /// Rating of the first record (in input order) whose attribute value
    /// equals `label`. Matches by attribute value, not employee identity.
    pub fn first_rating_with_label(&self, attribute: &str, label: &str) -> Option<f64> {
        self.records
            .iter()
            .find(|r| r.attribute_or_unknown(attribute) == label)
            .and_then(|r| r.performance_rating)
    }
}

/// Group outcomes by a single attribute
pub fn group_by_attribute<'a>(
    outcomes: &'a [AssessmentOutcome],
    index: &DemographicIndex<'_>,
    attribute: &str,
) -> AttributeGroups<'a> {
    let mut groups: AttributeGroups<'a> = BTreeMap::new();
    for outcome in outcomes {
        groups
            .entry(index.label_for(outcome, attribute).to_string())
            .or_default()
            .push(outcome);
    }
    groups
}

/// Group outcomes by every tracked attribute, preserving attribute order
pub fn group_by_demographics<'a>(
    outcomes: &'a [AssessmentOutcome],
    index: &DemographicIndex<'_>,
) -> Vec<(&'static str, AttributeGroups<'a>)> {
    TRACKED_ATTRIBUTES
        .iter()
        .map(|attr| (*attr, group_by_attribute(outcomes, index, attr)))
        .collect()
}

/// Unordered pairs of tracked attributes:
/// (gender, department), (gender, role_level), (department, role_level)
pub fn attribute_pairs() -> Vec<(&'static str, &'static str)> {
    let mut pairs = Vec::new();
    for (i, first) in TRACKED_ATTRIBUTES.iter().enumerate() {
        for second in &TRACKED_ATTRIBUTES[i + 1..] {
            pairs.push((*first, *second));
        }
    }
    pairs
}

/// Bucket sentiment scores by the combined `"<v1>_<v2>"` label of each
/// outcome's employee
pub fn intersectional_sentiment(
    outcomes: &[AssessmentOutcome],
    index: &DemographicIndex<'_>,
    first: &str,
    second: &str,
) -> BTreeMap<String, Vec<f64>> {
    let mut buckets: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for outcome in outcomes {
        let label = format!(
            "{}_{}",
            index.label_for(outcome, first),
            index.label_for(outcome, second)
        );
        buckets.entry(label).or_default().push(outcome.sentiment_score);
    }
    buckets
}
