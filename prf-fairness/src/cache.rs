//! "Seen so far" assessment cache
//!
//! The review pipeline produces outcomes one employee at a time. Validating
//! a handful of them says nothing about group disparity, so callers collect
//! outcomes here and only run the validator once [`AssessmentCache::is_ready`]
//! reports enough data.

use crate::types::{AssessmentOutcome, EmployeeId};
use std::collections::HashMap;

/// Minimum number of distinct assessments before validation is meaningful
pub const MIN_ASSESSMENTS_FOR_VALIDATION: usize = 5;

/// Latest outcome per employee, in first-seen order
#[derive(Debug, Clone)]
pub struct AssessmentCache {
    outcomes: Vec<AssessmentOutcome>,
    positions: HashMap<EmployeeId, usize>,
    min_assessments: usize,
}

impl Default for AssessmentCache {
    fn default() -> Self {
        Self::new()
    }
}

impl AssessmentCache {
    pub fn new() -> Self {
        Self::with_min_assessments(MIN_ASSESSMENTS_FOR_VALIDATION)
    }

    pub fn with_min_assessments(min_assessments: usize) -> Self {
        Self {
            outcomes: Vec::new(),
            positions: HashMap::new(),
            min_assessments,
        }
    }

    /// Insert an outcome; a newer outcome for the same employee replaces the older one.
    /// Returns `true` if the employee was not seen before.
    pub fn insert(&mut self, outcome: AssessmentOutcome) -> bool {
        match self.positions.get(&outcome.employee_id) {
            Some(&pos) => {
                self.outcomes[pos] = outcome;
                false
            }
            None => {
                self.positions.insert(outcome.employee_id.clone(), self.outcomes.len());
                self.outcomes.push(outcome);
                true
            }
        }
    }

    pub fn extend<I: IntoIterator<Item = AssessmentOutcome>>(&mut self, outcomes: I) {
        for outcome in outcomes {
            self.insert(outcome);
        }
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn min_assessments(&self) -> usize {
        self.min_assessments
    }

    pub fn is_ready(&self) -> bool {
        self.outcomes.len() >= self.min_assessments
    }

    pub fn outcomes(&self) -> &[AssessmentOutcome] {
        &self.outcomes
    }

    pub fn clear(&mut self) {
        self.outcomes.clear();
        self.positions.clear();
    }
}
