//! Precision/recall counters.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Result counts for one query or a sum of queries.
///
/// Precision is `true_positives / returned` and recall is
/// `true_positives / gold_positives`. Either is undefined when its
/// denominator is zero; the getters return `None` in that case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecisionRecall {
    /// Records returned by the query.
    pub returned: usize,
    /// Returned records that matched a gold positive.
    pub true_positives: usize,
    /// Gold records that should have been returned.
    pub gold_positives: usize,
}

impl PrecisionRecall {
    pub fn new(returned: usize, true_positives: usize, gold_positives: usize) -> Self {
        Self {
            returned,
            true_positives,
            gold_positives,
        }
    }

    pub fn inc_returned(&mut self) {
        self.returned += 1;
    }

    pub fn inc_true_positives(&mut self) {
        self.true_positives += 1;
    }

    pub fn add_gold_positives(&mut self, count: usize) {
        self.gold_positives += count;
    }

    pub fn precision_is_defined(&self) -> bool {
        self.returned != 0
    }

    pub fn recall_is_defined(&self) -> bool {
        self.gold_positives != 0
    }

    pub fn precision(&self) -> Option<f64> {
        self.precision_is_defined()
            .then(|| self.true_positives as f64 / self.returned as f64)
    }

    pub fn recall(&self) -> Option<f64> {
        self.recall_is_defined()
            .then(|| self.true_positives as f64 / self.gold_positives as f64)
    }

    pub fn false_positives(&self) -> usize {
        self.returned.saturating_sub(self.true_positives)
    }

    pub fn false_negatives(&self) -> usize {
        self.gold_positives.saturating_sub(self.true_positives)
    }
}

impl AddAssign for PrecisionRecall {
    fn add_assign(&mut self, other: Self) {
        self.returned += other.returned;
        self.true_positives += other.true_positives;
        self.gold_positives += other.gold_positives;
    }
}

impl Add for PrecisionRecall {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl Sum for PrecisionRecall {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_undefined_without_results() {
        let stats = PrecisionRecall::new(0, 0, 3);
        assert!(!stats.precision_is_defined());
        assert_eq!(stats.precision(), None);
        assert_eq!(stats.recall(), Some(0.0));
    }

    #[test]
    fn recall_undefined_without_gold() {
        let stats = PrecisionRecall::new(1, 0, 0);
        assert_eq!(stats.precision(), Some(0.0));
        assert!(!stats.recall_is_defined());
        assert_eq!(stats.recall(), None);
    }

    #[test]
    fn sums_component_wise() {
        let total: PrecisionRecall = [PrecisionRecall::new(3, 2, 3), PrecisionRecall::new(1, 1, 4)]
            .into_iter()
            .sum();
        assert_eq!(total, PrecisionRecall::new(4, 3, 7));
        assert_eq!(total.false_positives(), 1);
        assert_eq!(total.false_negatives(), 4);
    }
}
