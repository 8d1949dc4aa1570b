//! Running totals across evaluation units.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use refcomp_model::PrecisionRecall;
use tracing::info;

use crate::error::{CoreError, Result};
use crate::evaluator::UnitResult;

/// Per-category totals plus every recorded unit, kept for drill-down.
///
/// Each (category, journal) unit may be recorded once. Categories and units
/// iterate in first-seen order.
#[derive(Debug, Default)]
pub struct Aggregator<'s> {
    categories: Vec<String>,
    totals: HashMap<String, PrecisionRecall>,
    units: HashMap<(String, String), UnitResult<'s>>,
    unit_order: Vec<(String, String)>,
}

impl<'s> Aggregator<'s> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a category so it reports totals even with no units.
    pub fn declare_category(&mut self, category: &str) {
        if !self.totals.contains_key(category) {
            self.categories.push(category.to_string());
            self.totals.insert(category.to_string(), PrecisionRecall::default());
        }
    }

    pub fn record_unit(&mut self, category: &str, journal: &str, result: UnitResult<'s>) -> Result<()> {
        let key = (category.to_string(), journal.to_string());
        let stats = result.stats;
        match self.units.entry(key.clone()) {
            Entry::Occupied(_) => {
                return Err(CoreError::DuplicateUnit {
                    category: key.0,
                    journal: key.1,
                });
            }
            Entry::Vacant(entry) => {
                entry.insert(result);
            }
        }
        self.declare_category(category);
        if let Some(total) = self.totals.get_mut(category) {
            *total += stats;
        }
        self.unit_order.push(key);
        Ok(())
    }

    pub fn category_totals(&self, category: &str) -> Result<PrecisionRecall> {
        self.totals
            .get(category)
            .copied()
            .ok_or_else(|| CoreError::CategoryNotFound {
                category: category.to_string(),
            })
    }

    pub fn unit_result(&self, category: &str, journal: &str) -> Result<&UnitResult<'s>> {
        self.units
            .get(&(category.to_string(), journal.to_string()))
            .ok_or_else(|| CoreError::UnitNotFound {
                category: category.to_string(),
                journal: journal.to_string(),
            })
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Units of one category as (journal, result), in record order.
    pub fn units_of<'a>(&'a self, category: &'a str) -> impl Iterator<Item = (&'a str, &'a UnitResult<'s>)> + 'a {
        self.units().filter(move |(cat, _, _)| *cat == category).map(|(_, journal, result)| (journal, result))
    }

    /// Every unit as (category, journal, result), in record order.
    pub fn units(&self) -> impl Iterator<Item = (&str, &str, &UnitResult<'s>)> + '_ {
        self.unit_order.iter().filter_map(|key| {
            self.units
                .get(key)
                .map(|result| (key.0.as_str(), key.1.as_str(), result))
        })
    }

    /// Totals of one journal summed over all categories.
    pub fn group_totals(&self, journal: &str) -> PrecisionRecall {
        self.units()
            .filter(|(_, j, _)| *j == journal)
            .map(|(_, _, result)| result.stats)
            .sum()
    }

    /// Sum of every category's totals.
    pub fn grand_total(&self) -> PrecisionRecall {
        self.categories
            .iter()
            .filter_map(|category| self.totals.get(category))
            .copied()
            .sum()
    }

    pub fn log_totals(&self) {
        for category in &self.categories {
            if let Some(total) = self.totals.get(category) {
                info!(
                    category = %category,
                    gold_positives = total.gold_positives,
                    returned = total.returned,
                    true_positives = total.true_positives,
                    precision = ?total.precision(),
                    recall = ?total.recall(),
                    "category totals"
                );
            }
        }
    }
}
