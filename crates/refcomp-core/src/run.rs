//! Category by journal orchestration of a comparison run.

use std::collections::BTreeMap;

use refcomp_model::{CandidateRecord, Category, GoldRecord, Journal};
use tracing::{debug, info, info_span, warn};

use crate::aggregator::Aggregator;
use crate::error::{CoreError, Result};
use crate::evaluator::Evaluator;
use crate::matcher::Matcher;
use crate::search::{SearchQuery, SearchSettings, SearchSource};
use crate::store::RecordStore;

/// Venues returned for a unit that matched the journal words but not the
/// journal itself, with their record counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NonExactJournals {
    pub category: String,
    pub journal: String,
    pub venues: BTreeMap<String, usize>,
}

impl NonExactJournals {
    pub fn record_count(&self) -> usize {
        self.venues.values().sum()
    }
}

/// Everything a run produced.
#[derive(Debug)]
pub struct RunOutcome<'s> {
    pub aggregator: Aggregator<'s>,
    /// Gold-side journal names evaluated, in order.
    pub journals: Vec<String>,
    /// Only units that had non-exact venues.
    pub non_exact: Vec<NonExactJournals>,
}

/// Splits source results into records of `journal` and a tally of the rest.
pub fn partition_by_journal(
    journal: &Journal,
    records: Vec<CandidateRecord>,
) -> (Vec<CandidateRecord>, BTreeMap<String, usize>) {
    let mut kept = Vec::with_capacity(records.len());
    let mut other = BTreeMap::new();
    for record in records {
        if journal.matches_source_name(&record.journal) {
            kept.push(record);
        } else {
            *other.entry(record.journal).or_insert(0) += 1;
        }
    }
    (kept, other)
}

/// One comparison run over a gold standard and a search source.
pub struct Comparison<'s, S> {
    store: &'s RecordStore,
    source: S,
    settings: SearchSettings,
    evaluator: Evaluator,
}

impl<'s, S: SearchSource> Comparison<'s, S> {
    pub fn new(store: &'s RecordStore, source: S, settings: SearchSettings, evaluator: Evaluator) -> Self {
        Self {
            store,
            source,
            settings,
            evaluator,
        }
    }

    /// Evaluate every (category, journal) unit in the given order.
    ///
    /// Stops at the first unit whose query the source cannot resolve.
    pub fn run(&self, categories: &[Category], journals: &[&Journal]) -> Result<RunOutcome<'s>> {
        info!(
            categories = categories.len(),
            journals = journals.len(),
            year = ?self.settings.year,
            content = %self.settings.content,
            subscribed = self.settings.subscribed,
            claim_policy = ?self.evaluator.policy(),
            "starting comparison"
        );
        let matcher = Matcher::new(self.store);
        let mut aggregator = Aggregator::new();
        let mut non_exact = Vec::new();

        for category in categories {
            let _category_span = info_span!("category", name = %category.name).entered();
            debug!(query = %category.query, "category query");
            aggregator.declare_category(&category.name);

            for &journal in journals {
                let _unit_span = info_span!("unit", journal = %journal.name).entered();
                let query = SearchQuery {
                    category,
                    journal,
                    settings: &self.settings,
                };
                let returned = self.source.search(&query).map_err(|e| CoreError::UnresolvedQuery {
                    category: category.name.clone(),
                    journal: journal.name.clone(),
                    reason: e.to_string(),
                })?;
                let (candidates, others) = partition_by_journal(journal, returned);
                if !others.is_empty() {
                    for (venue, count) in &others {
                        warn!(venue = %venue, records = count, "journal matched inexactly by words in name");
                    }
                    non_exact.push(NonExactJournals {
                        category: category.name.clone(),
                        journal: journal.name.clone(),
                        venues: others,
                    });
                }

                let golds: Vec<&'s GoldRecord> = self.store.records_in_group(&journal.name);
                let result = self.evaluator.evaluate(candidates, golds, category, &matcher)?;
                info!(
                    gold_positives = result.stats.gold_positives,
                    returned = result.stats.returned,
                    true_positives = result.stats.true_positives,
                    precision = ?result.stats.precision(),
                    recall = ?result.stats.recall(),
                    "unit totals"
                );
                aggregator.record_unit(&category.name, &journal.name, result)?;
            }
        }

        aggregator.log_totals();
        Ok(RunOutcome {
            aggregator,
            journals: journals.iter().map(|j| j.name.clone()).collect(),
            non_exact,
        })
    }
}
