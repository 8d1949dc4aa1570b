//! Boundary with the external literature search.

use std::collections::HashSet;

use refcomp_model::{CandidateRecord, Category, Journal};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Failure reported by a search source.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    /// The source returned no usable answer (connectivity, query syntax).
    #[error("{reason}")]
    Unresolved { reason: String },
}

/// Source-side search options shared by every query of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Publication year; bounds every query to that year when set.
    pub year: Option<i32>,
    pub content: String,
    pub subscribed: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            year: None,
            content: "journals".to_string(),
            subscribed: true,
        }
    }
}

/// The query for one evaluation unit.
#[derive(Debug, Clone, Copy)]
pub struct SearchQuery<'a> {
    pub category: &'a Category,
    pub journal: &'a Journal,
    pub settings: &'a SearchSettings,
}

impl SearchQuery<'_> {
    /// Journal title as sent to the source; `&` is replaced by a space.
    pub fn source_title(&self) -> String {
        self.journal.source_name.replace('&', " ")
    }

    /// Full search expression: date bounds, journal title and category query.
    pub fn expression(&self) -> String {
        let mut expression = format!(
            "srctitle(\"{}\") AND\n{}",
            self.source_title(),
            self.category.query
        );
        if let Some(year) = self.settings.year {
            expression = format!(
                "Pub-Date BEF {}0101 AND Pub-Date AFT {}1231 AND {expression}",
                year + 1,
                year - 1
            );
        }
        expression
    }
}

/// Anything that can answer a unit's query with candidate records.
///
/// Sources return every record whose venue contains the journal words;
/// exact journal filtering happens in the caller.
pub trait SearchSource {
    fn search(&self, query: &SearchQuery<'_>) -> Result<Vec<CandidateRecord>, SearchError>;
}

impl<S: SearchSource + ?Sized> SearchSource for &S {
    fn search(&self, query: &SearchQuery<'_>) -> Result<Vec<CandidateRecord>, SearchError> {
        (**self).search(query)
    }
}

/// One recorded row: a returned record or a query that returned nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEntry {
    pub category: String,
    /// Gold-side journal the row was kept for. Tagged rows answer only that
    /// journal's query; untagged rows answer any journal whose words they match.
    pub unit: Option<String>,
    /// `None` records that the query ran and returned no records.
    pub record: Option<CandidateRecord>,
}

impl RecordedEntry {
    pub fn new(category: impl Into<String>, record: CandidateRecord) -> Self {
        Self {
            category: category.into(),
            unit: None,
            record: Some(record),
        }
    }

    /// Marks a (category, journal) query that returned nothing.
    pub fn empty(category: impl Into<String>, journal: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            unit: Some(journal.into()),
            record: None,
        }
    }

    pub fn for_unit(mut self, journal: impl Into<String>) -> Self {
        self.unit = Some(journal.into());
        self
    }

    fn answers(&self, query: &SearchQuery<'_>, title: &str) -> bool {
        if self.category != query.category.name {
            return false;
        }
        match (&self.unit, &self.record) {
            (Some(unit), _) => *unit == query.journal.name,
            (None, Some(record)) => venue_contains_words(&record.journal, title),
            (None, None) => false,
        }
    }
}

/// Answers queries from previously recorded results.
///
/// A query for a category with nothing recorded is unresolved rather than
/// empty. Empty entries make a category count as recorded without adding
/// records.
#[derive(Debug, Clone, Default)]
pub struct RecordedSearch {
    entries: Vec<RecordedEntry>,
    categories: HashSet<String>,
}

impl RecordedSearch {
    pub fn new(entries: impl IntoIterator<Item = RecordedEntry>) -> Self {
        let entries: Vec<RecordedEntry> = entries.into_iter().collect();
        let categories = entries.iter().map(|entry| entry.category.clone()).collect();
        Self { entries, categories }
    }

    /// Number of recorded records, not counting empty entries.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|entry| entry.record.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// True if every word of `title` occurs in `venue`, ignoring case.
pub fn venue_contains_words(venue: &str, title: &str) -> bool {
    let venue_words = words(venue);
    words(title).iter().all(|w| venue_words.contains(w))
}

impl SearchSource for RecordedSearch {
    fn search(&self, query: &SearchQuery<'_>) -> Result<Vec<CandidateRecord>, SearchError> {
        let category = &query.category.name;
        if !self.categories.contains(category) {
            return Err(SearchError::Unresolved {
                reason: format!("no recorded results for category {category}"),
            });
        }
        let title = query.source_title();
        let found: Vec<CandidateRecord> = self
            .entries
            .iter()
            .filter(|entry| entry.answers(query, &title))
            .filter_map(|entry| entry.record.clone())
            .collect();
        debug!(category = %category, title = %title, found = found.len(), "recorded search");
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use refcomp_model::Membership;

    use super::*;

    fn category(name: &str, query: &str) -> Category {
        Category {
            code: "G".to_string(),
            name: name.to_string(),
            display_name: name.to_string(),
            membership: Membership::All,
            query: query.to_string(),
        }
    }

    #[test]
    fn expression_without_year() {
        let category = category("GO_1", "TITLE-ABS-KEY(gene)");
        let journal = Journal::new("Cell Mol Life Sci", "Cell & Molecular Life Sciences");
        let settings = SearchSettings::default();
        let query = SearchQuery {
            category: &category,
            journal: &journal,
            settings: &settings,
        };
        assert_eq!(
            query.expression(),
            "srctitle(\"Cell   Molecular Life Sciences\") AND\nTITLE-ABS-KEY(gene)"
        );
    }

    #[test]
    fn expression_with_year_bounds() {
        let category = category("GO_1", "q");
        let journal = Journal::new("Cell", "Cell");
        let settings = SearchSettings {
            year: Some(2017),
            ..SearchSettings::default()
        };
        let query = SearchQuery {
            category: &category,
            journal: &journal,
            settings: &settings,
        };
        assert_eq!(
            query.expression(),
            "Pub-Date BEF 20180101 AND Pub-Date AFT 20161231 AND srctitle(\"Cell\") AND\nq"
        );
    }

    #[test]
    fn venue_word_matching() {
        assert!(venue_contains_words("Developmental Biology", "developmental biology"));
        assert!(venue_contains_words("Cell Reports", "Cell"));
        assert!(!venue_contains_words("Cell", "Cell Reports"));
    }

    fn query<'a>(category: &'a Category, journal: &'a Journal, settings: &'a SearchSettings) -> SearchQuery<'a> {
        SearchQuery {
            category,
            journal,
            settings,
        }
    }

    #[test]
    fn recorded_search_filters_by_category_and_journal() {
        let source = RecordedSearch::new(vec![
            RecordedEntry::new("GO_1", CandidateRecord::new("Cell").with_doi("d1")),
            RecordedEntry::new("GO_1", CandidateRecord::new("Gene").with_doi("d2")),
            RecordedEntry::new("GO_1", CandidateRecord::new("Cell Reports").with_doi("d3")),
            RecordedEntry::new("AP_1", CandidateRecord::new("Cell").with_doi("d4")),
        ]);
        let category = category("GO_1", "q");
        let journal = Journal::new("Cell", "Cell");
        let settings = SearchSettings::default();
        let found = source.search(&query(&category, &journal, &settings)).unwrap();
        let dois: Vec<&str> = found.iter().filter_map(|r| r.doi.as_deref()).collect();
        assert_eq!(dois, vec!["d1", "d3"]);
    }

    #[test]
    fn tagged_entries_answer_only_their_journal() {
        let record = CandidateRecord::new("Cell Reports").with_doi("d5");
        let source = RecordedSearch::new(vec![
            RecordedEntry::new("None_1", record.clone()).for_unit("Cell"),
            RecordedEntry::new("None_1", record).for_unit("Cell Rep"),
        ]);
        let category = category("None_1", "ALL");
        let settings = SearchSettings::default();
        let cell = Journal::new("Cell", "Cell");
        let reports = Journal::new("Cell Rep", "Cell Reports");
        assert_eq!(source.search(&query(&category, &cell, &settings)).unwrap().len(), 1);
        assert_eq!(source.search(&query(&category, &reports, &settings)).unwrap().len(), 1);
        assert_eq!(source.len(), 2);
    }

    #[test]
    fn empty_entry_resolves_to_no_records() {
        let source = RecordedSearch::new(vec![RecordedEntry::empty("GO_1", "Cell")]);
        let category = category("GO_1", "q");
        let settings = SearchSettings::default();
        let cell = Journal::new("Cell", "Cell");
        let gene = Journal::new("Gene", "Gene");
        assert!(source.search(&query(&category, &cell, &settings)).unwrap().is_empty());
        assert!(source.search(&query(&category, &gene, &settings)).unwrap().is_empty());
        assert!(source.is_empty());
    }

    #[test]
    fn unrecorded_category_is_unresolved() {
        let source = RecordedSearch::new(Vec::new());
        let category = category("TM_1", "q");
        let journal = Journal::new("Cell", "Cell");
        let settings = SearchSettings::default();
        let err = source.search(&query(&category, &journal, &settings)).unwrap_err();
        assert!(matches!(err, SearchError::Unresolved { .. }));
    }
}
