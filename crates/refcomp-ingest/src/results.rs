//! Recorded search results.
//!
//! A recorded result file holds the records a search source returned, one per
//! line, each tagged with the category name it was returned for. An optional
//! `unit` column names the gold-side journal the record was kept for. A row
//! with a blank `journal` records a query that returned nothing. The column
//! names follow the all-results dump so a dump can be replayed.

use std::path::Path;

use refcomp_model::CandidateRecord;
use serde::Deserialize;
use tracing::info;

use crate::error::{IngestError, Result};
use crate::tsv;

#[derive(Debug, Deserialize)]
struct RecordedRow {
    category: String,
    #[serde(default)]
    unit: String,
    journal: String,
    #[serde(default)]
    pubmed: String,
    #[serde(default, rename = "DOI")]
    doi: String,
    #[serde(default)]
    volume: String,
    #[serde(default, rename = "startingPage")]
    starting_page: String,
    #[serde(default, rename = "endingPage")]
    ending_page: String,
    #[serde(default, rename = "coverDate")]
    cover_date: String,
    #[serde(default, rename = "pubType")]
    pub_type: String,
    #[serde(default, rename = "prismType")]
    prism_type: String,
    #[serde(default)]
    title: String,
    #[serde(default, rename = "firstAuthor")]
    first_author: String,
}

/// One recorded row: the category, the journal it was kept for if known,
/// and the returned record unless the query returned nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedResult {
    pub category: String,
    pub unit: Option<String>,
    pub record: Option<CandidateRecord>,
}

impl From<RecordedRow> for RecordedResult {
    fn from(row: RecordedRow) -> Self {
        let unit = Some(row.unit).filter(|unit| !unit.is_empty());
        if row.journal.is_empty() {
            return Self {
                category: row.category,
                unit,
                record: None,
            };
        }
        let record = CandidateRecord {
            volume: row.volume,
            starting_page: row.starting_page,
            ending_page: row.ending_page,
            cover_date: row.cover_date,
            pub_type: row.pub_type,
            prism_type: row.prism_type,
            first_author: row.first_author,
            ..CandidateRecord::new(row.journal)
                .with_doi(&row.doi)
                .with_pubmed(&row.pubmed)
                .with_title(row.title)
        };
        Self {
            category: row.category,
            unit,
            record: Some(record),
        }
    }
}

/// Load recorded results in file order.
pub fn load_recorded_results(path: &Path) -> Result<Vec<RecordedResult>> {
    let mut reader = tsv::open(path)?;
    let header = tsv::headers(&mut reader, path)?;
    header.require("category", path)?;
    header.require("journal", path)?;

    let mut results = Vec::new();
    for row in reader.deserialize::<RecordedRow>() {
        let row = row.map_err(|e| IngestError::parse(path, e))?;
        results.push(RecordedResult::from(row));
    }
    info!(path = %path.display(), records = results.len(), "recorded results loaded");
    Ok(results)
}
