//! Gold-standard reference loading.

use std::path::Path;

use refcomp_model::{Accession, FlagSchema, GoldRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{IngestError, Result};
use crate::tsv::{self, field};

/// Header names of the gold-standard columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoldColumns {
    pub accession: String,
    pub doi: String,
    pub pubmed: String,
    pub journal: String,
    pub pages: String,
    pub title: String,
    pub year: String,
    pub authors: String,
    pub volume: String,
}

impl Default for GoldColumns {
    fn default() -> Self {
        Self {
            accession: "Jnum".to_string(),
            doi: "DOI".to_string(),
            pubmed: "pubmed".to_string(),
            journal: "journal".to_string(),
            pages: "pgs".to_string(),
            title: "title".to_string(),
            year: "year".to_string(),
            authors: "authors".to_string(),
            volume: "vol".to_string(),
        }
    }
}

/// Loaded gold standard: the records plus the flag columns they carry.
#[derive(Debug, Clone)]
pub struct GoldTable {
    pub schema: FlagSchema,
    pub records: Vec<GoldRecord>,
}

impl GoldTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parse a membership flag cell. Blank reads as not flagged.
pub fn parse_flag(raw: &str) -> Option<bool> {
    let value = raw.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("false") {
        Some(false)
    } else if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else {
        None
    }
}

/// Load the gold standard from a tab-delimited file with a header line.
///
/// The accession, identifier, journal and page columns are required, as is
/// every column named in `flag_fields`. Title, year, author and volume
/// columns are read when present.
pub fn load_gold_table(path: &Path, columns: &GoldColumns, flag_fields: &[String]) -> Result<GoldTable> {
    info!(path = %path.display(), "reading gold standard");
    let mut reader = tsv::open(path)?;
    let header = tsv::headers(&mut reader, path)?;

    let accession_idx = header.require(&columns.accession, path)?;
    let doi_idx = header.require(&columns.doi, path)?;
    let pubmed_idx = header.require(&columns.pubmed, path)?;
    let journal_idx = header.require(&columns.journal, path)?;
    let pages_idx = header.require(&columns.pages, path)?;
    let title_idx = header.position(&columns.title);
    let year_idx = header.position(&columns.year);
    let authors_idx = header.position(&columns.authors);
    let volume_idx = header.position(&columns.volume);

    let schema = FlagSchema::new(flag_fields);
    let mut flag_columns = Vec::with_capacity(schema.names().len());
    for (id, name) in schema.ids().zip(schema.names()) {
        flag_columns.push((id, name.as_str(), header.require(name, path)?));
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| IngestError::parse(path, e))?;
        let line = tsv::line_of(&row);
        let accession = Accession::new(field(&row, Some(accession_idx))).map_err(|source| {
            IngestError::Record {
                path: path.to_path_buf(),
                line,
                source,
            }
        })?;

        let mut record = GoldRecord::new(accession, field(&row, Some(journal_idx)))
            .with_doi(field(&row, Some(doi_idx)))
            .with_pubmed(field(&row, Some(pubmed_idx)))
            .with_pages(field(&row, Some(pages_idx)))
            .with_title(field(&row, title_idx))
            .with_year(field(&row, year_idx))
            .with_authors(field(&row, authors_idx))
            .with_volume(field(&row, volume_idx));

        for &(id, name, idx) in &flag_columns {
            let raw = field(&row, Some(idx));
            match parse_flag(raw) {
                Some(true) => record = record.with_flag(id),
                Some(false) => {}
                None => {
                    return Err(IngestError::InvalidValue {
                        field: name.to_string(),
                        value: raw.to_string(),
                        path: path.to_path_buf(),
                        line,
                    });
                }
            }
        }
        records.push(record);
    }

    debug!(flags = schema.names().len(), "gold flag columns resolved");
    info!(records = records.len(), "gold standard loaded");
    Ok(GoldTable { schema, records })
}
