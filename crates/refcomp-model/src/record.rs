//! Candidate and gold reference records.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::category::FlagId;
use crate::ids::{Accession, Identified, IdentifierField, identifier_value};

/// Delimiter between the first and last page in a combined page range.
pub const PAGE_RANGE_DELIMITER: char = '-';

/// A curated reference from the gold standard.
///
/// Built once by the loader. The only later change is
/// [`GoldRecord::derive_page_bounds`], run by the record store before indexing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldRecord {
    pub accession: Accession,
    pub doi: Option<String>,
    pub pubmed: Option<String>,
    /// Gold-side journal name; the grouping key.
    pub journal: String,
    /// Combined page range as curated, e.g. `87-94`.
    pub pages: String,
    pub starting_page: String,
    pub ending_page: String,
    pub volume: String,
    pub year: String,
    pub title: String,
    pub authors: String,
    flags: BTreeSet<FlagId>,
}

impl GoldRecord {
    pub fn new(accession: Accession, journal: impl Into<String>) -> Self {
        Self {
            accession,
            doi: None,
            pubmed: None,
            journal: journal.into().trim().to_string(),
            pages: String::new(),
            starting_page: String::new(),
            ending_page: String::new(),
            volume: String::new(),
            year: String::new(),
            title: String::new(),
            authors: String::new(),
            flags: BTreeSet::new(),
        }
    }

    pub fn with_doi(mut self, raw: &str) -> Self {
        self.doi = identifier_value(raw);
        self
    }

    pub fn with_pubmed(mut self, raw: &str) -> Self {
        self.pubmed = identifier_value(raw);
        self
    }

    pub fn with_pages(mut self, pages: impl Into<String>) -> Self {
        self.pages = pages.into();
        self
    }

    pub fn with_volume(mut self, volume: impl Into<String>) -> Self {
        self.volume = volume.into();
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = year.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_authors(mut self, authors: impl Into<String>) -> Self {
        self.authors = authors.into();
        self
    }

    /// Marks the record as a member of the flag's category.
    pub fn with_flag(mut self, flag: FlagId) -> Self {
        self.flags.insert(flag);
        self
    }

    pub fn is_flagged(&self, flag: FlagId) -> bool {
        self.flags.contains(&flag)
    }

    /// Splits [`GoldRecord::pages`] into starting and ending page.
    ///
    /// `87-94` gives `87` and `94`. A value without exactly one delimiter keeps
    /// its first segment as the starting page and an empty ending page.
    pub fn derive_page_bounds(&mut self) {
        let (start, end) = split_page_range(&self.pages);
        self.starting_page = start;
        self.ending_page = end;
    }
}

impl Identified for GoldRecord {
    fn identifier(&self, field: IdentifierField) -> Option<&str> {
        match field {
            IdentifierField::Doi => self.doi.as_deref(),
            IdentifierField::Pubmed => self.pubmed.as_deref(),
        }
    }
}

pub fn split_page_range(pages: &str) -> (String, String) {
    let parts: Vec<&str> = pages.trim().split(PAGE_RANGE_DELIMITER).collect();
    let start = parts.first().map(|p| p.trim().to_string()).unwrap_or_default();
    let end = if parts.len() == 2 {
        parts[1].trim().to_string()
    } else {
        String::new()
    };
    (start, end)
}

/// One record returned by the external literature search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub doi: Option<String>,
    pub pubmed: Option<String>,
    /// Venue name exactly as the source returned it.
    pub journal: String,
    pub title: String,
    pub volume: String,
    pub starting_page: String,
    pub ending_page: String,
    pub cover_date: String,
    pub pub_type: String,
    pub prism_type: String,
    pub first_author: String,
}

impl CandidateRecord {
    pub fn new(journal: impl Into<String>) -> Self {
        Self {
            journal: journal.into(),
            ..Self::default()
        }
    }

    pub fn with_doi(mut self, raw: &str) -> Self {
        self.doi = identifier_value(raw);
        self
    }

    pub fn with_pubmed(mut self, raw: &str) -> Self {
        self.pubmed = identifier_value(raw);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

impl Identified for CandidateRecord {
    fn identifier(&self, field: IdentifierField) -> Option<&str> {
        match field {
            IdentifierField::Doi => self.doi.as_deref(),
            IdentifierField::Pubmed => self.pubmed.as_deref(),
        }
    }
}
