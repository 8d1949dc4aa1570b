#![deny(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Placeholder some sources emit for an identifier they do not have.
pub const ABSENT_PLACEHOLDER: &str = "none";

/// Unique accession of a gold record (for example a `J:` number).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Accession(String);

impl Accession {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidAccession(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Accession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier schemes shared by candidate and gold records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierField {
    /// Digital object identifier.
    Doi,
    /// PubMed identifier.
    Pubmed,
}

impl IdentifierField {
    /// Lookup order used when matching: DOI first, then PubMed.
    pub const FALLBACK_ORDER: [IdentifierField; 2] = [IdentifierField::Doi, IdentifierField::Pubmed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Doi => "DOI",
            Self::Pubmed => "pubmed",
        }
    }
}

impl fmt::Display for IdentifierField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records that expose identifier values by scheme.
pub trait Identified {
    fn identifier(&self, field: IdentifierField) -> Option<&str>;
}

/// Normalizes a raw identifier cell.
///
/// Blank values and the `none` placeholder both mean "no identifier"; anything
/// else is returned trimmed.
pub fn identifier_value(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ABSENT_PLACEHOLDER) {
        None
    } else {
        Some(trimmed.to_string())
    }
}
