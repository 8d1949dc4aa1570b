//! Error types for model construction.

use thiserror::Error;

/// Errors raised while building model values from loaded data or configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// Accession identifiers must be non-empty.
    #[error("invalid accession: {0:?}")]
    InvalidAccession(String),

    /// A category names a membership field that the gold standard does not carry.
    #[error("category {category} uses unknown membership field '{field}'")]
    UnknownMembershipField { category: String, field: String },

    /// A category was configured without any search expression.
    #[error("category {category} has no search queries")]
    NoQueries { category: String },

    /// A required field was empty.
    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
