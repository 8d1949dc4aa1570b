//! Error types for evaluation.

use thiserror::Error;

/// Gold-standard integrity failures found while indexing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Two gold records share a value of a field that must be unique.
    #[error("{field} \"{value}\" matches more than one gold record")]
    DuplicateKey { field: &'static str, value: String },
}

/// Errors that abort a comparison run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The search source could not answer a unit's query.
    #[error("query for category {category}, journal {journal} was not resolved: {reason}")]
    UnresolvedQuery {
        category: String,
        journal: String,
        reason: String,
    },

    /// A (category, journal) unit was recorded twice.
    #[error("unit ({category}, {journal}) already recorded")]
    DuplicateUnit { category: String, journal: String },

    #[error("no result recorded for unit ({category}, {journal})")]
    UnitNotFound { category: String, journal: String },

    #[error("unknown category: {category}")]
    CategoryNotFound { category: String },

    /// A gold record matched a second candidate within one unit.
    #[error("gold record {gold} already claimed; second claim by candidate {candidate}")]
    AlreadyClaimed { gold: String, candidate: String },

    /// The keying function mapped two gold records of a unit to one key.
    #[error("gold key {key} is not unique within the unit")]
    DuplicateGoldKey { key: String },
}

/// Result type for evaluation operations.
pub type Result<T> = std::result::Result<T, CoreError>;
