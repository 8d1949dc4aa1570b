//! Matching and precision/recall evaluation of search results against a
//! gold standard.
//!
//! Data flows leaves first: the [`RecordStore`] indexes gold records, the
//! [`Matcher`] maps one candidate to at most one gold record, the
//! [`Evaluator`] classifies one (category, journal) unit and the
//! [`Aggregator`] keeps totals. [`Comparison`] drives a whole run against a
//! [`SearchSource`].

pub mod aggregator;
pub mod error;
pub mod evaluator;
pub mod matcher;
pub mod run;
pub mod search;
pub mod store;

pub use aggregator::Aggregator;
pub use error::{CoreError, Result, StoreError};
pub use evaluator::{
    ClaimPolicy, Evaluator, FalsePositive, FalsePositiveReason, TruePositive, UnitResult,
    accession_key, describe_candidate,
};
pub use matcher::{GoldLookup, MatchOutcome, Matcher};
pub use run::{Comparison, NonExactJournals, RunOutcome, partition_by_journal};
pub use search::{
    RecordedEntry, RecordedSearch, SearchError, SearchQuery, SearchSettings, SearchSource, venue_contains_words,
};
pub use store::RecordStore;
