//! Loaders for the tab-delimited inputs of a comparison run.
//!
//! # Features
//!
//! - **Gold standard**: curated references with identifier, journal, page and
//!   membership flag columns
//! - **Journal list**: gold-side and source-side journal names
//! - **Recorded results**: search results captured for offline replay

mod error;
mod gold;
mod journals;
mod results;
pub mod tsv;

// === Error Types ===
pub use error::{IngestError, Result};

// === Gold Standard ===
pub use gold::{GoldColumns, GoldTable, load_gold_table, parse_flag};

// === Journals ===
pub use journals::{load_journals, select_journals};

// === Recorded Results ===
pub use results::{RecordedResult, load_recorded_results};
