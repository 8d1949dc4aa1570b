//! Data model for comparing literature search results with a curated
//! reference set.

pub mod category;
pub mod error;
pub mod ids;
pub mod journal;
pub mod record;
pub mod stats;

pub use category::{Category, CategoryDefinition, FlagId, FlagSchema, Membership, MembershipTest};
pub use error::{ModelError, Result};
pub use ids::{ABSENT_PLACEHOLDER, Accession, Identified, IdentifierField, identifier_value};
pub use journal::Journal;
pub use record::{CandidateRecord, GoldRecord, split_page_range};
pub use stats::PrecisionRecall;
