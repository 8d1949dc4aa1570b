use serde::{Deserialize, Serialize};

/// A journal evaluated as one group.
///
/// Holds both the gold-side name (the grouping key) and the name the search
/// source uses for the same journal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Journal {
    pub name: String,
    pub source_name: String,
    /// Source-side names carry variable suffixes; match on prefix.
    pub prefix_match: bool,
    pub triaged_by: Option<String>,
}

impl Journal {
    pub fn new(name: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_name: source_name.into(),
            prefix_match: false,
            triaged_by: None,
        }
    }

    pub fn with_prefix_match(mut self, enable: bool) -> Self {
        self.prefix_match = enable;
        self
    }

    pub fn with_triaged_by(mut self, curator: Option<String>) -> Self {
        self.triaged_by = curator.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn is_triaged(&self) -> bool {
        self.triaged_by.is_some()
    }

    /// Returns true if a venue name reported by the source is this journal.
    pub fn matches_source_name(&self, venue: &str) -> bool {
        venue == self.source_name || (self.prefix_match && venue.starts_with(&self.source_name))
    }
}
