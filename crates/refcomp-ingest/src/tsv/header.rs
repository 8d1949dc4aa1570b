use std::collections::HashMap;
use std::path::Path;

use csv::StringRecord;

use crate::error::{IngestError, Result};

/// Column positions keyed by header name.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

impl HeaderIndex {
    pub fn new(record: &StringRecord) -> Self {
        let names: Vec<String> = record.iter().map(normalize_header).collect();
        let mut positions = HashMap::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            positions.entry(name.clone()).or_insert(idx);
        }
        Self { names, positions }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    /// Position of a column that must be present.
    pub fn require(&self, column: &str, path: &Path) -> Result<usize> {
        self.position(column)
            .ok_or_else(|| IngestError::MissingColumn {
                column: column.to_string(),
                path: path.to_path_buf(),
            })
    }
}

/// Field at `idx`, or empty when the row is short.
pub fn field(record: &StringRecord, idx: Option<usize>) -> &str {
    idx.and_then(|i| record.get(i)).unwrap_or("")
}
