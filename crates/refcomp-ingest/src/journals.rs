//! Journal list loading.
//!
//! Layout, one journal per line after a header line:
//!
//! ```text
//! gold_name<TAB>source_name<TAB>prefix_match[<TAB>triaged_by]
//! ```
//!
//! `prefix_match` is `true` or `false`; the triaged-by column may be left off.

use std::path::Path;

use refcomp_model::Journal;
use tracing::info;

use crate::error::{IngestError, Result};
use crate::tsv::{self, field};

const REQUIRED_FIELDS: usize = 3;

pub fn load_journals(path: &Path) -> Result<Vec<Journal>> {
    let mut reader = tsv::open(path)?;
    tsv::headers(&mut reader, path)?;

    let mut journals = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| IngestError::parse(path, e))?;
        if row.len() < REQUIRED_FIELDS {
            return Err(IngestError::ShortRow {
                path: path.to_path_buf(),
                line: tsv::line_of(&row),
                expected: REQUIRED_FIELDS,
                found: row.len(),
            });
        }
        let prefix_match = field(&row, Some(2)).eq_ignore_ascii_case("true");
        let triaged_by = Some(field(&row, Some(3)).to_string());
        journals.push(
            Journal::new(field(&row, Some(0)), field(&row, Some(1)))
                .with_prefix_match(prefix_match)
                .with_triaged_by(triaged_by),
        );
    }

    info!(
        path = %path.display(),
        journals = journals.len(),
        triaged = journals.iter().filter(|j| j.is_triaged()).count(),
        "journal list loaded"
    );
    Ok(journals)
}

/// Journals selected for evaluation.
///
/// With an explicit list of gold-side names, those journals in list order;
/// otherwise every triaged journal in file order. Unknown names are returned
/// separately.
pub fn select_journals<'a>(journals: &'a [Journal], only: &[String]) -> (Vec<&'a Journal>, Vec<String>) {
    if only.is_empty() {
        return (journals.iter().filter(|j| j.is_triaged()).collect(), Vec::new());
    }
    let mut selected = Vec::with_capacity(only.len());
    let mut unknown = Vec::new();
    for name in only {
        match journals.iter().find(|j| j.name == *name) {
            Some(journal) => selected.push(journal),
            None => unknown.push(name.clone()),
        }
    }
    (selected, unknown)
}
