//! Shared tab-delimited reading.

mod header;

pub use header::{HeaderIndex, field};

use std::fs::File;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord, Trim};

use crate::error::{IngestError, Result};

/// Field delimiter for every input file.
pub const DELIMITER: u8 = b'\t';

/// Lines starting with this byte are skipped.
pub const COMMENT: u8 = b'#';

/// Open a tab-delimited file with a header line.
///
/// Rows may have varying field counts, surrounding whitespace is trimmed and
/// `#` comment lines are skipped.
pub fn open(path: &Path) -> Result<Reader<File>> {
    ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(COMMENT))
        .quoting(false)
        .from_path(path)
        .map_err(|e| IngestError::parse(path, e))
}

/// Read and index the header line.
pub fn headers(reader: &mut Reader<File>, path: &Path) -> Result<HeaderIndex> {
    let record = reader
        .headers()
        .map_err(|e| IngestError::parse(path, e))?;
    if record.iter().all(str::is_empty) {
        return Err(IngestError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    Ok(HeaderIndex::new(record))
}

/// One-based line number of a record, for diagnostics.
pub fn line_of(record: &StringRecord) -> u64 {
    record.position().map_or(0, csv::Position::line)
}
