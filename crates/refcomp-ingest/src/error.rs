//! Error types for loading tab-delimited inputs.

use std::path::PathBuf;

use refcomp_model::ModelError;
use thiserror::Error;

/// Errors that can occur while reading input files.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// Malformed tab-delimited content.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// File has no header line.
    #[error("file is empty: {path}")]
    EmptyFile { path: PathBuf },

    /// Required column not found in the header line.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// Row has too few fields for the layout.
    #[error("{path} line {line}: expected at least {expected} fields, found {found}")]
    ShortRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// Invalid value in a typed field.
    #[error("{path} line {line}: invalid {field} value '{value}'")]
    InvalidValue {
        field: String,
        value: String,
        path: PathBuf,
        line: u64,
    },

    /// Row rejected by record validation.
    #[error("{path} line {line}: {source}")]
    Record {
        path: PathBuf,
        line: u64,
        #[source]
        source: ModelError,
    },
}

impl IngestError {
    pub(crate) fn parse(path: &std::path::Path, source: csv::Error) -> Self {
        if let csv::ErrorKind::Io(io) = source.kind()
            && io.kind() == std::io::ErrorKind::NotFound
        {
            return Self::FileNotFound {
                path: path.to_path_buf(),
            };
        }
        Self::Parse {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
