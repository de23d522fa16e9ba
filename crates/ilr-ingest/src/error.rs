//! Error types for CSV and config ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading input data or mapping configs.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Failed to read a file from disk.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to open or parse a CSV file.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Failed to parse CSV from an in-memory reader.
    #[error("failed to parse CSV input: {source}")]
    CsvRead {
        #[source]
        source: csv::Error,
    },

    /// Mapping config is not valid JSON (or does not match the expected
    /// document shape).
    #[error("invalid mapping config JSON: {source}")]
    ConfigParse {
        #[source]
        source: serde_json::Error,
    },

    /// Mapping config parsed but failed structural checks.
    #[error("invalid mapping config: {}", issues.join("; "))]
    InvalidConfig { issues: Vec<String> },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
