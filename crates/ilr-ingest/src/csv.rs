//! CSV export reading.
//!
//! Exports come out of learner-management systems with hand-edited headers
//! and ragged rows, so the reader is deliberately tolerant: headers are
//! trimmed, row lengths are flexible, and short rows are padded with
//! blanks rather than rejected.

use std::io::Read;
use std::path::Path;

use tracing::debug;

use ilr_model::Row;

use crate::error::{IngestError, Result};

/// Reads every record of a CSV export into [`Row`]s.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<Row>> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    collect_rows(reader, |source| IngestError::CsvRead { source })
}

/// Reads every record of a CSV export file into [`Row`]s.
pub fn read_rows_from_path(path: &Path) -> Result<Vec<Row>> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
    let rows = collect_rows(reader, |source| IngestError::CsvParse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), rows = rows.len(), "read csv export");
    Ok(rows)
}

fn collect_rows<R: Read>(
    mut reader: csv::Reader<R>,
    make_error: impl Fn(csv::Error) -> IngestError,
) -> Result<Vec<Row>> {
    let headers: Vec<String> = reader
        .headers()
        .map_err(&make_error)?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(&make_error)?;
        let mut row = Row::new();
        for (index, header) in headers.iter().enumerate() {
            // Flexible parsing allows short records; missing cells are blank.
            row.push(header.clone(), record.get(index).unwrap_or(""));
        }
        rows.push(row);
    }
    Ok(rows)
}
