//! One flat input row with tolerant header access.

use serde::{Deserialize, Serialize};

/// A single CSV row: ordered (header, value) pairs.
///
/// Lookup trims both sides and compares case-insensitively, recomputed on
/// every call. Export headers are frequently hand-edited, so a cached
/// normalized index could silently change which column a mapping resolves
/// to when two headers normalize to the same key; the linear scan keeps
/// first-declared-wins semantics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn push(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.fields.push((header.into(), value.into()));
    }

    /// Raw value for a column, matched trimmed and case-insensitively.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        let wanted = column.trim();
        self.fields
            .iter()
            .find(|(header, _)| header.trim().eq_ignore_ascii_case(wanted))
            .map(|(_, value)| value.as_str())
    }

    /// Trimmed value for a column, with blank collapsed to `None`.
    #[must_use]
    pub fn get_non_blank(&self, column: &str) -> Option<&str> {
        self.get(column)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// True when the column is present with a non-blank value.
    #[must_use]
    pub fn has_value(&self, column: &str) -> bool {
        self.get_non_blank(column).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(header, value)| (header.as_str(), value.as_str()))
    }
}

impl FromIterator<(String, String)> for Row {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
