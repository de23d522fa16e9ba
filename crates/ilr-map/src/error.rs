//! Error types for mapping.

use thiserror::Error;

/// Errors that abort a mapping call.
///
/// A misconfigured mapping is a configuration defect, not a data defect,
/// so the whole row stops processing rather than silently continuing with
/// a raw value where a transform was explicitly requested.
#[derive(Debug, Error)]
pub enum MapError {
    /// A mapping referenced a transform name the registry does not know.
    #[error("unknown transform '{name}' referenced by mapping for column '{column}'")]
    UnknownTransform { name: String, column: String },
}

/// Result type for mapping operations.
pub type Result<T> = std::result::Result<T, MapError>;
