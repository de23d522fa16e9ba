//! Error types for schema interpretation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort registry construction.
///
/// All variants are fatal: there is no partial registry, and callers must
/// not run any dependent operation after a failed build.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema declares no top-level element.
    #[error("schema declares no top-level element")]
    NoRoot,

    /// The schema declares more than one top-level element.
    #[error("schema declares {count} top-level elements, expected exactly one")]
    MultipleRoots { count: usize },

    /// The schema carries no target namespace.
    #[error("schema declares no target namespace")]
    MissingNamespace,

    /// The schema text is not well-formed, or the expected root container
    /// is absent.
    #[error("malformed schema: {0}")]
    Malformed(String),

    /// Failed to read a schema file.
    #[error("failed to read schema {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
