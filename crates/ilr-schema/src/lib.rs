//! Runtime schema interpretation.
//!
//! Parses an XSD-like schema definition into a typed, navigable
//! [`SchemaRegistry`] that drives validation, mapping and generation
//! generically. Only the subset the submission formats use is interpreted:
//! elements, inline `complexType`/`sequence` structure, and
//! `simpleType`/`restriction` facets.

pub mod element;
pub mod error;
pub mod interpreter;
pub mod raw;
pub mod registry;

pub use element::{BaseType, Cardinality, Constraints, NamedSimpleType, Occurs, SchemaElement};
pub use error::{Result, SchemaError};
pub use registry::{RegistryOptions, SchemaRegistry, build_schema_registry};
