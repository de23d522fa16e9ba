//! Constraint validation driven by the schema registry.
//!
//! [`validate_value`] checks one raw value against one element's recovered
//! facets; [`validate_rows`] runs that over a whole CSV export through a
//! mapping config. Findings are always returned as data, never thrown, so
//! a caller can report every problem in one pass.

mod batch;
mod value;

pub use batch::validate_rows;
pub use value::{ValueContext, validate_value};
