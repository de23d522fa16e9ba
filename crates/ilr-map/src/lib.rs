//! Column mapping and denormalization.
//!
//! Turns one flat, wide CSV row into a nested, schema-shaped record. The
//! target shape is never fixed in code: the registry decides which path
//! segments are objects and which are repeatable groups, the mapping
//! config decides which columns land where, and the aim/template layers
//! expand positional column groups into repeated records.

mod aims;
mod builders;
mod engine;
mod error;
mod transforms;

pub use aims::{map_row_with_aims, substitute_aim};
pub use builders::{build_app_fin_records, build_employment_statuses, build_fam_entries};
pub use engine::{map_row, set_nested_value};
pub use error::{MapError, Result};
pub use transforms::{TransformFn, TransformRegistry};
