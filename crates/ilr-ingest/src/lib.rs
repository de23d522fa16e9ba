//! Input loading for the submission pipeline.
//!
//! Reads CSV exports into [`ilr_model::Row`]s and loads JSON mapping
//! configs, rejecting configs that fail structural checks before any
//! downstream work runs.

mod config;
mod csv;
mod error;

pub use config::{load_mapping_config, load_mapping_config_from_str};
pub use csv::{read_rows, read_rows_from_path};
pub use error::{IngestError, Result};
