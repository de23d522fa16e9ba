//! Shared data model for the ILR submission toolkit.
//!
//! Holds the types every pipeline stage exchanges: validation findings,
//! mapping configuration, and the flat input row. Schema types live in
//! `ilr-schema`; this crate stays free of parsing concerns.

pub mod issue;
pub mod mapping;
pub mod row;

pub use issue::{IssueKind, IssueSeverity, ValidationIssue, ValidationReport};
pub use mapping::{
    AppFinTemplate, ColumnMapping, EmploymentStatusConfig, EsmField, FamTemplate, MappingConfig,
    TargetSchema, MAX_AIMS,
};
pub use row::Row;
