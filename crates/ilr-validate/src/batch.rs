//! Batch validation of CSV rows against a mapping config.
//!
//! Rows are validated independently: one malformed row never suppresses
//! reporting on the rest of the file.

use tracing::debug;

use ilr_model::{IssueKind, MappingConfig, Row, ValidationIssue, ValidationReport};
use ilr_schema::SchemaRegistry;

use crate::value::{ValueContext, validate_value};

fn substitute_aim(template: &str, aim: u8) -> String {
    template.replacen("{n}", &aim.to_string(), 1)
}

/// Validates every mapped cell of every row, collecting all issues.
///
/// Aim-tagged mappings are probed against their aim-substituted column
/// name. A mapping whose `xsd_path` does not resolve in the registry
/// yields an `Unexpected` issue for that row instead of aborting.
#[must_use]
pub fn validate_rows(
    rows: &[Row],
    config: &MappingConfig,
    registry: &SchemaRegistry,
) -> ValidationReport {
    let mut report = ValidationReport {
        rows_checked: rows.len(),
        ..ValidationReport::default()
    };

    for (row_index, row) in rows.iter().enumerate() {
        for mapping in &config.mappings {
            let column = match mapping.aim_number {
                Some(aim) => substitute_aim(&mapping.csv_column, aim),
                None => mapping.csv_column.clone(),
            };
            let ctx = ValueContext {
                row_index: Some(row_index),
                source_field: Some(column.clone()),
            };

            let Some(element) = registry.element_below_root(&mapping.xsd_path) else {
                report.issues.push(
                    ValidationIssue::error(
                        IssueKind::Unexpected,
                        &mapping.xsd_path,
                        format!(
                            "mapping target {} does not exist in schema {}",
                            mapping.xsd_path,
                            registry.namespace()
                        ),
                    )
                    .at_row(row_index)
                    .from_field(&column),
                );
                continue;
            };

            report
                .issues
                .extend(validate_value(row.get(&column), element, &ctx));
        }
    }

    debug!(
        rows = rows.len(),
        issues = report.issues.len(),
        "batch validation finished"
    );
    report
}
