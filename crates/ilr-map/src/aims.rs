//! Aim-group expansion: one wide row fans out into 0..5 repeated records.
//!
//! Up to five parallel "aim" column groups share a positional naming
//! convention (e.g. `"Start date (aim {n})"`). Which aims exist is decided
//! purely by the detection column for each number being non-blank.

use serde_json::{Map, Value};
use tracing::debug;

use ilr_model::{MAX_AIMS, MappingConfig, Row};
use ilr_schema::SchemaRegistry;

use crate::builders::{build_app_fin_records, build_employment_statuses, build_fam_entries};
use crate::engine::{apply_mapping, set_nested_with_prefix};
use crate::error::Result;
use crate::transforms::TransformRegistry;

/// Record key for the auto-populated aim sequence number.
const AIM_SEQ_KEY: &str = "AimSeqNumber";
/// Record keys the builder lists attach under, inside each aim record.
const FAM_KEY: &str = "LearningDeliveryFAM";
const APP_FIN_KEY: &str = "AppFinRecord";
const EMPLOYMENT_KEY: &str = "LearnerEmploymentStatus";

/// Substitutes an aim number into a `{n}` column-name pattern.
///
/// First-occurrence string replace, nothing stronger: external mapping
/// configs depend on the literal resulting column names.
#[must_use]
pub fn substitute_aim(template: &str, aim: u8) -> String {
    template.replacen("{n}", &aim.to_string(), 1)
}

/// The deepest repeatable ancestor on the aim mappings' target path,
/// relative to the schema root. This is the slot the aim records splice
/// into.
fn aim_group_path(config: &MappingConfig, registry: &SchemaRegistry) -> Option<String> {
    let mapping = config.mappings.iter().find(|m| m.aim_number.is_some())?;
    let segments: Vec<&str> = mapping.xsd_path.split('.').collect();

    let mut group = None;
    let mut relative = String::new();
    // The leaf segment is a field, never the group container.
    for segment in &segments[..segments.len().saturating_sub(1)] {
        if relative.is_empty() {
            relative.push_str(segment);
        } else {
            relative.push('.');
            relative.push_str(segment);
        }
        if registry
            .element_below_root(&relative)
            .is_some_and(|element| element.is_repeatable())
        {
            group = Some(relative.clone());
        }
    }
    group
}

/// Maps one row with aim-group expansion.
///
/// Non-aim mappings are applied once at the top level. For each aim number
/// whose detection column is non-blank, a record is synthesized from that
/// aim's mappings plus a sequence number equal to the aim number itself
/// (never renumbered), and the FAM / financial / employment-status
/// builders run against the same aim. The ordered aim-record list then
/// replaces whatever single-element placeholder the generic path would
/// have produced at the repeatable slot.
pub fn map_row_with_aims(
    row: &Row,
    config: &MappingConfig,
    registry: &SchemaRegistry,
    transforms: &TransformRegistry,
) -> Result<Value> {
    let mut record = Map::new();
    let root_name = registry.root().name.clone();

    for mapping in config.base_mappings() {
        apply_mapping(
            &mut record,
            row,
            &mapping.csv_column,
            &mapping.xsd_path,
            &root_name,
            mapping,
            registry,
            transforms,
        )?;
    }

    let Some(detection) = &config.aim_detection_field else {
        return Ok(Value::Object(record));
    };
    let Some(group_path) = aim_group_path(config, registry) else {
        debug!("no repeatable aim group on any aim mapping, skipping expansion");
        return Ok(Value::Object(record));
    };
    let group_schema_path = format!("{root_name}.{group_path}");
    let group_prefix = format!("{group_path}.");

    let mut aim_records = Vec::new();
    for aim in 1..=MAX_AIMS {
        // A blank detection column skips the whole aim group, whatever
        // the rest of its columns hold.
        if !row.has_value(&substitute_aim(detection, aim)) {
            continue;
        }

        let mut aim_record = Map::new();
        aim_record.insert(AIM_SEQ_KEY.to_string(), Value::Number(aim.into()));
        for mapping in config.aim_mappings(aim) {
            let column = substitute_aim(&mapping.csv_column, aim);
            let relative = mapping
                .xsd_path
                .strip_prefix(&group_prefix)
                .unwrap_or(&mapping.xsd_path);
            apply_mapping(
                &mut aim_record,
                row,
                &column,
                relative,
                &group_schema_path,
                mapping,
                registry,
                transforms,
            )?;
        }

        let fams = build_fam_entries(row, &config.fam_templates, aim);
        if !fams.is_empty() {
            aim_record.insert(FAM_KEY.to_string(), Value::Array(fams));
        }
        let fin_records = build_app_fin_records(row, &config.app_fin_templates, aim);
        if !fin_records.is_empty() {
            aim_record.insert(APP_FIN_KEY.to_string(), Value::Array(fin_records));
        }
        let statuses = build_employment_statuses(row, &config.employment_statuses, aim);
        if !statuses.is_empty() {
            aim_record.insert(EMPLOYMENT_KEY.to_string(), Value::Array(statuses));
        }

        aim_records.push(Value::Object(aim_record));
    }

    debug!(aims = aim_records.len(), group = %group_path, "aim expansion finished");
    if !aim_records.is_empty() {
        set_nested_with_prefix(
            &mut record,
            &root_name,
            &group_path,
            Value::Array(aim_records),
            registry,
        );
    }
    Ok(Value::Object(record))
}
