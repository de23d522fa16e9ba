//! Mapping configuration: how flat CSV columns land in the schema tree.
//!
//! Configs are JSON documents authored outside the toolkit. Template
//! column patterns contain a literal `{n}` placeholder substituted per aim
//! number at mapping time; the substitution is a plain first-occurrence
//! string replace, and external configs depend on the literal resulting
//! column names.

use serde::{Deserialize, Serialize};

/// One column-to-element mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    /// Source CSV header (matched case-insensitively, trimmed).
    pub csv_column: String,
    /// Dot-joined target path below the schema root.
    pub xsd_path: String,
    /// Optional named transform applied before writing the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
    /// Tags this mapping as belonging to one aim group (1..=5).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aim_number: Option<u8>,
}

/// The schema a config targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSchema {
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Learning delivery FAM (funding and monitoring) template.
///
/// A blank resolved type means the FAM kind does not apply to that aim and
/// the entry is skipped. Dates are optional independently of each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamTemplate {
    /// Column pattern for the FAM type value (e.g. "SOF", "ACT").
    pub type_csv: String,
    /// Column pattern for the FAM code value.
    pub code_csv: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from_csv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to_csv: Option<String>,
}

/// Apprenticeship financial record template.
///
/// Type, date and amount are all individually required: a partially
/// populated financial record is never emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppFinTemplate {
    /// Column pattern for the financial record type (e.g. "TNP", "PMR").
    pub type_csv: String,
    /// Column pattern for the financial record code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_csv: Option<String>,
    pub date_csv: String,
    pub amount_csv: String,
}

/// One employment-status monitoring field probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsmField {
    /// Monitoring type code (e.g. "SEM", "LOE").
    pub esm_type: String,
    /// Column pattern for the monitoring code.
    pub csv: String,
}

/// Learner employment status template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmploymentStatusConfig {
    pub status_csv: String,
    pub date_csv: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer_id_csv: Option<String>,
    #[serde(default)]
    pub monitoring: Vec<EsmField>,
}

/// A complete mapping configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingConfig {
    pub id: String,
    pub name: String,
    pub version: String,
    pub target_schema: TargetSchema,
    pub mappings: Vec<ColumnMapping>,
    /// Column pattern (with `{n}`) probed to decide whether an aim exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aim_detection_field: Option<String>,
    #[serde(default)]
    pub fam_templates: Vec<FamTemplate>,
    #[serde(default)]
    pub app_fin_templates: Vec<AppFinTemplate>,
    #[serde(default)]
    pub employment_statuses: Vec<EmploymentStatusConfig>,
}

/// Highest aim group number a config may address.
pub const MAX_AIMS: u8 = 5;

impl MappingConfig {
    /// Structural defects in the config, empty when it is usable.
    ///
    /// Checked before any mapping call; the messages are meant for config
    /// authors, not end users.
    #[must_use]
    pub fn structural_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.id.trim().is_empty() {
            issues.push("config id must not be empty".to_string());
        }
        if self.name.trim().is_empty() {
            issues.push("config name must not be empty".to_string());
        }
        if self.version.trim().is_empty() {
            issues.push("config version must not be empty".to_string());
        }
        if self.target_schema.namespace.trim().is_empty() {
            issues.push("targetSchema.namespace must not be empty".to_string());
        }
        if self.mappings.is_empty() {
            issues.push("at least one mapping is required".to_string());
        }
        for (index, mapping) in self.mappings.iter().enumerate() {
            if mapping.csv_column.trim().is_empty() {
                issues.push(format!("mapping {index}: csvColumn must not be empty"));
            }
            if mapping.xsd_path.trim().is_empty() {
                issues.push(format!("mapping {index}: xsdPath must not be empty"));
            }
            if let Some(aim) = mapping.aim_number {
                if aim < 1 || aim > MAX_AIMS {
                    issues.push(format!(
                        "mapping {index}: aimNumber {aim} outside 1..={MAX_AIMS}"
                    ));
                }
            }
        }
        if let Some(field) = &self.aim_detection_field {
            if !field.contains("{n}") {
                issues.push("aimDetectionField must contain the {n} placeholder".to_string());
            }
        }
        issues
    }

    /// Mappings not tagged with any aim number.
    pub fn base_mappings(&self) -> impl Iterator<Item = &ColumnMapping> {
        self.mappings.iter().filter(|m| m.aim_number.is_none())
    }

    /// Mappings tagged with the given aim number.
    pub fn aim_mappings(&self, aim: u8) -> impl Iterator<Item = &ColumnMapping> {
        self.mappings
            .iter()
            .filter(move |m| m.aim_number == Some(aim))
    }
}
