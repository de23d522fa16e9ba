//! Mapping-config loading.
//!
//! Configs are JSON documents authored outside the toolkit; a config that
//! parses but fails structural checks is rejected here, before any mapping
//! or validation work is attempted against it.

use std::fs;
use std::path::Path;

use tracing::debug;

use ilr_model::MappingConfig;

use crate::error::{IngestError, Result};

/// Parses and structurally checks a mapping config from a JSON string.
pub fn load_mapping_config_from_str(json: &str) -> Result<MappingConfig> {
    let config: MappingConfig =
        serde_json::from_str(json).map_err(|source| IngestError::ConfigParse { source })?;
    let issues = config.structural_issues();
    if !issues.is_empty() {
        return Err(IngestError::InvalidConfig { issues });
    }
    Ok(config)
}

/// Loads a mapping config from a JSON file.
pub fn load_mapping_config(path: &Path) -> Result<MappingConfig> {
    let json = fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config = load_mapping_config_from_str(&json)?;
    debug!(
        path = %path.display(),
        id = %config.id,
        mappings = config.mappings.len(),
        "loaded mapping config"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "id": "ilr-2526",
        "name": "ILR 2025-26",
        "version": "1",
        "targetSchema": {"namespace": "ESFA/ILR/2025-26"},
        "mappings": [
            {"csvColumn": "Learner ref", "xsdPath": "Learner.LearnRefNumber"}
        ]
    }"#;

    #[test]
    fn valid_config_loads() {
        let config = load_mapping_config_from_str(VALID).expect("load config");
        assert_eq!(config.id, "ilr-2526");
        assert_eq!(config.mappings.len(), 1);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = load_mapping_config_from_str("{not json").expect_err("parse");
        assert!(matches!(err, IngestError::ConfigParse { .. }));
    }

    #[test]
    fn structurally_broken_config_is_rejected() {
        let json = r#"{
            "id": "",
            "name": "ILR",
            "version": "1",
            "targetSchema": {"namespace": "ESFA/ILR/2025-26"},
            "mappings": []
        }"#;
        let err = load_mapping_config_from_str(json).expect_err("invalid");
        match err {
            IngestError::InvalidConfig { issues } => {
                assert!(issues.iter().any(|i| i.contains("id")));
                assert!(issues.iter().any(|i| i.contains("mapping")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_mapping_config(Path::new("/nonexistent/config.json"))
            .expect_err("missing file");
        assert!(matches!(err, IngestError::FileRead { .. }));
    }
}
