//! Generic row-to-record mapping.

use serde_json::{Map, Value};

use ilr_model::{ColumnMapping, Row};
use ilr_schema::SchemaRegistry;

use crate::error::{MapError, Result};
use crate::transforms::TransformRegistry;

fn ensure_object(slot: &mut Value) -> &mut Map<String, Value> {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

fn ensure_single_element_array(slot: &mut Value) -> &mut Map<String, Value> {
    if !slot.is_array() {
        *slot = Value::Array(vec![Value::Object(Map::new())]);
    }
    if let Value::Array(items) = slot {
        if items.is_empty() {
            items.push(Value::Object(Map::new()));
        }
        return ensure_object(&mut items[0]);
    }
    unreachable!()
}

/// Writes a value at a dot-joined path relative to `schema_prefix`,
/// creating intermediate containers as it goes.
///
/// A repeatable intermediate container always becomes (or reuses) a
/// single-element array, descending into index 0. The generic path can
/// therefore represent at most one instance of any repeatable intermediate
/// group per row; the aim mechanism is the only path that produces true
/// multiplicity. This is a deliberate constraint of the generic writer,
/// not something to generalize.
pub(crate) fn set_nested_with_prefix(
    target: &mut Map<String, Value>,
    schema_prefix: &str,
    relative_path: &str,
    value: Value,
    registry: &SchemaRegistry,
) {
    let mut segments: Vec<&str> = relative_path.split('.').collect();
    let Some(last) = segments.pop() else {
        return;
    };

    let mut current = target;
    let mut schema_path = schema_prefix.to_string();
    for segment in segments {
        schema_path = format!("{schema_path}.{segment}");
        let repeatable = registry
            .element(&schema_path)
            .is_some_and(|element| element.is_repeatable());
        let slot = current
            .entry(segment.to_string())
            .or_insert(Value::Null);
        current = if repeatable {
            ensure_single_element_array(slot)
        } else {
            ensure_object(slot)
        };
    }
    current.insert(last.to_string(), value);
}

/// Writes a value into a record at a dot-joined path below the schema root.
pub fn set_nested_value(
    record: &mut Value,
    dot_path: &str,
    value: Value,
    registry: &SchemaRegistry,
) {
    let target = ensure_object(record);
    set_nested_with_prefix(target, &registry.root().name, dot_path, value, registry);
}

pub(crate) fn apply_mapping(
    target: &mut Map<String, Value>,
    row: &Row,
    column: &str,
    relative_path: &str,
    schema_prefix: &str,
    mapping: &ColumnMapping,
    registry: &SchemaRegistry,
    transforms: &TransformRegistry,
) -> Result<()> {
    let Some(raw) = row.get_non_blank(column) else {
        return Ok(());
    };
    let value = match &mapping.transform {
        Some(name) => {
            transforms
                .apply(name, raw)
                .ok_or_else(|| MapError::UnknownTransform {
                    name: name.clone(),
                    column: column.to_string(),
                })?
        }
        None => Value::String(raw.to_string()),
    };
    set_nested_with_prefix(target, schema_prefix, relative_path, value, registry);
    Ok(())
}

/// Maps one flat row through a list of mappings into a nested,
/// schema-shaped record. Columns are matched case-insensitively and
/// whitespace-tolerantly; blank cells are skipped.
pub fn map_row(
    row: &Row,
    mappings: &[ColumnMapping],
    registry: &SchemaRegistry,
    transforms: &TransformRegistry,
) -> Result<Value> {
    let mut record = Map::new();
    let root_name = registry.root().name.clone();
    for mapping in mappings {
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
    Ok(Value::Object(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SCHEMA: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="NS">
        <xs:element name="Message">
            <xs:complexType>
                <xs:sequence>
                    <xs:element name="Learner" minOccurs="0" maxOccurs="unbounded">
                        <xs:complexType>
                            <xs:sequence>
                                <xs:element name="LearnRefNumber" type="xs:string"/>
                                <xs:element name="ULN" type="xs:long"/>
                                <xs:element name="ContactDetails">
                                    <xs:complexType>
                                        <xs:sequence>
                                            <xs:element name="Postcode" type="xs:string"/>
                                        </xs:sequence>
                                    </xs:complexType>
                                </xs:element>
                            </xs:sequence>
                        </xs:complexType>
                    </xs:element>
                </xs:sequence>
            </xs:complexType>
        </xs:element>
    </xs:schema>"#;

    fn registry() -> SchemaRegistry {
        SCHEMA.parse().expect("registry")
    }

    fn mapping(column: &str, path: &str, transform: Option<&str>) -> ColumnMapping {
        ColumnMapping {
            csv_column: column.to_string(),
            xsd_path: path.to_string(),
            transform: transform.map(ToString::to_string),
            aim_number: None,
        }
    }

    #[test]
    fn repeatable_intermediate_folds_into_single_element_array() {
        let registry = registry();
        let mut record = json!({});
        set_nested_value(
            &mut record,
            "Learner.LearnRefNumber",
            json!("A1"),
            &registry,
        );
        set_nested_value(&mut record, "Learner.ULN", json!("1234567890"), &registry);
        assert_eq!(
            record,
            json!({"Learner": [{"LearnRefNumber": "A1", "ULN": "1234567890"}]})
        );
    }

    #[test]
    fn singular_intermediates_become_objects() {
        let registry = registry();
        let mut record = json!({});
        set_nested_value(
            &mut record,
            "Learner.ContactDetails.Postcode",
            json!("AB1 2CD"),
            &registry,
        );
        assert_eq!(
            record,
            json!({"Learner": [{"ContactDetails": {"Postcode": "AB1 2CD"}}]})
        );
    }

    #[test]
    fn map_row_skips_blank_and_missing_columns() {
        let registry = registry();
        let mut row = Row::new();
        row.push("Learner ref", "A1");
        row.push("Postcode", "   ");
        let mappings = vec![
            mapping("Learner Ref", "Learner.LearnRefNumber", None),
            mapping("Postcode", "Learner.ContactDetails.Postcode", None),
            mapping("ULN", "Learner.ULN", None),
        ];
        let record = map_row(&row, &mappings, &registry, &TransformRegistry::default())
            .expect("map row");
        assert_eq!(record, json!({"Learner": [{"LearnRefNumber": "A1"}]}));
    }

    #[test]
    fn transform_is_applied_before_writing() {
        let registry = registry();
        let mut row = Row::new();
        row.push("ULN", " 1234567890 ");
        let mappings = vec![mapping("ULN", "Learner.ULN", Some("to_number"))];
        let record = map_row(&row, &mappings, &registry, &TransformRegistry::default())
            .expect("map row");
        assert_eq!(record, json!({"Learner": [{"ULN": 1234567890_i64}]}));
    }

    #[test]
    fn unknown_transform_stops_the_row() {
        let registry = registry();
        let mut row = Row::new();
        row.push("ULN", "1234567890");
        let mappings = vec![mapping("ULN", "Learner.ULN", Some("no_such"))];
        let err = map_row(&row, &mappings, &registry, &TransformRegistry::default())
            .expect_err("must fail");
        assert!(matches!(err, MapError::UnknownTransform { ref name, .. } if name == "no_such"));
    }
}
