//! Generation against a learner-message schema.

use ilr_output::{GeneratorOptions, WarningKind, generate};
use ilr_schema::SchemaRegistry;
use serde_json::json;

const SCHEMA: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="ESFA/ILR/2025-26">
    <xs:element name="Message">
        <xs:complexType>
            <xs:sequence>
                <xs:element name="Header">
                    <xs:complexType>
                        <xs:sequence>
                            <xs:element name="CollectionYear" type="xs:string"/>
                        </xs:sequence>
                    </xs:complexType>
                </xs:element>
                <xs:element name="Learner" minOccurs="0" maxOccurs="unbounded">
                    <xs:complexType>
                        <xs:sequence>
                            <xs:element name="ULN" type="xs:long"/>
                            <xs:element name="FamilyName" type="xs:string"/>
                            <xs:element name="GivenNames" type="xs:string" minOccurs="0"/>
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

fn compact() -> GeneratorOptions {
    GeneratorOptions {
        namespace: None,
        indent: None,
    }
}

#[test]
fn output_follows_schema_order_not_key_order() {
    // Keys deliberately inserted in an order that differs from the
    // schema sequence (and from alphabetical order).
    let record = json!({
        "Learner": [{"FamilyName": "Smith", "ULN": "1234567890"}],
        "Header": {"CollectionYear": "2526"},
    });
    let generated = generate(&record, &registry(), &compact());
    assert!(generated.warnings.is_empty());
    assert_eq!(
        generated.xml,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <Message xmlns=\"ESFA/ILR/2025-26\">\
         <Header><CollectionYear>2526</CollectionYear></Header>\
         <Learner><ULN>1234567890</ULN><FamilyName>Smith</FamilyName></Learner>\
         </Message>"
    );
}

#[test]
fn repeatable_group_emits_one_element_per_entry() {
    let record = json!({
        "Header": {"CollectionYear": "2526"},
        "Learner": [
            {"FamilyName": "Smith", "ULN": "1111111111"},
            {"ULN": "2222222222", "FamilyName": "Jones", "GivenNames": "Ada"},
        ],
    });
    let generated = generate(&record, &registry(), &compact());
    assert!(generated.warnings.is_empty());
    assert_eq!(generated.xml.matches("<Learner>").count(), 2);
    let first = generated.xml.find("<ULN>1111111111</ULN>").expect("first uln");
    let second = generated.xml.find("<ULN>2222222222</ULN>").expect("second uln");
    assert!(first < second);
    // Schema order inside each entry, whatever the key order was.
    assert!(generated.xml.contains(
        "<ULN>2222222222</ULN><FamilyName>Jones</FamilyName><GivenNames>Ada</GivenNames>"
    ));
}

#[test]
fn missing_required_leaf_warns_and_is_omitted() {
    let record = json!({
        "Header": {"CollectionYear": "2526"},
        "Learner": [{"ULN": "1234567890"}],
    });
    let generated = generate(&record, &registry(), &compact());
    assert!(!generated.xml.contains("<FamilyName>"));
    assert_eq!(generated.warnings.len(), 1);
    let warning = &generated.warnings[0];
    assert_eq!(warning.kind, WarningKind::MissingRequired);
    assert_eq!(warning.path, "Message.Learner.FamilyName");
}

#[test]
fn missing_optional_leaf_is_silently_omitted() {
    let record = json!({
        "Header": {"CollectionYear": "2526"},
        "Learner": [{"ULN": "1234567890", "FamilyName": "Smith"}],
    });
    let generated = generate(&record, &registry(), &compact());
    assert!(generated.warnings.is_empty());
    assert!(!generated.xml.contains("GivenNames"));
}

#[test]
fn non_array_for_repeatable_warns_and_skips() {
    let record = json!({
        "Header": {"CollectionYear": "2526"},
        "Learner": {"ULN": "1234567890", "FamilyName": "Smith"},
    });
    let generated = generate(&record, &registry(), &compact());
    assert!(!generated.xml.contains("<Learner>"));
    assert_eq!(generated.warnings.len(), 1);
    assert_eq!(generated.warnings[0].kind, WarningKind::ShapeMismatch);
    assert_eq!(generated.warnings[0].path, "Message.Learner");
}

#[test]
fn scalar_for_required_complex_emits_empty_element_with_warning() {
    let record = json!({"Header": "not-an-object"});
    let generated = generate(&record, &registry(), &compact());
    assert!(generated.xml.contains("<Header></Header>"));
    assert!(
        generated
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::ShapeMismatch && w.path == "Message.Header")
    );
}

#[test]
fn text_is_escaped() {
    let record = json!({
        "Header": {"CollectionYear": "<25 & \"26\" '>'"},
    });
    let generated = generate(&record, &registry(), &compact());
    assert!(
        generated
            .xml
            .contains("&lt;25 &amp; &quot;26&quot; &apos;&gt;&apos;")
    );
}

#[test]
fn namespace_can_be_overridden() {
    let record = json!({"Header": {"CollectionYear": "2526"}});
    let opts = GeneratorOptions {
        namespace: Some("ESFA/ILR/2026-27".to_string()),
        indent: None,
    };
    let generated = generate(&record, &registry(), &opts);
    assert!(generated.xml.contains("<Message xmlns=\"ESFA/ILR/2026-27\">"));
}

#[test]
fn indented_output_still_orders_by_schema() {
    let record = json!({
        "Learner": [{"FamilyName": "Smith", "ULN": "1234567890"}],
        "Header": {"CollectionYear": "2526"},
    });
    let generated = generate(&record, &registry(), &GeneratorOptions::default());
    let header = generated.xml.find("<Header>").expect("header");
    let learner = generated.xml.find("<Learner>").expect("learner");
    assert!(header < learner);
}
