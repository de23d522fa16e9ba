//! Schema-ordered XML emission.

use std::io;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde_json::Value;
use tracing::warn;

use ilr_schema::{SchemaElement, SchemaRegistry};

/// Options for XML generation.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Overrides the registry's namespace on the root element.
    pub namespace: Option<String>,
    /// Indent width in spaces; `None` writes compact output.
    pub indent: Option<usize>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            namespace: None,
            indent: Some(2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A required element had no usable value and was omitted (or emitted
    /// empty, for complex elements).
    MissingRequired,
    /// The record value had the wrong shape for the declared element.
    ShapeMismatch,
}

/// A non-fatal generation finding. Generation never fails on shape
/// mismatches; it produces best-effort output plus these.
#[derive(Debug, Clone)]
pub struct GeneratorWarning {
    /// Schema path of the affected element.
    pub path: String,
    pub message: String,
    pub kind: WarningKind,
}

/// Best-effort XML output plus everything that went missing on the way.
#[derive(Debug, Clone)]
pub struct Generated {
    pub xml: String,
    pub warnings: Vec<GeneratorWarning>,
}

/// Serializes a mapped record into submission XML.
///
/// The walk follows the schema tree, not the record: each declared child
/// is emitted in the schema's sequence order regardless of how the record
/// object's keys were inserted. The consuming regulatory validator checks
/// element order, so record-key order must never leak into the output.
#[must_use]
pub fn generate(record: &Value, registry: &SchemaRegistry, opts: &GeneratorOptions) -> Generated {
    let mut warnings = Vec::new();
    let mut writer = match opts.indent {
        Some(width) => Writer::new_with_indent(Vec::new(), b' ', width),
        None => Writer::new(Vec::new()),
    };

    let namespace = opts
        .namespace
        .clone()
        .unwrap_or_else(|| registry.namespace().to_string());

    // The sink is an in-memory buffer; a writer error is not reachable in
    // practice, but generation still returns whatever was produced.
    if let Err(err) = write_document(&mut writer, registry, record, &namespace, &mut warnings) {
        warn!(%err, "xml writer failed, returning partial output");
    }

    Generated {
        xml: String::from_utf8_lossy(&writer.into_inner()).into_owned(),
        warnings,
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> io::Result<()> {
    writer.write_event(event).map_err(io::Error::other)
}

fn write_document(
    writer: &mut Writer<Vec<u8>>,
    registry: &SchemaRegistry,
    record: &Value,
    namespace: &str,
    warnings: &mut Vec<GeneratorWarning>,
) -> io::Result<()> {
    emit(writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let root = registry.root();
    let mut start = BytesStart::new(root.name.as_str());
    start.push_attribute(("xmlns", namespace));
    emit(writer, Event::Start(start))?;
    if let Some(object) = record.as_object() {
        for child in &root.children {
            write_child(writer, child, object.get(&child.name), warnings)?;
        }
        if root.children.is_empty() {
            write_leaf_text(writer, root, record, warnings)?;
        }
    } else {
        push_shape_warning(warnings, root, "record root is not an object");
    }
    emit(writer, Event::End(BytesEnd::new(root.name.as_str())))?;
    Ok(())
}

fn push_shape_warning(warnings: &mut Vec<GeneratorWarning>, element: &SchemaElement, message: &str) {
    warnings.push(GeneratorWarning {
        path: element.path.clone(),
        message: format!("{}: {message}", element.name),
        kind: WarningKind::ShapeMismatch,
    });
}

fn push_missing_warning(warnings: &mut Vec<GeneratorWarning>, element: &SchemaElement) {
    warnings.push(GeneratorWarning {
        path: element.path.clone(),
        message: format!("required element {} has no value", element.name),
        kind: WarningKind::MissingRequired,
    });
}

/// Emits one declared child, honoring its cardinality.
fn write_child(
    writer: &mut Writer<Vec<u8>>,
    element: &SchemaElement,
    value: Option<&Value>,
    warnings: &mut Vec<GeneratorWarning>,
) -> io::Result<()> {
    if element.is_repeatable() {
        match value {
            None | Some(Value::Null) => {
                if element.is_required() {
                    push_missing_warning(warnings, element);
                }
            }
            Some(Value::Array(items)) => {
                for item in items {
                    write_single(writer, element, item, warnings)?;
                }
            }
            Some(other) => {
                push_shape_warning(
                    warnings,
                    element,
                    &format!("expected an array, got {}", value_kind(other)),
                );
            }
        }
        return Ok(());
    }

    match value {
        None | Some(Value::Null) => {
            if element.is_required() {
                push_missing_warning(warnings, element);
            }
        }
        Some(single) => write_single(writer, element, single, warnings)?,
    }
    Ok(())
}

/// Emits one instance of an element.
fn write_single(
    writer: &mut Writer<Vec<u8>>,
    element: &SchemaElement,
    value: &Value,
    warnings: &mut Vec<GeneratorWarning>,
) -> io::Result<()> {
    if element.is_complex {
        emit(writer, Event::Start(BytesStart::new(element.name.as_str())))?;
        if let Some(object) = value.as_object() {
            for child in &element.children {
                write_child(writer, child, object.get(&child.name), warnings)?;
            }
        } else {
            // Still opened and closed so the document shape survives.
            if element.is_required() {
                push_shape_warning(
                    warnings,
                    element,
                    &format!("expected an object, got {}", value_kind(value)),
                );
            }
        }
        emit(writer, Event::End(BytesEnd::new(element.name.as_str())))?;
        return Ok(());
    }

    write_leaf_text(writer, element, value, warnings)
}

fn write_leaf_text(
    writer: &mut Writer<Vec<u8>>,
    element: &SchemaElement,
    value: &Value,
    warnings: &mut Vec<GeneratorWarning>,
) -> io::Result<()> {
    let Some(text) = scalar_text(value) else {
        push_shape_warning(
            warnings,
            element,
            &format!("expected a scalar, got {}", value_kind(value)),
        );
        return Ok(());
    };
    emit(writer, Event::Start(BytesStart::new(element.name.as_str())))?;
    emit(writer, Event::Text(BytesText::new(&text)))?;
    emit(writer, Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
