//! Schema interpretation: raw tree → typed elements.
//!
//! Only the subset the submission formats actually use is interpreted:
//! `element`, inline `complexType`/`sequence` structure, inline and named
//! `simpleType`/`restriction`, and the restriction facets listed on
//! [`Constraints`](crate::element::Constraints).

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::element::{BaseType, Cardinality, Constraints, NamedSimpleType, Occurs, SchemaElement};
use crate::raw::RawElement;

/// Strips an `xs:` / `xsd:` style prefix from a type reference.
fn strip_prefix(type_ref: &str) -> &str {
    match type_ref.split_once(':') {
        Some((_, local)) => local,
        None => type_ref,
    }
}

/// Resolves a type reference to a base type.
///
/// Unresolvable references degrade to `string` rather than failing:
/// schema evolution may introduce references this tool does not yet
/// recognize, and the pipeline should keep working on the rest.
pub fn resolve_base_type(type_ref: &str, named_types: &HashMap<String, NamedSimpleType>) -> BaseType {
    let local = strip_prefix(type_ref);
    if let Some(primitive) = BaseType::from_primitive(local) {
        return primitive;
    }
    if let Some(named) = named_types.get(local) {
        return named.base_type;
    }
    warn!(type_ref, "unresolvable type reference, treating as string");
    BaseType::String
}

/// Parses `minOccurs`/`maxOccurs` attributes; both default to 1.
pub fn parse_cardinality(raw: &RawElement) -> Cardinality {
    let min = match raw.attr("minOccurs") {
        None => 1,
        Some(value) => value.parse().unwrap_or_else(|_| {
            warn!(value, "unparseable minOccurs, defaulting to 1");
            1
        }),
    };
    let max = match raw.attr("maxOccurs") {
        None => Occurs::Bounded(1),
        Some("unbounded") => Occurs::Unbounded,
        Some(value) => Occurs::Bounded(value.parse().unwrap_or_else(|_| {
            warn!(value, "unparseable maxOccurs, defaulting to 1");
            1
        })),
    };
    Cardinality { min, max }
}

fn facet_value<'a>(restriction: &'a RawElement, facet: &'a str) -> Option<&'a str> {
    // Only the first occurrence counts; a repeated pattern facet is not
    // treated as a conjunction.
    restriction.children_named(facet).next()?.attr("value")
}

fn parsed_facet<T: std::str::FromStr>(restriction: &RawElement, facet: &str) -> Option<T> {
    let value = facet_value(restriction, facet)?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(facet, value, "unparseable facet value, ignoring");
            None
        }
    }
}

/// Pulls each present facet out of a `restriction` node.
pub fn extract_constraints(restriction: &RawElement) -> Constraints {
    Constraints {
        pattern: facet_value(restriction, "pattern").map(ToString::to_string),
        min_length: parsed_facet(restriction, "minLength"),
        max_length: parsed_facet(restriction, "maxLength"),
        min_inclusive: parsed_facet(restriction, "minInclusive"),
        max_inclusive: parsed_facet(restriction, "maxInclusive"),
        min_exclusive: parsed_facet(restriction, "minExclusive"),
        max_exclusive: parsed_facet(restriction, "maxExclusive"),
        total_digits: parsed_facet(restriction, "totalDigits"),
        fraction_digits: parsed_facet(restriction, "fractionDigits"),
        enumeration: restriction
            .children_named("enumeration")
            .filter_map(|entry| entry.attr("value"))
            .map(ToString::to_string)
            .collect(),
    }
}

/// Resolves every named `simpleType` into a lookup map.
///
/// A named type may restrict another named type declared earlier; the
/// already-resolved base type is reused. Forward or unknown references
/// fall back to `string`.
pub fn build_named_types(schema: &RawElement) -> HashMap<String, NamedSimpleType> {
    let mut named_types = HashMap::new();
    for raw_type in schema.children_named("simpleType") {
        let Some(name) = raw_type.attr("name") else {
            continue;
        };
        let Some(restriction) = raw_type.child("restriction") else {
            warn!(name, "named simpleType without restriction, skipping");
            continue;
        };
        let base = restriction.attr("base").unwrap_or("xs:string");
        let base_type = resolve_base_type(base, &named_types);
        named_types.insert(
            name.to_string(),
            NamedSimpleType {
                name: name.to_string(),
                base_type,
                constraints: extract_constraints(restriction),
            },
        );
    }
    named_types
}

fn join_path(parent_path: &str, name: &str) -> String {
    if parent_path.is_empty() {
        name.to_string()
    } else {
        format!("{parent_path}.{name}")
    }
}

/// Recursively builds one schema element and its subtree.
pub fn build_element(
    raw: &RawElement,
    parent_path: &str,
    named_types: &HashMap<String, NamedSimpleType>,
) -> Arc<SchemaElement> {
    let name = raw.attr("name").unwrap_or_default().to_string();
    let path = join_path(parent_path, &name);
    let cardinality = parse_cardinality(raw);

    if let Some(simple) = raw.child("simpleType") {
        // Inline restricted scalar.
        let (base_type, constraints) = match simple.child("restriction") {
            Some(restriction) => {
                let base = restriction.attr("base").unwrap_or("xs:string");
                (
                    resolve_base_type(base, named_types),
                    extract_constraints(restriction),
                )
            }
            None => (BaseType::String, Constraints::default()),
        };
        return Arc::new(SchemaElement {
            name,
            path,
            base_type,
            constraints,
            cardinality,
            children: Vec::new(),
            is_complex: false,
        });
    }

    if let Some(complex) = raw.child("complexType") {
        let children = match complex.child("sequence") {
            Some(sequence) => sequence
                .children_named("element")
                .map(|child| build_element(child, &path, named_types))
                .collect(),
            None => Vec::new(),
        };
        return Arc::new(SchemaElement {
            name,
            path,
            // Placeholder; complex nodes never type-check a scalar.
            base_type: BaseType::String,
            constraints: Constraints::default(),
            cardinality,
            children,
            is_complex: true,
        });
    }

    // Named or primitive type reference.
    let type_ref = raw.attr("type").unwrap_or("xs:string");
    let local = strip_prefix(type_ref);
    let (base_type, constraints) = match named_types.get(local) {
        Some(named) => (named.base_type, named.constraints.clone()),
        None => (resolve_base_type(type_ref, named_types), Constraints::default()),
    };
    Arc::new(SchemaElement {
        name,
        path,
        base_type,
        constraints,
        cardinality,
        children: Vec::new(),
        is_complex: false,
    })
}
