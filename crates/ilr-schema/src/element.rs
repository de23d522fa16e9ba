//! Typed schema model: elements, base types, cardinality, facets.

use std::fmt;
use std::sync::Arc;

/// Scalar base types the schema subset can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    String,
    Int,
    Integer,
    Long,
    Decimal,
    Date,
    DateTime,
    Boolean,
}

impl BaseType {
    /// Resolves a bare primitive name (already stripped of its `xs:`
    /// prefix) to a base type.
    #[must_use]
    pub fn from_primitive(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "int" => Some(Self::Int),
            "integer" => Some(Self::Integer),
            "long" => Some(Self::Long),
            "decimal" => Some(Self::Decimal),
            "date" => Some(Self::Date),
            "dateTime" => Some(Self::DateTime),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }

    /// True for the integral kinds that demand canonical numerals.
    #[must_use]
    pub fn is_integral(&self) -> bool {
        matches!(self, Self::Int | Self::Integer | Self::Long)
    }

    /// True for any numeric kind, integral or decimal.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.is_integral() || *self == Self::Decimal
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Decimal => "decimal",
            Self::Date => "date",
            Self::DateTime => "dateTime",
            Self::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// Declared maximum occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurs {
    Bounded(u32),
    Unbounded,
}

/// Declared occurrence bounds; defaults to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cardinality {
    pub min: u32,
    pub max: Occurs,
}

impl Default for Cardinality {
    fn default() -> Self {
        Self {
            min: 1,
            max: Occurs::Bounded(1),
        }
    }
}

impl Cardinality {
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.min >= 1
    }

    #[must_use]
    pub fn is_repeatable(&self) -> bool {
        match self.max {
            Occurs::Unbounded => true,
            Occurs::Bounded(max) => max > 1,
        }
    }
}

/// Restriction facets recovered from the schema. All optional; an empty
/// set means the base type alone constrains the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    pub pattern: Option<String>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min_inclusive: Option<f64>,
    pub max_inclusive: Option<f64>,
    pub min_exclusive: Option<f64>,
    pub max_exclusive: Option<f64>,
    pub total_digits: Option<u32>,
    pub fraction_digits: Option<u32>,
    /// Allowed values in declaration order; empty means unconstrained.
    pub enumeration: Vec<String>,
}

impl Constraints {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.min_inclusive.is_none()
            && self.max_inclusive.is_none()
            && self.min_exclusive.is_none()
            && self.max_exclusive.is_none()
            && self.total_digits.is_none()
            && self.fraction_digits.is_none()
            && self.enumeration.is_empty()
    }
}

/// A reusable named restriction, resolved once and referenced by name.
#[derive(Debug, Clone)]
pub struct NamedSimpleType {
    pub name: String,
    pub base_type: BaseType,
    pub constraints: Constraints,
}

/// One node of the interpreted schema tree.
///
/// Children are `Arc`-shared with the registry's lookup indices; the tree
/// is never mutated after construction.
#[derive(Debug, Clone)]
pub struct SchemaElement {
    /// Declared tag name.
    pub name: String,
    /// Dot-joined path from the tree root; unique per node.
    pub path: String,
    /// Scalar base type; `String` placeholder on complex nodes.
    pub base_type: BaseType,
    pub constraints: Constraints,
    pub cardinality: Cardinality,
    /// Declared children in sequence order; the order is the output
    /// serialization order.
    pub children: Vec<Arc<SchemaElement>>,
    /// True iff the element was declared with a structured type.
    pub is_complex: bool,
}

impl SchemaElement {
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.cardinality.is_required()
    }

    #[must_use]
    pub fn is_repeatable(&self) -> bool {
        self.cardinality.is_repeatable()
    }

    /// Direct child by name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Arc<SchemaElement>> {
        self.children.iter().find(|child| child.name == name)
    }
}
