//! Named transform lookup.
//!
//! The transform catalog itself lives outside the core; this module only
//! fixes the call contract (`name → fn(&str) → value`) and ships a minimal
//! built-in set so mapping works out of the box. Unknown names fail the
//! whole mapping call.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde_json::{Number, Value};

/// A pure transform from one raw CSV cell to a mapped value.
pub type TransformFn = fn(&str) -> Value;

/// Registry of named transforms.
pub struct TransformRegistry {
    transforms: HashMap<String, TransformFn>,
}

impl TransformRegistry {
    /// An empty registry with no transforms at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            transforms: HashMap::new(),
        }
    }

    /// Registers a transform, replacing any previous one of the same name.
    pub fn register(&mut self, name: impl Into<String>, transform: TransformFn) {
        self.transforms.insert(name.into(), transform);
    }

    /// Applies a named transform; `None` means the name is unknown.
    #[must_use]
    pub fn apply(&self, name: &str, raw: &str) -> Option<Value> {
        self.transforms.get(name).map(|transform| transform(raw))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }
}

impl Default for TransformRegistry {
    /// The built-in catalog: `trim`, `uppercase`, `to_number`, `date_iso`.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("trim", |raw| Value::String(raw.trim().to_string()));
        registry.register("uppercase", |raw| {
            Value::String(raw.trim().to_uppercase())
        });
        registry.register("to_number", to_number);
        registry.register("date_iso", date_iso);
        registry
    }
}

fn to_number(raw: &str) -> Value {
    let trimmed = raw.trim();
    if let Ok(parsed) = trimmed.parse::<i64>() {
        return Value::Number(parsed.into());
    }
    if let Ok(parsed) = trimmed.parse::<f64>() {
        if let Some(number) = Number::from_f64(parsed) {
            return Value::Number(number);
        }
    }
    // Not numeric; pass through so validation can report it in context.
    Value::String(trimmed.to_string())
}

/// Reformats UK-style `DD/MM/YYYY` dates to ISO `YYYY-MM-DD`; values
/// already in ISO form (or unparseable) pass through unchanged.
fn date_iso(raw: &str) -> Value {
    let trimmed = raw.trim();
    if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, "%d/%m/%Y") {
        return Value::String(parsed.format("%Y-%m-%d").to_string());
    }
    Value::String(trimmed.to_string())
}
