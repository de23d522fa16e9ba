//! XML submission generation.
//!
//! Serializes a mapped record into the government-mandated XML format.
//! Element order comes from the schema registry, never from the record;
//! shape mismatches degrade to warnings rather than failures so partial
//! or invalid data can still be inspected.

mod generator;

pub use generator::{Generated, GeneratorOptions, GeneratorWarning, WarningKind, generate};
