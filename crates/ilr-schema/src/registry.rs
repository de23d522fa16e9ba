//! Registry construction and lookup.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::element::{NamedSimpleType, SchemaElement};
use crate::error::{Result, SchemaError};
use crate::interpreter::{build_element, build_named_types};
use crate::raw::{RawElement, parse_document};

/// Metadata attached to a registry at build time.
#[derive(Debug, Clone, Default)]
pub struct RegistryOptions {
    pub schema_version: Option<String>,
    pub source_file: Option<String>,
}

/// The immutable result of schema interpretation: the typed element tree
/// plus path and name lookup indices.
///
/// Built once per schema file and shared by reference across every
/// subsequent validation, mapping and generation call. Nothing mutates it
/// after construction, so it is safe to share across threads.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    namespace: String,
    schema_version: Option<String>,
    source_file: Option<String>,
    root: Arc<SchemaElement>,
    elements_by_path: HashMap<String, Arc<SchemaElement>>,
    elements_by_name: HashMap<String, Vec<Arc<SchemaElement>>>,
    named_types: HashMap<String, NamedSimpleType>,
}

impl SchemaRegistry {
    /// Reads and interprets a schema file, recording its path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        build_schema_registry(
            &text,
            RegistryOptions {
                schema_version: None,
                source_file: Some(path.display().to_string()),
            },
        )
    }

    /// Target namespace declared by the schema.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn schema_version(&self) -> Option<&str> {
        self.schema_version.as_deref()
    }

    #[must_use]
    pub fn source_file(&self) -> Option<&str> {
        self.source_file.as_deref()
    }

    /// The sole root element.
    #[must_use]
    pub fn root(&self) -> &Arc<SchemaElement> {
        &self.root
    }

    /// Element at a full dot-joined path (root name included).
    #[must_use]
    pub fn element(&self, path: &str) -> Option<&Arc<SchemaElement>> {
        self.elements_by_path.get(path)
    }

    /// Element at a dot-joined path relative to the root element.
    #[must_use]
    pub fn element_below_root(&self, relative_path: &str) -> Option<&Arc<SchemaElement>> {
        self.element(&format!("{}.{relative_path}", self.root.name))
    }

    /// All elements sharing a declared name, in depth-first discovery
    /// order. The same name legitimately recurs at different paths.
    #[must_use]
    pub fn elements_named(&self, name: &str) -> &[Arc<SchemaElement>] {
        self.elements_by_name
            .get(name)
            .map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn named_type(&self, name: &str) -> Option<&NamedSimpleType> {
        self.named_types.get(name)
    }

    /// Number of elements in the tree (and entries in the path index).
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements_by_path.len()
    }

    /// Iterates every indexed path.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.elements_by_path.keys().map(String::as_str)
    }
}

impl FromStr for SchemaRegistry {
    type Err = SchemaError;

    fn from_str(text: &str) -> Result<Self> {
        build_schema_registry(text, RegistryOptions::default())
    }
}

fn extract_namespace(schema: &RawElement) -> Option<String> {
    schema
        .attr("targetNamespace")
        .map(str::trim)
        .filter(|namespace| !namespace.is_empty())
        .map(ToString::to_string)
}

fn populate_lookup_maps(
    node: &Arc<SchemaElement>,
    by_path: &mut HashMap<String, Arc<SchemaElement>>,
    by_name: &mut HashMap<String, Vec<Arc<SchemaElement>>>,
) {
    by_path.insert(node.path.clone(), Arc::clone(node));
    by_name
        .entry(node.name.clone())
        .or_default()
        .push(Arc::clone(node));
    for child in &node.children {
        populate_lookup_maps(child, by_path, by_name);
    }
}

/// Interprets schema text into a registry.
///
/// All failures here are fatal; there is no partial registry.
pub fn build_schema_registry(text: &str, options: RegistryOptions) -> Result<SchemaRegistry> {
    let document = parse_document(text)?;
    if document.name != "schema" {
        return Err(SchemaError::Malformed(format!(
            "expected schema root container, found <{}>",
            document.name
        )));
    }

    let namespace = extract_namespace(&document).ok_or(SchemaError::MissingNamespace)?;
    let named_types = build_named_types(&document);

    let roots: Vec<&RawElement> = document.children_named("element").collect();
    let raw_root = match roots.as_slice() {
        [] => return Err(SchemaError::NoRoot),
        [only] => *only,
        many => {
            return Err(SchemaError::MultipleRoots { count: many.len() });
        }
    };

    let root = build_element(raw_root, "", &named_types);
    let mut elements_by_path = HashMap::new();
    let mut elements_by_name = HashMap::new();
    populate_lookup_maps(&root, &mut elements_by_path, &mut elements_by_name);

    debug!(
        namespace,
        elements = elements_by_path.len(),
        named_types = named_types.len(),
        "schema registry built"
    );

    Ok(SchemaRegistry {
        namespace,
        schema_version: options.schema_version,
        source_file: options.source_file,
        root,
        elements_by_path,
        elements_by_name,
        named_types,
    })
}
