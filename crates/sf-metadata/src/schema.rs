//! Field-type schemas derived from the service's type descriptors.
//!
//! Every Metadata API type extends a root type (`Metadata`), but the
//! descriptors list only a type's own fields. The registry flattens that
//! inheritance once, at build time: each non-root type's schema is its own
//! fields overlaid with the root type's fields, the root's declaration
//! winning on a name collision.
//!
//! Descriptors are processed in a single pass, in the order given. A type
//! whose descriptor precedes the root type's is registered without the root
//! fields. Callers that need merged schemas must list the root type first.

use std::sync::{LazyLock, OnceLock};

use indexmap::IndexMap;
use regex_lite::Regex;
use tracing::debug;

static HEADER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*struct\s+(\S+)\s*\{\s*$").unwrap());

static FIELD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\S+)\s+([^\s;]+);\s*$").unwrap());

/// Declared field types of one service type, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSchema {
    name: String,
    fields: IndexMap<String, String>,
}

impl TypeSchema {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type name of a field.
    pub fn field_type(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// `(field name, declared type)` pairs in order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Lazily built registry of [`TypeSchema`]s keyed by type name.
#[derive(Debug, Clone)]
pub struct TypeSchemaRegistry {
    root_type: String,
    descriptors: Vec<String>,
    types: OnceLock<IndexMap<String, TypeSchema>>,
}

impl TypeSchemaRegistry {
    /// Create a registry over raw descriptors. Nothing is parsed until the
    /// first lookup.
    pub fn new(root_type: impl Into<String>, descriptors: Vec<String>) -> Self {
        Self {
            root_type: root_type.into(),
            descriptors,
            types: OnceLock::new(),
        }
    }

    /// Name of the type whose fields are merged into every other type.
    pub fn root_type(&self) -> &str {
        &self.root_type
    }

    /// Schema of a type, or `None` for a type that was never registered.
    pub fn fields(&self, type_name: &str) -> Option<&TypeSchema> {
        self.types().get(type_name)
    }

    /// Declared type of a field, or `None` if the type or field is unknown.
    pub fn field_type(&self, type_name: &str, field: &str) -> Option<&str> {
        self.fields(type_name)
            .and_then(|schema| schema.field_type(field))
    }

    /// Registered type names in registration order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types().keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types().is_empty()
    }

    fn types(&self) -> &IndexMap<String, TypeSchema> {
        self.types
            .get_or_init(|| build(&self.root_type, &self.descriptors))
    }
}

fn build(root_type: &str, descriptors: &[String]) -> IndexMap<String, TypeSchema> {
    let mut types: IndexMap<String, TypeSchema> = IndexMap::new();

    for descriptor in descriptors {
        let Some(mut schema) = parse_descriptor(descriptor) else {
            continue;
        };

        if schema.name != root_type {
            if let Some(root) = types.get(root_type) {
                // Existing names keep their position but take the root's type.
                for (field, ty) in &root.fields {
                    schema.fields.insert(field.clone(), ty.clone());
                }
            }
        }

        types.insert(schema.name.clone(), schema);
    }

    debug!(
        types = types.len(),
        descriptors = descriptors.len(),
        root_type,
        "Built type schema registry"
    );
    types
}

/// Parse one `struct <Name> {` / `<type> <field>;` / `}` block.
///
/// A block with a malformed header yields `None`; malformed field lines are
/// skipped.
fn parse_descriptor(descriptor: &str) -> Option<TypeSchema> {
    let mut lines = descriptor.lines();
    let header = HEADER_PATTERN.captures(lines.next()?)?;
    let name = header[1].to_string();

    let mut fields = IndexMap::new();
    for line in lines {
        if line.trim() == "}" {
            break;
        }
        if let Some(field) = FIELD_PATTERN.captures(line) {
            fields.insert(field[2].to_string(), field[1].to_string());
        }
    }

    Some(TypeSchema { name, fields })
}
