//! In-memory document of named definitions.
//!
//! A [`Document`] maps definition names to [`Schema`] values and resolves
//! local `$ref` tokens against them. It is read-only during resolution, so
//! one document can be shared by parallel model builds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::schema::Schema;

/// Pointer prefixes accepted for local references.
const LOCAL_REF_PREFIXES: &[&str] = &["#/definitions/", "#/$defs/"];

/// A set of named definitions.
///
/// Deserializes from any interface description that carries a top-level
/// `definitions` (or `$defs`) object; every other top-level key is ignored.
///
/// # Examples
///
/// ```
/// use schema_modelgen_core::{Document, Schema};
///
/// let doc = Document::from_definitions([
///     ("Pet", Schema::of_type("object")),
///     ("Tag", Schema::of_type("string")),
/// ]);
///
/// let (name, schema) = doc.resolve_ref("#/definitions/Tag").unwrap();
/// assert_eq!(name, "Tag");
/// assert_eq!(schema.first_type(), "string");
/// assert!(doc.resolve_ref("#/definitions/Missing").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, alias = "$defs")]
    definitions: BTreeMap<String, Schema>,
}

impl Document {
    /// Builds a document from `(name, schema)` pairs.
    pub fn from_definitions<I, S>(definitions: I) -> Self
    where
        I: IntoIterator<Item = (S, Schema)>,
        S: Into<String>,
    {
        Self {
            definitions: definitions
                .into_iter()
                .map(|(name, schema)| (name.into(), schema))
                .collect(),
        }
    }

    /// Adds or replaces a definition.
    pub fn insert(&mut self, name: impl Into<String>, schema: Schema) {
        self.definitions.insert(name.into(), schema);
    }

    /// Looks up a definition by name.
    pub fn definition(&self, name: &str) -> Option<&Schema> {
        self.definitions.get(name)
    }

    /// Returns all definition names in sorted order.
    pub fn definition_names(&self) -> Vec<&str> {
        self.definitions.keys().map(String::as_str).collect()
    }

    /// Returns the number of definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns `true` if the document has no definitions.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Resolves a local reference token to its definition.
    ///
    /// Returns the definition name (as stored in the document) alongside the
    /// schema. JSON-pointer escapes (`~1`, `~0`) in the final segment are
    /// decoded.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnresolvedReference`] for non-local tokens or
    /// names that are not defined.
    pub fn resolve_ref(&self, token: &str) -> Result<(&str, &Schema)> {
        let name = LOCAL_REF_PREFIXES
            .iter()
            .find_map(|prefix| token.strip_prefix(prefix))
            .map(unescape_pointer_segment)
            .ok_or_else(|| ModelError::UnresolvedReference(token.to_string()))?;

        self.definitions
            .get_key_value(name.as_str())
            .map(|(key, schema)| (key.as_str(), schema))
            .ok_or_else(|| ModelError::UnresolvedReference(token.to_string()))
    }
}

fn unescape_pointer_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}
