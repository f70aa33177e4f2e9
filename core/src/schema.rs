//! Input schema model.
//!
//! [`Schema`] mirrors the subset of JSON Schema (as used by Swagger 2.0
//! definitions) that the resolver and model builder read. It deserializes
//! directly from JSON or YAML with [`serde`]; unknown keys are kept in
//! [`Schema::extensions`] so vendor extensions (`x-*`) stay reachable.
//!
//! Schemas are owned by the caller and only ever read by this crate.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Extension that marks a schema as nullable.
pub const NULLABLE_EXTENSION: &str = "x-nullable";

/// Older spelling of [`NULLABLE_EXTENSION`], still honored.
pub const LEGACY_NULLABLE_EXTENSION: &str = "x-isnullable";

/// Extension that overrides the generated type name of a definition.
pub const TYPE_NAME_EXTENSION: &str = "x-type-name";

/// Declared `type` of a schema: a single token or a list of tokens.
///
/// Serialized back as a plain string when exactly one token is present.
///
/// # Examples
///
/// ```
/// use schema_modelgen_core::SchemaTypes;
///
/// let single: SchemaTypes = serde_json::from_str(r#""string""#).unwrap();
/// let many: SchemaTypes = serde_json::from_str(r#"["object", "null"]"#).unwrap();
/// assert_eq!(single.first(), Some("string"));
/// assert!(many.contains("null"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaTypes(Vec<String>);

impl SchemaTypes {
    /// Creates a type list from the given tokens.
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(types.into_iter().map(Into::into).collect())
    }

    /// Returns the first declared token, if any.
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Returns `true` if `name` is one of the declared tokens.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|t| t == name)
    }

    /// Returns `true` if no type was declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the declared tokens.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for SchemaTypes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::One(single) => Self(vec![single]),
            OneOrMany::Many(many) => Self(many),
        })
    }
}

impl Serialize for SchemaTypes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.as_slice() {
            [single] => serializer.serialize_str(single),
            many => many.serialize(serializer),
        }
    }
}

/// The `items` keyword: one schema for homogeneous arrays, or an ordered
/// list of schemas for tuples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaItems {
    /// Every element matches the same schema.
    Single(Box<Schema>),
    /// Element `n` matches schema `n`.
    Tuple(Vec<Schema>),
}

/// A keyword that is either a boolean policy or a schema
/// (`additionalItems`, `additionalProperties`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrBool {
    /// Plain allow/deny policy.
    Bool(bool),
    /// Extra entries must match this schema.
    Schema(Box<Schema>),
}

impl SchemaOrBool {
    /// Returns `true` if extra entries are permitted at all.
    pub fn allows(&self) -> bool {
        match self {
            Self::Bool(allowed) => *allowed,
            Self::Schema(_) => true,
        }
    }

    /// Returns the schema for extra entries, if one is given.
    pub fn schema(&self) -> Option<&Schema> {
        match self {
            Self::Bool(_) => None,
            Self::Schema(schema) => Some(schema),
        }
    }
}

/// XML serialization hints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XmlObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    pub attribute: bool,
    pub wrapped: bool,
}

/// One schema node.
///
/// # Examples
///
/// ```
/// use schema_modelgen_core::Schema;
///
/// let schema: Schema = serde_json::from_value(serde_json::json!({
///     "type": "object",
///     "required": ["name"],
///     "properties": {
///         "name": { "type": "string", "maxLength": 64 },
///         "tags": { "type": "array", "items": { "type": "string" } }
///     }
/// }))
/// .unwrap();
///
/// assert_eq!(schema.first_type(), "object");
/// assert!(schema.is_required("name"));
/// assert_eq!(schema.properties["name"].max_length, Some(64));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type", skip_serializing_if = "SchemaTypes::is_empty")]
    pub types: SchemaTypes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Schema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<SchemaItems>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_items: Option<SchemaOrBool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<SchemaOrBool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<Schema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<Schema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub exclusive_maximum: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub exclusive_minimum: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unique_items: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xml: Option<XmlObject>,
    /// Every key not modelled above, vendor extensions included.
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

impl Schema {
    /// Creates a schema declaring a single type token.
    pub fn of_type(type_name: &str) -> Self {
        Self {
            types: SchemaTypes::new([type_name]),
            ..Default::default()
        }
    }

    /// Creates an array schema whose elements all match `items`.
    pub fn array_of(items: Schema) -> Self {
        Self {
            items: Some(SchemaItems::Single(Box::new(items))),
            ..Self::of_type("array")
        }
    }

    /// Creates a reference to a named definition (`#/definitions/<name>`).
    ///
    /// # Examples
    ///
    /// ```
    /// use schema_modelgen_core::Schema;
    ///
    /// let schema = Schema::definition_ref("Pet");
    /// assert_eq!(schema.reference.as_deref(), Some("#/definitions/Pet"));
    /// ```
    pub fn definition_ref(name: &str) -> Self {
        Self {
            reference: Some(format!("#/definitions/{name}")),
            ..Default::default()
        }
    }

    /// Adds a property.
    pub fn with_property(mut self, name: &str, schema: Schema) -> Self {
        self.properties.insert(name.to_string(), schema);
        self
    }

    /// Marks a property name as required.
    pub fn with_required(mut self, name: &str) -> Self {
        self.required.push(name.to_string());
        self
    }

    /// Sets the format.
    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Sets a vendor extension.
    pub fn with_extension(mut self, key: &str, value: Value) -> Self {
        self.extensions.insert(key.to_string(), value);
        self
    }

    /// Returns the first declared type token, defaulting to `"object"`.
    pub fn first_type(&self) -> &str {
        match self.types.first() {
            Some(first) if !first.is_empty() => first,
            _ => "object",
        }
    }

    /// Returns `true` if this node is a `$ref`.
    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }

    /// Returns `true` if `name` is listed in `required`.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Returns the value of a vendor extension.
    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }

    /// Returns `true` if a nullability extension is set to `true`.
    pub fn nullable_extension(&self) -> bool {
        [NULLABLE_EXTENSION, LEGACY_NULLABLE_EXTENSION]
            .iter()
            .any(|key| self.extension(key).and_then(Value::as_bool) == Some(true))
    }

    /// Returns the explicit type-name override, if declared.
    pub fn type_name_override(&self) -> Option<&str> {
        self.extension(TYPE_NAME_EXTENSION)
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
    }

    /// Returns the single element schema of a homogeneous array.
    pub fn single_items(&self) -> Option<&Schema> {
        match &self.items {
            Some(SchemaItems::Single(schema)) => Some(schema),
            _ => None,
        }
    }

    /// Returns the element schemas of a tuple.
    pub fn tuple_items(&self) -> Option<&[Schema]> {
        match &self.items {
            Some(SchemaItems::Tuple(schemas)) => Some(schemas),
            _ => None,
        }
    }

    /// Returns `true` if `additionalItems` is allowed or carries a schema.
    pub fn allows_additional_items(&self) -> bool {
        self.additional_items
            .as_ref()
            .is_some_and(SchemaOrBool::allows)
    }

    /// Returns the `additionalItems` schema, if any.
    pub fn additional_items_schema(&self) -> Option<&Schema> {
        self.additional_items.as_ref().and_then(SchemaOrBool::schema)
    }

    /// Returns the `additionalProperties` schema, if any.
    pub fn additional_properties_schema(&self) -> Option<&Schema> {
        self.additional_properties
            .as_ref()
            .and_then(SchemaOrBool::schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Schema {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_type_accepts_string_or_list() {
        let single = parse(json!({ "type": "integer" }));
        assert_eq!(single.first_type(), "integer");

        let many = parse(json!({ "type": ["object", "null"] }));
        assert_eq!(many.first_type(), "object");
        assert!(many.types.contains("null"));
    }

    #[test]
    fn test_missing_type_defaults_to_object() {
        assert_eq!(Schema::default().first_type(), "object");
        assert_eq!(parse(json!({ "type": [""] })).first_type(), "object");
    }

    #[test]
    fn test_items_single_and_tuple() {
        let array = parse(json!({ "type": "array", "items": { "type": "string" } }));
        assert!(array.single_items().is_some());
        assert!(array.tuple_items().is_none());

        let tuple = parse(json!({
            "type": "array",
            "items": [{ "type": "string" }, { "type": "integer" }]
        }));
        let elements = tuple.tuple_items().unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[1].first_type(), "integer");
    }

    #[test]
    fn test_additional_items_policy() {
        let allowed = parse(json!({ "additionalItems": true }));
        assert!(allowed.allows_additional_items());
        assert!(allowed.additional_items_schema().is_none());

        let denied = parse(json!({ "additionalItems": false }));
        assert!(!denied.allows_additional_items());

        let typed = parse(json!({ "additionalItems": { "type": "boolean" } }));
        assert!(typed.allows_additional_items());
        assert_eq!(typed.additional_items_schema().unwrap().first_type(), "boolean");
    }

    #[test]
    fn test_extensions_are_captured() {
        let schema = parse(json!({
            "type": "string",
            "x-nullable": true,
            "x-type-name": "Label"
        }));
        assert!(schema.nullable_extension());
        assert_eq!(schema.type_name_override(), Some("Label"));
    }

    #[test]
    fn test_nullable_extension_false_is_not_nullable() {
        let schema = parse(json!({ "type": "string", "x-isnullable": false }));
        assert!(!schema.nullable_extension());
    }

    #[test]
    fn test_validation_keywords_deserialize() {
        let schema = parse(json!({
            "type": "number",
            "maximum": 10.5,
            "exclusiveMaximum": true,
            "minimum": 1,
            "multipleOf": 0.5,
            "enum": [1, 2.5],
            "default": 2
        }));
        assert_eq!(schema.maximum, Some(10.5));
        assert!(schema.exclusive_maximum);
        assert_eq!(schema.minimum, Some(1.0));
        assert!(!schema.exclusive_minimum);
        assert_eq!(schema.multiple_of, Some(0.5));
        assert_eq!(schema.enum_values, vec![json!(1), json!(2.5)]);
        assert_eq!(schema.default, Some(json!(2)));
    }

    #[test]
    fn test_builders() {
        let schema = Schema::of_type("object")
            .with_property("name", Schema::of_type("string").with_format("email"))
            .with_property("tags", Schema::array_of(Schema::of_type("string")))
            .with_required("name");
        assert!(schema.is_required("name"));
        assert!(!schema.is_required("tags"));
        assert_eq!(schema.properties["name"].format.as_deref(), Some("email"));
        assert!(schema.properties["tags"].single_items().is_some());
    }

    #[test]
    fn test_single_type_serializes_as_string() {
        let value = serde_json::to_value(Schema::of_type("string")).unwrap();
        assert_eq!(value, json!({ "type": "string" }));
    }
}
