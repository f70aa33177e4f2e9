//! Output model handed to renderers.
//!
//! A [`GenModel`] describes one definition; each of its properties is a
//! [`GenModelProperty`] tree whose children describe array elements, tuple
//! positions and additional items. Both serialize with stable camelCase keys
//! for the dump mode.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::resolver::ResolvedType;
use crate::schema::Schema;

/// Validation constraints of one property, copied from its schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Validations {
    pub required: bool,
    pub format: Option<String>,
    pub default: Option<Value>,
    pub maximum: Option<f64>,
    pub exclusive_maximum: bool,
    pub minimum: Option<f64>,
    pub exclusive_minimum: bool,
    pub max_length: Option<u64>,
    pub min_length: Option<u64>,
    pub pattern: Option<String>,
    pub max_items: Option<u64>,
    pub min_items: Option<u64>,
    pub unique_items: bool,
    pub multiple_of: Option<f64>,
    #[serde(rename = "enum")]
    pub enum_values: Vec<Value>,
}

impl Validations {
    /// Copies the constraints of `schema`.
    pub fn from_schema(schema: &Schema, required: bool) -> Self {
        Self {
            required,
            format: schema.format.clone(),
            default: schema.default.clone(),
            maximum: schema.maximum,
            exclusive_maximum: schema.exclusive_maximum,
            minimum: schema.minimum,
            exclusive_minimum: schema.exclusive_minimum,
            max_length: schema.max_length,
            min_length: schema.min_length,
            pattern: schema.pattern.clone(),
            max_items: schema.max_items,
            min_items: schema.min_items,
            unique_items: schema.unique_items,
            multiple_of: schema.multiple_of,
            enum_values: schema.enum_values.clone(),
        }
    }

    /// Returns `true` if anything has to be checked.
    ///
    /// A default value alone is not a validation. The format only counts
    /// when it maps to a custom formatter, which validates on parse.
    pub fn is_active(&self, custom_formatter: bool) -> bool {
        self.required
            || self.maximum.is_some()
            || self.minimum.is_some()
            || self.max_length.is_some()
            || self.min_length.is_some()
            || self.pattern.is_some()
            || self.has_item_constraints()
            || self.multiple_of.is_some()
            || !self.enum_values.is_empty()
            || (custom_formatter && self.format.is_some())
    }

    /// Returns `true` if item count or uniqueness is constrained.
    pub fn has_item_constraints(&self) -> bool {
        self.max_items.is_some() || self.min_items.is_some() || self.unique_items
    }
}

/// One property of a model, or one element position of a container
/// property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenModelProperty {
    /// Property name as declared in the schema.
    pub name: String,
    /// Normalized lowerCamel name, also the key in [`GenModel::properties`].
    pub param_name: String,
    /// Rust field name.
    pub accessor: String,
    pub receiver: String,
    pub doc_string: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// JSON text of the schema example.
    pub example: Option<String>,
    pub data_type: String,
    pub zero_value: String,
    pub resolved: ResolvedType,
    pub validations: Validations,
    /// Expression evaluating to the field path used in validation errors.
    pub path: String,
    /// Expression reading the value being validated.
    pub value_expression: String,
    /// Loop variable for this property's own elements.
    pub index_var: String,
    /// Plain Rust scalar. Never set together with `is_custom_formatter`.
    pub is_primitive: bool,
    pub is_custom_formatter: bool,
    pub is_container: bool,
    pub is_map: bool,
    pub is_complex_object: bool,
    pub has_validations: bool,
    pub has_slice_validations: bool,
    pub single_schema_slice: bool,
    pub items: Vec<GenModelProperty>,
    pub allows_additional_items: bool,
    pub has_additional_items: bool,
    pub additional_items: Option<Box<GenModelProperty>>,
    pub xml_name: Option<String>,
}

impl GenModelProperty {
    pub fn is_required(&self) -> bool {
        self.validations.required
    }

    /// Element child of a single-schema array.
    pub fn element(&self) -> Option<&GenModelProperty> {
        if self.single_schema_slice {
            self.items.first()
        } else {
            None
        }
    }
}

/// The model built for one definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenModel {
    /// Definition name as declared in the document.
    pub name: String,
    pub type_name: String,
    pub human_name: String,
    pub package: String,
    pub receiver: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub doc_string: String,
    /// Properties keyed by normalized name.
    pub properties: BTreeMap<String, GenModelProperty>,
    pub has_validations: bool,
}

impl GenModel {
    /// Looks up a property by any spelling of its name.
    pub fn property(&self, name: &str) -> Option<&GenModelProperty> {
        self.properties.get(&crate::naming::to_json_name(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_alone_is_not_a_validation() {
        let schema: Schema = serde_json::from_value(json!({ "type": "integer", "default": 3 }))
            .unwrap();
        let validations = Validations::from_schema(&schema, false);
        assert_eq!(validations.default, Some(json!(3)));
        assert!(!validations.is_active(false));
    }

    #[test]
    fn test_format_counts_only_for_custom_formatters() {
        let schema = Schema::of_type("string").with_format("date");
        let validations = Validations::from_schema(&schema, false);
        assert!(!validations.is_active(false));
        assert!(validations.is_active(true));
    }

    #[test]
    fn test_each_constraint_activates() {
        let cases = [
            json!({ "maximum": 1 }),
            json!({ "minimum": 1 }),
            json!({ "maxLength": 1 }),
            json!({ "minLength": 1 }),
            json!({ "pattern": "^a" }),
            json!({ "maxItems": 1 }),
            json!({ "minItems": 1 }),
            json!({ "uniqueItems": true }),
            json!({ "multipleOf": 2 }),
            json!({ "enum": ["a"] }),
        ];
        for case in cases {
            let schema: Schema = serde_json::from_value(case.clone()).unwrap();
            assert!(Validations::from_schema(&schema, false).is_active(false), "{case}");
        }
        assert!(Validations::from_schema(&Schema::default(), true).is_active(false));
    }

    #[test]
    fn test_enum_serializes_under_keyword_name() {
        let schema: Schema = serde_json::from_value(json!({ "enum": ["a", "b"] })).unwrap();
        let value = serde_json::to_value(Validations::from_schema(&schema, false)).unwrap();
        assert_eq!(value["enum"], json!(["a", "b"]));
        assert_eq!(value["uniqueItems"], false);
    }
}
