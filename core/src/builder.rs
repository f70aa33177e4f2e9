//! Definition → [`GenModel`] construction.
//!
//! Each property is built from a [`BuildContext`] passed down by value:
//! array elements, tuple positions and additional items get a derived
//! context with a nested field path, a fresh loop variable and an indexed
//! value expression. `allOf` branches are flattened into the owning model.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::docs;
use crate::document::Document;
use crate::error::{ModelError, Result};
use crate::model::{GenModel, GenModelProperty, Validations};
use crate::naming;
use crate::options::{CompositionPolicy, ModelOptions};
use crate::resolver::TypeResolver;
use crate::schema::{Schema, SchemaItems};
use crate::trail::Trail;
use crate::typemap;

/// Receiver of generated methods.
const RECEIVER: &str = "self";

/// Loop variable of a top-level property.
const ROOT_INDEX_VAR: &str = "i";

/// Where a property sits in the generated code.
#[derive(Debug, Clone)]
struct BuildContext<'s> {
    /// Type name of the owning model, used to name inline objects.
    owner: &'s str,
    name: &'s str,
    path: String,
    index_var: String,
    value_expression: String,
    schema: &'s Schema,
    required: bool,
}

impl<'s> BuildContext<'s> {
    fn root(owner: &'s str, name: &'s str, schema: &'s Schema, required: bool) -> Self {
        Self {
            owner,
            name,
            path: format!("{name:?}"),
            index_var: ROOT_INDEX_VAR.to_string(),
            value_expression: format!("{RECEIVER}.{}", naming::to_field_name(name)),
            schema,
            required,
        }
    }

    /// Context of one element of the container described by `self`.
    ///
    /// Elements are never required on their own.
    fn element(&self, schema: &'s Schema) -> Self {
        Self {
            owner: self.owner,
            name: self.name,
            path: format!("format!(\"{{}}.{{}}\", {}, {})", self.path, self.index_var),
            index_var: format!("{}i", self.index_var),
            value_expression: format!("{}[{}]", self.value_expression, self.index_var),
            schema,
            required: false,
        }
    }

    /// Context of tuple position `position`.
    fn tuple_element(&self, position: usize, schema: &'s Schema) -> Self {
        Self {
            path: format!("format!(\"{{}}.{{}}\", {}, {position})", self.path),
            value_expression: format!("{}.{position}", self.value_expression),
            ..self.element(schema)
        }
    }
}

struct ModelBuilder<'a> {
    document: &'a Document,
    resolver: TypeResolver<'a>,
    composition: CompositionPolicy,
}

impl ModelBuilder<'_> {
    fn collect_properties(
        &self,
        owner: &str,
        schema: &Schema,
        trail: &Trail<'_>,
    ) -> Result<BTreeMap<String, GenModelProperty>> {
        self.check_composition(schema)?;

        let mut properties = BTreeMap::new();
        for (name, property) in &schema.properties {
            let context = BuildContext::root(owner, name, property, schema.is_required(name));
            let built = self
                .make_property(context)
                .map_err(|e| e.in_property(name))?;
            if let Some(previous) = properties.insert(naming::to_json_name(name), built) {
                warn!(
                    property = name.as_str(),
                    replaced = previous.name.as_str(),
                    "property names normalize to the same key"
                );
            }
        }

        for branch in &schema.all_of {
            let merged = match &branch.reference {
                Some(token) => {
                    let (name, target) = self.document.resolve_ref(token)?;
                    debug!(reference = token, definition = name, "flattening allOf branch");
                    let trail = Trail::enter(Some(trail), name)?;
                    self.collect_properties(owner, target, &trail)?
                }
                None => self.collect_properties(owner, branch, trail)?,
            };
            properties.extend(merged);
        }

        Ok(properties)
    }

    fn check_composition(&self, schema: &Schema) -> Result<()> {
        for (keyword, branches) in [("oneOf", &schema.one_of), ("anyOf", &schema.any_of)] {
            if branches.is_empty() {
                continue;
            }
            match self.composition {
                CompositionPolicy::Reject => {
                    return Err(ModelError::UnsupportedComposition { keyword });
                }
                CompositionPolicy::Ignore => {
                    warn!(keyword, branches = branches.len(), "ignoring unsupported composition");
                }
            }
        }
        Ok(())
    }

    fn make_property(&self, context: BuildContext<'_>) -> Result<GenModelProperty> {
        let schema = context.schema;
        self.check_composition(schema)?;
        let resolved = self.resolver.resolve(schema, false)?;

        let accessor = naming::to_field_name(context.name);
        let param_name = naming::to_json_name(context.name);
        let example = schema.example.as_ref().map(ToString::to_string);
        let data_type = if resolved.target_type.is_empty() {
            format!("{}{}", context.owner, naming::to_type_name(context.name))
        } else {
            resolved.target_type.clone()
        };

        let mut items = Vec::new();
        let mut single_schema_slice = false;
        match &schema.items {
            Some(SchemaItems::Single(element)) => {
                items.push(self.make_property(context.element(element))?);
                single_schema_slice = true;
            }
            Some(SchemaItems::Tuple(elements)) => {
                for (position, element) in elements.iter().enumerate() {
                    items.push(self.make_property(context.tuple_element(position, element))?);
                }
            }
            None => {}
        }

        let additional_items = match schema.additional_items_schema() {
            Some(extra) => Some(Box::new(self.make_property(context.element(extra))?)),
            None => None,
        };
        let allows_additional_items = schema.allows_additional_items();

        let validations = Validations::from_schema(schema, context.required);
        let is_custom_formatter = resolved.is_custom_formatter();
        let is_primitive = typemap::is_primitive(&data_type);
        let is_map = resolved.is_map();
        let is_container = resolved.is_array() || resolved.is_tuple() || is_map;

        let has_slice_validations = validations.has_item_constraints()
            || items.iter().any(|item| item.has_validations)
            || additional_items.as_ref().is_some_and(|extra| extra.has_validations);
        let has_validations = validations.is_active(is_custom_formatter) || has_slice_validations;

        let zero_value = typemap::zero_value(&data_type)
            .unwrap_or("Default::default()")
            .to_string();
        let xml_name = schema.xml.as_ref().map(|xml| {
            let name = xml.name.clone().unwrap_or_else(|| param_name.clone());
            if xml.attribute {
                format!("{name},attr")
            } else {
                name
            }
        });

        Ok(GenModelProperty {
            doc_string: docs::property_doc(
                &accessor,
                schema.description.as_deref(),
                example.as_deref(),
            ),
            name: context.name.to_string(),
            param_name,
            accessor,
            receiver: RECEIVER.to_string(),
            title: schema.title.clone(),
            description: schema.description.clone(),
            example,
            data_type,
            zero_value,
            is_primitive,
            is_custom_formatter,
            is_container,
            is_map,
            is_complex_object: resolved.is_complex_object(),
            resolved,
            validations,
            path: context.path,
            value_expression: context.value_expression,
            index_var: context.index_var,
            has_validations,
            has_slice_validations,
            single_schema_slice,
            items,
            allows_additional_items,
            has_additional_items: allows_additional_items && !single_schema_slice,
            additional_items,
            xml_name,
        })
    }
}

/// Builds the model of definition `name` from its schema.
///
/// `schema` does not have to be stored in `document`; the document is only
/// used to resolve references. Errors are wrapped with the property they
/// occurred in.
///
/// # Examples
///
/// ```
/// use schema_modelgen_core::{build_model, Document, ModelOptions, Schema};
///
/// let pet = Schema::of_type("object")
///     .with_property("name", Schema::of_type("string"))
///     .with_property("tags", Schema::array_of(Schema::of_type("string")))
///     .with_required("name");
///
/// let model = build_model("Pet", &pet, &Document::default(), &ModelOptions::default()).unwrap();
/// assert_eq!(model.type_name, "Pet");
/// assert!(model.properties["name"].is_required());
/// assert!(model.properties["tags"].is_container);
/// assert!(model.has_validations);
/// ```
///
/// # Errors
///
/// Any resolution error of any property, a missing `allOf` reference, an
/// `allOf` cycle, or `oneOf` / `anyOf` under [`CompositionPolicy::Reject`].
pub fn build_model(
    name: &str,
    schema: &Schema,
    document: &Document,
    options: &ModelOptions,
) -> Result<GenModel> {
    let builder = ModelBuilder {
        document,
        resolver: TypeResolver::new(document).with_models_package(&options.models_package),
        composition: options.composition,
    };
    let type_name = schema
        .type_name_override()
        .map(str::to_string)
        .unwrap_or_else(|| naming::to_type_name(name));

    let trail = Trail::enter(None, name)?;
    let properties = builder.collect_properties(&type_name, schema, &trail)?;
    let has_validations = properties.values().any(|p| p.has_validations);
    debug!(
        definition = name,
        properties = properties.len(),
        has_validations,
        "built model"
    );

    Ok(GenModel {
        name: name.to_string(),
        doc_string: docs::model_doc(&type_name, schema.description.as_deref()),
        human_name: naming::to_human_name(name),
        type_name,
        package: options.models_package.clone(),
        receiver: RECEIVER.to_string(),
        title: schema.title.clone(),
        description: schema.description.clone(),
        properties,
        has_validations,
    })
}

/// Looks up definition `name` in `document` and builds its model.
///
/// Every error, including a missing definition, is wrapped in
/// [`ModelError::Definition`].
pub fn build_definition(document: &Document, name: &str, options: &ModelOptions) -> Result<GenModel> {
    document
        .definition(name)
        .ok_or_else(|| ModelError::DefinitionNotFound(name.to_string()))
        .and_then(|schema| build_model(name, schema, document, options))
        .map_err(|e| e.in_definition(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn document(value: Value) -> Document {
        serde_json::from_value(value).unwrap()
    }

    fn build(doc: &Document, name: &str) -> GenModel {
        build_definition(doc, name, &ModelOptions::default()).unwrap()
    }

    #[test]
    fn test_root_context() {
        let schema = Schema::of_type("string");
        let context = BuildContext::root("Pet", "petId", &schema, true);
        assert_eq!(context.path, "\"petId\"");
        assert_eq!(context.index_var, "i");
        assert_eq!(context.value_expression, "self.pet_id");
    }

    #[test]
    fn test_nested_contexts_do_not_shadow() {
        let schema = Schema::of_type("string");
        let root = BuildContext::root("Grid", "rows", &schema, true);
        let row = root.element(&schema);
        let cell = row.element(&schema);
        assert!(!row.required);
        assert_eq!(row.path, "format!(\"{}.{}\", \"rows\", i)");
        assert_eq!(row.value_expression, "self.rows[i]");
        assert_eq!(row.index_var, "ii");
        assert_eq!(cell.value_expression, "self.rows[i][ii]");
        assert_eq!(cell.index_var, "iii");
    }

    #[test]
    fn test_tuple_element_context() {
        let schema = Schema::of_type("string");
        let root = BuildContext::root("Point", "coords", &schema, false);
        let second = root.tuple_element(1, &schema);
        assert_eq!(second.path, "format!(\"{}.{}\", \"coords\", 1)");
        assert_eq!(second.value_expression, "self.coords.1");
    }

    #[test]
    fn test_unknown_definition() {
        let doc = Document::default();
        let err = build_definition(&doc, "Pet", &ModelOptions::default()).unwrap_err();
        assert_eq!(err.root_cause(), &ModelError::DefinitionNotFound("Pet".into()));
        assert!(matches!(err, ModelError::Definition { ref name, .. } if name == "Pet"));
    }

    #[test]
    fn test_property_keys_are_normalized_last_write_wins() {
        let doc = document(json!({
            "definitions": {
                "Pet": {
                    "type": "object",
                    "properties": {
                        "pet_id": { "type": "string" },
                        "petId": { "type": "integer" }
                    }
                }
            }
        }));
        let model = build(&doc, "Pet");
        assert_eq!(model.properties.len(), 1);
        // Properties are visited in sorted order: "petId" first, then "pet_id".
        assert_eq!(model.properties["petId"].data_type, "String");
        assert_eq!(model.properties["petId"].name, "pet_id");
    }

    #[test]
    fn test_inline_object_gets_owner_prefixed_type() {
        let doc = document(json!({
            "definitions": {
                "Pet": {
                    "type": "object",
                    "properties": {
                        "owner": {
                            "type": "object",
                            "properties": { "name": { "type": "string" } }
                        }
                    }
                }
            }
        }));
        let owner = &build(&doc, "Pet").properties["owner"];
        assert_eq!(owner.data_type, "PetOwner");
        assert!(owner.is_complex_object);
        assert!(!owner.is_container);
        assert_eq!(owner.zero_value, "Default::default()");
    }

    #[test]
    fn test_tuple_children_in_order() {
        let doc = document(json!({
            "definitions": {
                "Point": {
                    "type": "object",
                    "properties": {
                        "coords": {
                            "type": "array",
                            "items": [
                                { "type": "number", "minimum": 0 },
                                { "type": "number" }
                            ],
                            "additionalItems": { "type": "string", "maxLength": 3 }
                        }
                    }
                }
            }
        }));
        let coords = &build(&doc, "Point").properties["coords"];
        assert!(coords.is_container);
        assert!(!coords.single_schema_slice);
        assert_eq!(coords.items.len(), 2);
        assert_eq!(coords.items[0].validations.minimum, Some(0.0));
        assert!(coords.items[0].has_validations);
        assert!(!coords.items[1].has_validations);
        assert!(coords.allows_additional_items);
        assert!(coords.has_additional_items);
        let extra = coords.additional_items.as_ref().unwrap();
        assert_eq!(extra.validations.max_length, Some(3));
        assert_eq!(extra.value_expression, "self.coords[i]");
        assert!(coords.has_slice_validations);
        assert!(coords.has_validations);
    }

    #[test]
    fn test_additional_items_flag_without_schema() {
        let doc = document(json!({
            "definitions": {
                "Bag": {
                    "type": "object",
                    "properties": {
                        "things": {
                            "type": "array",
                            "items": { "type": "string" },
                            "additionalItems": true
                        }
                    }
                }
            }
        }));
        let things = &build(&doc, "Bag").properties["things"];
        assert!(things.single_schema_slice);
        assert!(things.allows_additional_items);
        assert!(!things.has_additional_items);
        assert!(things.additional_items.is_none());
    }

    #[test]
    fn test_nested_element_validation_bubbles_up() {
        let doc = document(json!({
            "definitions": {
                "Grid": {
                    "type": "object",
                    "properties": {
                        "rows": {
                            "type": "array",
                            "items": {
                                "type": "array",
                                "items": { "type": "integer", "maximum": 9 }
                            }
                        }
                    }
                }
            }
        }));
        let model = build(&doc, "Grid");
        let rows = &model.properties["rows"];
        assert!(rows.has_slice_validations);
        let cell = rows.element().unwrap().element().unwrap();
        assert_eq!(cell.value_expression, "self.rows[i][ii]");
        assert_eq!(cell.index_var, "iii");
        assert!(model.has_validations);
    }

    #[test]
    fn test_xml_name() {
        let doc = document(json!({
            "definitions": {
                "Pet": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer", "xml": { "attribute": true } },
                        "pet_name": { "type": "string", "xml": { "name": "name" } },
                        "tag": { "type": "string" }
                    }
                }
            }
        }));
        let model = build(&doc, "Pet");
        assert_eq!(model.properties["id"].xml_name.as_deref(), Some("id,attr"));
        assert_eq!(model.properties["petName"].xml_name.as_deref(), Some("name"));
        assert_eq!(model.properties["tag"].xml_name, None);
    }

    #[test]
    fn test_example_and_doc_string() {
        let doc = document(json!({
            "definitions": {
                "Pet": {
                    "type": "object",
                    "description": "A pet for sale.",
                    "properties": {
                        "name": { "type": "string", "description": "Pet name.", "example": "doggie" }
                    }
                }
            }
        }));
        let model = build(&doc, "Pet");
        assert_eq!(model.doc_string, "/// Pet A pet for sale.");
        let name = &model.properties["name"];
        assert_eq!(name.example.as_deref(), Some("\"doggie\""));
        assert_eq!(name.doc_string, "/// name Pet name. eg.\n///\n///     \"doggie\"");
    }

    #[test]
    fn test_type_name_override_on_model() {
        let doc = document(json!({
            "definitions": {
                "pet_v2": { "type": "object", "x-type-name": "Pet" },
                "order_line": { "type": "object" }
            }
        }));
        assert_eq!(build(&doc, "pet_v2").type_name, "Pet");
        let line = build(&doc, "order_line");
        assert_eq!(line.type_name, "OrderLine");
        assert_eq!(line.human_name, "order line");
        assert_eq!(line.package, "models");
        assert!(!line.has_validations);
    }

    #[test]
    fn test_composition_policy() {
        let doc = document(json!({
            "definitions": {
                "Shape": {
                    "type": "object",
                    "properties": { "sides": { "type": "integer" } },
                    "oneOf": [{ "type": "object" }]
                }
            }
        }));
        let err = build_definition(&doc, "Shape", &ModelOptions::default()).unwrap_err();
        assert_eq!(
            err.root_cause(),
            &ModelError::UnsupportedComposition { keyword: "oneOf" }
        );

        let options = ModelOptions {
            composition: CompositionPolicy::Ignore,
            ..ModelOptions::default()
        };
        let model = build_definition(&doc, "Shape", &options).unwrap();
        assert!(model.properties.contains_key("sides"));
    }

    #[test]
    fn test_composition_policy_applies_to_properties() {
        let doc = document(json!({
            "definitions": {
                "Shape": {
                    "type": "object",
                    "properties": {
                        "kind": { "oneOf": [{ "type": "string" }, { "type": "integer" }] },
                        "sides": {
                            "type": "array",
                            "items": { "anyOf": [{ "type": "integer" }] }
                        }
                    }
                }
            }
        }));
        let err = build_definition(&doc, "Shape", &ModelOptions::default()).unwrap_err();
        assert_eq!(
            err.root_cause(),
            &ModelError::UnsupportedComposition { keyword: "oneOf" }
        );
        assert!(err.to_string().contains("property \"kind\""), "{err}");

        let nested = document(json!({
            "definitions": {
                "Shape": {
                    "type": "object",
                    "properties": {
                        "sides": {
                            "type": "array",
                            "items": { "anyOf": [{ "type": "integer" }] }
                        }
                    }
                }
            }
        }));
        let err = build_definition(&nested, "Shape", &ModelOptions::default()).unwrap_err();
        assert_eq!(
            err.root_cause(),
            &ModelError::UnsupportedComposition { keyword: "anyOf" }
        );

        let options = ModelOptions {
            composition: CompositionPolicy::Ignore,
            ..ModelOptions::default()
        };
        let model = build_definition(&doc, "Shape", &options).unwrap();
        assert_eq!(model.properties.len(), 2);
    }

    #[test]
    fn test_non_latin_property_names_stay_distinct() {
        let doc = document(json!({
            "definitions": {
                "Person": {
                    "type": "object",
                    "required": ["名前"],
                    "properties": {
                        "名前": { "type": "string" },
                        "年齢": { "type": "integer" },
                        "住所": { "type": "string" }
                    }
                }
            }
        }));
        let model = build(&doc, "Person");
        assert_eq!(model.properties.len(), 3);
        let age = model.property("年齢").unwrap();
        assert_eq!(age.name, "年齢");
        assert_eq!(age.accessor, "年齢");
        assert_eq!(age.data_type, "i64");
        assert!(model.properties["名前"].is_required());
        assert!(!model.properties["住所"].is_required());
    }

    #[test]
    fn test_symbol_only_property_names_are_escaped() {
        let doc = document(json!({
            "definitions": {
                "Flags": {
                    "type": "object",
                    "properties": {
                        "+": { "type": "boolean" },
                        "-": { "type": "boolean" }
                    }
                }
            }
        }));
        let model = build(&doc, "Flags");
        let keys: Vec<&str> = model.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["x2b", "x2d"]);
        assert_eq!(model.properties["x2b"].accessor, "x2b");
        assert_eq!(model.properties["x2d"].name, "-");
    }

    #[test]
    fn test_primitive_and_custom_formatter_are_exclusive() {
        let doc = document(json!({
            "definitions": {
                "Account": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string", "format": "uuid" },
                        "created": { "type": "string", "format": "date-time" },
                        "size": { "type": "integer", "format": "int32" },
                        "label": { "type": "string" }
                    }
                }
            }
        }));
        let model = build(&doc, "Account");

        let id = &model.properties["id"];
        assert!(id.is_custom_formatter);
        assert!(!id.is_primitive);
        assert!(id.resolved.primitive);

        let created = &model.properties["created"];
        assert!(!created.is_custom_formatter);
        assert!(!created.is_primitive);

        assert!(model.properties["size"].is_primitive);
        assert!(model.properties["label"].is_primitive);
        for property in model.properties.values() {
            assert!(!(property.is_primitive && property.is_custom_formatter));
        }
    }

    #[test]
    fn test_all_of_missing_reference() {
        let doc = document(json!({
            "definitions": {
                "Dog": { "allOf": [{ "$ref": "#/definitions/Animal" }] }
            }
        }));
        let err = build_definition(&doc, "Dog", &ModelOptions::default()).unwrap_err();
        assert_eq!(
            err.root_cause(),
            &ModelError::UnresolvedReference("#/definitions/Animal".into())
        );
    }

    #[test]
    fn test_all_of_cycle_is_rejected() {
        let doc = document(json!({
            "definitions": {
                "A": { "allOf": [{ "$ref": "#/definitions/B" }] },
                "B": { "allOf": [{ "$ref": "#/definitions/A" }] }
            }
        }));
        let err = build_definition(&doc, "A", &ModelOptions::default()).unwrap_err();
        assert_eq!(err.root_cause(), &ModelError::CyclicReference("A -> B -> A".into()));
    }

    #[test]
    fn test_property_error_is_wrapped() {
        let doc = document(json!({
            "definitions": {
                "Pet": {
                    "type": "object",
                    "properties": { "owner": { "$ref": "#/definitions/Person" } }
                }
            }
        }));
        let err = build_definition(&doc, "Pet", &ModelOptions::default()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("definition \"Pet\""), "{message}");
        assert!(message.contains("property \"owner\""), "{message}");
    }
}
