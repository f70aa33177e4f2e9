//! Schema → target type resolution.
//!
//! [`TypeResolver::resolve`] classifies a schema node into exactly one
//! [`TypeShape`] using a fixed precedence:
//!
//! 1. `$ref`: object-typed targets become named complex objects without
//!    looking inside them; other targets (aliases of strings, arrays, …) are
//!    resolved in place and marked non-anonymous.
//! 2. `format`: a known format maps straight to its target type, whatever
//!    the declared type says.
//! 3. the first declared type (`object` when none is declared).
//!
//! Arrays and maps are never nullable. Everything else is nullable when the
//! schema is declared as `object` or carries a `true` nullability extension.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::debug;

use crate::document::Document;
use crate::error::{ModelError, Result};
use crate::naming;
use crate::schema::{Schema, SchemaItems};
use crate::trail::Trail;
use crate::typemap::{self, INTERFACE_TYPE, STRING_TYPE};

/// Structural classification of a resolved schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
    /// Scalar value: numbers, booleans, strings, formatted strings, files.
    Primitive,
    /// Homogeneous array.
    Array { element: Box<ResolvedType> },
    /// Fixed-position heterogeneous array, in declaration order.
    Tuple { elements: Vec<ResolvedType> },
    /// String-keyed map.
    Map { value: Box<ResolvedType> },
    /// Named or anonymous structured object.
    ///
    /// `properties` is only filled for anonymous inline objects resolved in
    /// an anonymous context; named objects are referenced, not expanded.
    Object {
        properties: BTreeMap<String, ResolvedType>,
    },
    /// Untyped value, used only when no schema exists at all.
    Interface,
}

impl TypeShape {
    /// Stable lower-case name of the shape.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Primitive => "primitive",
            Self::Array { .. } => "array",
            Self::Tuple { .. } => "tuple",
            Self::Map { .. } => "map",
            Self::Object { .. } => "object",
            Self::Interface => "interface",
        }
    }
}

/// How one schema node is represented in the target model.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedType {
    pub shape: TypeShape,
    /// Rust type expression (`String`, `Vec<i64>`, `models::Pet`, …).
    /// Empty for anonymous inline objects, which the renderer names.
    pub target_type: String,
    /// Declared schema type the target was derived from.
    pub source_type: String,
    /// Declared format, when the format decided the target type.
    pub source_format: Option<String>,
    pub nullable: bool,
    pub anonymous: bool,
    /// Plain scalar. `file` is a scalar but not primitive.
    pub primitive: bool,
    /// Type of elements beyond the declared items of an array or tuple.
    pub additional_items: Option<Box<ResolvedType>>,
}

impl ResolvedType {
    fn interface() -> Self {
        Self {
            shape: TypeShape::Interface,
            target_type: INTERFACE_TYPE.to_string(),
            source_type: String::new(),
            source_format: None,
            nullable: false,
            anonymous: false,
            primitive: false,
            additional_items: None,
        }
    }

    fn scalar(target_type: &str, source_type: &str, primitive: bool) -> Self {
        Self {
            shape: TypeShape::Primitive,
            target_type: target_type.to_string(),
            source_type: source_type.to_string(),
            primitive,
            ..Self::interface()
        }
    }

    fn array_of(element: ResolvedType) -> Self {
        Self {
            target_type: format!("Vec<{}>", element.target_type),
            source_type: "array".to_string(),
            shape: TypeShape::Array {
                element: Box::new(element),
            },
            ..Self::interface()
        }
    }

    fn tuple_of(elements: Vec<ResolvedType>) -> Self {
        let names: Vec<&str> = elements.iter().map(|e| e.target_type.as_str()).collect();
        let target_type = match names.as_slice() {
            [single] => format!("({single},)"),
            many => format!("({})", many.join(", ")),
        };
        Self {
            target_type,
            source_type: "array".to_string(),
            shape: TypeShape::Tuple { elements },
            ..Self::interface()
        }
    }

    fn map_of(value: ResolvedType) -> Self {
        Self {
            target_type: format!("HashMap<String, {}>", value.target_type),
            source_type: "object".to_string(),
            shape: TypeShape::Map {
                value: Box::new(value),
            },
            ..Self::interface()
        }
    }

    /// Homogeneous array (tuples are reported by [`is_tuple`](Self::is_tuple)).
    pub fn is_array(&self) -> bool {
        matches!(self.shape, TypeShape::Array { .. })
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self.shape, TypeShape::Tuple { .. })
    }

    pub fn is_map(&self) -> bool {
        matches!(self.shape, TypeShape::Map { .. })
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.shape, TypeShape::Interface)
    }

    /// Named or anonymous structured object.
    pub fn is_complex_object(&self) -> bool {
        matches!(self.shape, TypeShape::Object { .. })
    }

    /// Formatted scalar with its own parsing and validation.
    pub fn is_custom_formatter(&self) -> bool {
        typemap::is_custom_formatter(&self.target_type)
    }

    pub fn has_additional_items(&self) -> bool {
        self.additional_items.is_some()
    }

    /// Element type of an array, or value type of a map.
    pub fn element(&self) -> Option<&ResolvedType> {
        match &self.shape {
            TypeShape::Array { element } => Some(element),
            TypeShape::Map { value } => Some(value),
            _ => None,
        }
    }

    /// Ordered element types of a tuple; empty for every other shape.
    pub fn tuple_types(&self) -> &[ResolvedType] {
        match &self.shape {
            TypeShape::Tuple { elements } => elements,
            _ => &[],
        }
    }

    /// Property types of an anonymous inline object.
    pub fn property_types(&self) -> Option<&BTreeMap<String, ResolvedType>> {
        match &self.shape {
            TypeShape::Object { properties } if !properties.is_empty() => Some(properties),
            _ => None,
        }
    }
}

impl Serialize for ResolvedType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_struct("ResolvedType", 18)?;
        out.serialize_field("kind", self.shape.kind())?;
        out.serialize_field("targetType", &self.target_type)?;
        out.serialize_field("sourceType", &self.source_type)?;
        out.serialize_field("sourceFormat", &self.source_format)?;
        out.serialize_field("nullable", &self.nullable)?;
        out.serialize_field("anonymous", &self.anonymous)?;
        out.serialize_field("primitive", &self.primitive)?;
        out.serialize_field("customFormatter", &self.is_custom_formatter())?;
        out.serialize_field("complexObject", &self.is_complex_object())?;
        out.serialize_field("isArray", &self.is_array())?;
        out.serialize_field("isTuple", &self.is_tuple())?;
        out.serialize_field("isMap", &self.is_map())?;
        out.serialize_field("isInterface", &self.is_interface())?;
        out.serialize_field("hasAdditionalItems", &self.has_additional_items())?;
        out.serialize_field("elementType", &self.element())?;
        out.serialize_field("tupleTypes", self.tuple_types())?;
        out.serialize_field("propertyTypes", &self.property_types())?;
        out.serialize_field("additionalItems", &self.additional_items)?;
        out.end()
    }
}

/// Nullability rule shared by every resolution branch.
///
/// # Examples
///
/// ```
/// use schema_modelgen_core::{is_nullable, Schema};
///
/// assert!(is_nullable(&Schema::of_type("object")));
/// assert!(!is_nullable(&Schema::of_type("string")));
/// assert!(is_nullable(
///     &Schema::of_type("string").with_extension("x-nullable", true.into())
/// ));
/// ```
pub fn is_nullable(schema: &Schema) -> bool {
    schema.types.contains("object") || schema.nullable_extension()
}

/// Resolves schemas against a document.
///
/// Resolution is a pure function of the schema and the document; one
/// resolver can be shared freely.
///
/// # Examples
///
/// ```
/// use schema_modelgen_core::{Document, Schema, TypeResolver};
///
/// let doc = Document::from_definitions([("Pet", Schema::of_type("object"))]);
/// let resolver = TypeResolver::new(&doc).with_models_package("models");
///
/// let pets = resolver
///     .resolve(&Schema::array_of(Schema::definition_ref("Pet")), false)
///     .unwrap();
/// assert!(pets.is_array());
/// assert!(!pets.nullable);
/// assert_eq!(pets.target_type, "Vec<models::Pet>");
///
/// let id = resolver
///     .resolve(&Schema::of_type("string").with_format("uuid"), false)
///     .unwrap();
/// assert!(id.is_custom_formatter());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    document: &'a Document,
    models_package: &'a str,
}

impl<'a> TypeResolver<'a> {
    /// Creates a resolver for `document` with no models package prefix.
    pub fn new(document: &'a Document) -> Self {
        Self {
            document,
            models_package: "",
        }
    }

    /// Prefixes named object types with `package::`.
    pub fn with_models_package(mut self, package: &'a str) -> Self {
        self.models_package = package;
        self
    }

    /// Resolves one schema node.
    ///
    /// `anonymous` tells whether the node sits in an anonymous context
    /// (nested inside another resolved type), which makes inline object
    /// properties expand into a property map.
    ///
    /// # Errors
    ///
    /// - [`ModelError::UnresolvedReference`] when a `$ref` is not defined.
    /// - [`ModelError::UnresolvableType`] for unknown type tokens.
    /// - [`ModelError::CyclicReference`] when non-object aliases refer back
    ///   to themselves.
    pub fn resolve(&self, schema: &Schema, anonymous: bool) -> Result<ResolvedType> {
        self.resolve_node(Some(schema), anonymous, None)
    }

    fn resolve_node(
        &self,
        schema: Option<&Schema>,
        anonymous: bool,
        trail: Option<&Trail<'_>>,
    ) -> Result<ResolvedType> {
        let Some(schema) = schema else {
            return Ok(ResolvedType::interface());
        };

        if let Some(token) = &schema.reference {
            return self.resolve_reference(token, trail);
        }

        if let Some(resolved) = resolve_format(schema) {
            return Ok(resolved);
        }

        match schema.first_type() {
            "array" => self.resolve_array(schema, trail),
            scalar @ ("file" | "number" | "integer" | "boolean") => {
                let target = typemap::mapped_type(scalar).ok_or_else(|| unresolvable(schema))?;
                Ok(ResolvedType::scalar(target, scalar, scalar != "file"))
            }
            "string" => Ok(ResolvedType::scalar(STRING_TYPE, "string", true)),
            "object" => self.resolve_object(schema, anonymous, trail),
            _ => Err(unresolvable(schema)),
        }
    }

    fn resolve_reference(&self, token: &str, trail: Option<&Trail<'_>>) -> Result<ResolvedType> {
        let (name, target) = self.document.resolve_ref(token)?;
        debug!(reference = token, definition = name, "resolving reference");

        if target.types.contains("object") {
            let type_name = target
                .type_name_override()
                .map(str::to_string)
                .unwrap_or_else(|| naming::to_type_name(name));
            return Ok(ResolvedType {
                shape: TypeShape::Object {
                    properties: BTreeMap::new(),
                },
                target_type: self.qualify(&type_name),
                source_type: "object".to_string(),
                nullable: is_nullable(target),
                ..ResolvedType::interface()
            });
        }

        let trail = Trail::enter(trail, name)?;
        let mut resolved = self.resolve_node(Some(target), true, Some(&trail))?;
        resolved.anonymous = false;
        Ok(resolved)
    }

    fn resolve_array(&self, schema: &Schema, trail: Option<&Trail<'_>>) -> Result<ResolvedType> {
        let additional_items = if schema.allows_additional_items() {
            let resolved = self.resolve_node(schema.additional_items_schema(), true, trail)?;
            Some(Box::new(resolved))
        } else {
            None
        };

        let resolved = match &schema.items {
            Some(SchemaItems::Tuple(elements)) if !elements.is_empty() => {
                let elements = elements
                    .iter()
                    .map(|element| self.resolve_node(Some(element), true, trail))
                    .collect::<Result<Vec<_>>>()?;
                ResolvedType::tuple_of(elements)
            }
            Some(SchemaItems::Single(items)) => {
                ResolvedType::array_of(self.resolve_node(Some(items), true, trail)?)
            }
            // No usable items: fall back to an untyped element.
            _ => ResolvedType::array_of(ResolvedType::interface()),
        };

        Ok(ResolvedType {
            additional_items,
            ..resolved
        })
    }

    fn resolve_object(
        &self,
        schema: &Schema,
        anonymous: bool,
        trail: Option<&Trail<'_>>,
    ) -> Result<ResolvedType> {
        let mut properties = BTreeMap::new();
        if anonymous {
            for (name, property) in &schema.properties {
                let resolved = self
                    .resolve_node(Some(property), true, trail)
                    .map_err(|e| e.in_property(name))?;
                properties.insert(name.clone(), resolved);
            }
        }

        if let Some(value) = schema.additional_properties_schema() {
            let value = self.resolve_node(Some(value), true, trail)?;
            return Ok(ResolvedType::map_of(value));
        }

        if !schema.properties.is_empty() {
            return Ok(ResolvedType {
                shape: TypeShape::Object { properties },
                target_type: String::new(),
                source_type: "object".to_string(),
                nullable: is_nullable(schema),
                anonymous,
                ..ResolvedType::interface()
            });
        }

        Ok(ResolvedType::map_of(ResolvedType::interface()))
    }

    fn qualify(&self, type_name: &str) -> String {
        if self.models_package.is_empty() {
            type_name.to_string()
        } else {
            format!("{}::{type_name}", self.models_package)
        }
    }
}

fn resolve_format(schema: &Schema) -> Option<ResolvedType> {
    let format = schema.format.as_deref()?;
    let target = typemap::format_type(format)?;
    Some(ResolvedType {
        source_type: schema.types.first().unwrap_or("string").to_string(),
        source_format: Some(format.to_string()),
        nullable: is_nullable(schema),
        ..ResolvedType::scalar(target, "", true)
    })
}

fn unresolvable(schema: &Schema) -> ModelError {
    ModelError::UnresolvableType {
        types: schema.types.as_slice().to_vec(),
        format: schema.format.clone(),
    }
}
