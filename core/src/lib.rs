//! Schema type resolution and model building for code generators.
//!
//! This crate turns the named definitions of a JSON-Schema style interface
//! description into a resolved, validation-annotated model:
//!
//! - [`Schema`] and [`Document`]: the read-only input, schema nodes and the
//!   named definitions references point into.
//! - [`TypeResolver`]: classifies one schema node into a [`ResolvedType`]
//!   with exactly one [`TypeShape`], following references and deriving
//!   nullability.
//! - [`build_model`] / [`build_definition`]: walk a definition's properties
//!   and produce a [`GenModel`] of [`GenModelProperty`] trees, flattening
//!   `allOf`.
//! - [`dump`]: JSON / YAML output of built models.
//!
//! Target types are Rust type expressions (`Vec<String>`,
//! `HashMap<String, i64>`, `models::Pet`, `formats::Uuid`).
//!
//! # Example
//!
//! ```
//! use schema_modelgen_core::*;
//!
//! let document: Document = serde_json::from_value(serde_json::json!({
//!     "definitions": {
//!         "Pet": {
//!             "type": "object",
//!             "required": ["name"],
//!             "properties": {
//!                 "name": { "type": "string" },
//!                 "tags": { "type": "array", "items": { "type": "string" } },
//!                 "owner": { "$ref": "#/definitions/Person" }
//!             }
//!         },
//!         "Person": { "type": "object" }
//!     }
//! }))
//! .unwrap();
//!
//! let model = build_definition(&document, "Pet", &ModelOptions::default()).unwrap();
//! assert_eq!(model.properties.len(), 3);
//! assert!(model.properties["name"].is_required());
//! assert_eq!(model.properties["tags"].data_type, "Vec<String>");
//! assert_eq!(model.properties["owner"].data_type, "models::Person");
//! assert!(model.properties["owner"].resolved.nullable);
//! ```

mod builder;
pub mod docs;
mod document;
pub mod dump;
mod error;
mod model;
pub mod naming;
mod options;
mod resolver;
mod schema;
mod trail;
pub mod typemap;

pub use builder::{build_definition, build_model};
pub use document::Document;
pub use dump::{DumpFormat, format_model};
pub use error::{ModelError, Result};
pub use model::{GenModel, GenModelProperty, Validations};
pub use options::{CompositionPolicy, DEFAULT_MODELS_PACKAGE, ModelOptions};
pub use resolver::{ResolvedType, TypeResolver, TypeShape, is_nullable};
pub use schema::*;
