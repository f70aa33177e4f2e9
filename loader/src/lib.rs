//! Document loading and generator configuration for schema-modelgen.
//!
//! This crate reads interface descriptions from disk into a
//! [`Document`](schema_modelgen_core::Document) and loads the YAML
//! [`GenConfig`] that selects definitions and tunes model building.
//!
//! # Quick start
//!
//! ```no_run
//! use schema_modelgen_core::build_definition;
//! use schema_modelgen_loader::{GenConfig, load_document};
//!
//! let document = load_document("petstore.json").unwrap();
//! let config = GenConfig::load("modelgen.yml").unwrap();
//!
//! for name in config.select(&document) {
//!     let model = build_definition(&document, name, &config.model_options()).unwrap();
//!     println!("{} has {} properties", model.type_name, model.properties.len());
//! }
//! ```

mod config;
mod error;
mod loader;

pub use config::{CONFIG_VERSION, DumpConfig, GenConfig};
pub use error::{LoaderError, Result};
pub use loader::{DocumentFormat, load_definitions_dir, load_document, parse_document};
