//! Generator configuration.
//!
//! Defines the YAML-serializable configuration that controls which
//! definitions are built, the models package, the composition policy, and
//! the dump format.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! models_package: models
//! definitions:
//!   - Pet
//!   - Order
//! exclude:
//!   - Internal
//! composition: reject
//! dump:
//!   format: yaml
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use schema_modelgen_core::{
    CompositionPolicy, DEFAULT_MODELS_PACKAGE, Document, DumpFormat, ModelOptions,
};
use serde::{Deserialize, Serialize};

use crate::error::{LoaderError, Result};

/// Configuration format version written by [`GenConfig::default`].
pub const CONFIG_VERSION: &str = "1.0";

/// Settings for dump output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpConfig {
    pub format: DumpFormat,
}

/// Top-level generator configuration.
///
/// Every field is optional in the YAML file; missing fields take their
/// defaults.
///
/// # Examples
///
/// ```no_run
/// use schema_modelgen_loader::GenConfig;
///
/// let config = GenConfig::load("modelgen.yml").unwrap();
/// if config.is_selected("Pet") {
///     println!("Pet will be built into {}", config.models_package);
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    /// Package prefix for referenced model types. Empty for none.
    pub models_package: String,
    /// Definitions to build (empty = build all).
    pub definitions: Vec<String>,
    /// Definitions to explicitly skip.
    pub exclude: Vec<String>,
    /// Treatment of `oneOf` / `anyOf`.
    pub composition: CompositionPolicy,
    pub dump: DumpConfig,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            models_package: DEFAULT_MODELS_PACKAGE.to_string(),
            definitions: Vec::new(),
            exclude: Vec::new(),
            composition: CompositionPolicy::default(),
            dump: DumpConfig::default(),
        }
    }
}

impl GenConfig {
    /// Loads and validates configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::LoaderError::IoError) if the file cannot
    /// be read, [`YamlError`](crate::LoaderError::YamlError) if parsing
    /// fails, or [`InvalidConfig`](crate::LoaderError::InvalidConfig) if
    /// validation fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::LoaderError::IoError) if the file cannot
    /// be written, or [`YamlError`](crate::LoaderError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Checks that the version is set and the models package is a `::`
    /// separated Rust path.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(LoaderError::InvalidConfig("version must not be empty".into()));
        }
        if !self.models_package.is_empty()
            && !self.models_package.split("::").all(is_identifier)
        {
            return Err(LoaderError::InvalidConfig(format!(
                "models_package '{}' is not a Rust path",
                self.models_package
            )));
        }
        Ok(())
    }

    /// Returns `true` if `name` is in the exclusion list.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.iter().any(|d| d == name)
    }

    /// Returns `true` if definition `name` should be built.
    ///
    /// When `definitions` is empty, all non-excluded definitions are
    /// selected. Otherwise the name must be listed. Exclusions always win.
    ///
    /// # Examples
    ///
    /// ```
    /// # let yaml = r#"
    /// # definitions: [Pet, Order]
    /// # exclude: [Order]
    /// # "#;
    /// # let config: schema_modelgen_loader::GenConfig = serde_yaml::from_str(yaml).unwrap();
    /// assert!(config.is_selected("Pet"));
    /// assert!(!config.is_selected("Tag"));
    /// assert!(!config.is_selected("Order"));
    /// ```
    pub fn is_selected(&self, name: &str) -> bool {
        if self.is_excluded(name) {
            return false;
        }
        if self.definitions.is_empty() {
            return true;
        }
        self.definitions.iter().any(|d| d == name)
    }

    /// Returns the selected definition names of `document`, sorted.
    ///
    /// Listed names missing from the document are returned too, so building
    /// them reports the missing definition.
    pub fn select<'a>(&'a self, document: &'a Document) -> Vec<&'a str> {
        if self.definitions.is_empty() {
            return document
                .definition_names()
                .into_iter()
                .filter(|name| !self.is_excluded(name))
                .collect();
        }
        let mut names: Vec<&str> = self
            .definitions
            .iter()
            .map(String::as_str)
            .filter(|name| !self.is_excluded(name))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Projects the settings the model builder needs.
    pub fn model_options(&self) -> ModelOptions {
        ModelOptions {
            models_package: self.models_package.clone(),
            composition: self.composition,
        }
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
