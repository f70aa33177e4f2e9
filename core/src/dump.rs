//! Dump output for built models.

use serde::{Deserialize, Serialize};

use crate::model::GenModel;

/// Supported dump formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DumpFormat {
    #[default]
    Json,
    Yaml,
}

impl DumpFormat {
    /// File extension for dumps written in this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Serializes any dump payload in the requested format.
pub fn format_value<T: Serialize>(value: &T, format: DumpFormat) -> Result<String, String> {
    match format {
        DumpFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        DumpFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}

/// Formats a model in the requested dump format.
pub fn format_model(model: &GenModel, format: DumpFormat) -> Result<String, String> {
    format_value(model, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Document, ModelOptions, Schema, build_model};

    fn pet() -> GenModel {
        let schema = Schema::of_type("object")
            .with_property("name", Schema::of_type("string"))
            .with_required("name");
        build_model("Pet", &schema, &Document::default(), &ModelOptions::default()).unwrap()
    }

    #[test]
    fn test_format_model_json() {
        let json = format_model(&pet(), DumpFormat::Json).unwrap();
        assert!(json.contains("\"typeName\": \"Pet\""));
        assert!(json.contains("\"hasValidations\": true"));
        assert!(json.contains("\"valueExpression\": \"self.name\""));
    }

    #[test]
    fn test_format_model_yaml() {
        let yaml = format_model(&pet(), DumpFormat::Yaml).unwrap();
        assert!(yaml.contains("typeName: Pet"));
        assert!(yaml.contains("targetType: String"));
    }

    #[test]
    fn test_extension() {
        assert_eq!(DumpFormat::Json.extension(), "json");
        assert_eq!(DumpFormat::Yaml.extension(), "yaml");
    }
}
