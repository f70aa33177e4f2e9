//! Interface description loading.
//!
//! A [`Document`] can be loaded from:
//!
//! - a single JSON or YAML file carrying a top-level `definitions` (or
//!   `$defs`) object, such as a Swagger 2.0 description;
//! - a directory with one schema file per definition, named after the
//!   definition (`Pet.json`, `Order.yaml`).
//!
//! ```no_run
//! use schema_modelgen_loader::load_document;
//!
//! let document = load_document("petstore.yaml").unwrap();
//! for name in document.definition_names() {
//!     println!("{name}");
//! }
//! ```

use std::io::BufReader;
use std::path::Path;

use schema_modelgen_core::{Document, Schema};
use tracing::debug;

use crate::error::{LoaderError, Result};

/// Serialization format of a document file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Picks the format from a file extension (`json`, `yaml`, `yml`).
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::UnsupportedFormat`] for any other extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use schema_modelgen_loader::DocumentFormat;
    ///
    /// assert_eq!(DocumentFormat::from_path("api.YML").unwrap(), DocumentFormat::Yaml);
    /// assert!(DocumentFormat::from_path("api.toml").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(LoaderError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Loads a document from a file or a directory of definition files.
///
/// # Errors
///
/// Returns [`LoaderError::IoError`] if the path cannot be read,
/// [`LoaderError::UnsupportedFormat`] for a file with an unknown extension,
/// or a JSON/YAML error if parsing fails.
pub fn load_document(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    if path.is_dir() {
        return load_definitions_dir(path);
    }

    let format = DocumentFormat::from_path(path)?;
    let reader = BufReader::new(std::fs::File::open(path)?);
    let document: Document = match format {
        DocumentFormat::Json => serde_json::from_reader(reader)?,
        DocumentFormat::Yaml => serde_yaml::from_reader(reader)?,
    };
    debug!(
        path = %path.display(),
        definitions = document.len(),
        "loaded document"
    );
    Ok(document)
}

/// Parses a document from text in the given format.
///
/// # Examples
///
/// ```
/// use schema_modelgen_loader::{parse_document, DocumentFormat};
///
/// let yaml = "definitions:\n  Tag:\n    type: string\n";
/// let document = parse_document(yaml, DocumentFormat::Yaml).unwrap();
/// assert!(document.definition("Tag").is_some());
/// ```
pub fn parse_document(text: &str, format: DocumentFormat) -> Result<Document> {
    Ok(match format {
        DocumentFormat::Json => serde_json::from_str(text)?,
        DocumentFormat::Yaml => serde_yaml::from_str(text)?,
    })
}

/// Loads every `*.json`, `*.yaml` and `*.yml` file in `path` as one
/// definition named after the file stem. Other files are skipped.
///
/// # Errors
///
/// Returns [`LoaderError::IoError`] if the directory or a file cannot be
/// read, or a JSON/YAML error if any file fails to parse.
pub fn load_definitions_dir(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    let mut document = Document::default();

    for entry in std::fs::read_dir(path)? {
        let file_path = entry?.path();
        let Ok(format) = DocumentFormat::from_path(&file_path) else {
            continue;
        };
        let Some(name) = file_path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let reader = BufReader::new(std::fs::File::open(&file_path)?);
        let schema: Schema = match format {
            DocumentFormat::Json => serde_json::from_reader(reader)?,
            DocumentFormat::Yaml => serde_yaml::from_reader(reader)?,
        };
        document.insert(name, schema);
    }

    debug!(
        path = %path.display(),
        definitions = document.len(),
        "loaded definitions directory"
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write(dir: &Path, name: &str, contents: &str) {
        let mut f = std::fs::File::create(dir.join(name)).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(DocumentFormat::from_path("a.json").unwrap(), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path("a.yaml").unwrap(), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path("a.yml").unwrap(), DocumentFormat::Yaml);
        assert!(matches!(
            DocumentFormat::from_path("Makefile"),
            Err(LoaderError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "api.json",
            r#"{ "swagger": "2.0", "definitions": { "Pet": { "type": "object" } } }"#,
        );
        let document = load_document(dir.path().join("api.json")).unwrap();
        assert_eq!(document.definition_names(), vec!["Pet"]);
    }

    #[test]
    fn test_load_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "api.yaml",
            "definitions:\n  Pet:\n    type: object\n  Tag:\n    type: string\n",
        );
        let document = load_document(dir.path().join("api.yaml")).unwrap();
        assert_eq!(document.len(), 2);
    }

    #[test]
    fn test_load_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "api.toml", "");
        let err = load_document(dir.path().join("api.toml")).unwrap_err();
        assert!(matches!(err, LoaderError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_document("/nonexistent/api.json").unwrap_err();
        assert!(matches!(err, LoaderError::IoError(_)));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "api.json", "{ not json");
        let err = load_document(dir.path().join("api.json")).unwrap_err();
        assert!(matches!(err, LoaderError::JsonError(_)));
    }

    #[test]
    fn test_load_definitions_dir() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Pet.json", r#"{ "type": "object" }"#);
        write(dir.path(), "Tag.yml", "type: string\n");
        write(dir.path(), "README.md", "# not a schema");

        let document = load_document(dir.path()).unwrap();
        assert_eq!(document.definition_names(), vec!["Pet", "Tag"]);
        assert_eq!(document.definition("Tag").unwrap().first_type(), "string");
    }

    #[test]
    fn test_parse_document_json() {
        let document =
            parse_document(r#"{"definitions":{"A":{"type":"integer"}}}"#, DocumentFormat::Json)
                .unwrap();
        assert_eq!(document.definition("A").unwrap().first_type(), "integer");
    }
}
