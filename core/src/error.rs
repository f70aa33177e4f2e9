//! Error types for type resolution and model building.

use thiserror::Error;

/// Errors raised while resolving schemas or building models.
///
/// Errors raised below a property or definition are wrapped in
/// [`Property`](ModelError::Property) / [`Definition`](ModelError::Definition)
/// so the caller can see where resolution failed. Use
/// [`root_cause`](ModelError::root_cause) to get at the underlying kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A requested definition is absent from the document.
    #[error("definition {0:?} not found in document")]
    DefinitionNotFound(String),

    /// A `$ref` token does not resolve within the document.
    #[error("unresolved reference {0:?}")]
    UnresolvedReference(String),

    /// The declared type is not one of the recognized tokens.
    #[error("unresolvable type {types:?} (format {format:?})")]
    UnresolvableType {
        types: Vec<String>,
        format: Option<String>,
    },

    /// A reference chain re-enters a definition that is still being expanded.
    #[error("cyclic reference: {0}")]
    CyclicReference(String),

    /// `oneOf` / `anyOf` under the reject policy.
    #[error("unsupported composition keyword {keyword:?}")]
    UnsupportedComposition { keyword: &'static str },

    /// Failure while building a property.
    #[error("property {property:?}: {source}")]
    Property {
        property: String,
        source: Box<ModelError>,
    },

    /// Failure while building a definition.
    #[error("definition {name:?}: {source}")]
    Definition {
        name: String,
        source: Box<ModelError>,
    },
}

impl ModelError {
    pub(crate) fn in_property(self, property: &str) -> Self {
        Self::Property {
            property: property.to_string(),
            source: Box::new(self),
        }
    }

    pub(crate) fn in_definition(self, name: &str) -> Self {
        Self::Definition {
            name: name.to_string(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping property/definition context.
    ///
    /// # Examples
    ///
    /// ```
    /// use schema_modelgen_core::ModelError;
    ///
    /// let err = ModelError::Definition {
    ///     name: "Pet".into(),
    ///     source: Box::new(ModelError::UnresolvedReference("#/definitions/Tag".into())),
    /// };
    /// assert!(matches!(err.root_cause(), ModelError::UnresolvedReference(_)));
    /// ```
    pub fn root_cause(&self) -> &ModelError {
        match self {
            Self::Property { source, .. } | Self::Definition { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Convenience alias for results with [`ModelError`].
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_is_rendered_in_message() {
        let err = ModelError::UnresolvableType {
            types: vec!["widget".into()],
            format: None,
        }
        .in_property("shape")
        .in_definition("Drawing");

        let message = err.to_string();
        assert!(message.starts_with("definition \"Drawing\""));
        assert!(message.contains("property \"shape\""));
        assert!(message.contains("widget"));
    }

    #[test]
    fn test_root_cause_of_plain_error_is_itself() {
        let err = ModelError::DefinitionNotFound("Pet".into());
        assert_eq!(err.root_cause(), &err);
    }
}
