//! Options controlling model building.

use serde::{Deserialize, Serialize};

/// Package prefix used for named model types when none is configured.
pub const DEFAULT_MODELS_PACKAGE: &str = "models";

/// How `oneOf` / `anyOf` keywords are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum CompositionPolicy {
    /// Fail the definition with [`ModelError::UnsupportedComposition`](crate::ModelError::UnsupportedComposition).
    #[default]
    Reject,
    /// Log a warning and build the model without the keyword.
    Ignore,
}

/// Settings for [`build_model`](crate::build_model).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelOptions {
    /// Prefix for referenced model types (`models::Pet`). Empty for none.
    pub models_package: String,
    pub composition: CompositionPolicy,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            models_package: DEFAULT_MODELS_PACKAGE.to_string(),
            composition: CompositionPolicy::default(),
        }
    }
}
