//! Error types for the model registry
//!
//! Declaring and reading metadata never fails: a missing declaration is an
//! empty result. Errors only come out of configuration loading and the
//! opt-in integrity check.

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Error types for registry operations
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Configuration error: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Association '{association}' on model '{model}' has no target")]
    MissingTarget { model: String, association: String },

    #[error(
        "Association '{association}' on model '{model}' targets '{target}', \
         which is not a declared model"
    )]
    UnknownTarget {
        model: String,
        association: String,
        target: String,
    },
}

impl RegistryError {
    /// Create a missing target error
    pub fn missing_target(model: impl Into<String>, association: impl Into<String>) -> Self {
        Self::MissingTarget {
            model: model.into(),
            association: association.into(),
        }
    }

    /// Create an unknown target error
    pub fn unknown_target(
        model: impl Into<String>,
        association: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::UnknownTarget {
            model: model.into(),
            association: association.into(),
            target: target.into(),
        }
    }

    /// Returns true if the error comes from an association declaration
    pub fn is_association_error(&self) -> bool {
        !matches!(self, Self::InvalidConfig(_))
    }
}
