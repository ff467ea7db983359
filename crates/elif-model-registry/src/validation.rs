//! Validation entries attached to attributes
//!
//! The registry only records validators; implementing rules is left to the
//! validation layer. Entries are kept in declaration order because runners
//! execute them in sequence and stop at the first failure.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A failed validation for one attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
    /// Error code for programmatic handling
    pub code: String,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: "validation_failed".to_string(),
        }
    }

    /// Set the error code
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }
}

/// A validation callback for a single attribute value
pub trait AttributeValidator: Send + Sync {
    /// Validate `value` for `field`; `options` are the ones registered with the entry
    fn validate(
        &self,
        value: &Value,
        field: &str,
        options: Option<&Value>,
    ) -> Result<(), ValidationError>;

    /// Get the validation rule name
    fn rule_name(&self) -> &str;
}

/// Adapter turning a closure into an [`AttributeValidator`]
pub struct FnValidator<F> {
    rule: String,
    callback: F,
}

impl<F> AttributeValidator for FnValidator<F>
where
    F: Fn(&Value, &str, Option<&Value>) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(
        &self,
        value: &Value,
        field: &str,
        options: Option<&Value>,
    ) -> Result<(), ValidationError> {
        (self.callback)(value, field, options)
    }

    fn rule_name(&self) -> &str {
        &self.rule
    }
}

/// A registered validator and the options it runs with
#[derive(Clone)]
pub struct ValidationEntry {
    pub validator: Arc<dyn AttributeValidator>,
    pub options: Option<Value>,
}

impl ValidationEntry {
    pub fn new<V>(validator: V) -> Self
    where
        V: AttributeValidator + 'static,
    {
        Self {
            validator: Arc::new(validator),
            options: None,
        }
    }

    /// Build an entry from a closure
    pub fn from_fn<F>(rule: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&Value, &str, Option<&Value>) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        Self::new(FnValidator {
            rule: rule.into(),
            callback,
        })
    }

    /// Attach options passed to the validator on every run
    pub fn with_options(mut self, options: impl Into<Value>) -> Self {
        self.options = Some(options.into());
        self
    }

    pub fn rule_name(&self) -> &str {
        self.validator.rule_name()
    }

    /// Run this entry against a value
    pub fn check(&self, value: &Value, field: &str) -> Result<(), ValidationError> {
        self.validator.validate(value, field, self.options.as_ref())
    }
}

impl fmt::Debug for ValidationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationEntry")
            .field("rule", &self.rule_name())
            .field("options", &self.options)
            .finish()
    }
}

/// Run entries in order, stopping at the first failure
pub fn run_validations(
    entries: &[ValidationEntry],
    field: &str,
    value: &Value,
) -> Result<(), ValidationError> {
    for entry in entries {
        tracing::trace!("Running validation '{}' on field '{}'", entry.rule_name(), field);
        entry.check(value, field)?;
    }
    Ok(())
}
