//! Registry configuration
//!
//! Controls how default model names are derived and whether key collisions
//! between attributes and associations are reported.

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable selecting the default model naming strategy
pub const MODEL_NAMING_ENV: &str = "ELIF_MODEL_NAMING";

/// Environment variable toggling collision warnings
pub const WARN_ON_COLLISION_ENV: &str = "ELIF_MODEL_WARN_ON_COLLISION";

/// Configuration error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value for field '{field}': '{value}'. Expected: {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },
}

impl ConfigError {
    /// Create an invalid value error
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }
}

/// How a model's default name is derived from its type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingStrategy {
    /// `UserAccount` -> `userAccount`
    #[default]
    Camel,
    /// `UserAccount` -> `user_account`
    Snake,
    /// `UserAccount` -> `UserAccount`
    Pascal,
    /// `UserAccount` -> `user-account`
    Kebab,
    /// Identifier used as-is
    Preserve,
}

impl FromStr for NamingStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "camel" | "camelcase" => Ok(Self::Camel),
            "snake" | "snake_case" => Ok(Self::Snake),
            "pascal" | "pascalcase" => Ok(Self::Pascal),
            "kebab" | "kebab-case" => Ok(Self::Kebab),
            "preserve" | "none" => Ok(Self::Preserve),
            _ => Err(ConfigError::invalid_value(
                "model_naming",
                s,
                "camel, snake, pascal, kebab, or preserve",
            )),
        }
    }
}

impl fmt::Display for NamingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Camel => "camel",
            Self::Snake => "snake",
            Self::Pascal => "pascal",
            Self::Kebab => "kebab",
            Self::Preserve => "preserve",
        };
        write!(f, "{}", name)
    }
}

/// Registry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Strategy used for model names that were never declared explicitly
    pub model_naming: NamingStrategy,
    /// Log a warning when an association shadows an attribute with the same key
    pub warn_on_collision: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            model_naming: NamingStrategy::Camel,
            warn_on_collision: true,
        }
    }
}

impl RegistryConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model naming strategy
    pub fn with_model_naming(mut self, strategy: NamingStrategy) -> Self {
        self.model_naming = strategy;
        self
    }

    /// Enable or disable collision warnings
    pub fn with_warn_on_collision(mut self, warn: bool) -> Self {
        self.warn_on_collision = warn;
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(naming) = lookup(MODEL_NAMING_ENV) {
            config.model_naming = naming.parse()?;
        }

        if let Some(warn) = lookup(WARN_ON_COLLISION_ENV) {
            config.warn_on_collision = parse_bool(&warn).ok_or_else(|| {
                ConfigError::invalid_value("warn_on_collision", warn.clone(), "true or false")
            })?;
        }

        Ok(config)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();
        assert_eq!(config.model_naming, NamingStrategy::Camel);
        assert!(config.warn_on_collision);
    }

    #[test]
    fn test_from_lookup_without_overrides() {
        let config = RegistryConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, RegistryConfig::default());
    }

    #[test]
    fn test_from_lookup_invalid_naming() {
        let result = RegistryConfig::from_lookup(|key| {
            (key == MODEL_NAMING_ENV).then(|| "shouty".to_string())
        });
        assert_eq!(
            result,
            Err(ConfigError::invalid_value(
                "model_naming",
                "shouty",
                "camel, snake, pascal, kebab, or preserve"
            ))
        );
    }

    #[test]
    fn test_naming_strategy_parsing() {
        assert_eq!("snake".parse::<NamingStrategy>(), Ok(NamingStrategy::Snake));
        assert_eq!("Kebab-Case".parse::<NamingStrategy>(), Ok(NamingStrategy::Kebab));
        assert_eq!(" camel ".parse::<NamingStrategy>(), Ok(NamingStrategy::Camel));
        assert!("shouty".parse::<NamingStrategy>().is_err());
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            (MODEL_NAMING_ENV, "snake"),
            (WARN_ON_COLLISION_ENV, "off"),
        ]
        .into_iter()
        .collect();

        let config =
            RegistryConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.model_naming, NamingStrategy::Snake);
        assert!(!config.warn_on_collision);
    }

    #[test]
    fn test_from_lookup_invalid_bool() {
        let result = RegistryConfig::from_lookup(|key| {
            (key == WARN_ON_COLLISION_ENV).then(|| "maybe".to_string())
        });

        match result {
            Err(ConfigError::InvalidValue { field, value, .. }) => {
                assert_eq!(field, "warn_on_collision");
                assert_eq!(value, "maybe");
            }
            other => panic!("expected invalid value error, got {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_from_env() {
        env::set_var(MODEL_NAMING_ENV, "pascal");
        env::remove_var(WARN_ON_COLLISION_ENV);

        let config = RegistryConfig::from_env().unwrap();
        assert_eq!(config.model_naming, NamingStrategy::Pascal);
        assert!(config.warn_on_collision);

        env::remove_var(MODEL_NAMING_ENV);
    }

    #[test]
    fn test_config_deserialization() {
        let config: RegistryConfig = serde_json::from_str(r#"{"model_naming":"kebab"}"#).unwrap();
        assert_eq!(config.model_naming, NamingStrategy::Kebab);
        assert!(config.warn_on_collision);
    }
}
