//! Declaration Store - merge-only storage of model declarations
//!
//! Declarations are keyed by model type, then by kind (model options,
//! attribute, association, validation) and property key. Options merge field
//! by field; validations append. Nothing is ever removed except by
//! [`DeclarationStore::clear`].

use std::sync::Arc;

use dashmap::DashMap;
use indexmap::IndexMap;

use crate::model_type::ModelType;
use crate::options::{merge_entry, AssociationOptions, AttributeOptions, Merge, ModelOptions};
use crate::validation::ValidationEntry;

/// Everything declared for one model type
#[derive(Debug, Clone, Default)]
pub struct ModelDeclarations {
    /// Model-level options, `None` until declared
    pub options: Option<ModelOptions>,
    /// Attribute options by key, in first-declaration order
    pub attributes: IndexMap<String, AttributeOptions>,
    /// Association options by key, in first-declaration order
    pub associations: IndexMap<String, AssociationOptions>,
    /// Validation entries by attribute key, in declaration order
    pub validations: IndexMap<String, Vec<ValidationEntry>>,
    /// Type whose declarations this one inherits
    pub parent: Option<ModelType>,
}

/// Thread-safe store for model declarations
#[derive(Debug, Clone, Default)]
pub struct DeclarationStore {
    models: Arc<DashMap<ModelType, ModelDeclarations>>,
}

impl DeclarationStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge model-level options for `model`
    pub fn define_model_options(&self, model: ModelType, patch: ModelOptions) {
        tracing::debug!("Declaring model options for '{}'", model);
        let mut declarations = self.models.entry(model).or_default();
        declarations.options.get_or_insert_with(ModelOptions::default).merge(patch);
    }

    /// Merge options for the attribute `key` of `model`
    pub fn define_attribute(
        &self,
        model: ModelType,
        key: impl Into<String>,
        patch: AttributeOptions,
    ) {
        let key = key.into();
        tracing::debug!("Declaring attribute '{}' on model '{}'", key, model);
        let mut declarations = self.models.entry(model).or_default();
        merge_entry(&mut declarations.attributes, key, patch);
    }

    /// Merge options for the association `key` of `model`
    pub fn define_association(
        &self,
        model: ModelType,
        key: impl Into<String>,
        patch: AssociationOptions,
    ) {
        let key = key.into();
        tracing::debug!("Declaring association '{}' on model '{}'", key, model);
        let mut declarations = self.models.entry(model).or_default();
        merge_entry(&mut declarations.associations, key, patch);
    }

    /// Append a validation entry for the attribute `key` of `model`
    pub fn define_attribute_validation(
        &self,
        model: ModelType,
        key: impl Into<String>,
        entry: ValidationEntry,
    ) {
        let key = key.into();
        tracing::debug!(
            "Declaring validation '{}' for attribute '{}' on model '{}'",
            entry.rule_name(),
            key,
            model
        );
        let mut declarations = self.models.entry(model).or_default();
        declarations.validations.entry(key).or_default().push(entry);
    }

    /// Record that `child` inherits the declarations of `parent`
    pub fn define_parent(&self, child: ModelType, parent: ModelType) {
        if child == parent {
            tracing::warn!("Ignoring model '{}' declared as its own parent", child);
            return;
        }
        tracing::debug!("Declaring model '{}' as extending '{}'", child, parent);
        self.models.entry(child).or_default().parent = Some(parent);
    }

    /// Check whether model-level options were declared for `model`
    pub fn has_model_options(&self, model: ModelType) -> bool {
        self.models
            .get(&model)
            .map(|declarations| declarations.options.is_some())
            .unwrap_or(false)
    }

    /// Merged model options, if any were declared
    pub fn model_options(&self, model: ModelType) -> Option<ModelOptions> {
        self.models.get(&model)?.options.clone()
    }

    /// All attribute options declared directly on `model`
    pub fn attributes(&self, model: ModelType) -> IndexMap<String, AttributeOptions> {
        self.models
            .get(&model)
            .map(|declarations| declarations.attributes.clone())
            .unwrap_or_default()
    }

    /// All association options declared directly on `model`
    pub fn associations(&self, model: ModelType) -> IndexMap<String, AssociationOptions> {
        self.models
            .get(&model)
            .map(|declarations| declarations.associations.clone())
            .unwrap_or_default()
    }

    pub fn attribute_options(&self, model: ModelType, key: &str) -> Option<AttributeOptions> {
        self.models.get(&model)?.attributes.get(key).cloned()
    }

    pub fn association_options(&self, model: ModelType, key: &str) -> Option<AssociationOptions> {
        self.models.get(&model)?.associations.get(key).cloned()
    }

    /// Validation entries declared directly on `model` for `key`
    pub fn validations(&self, model: ModelType, key: &str) -> Vec<ValidationEntry> {
        self.models
            .get(&model)
            .and_then(|declarations| declarations.validations.get(key).cloned())
            .unwrap_or_default()
    }

    pub fn parent_of(&self, model: ModelType) -> Option<ModelType> {
        self.models.get(&model)?.parent
    }

    /// Copy of everything declared directly on `model`
    pub fn snapshot(&self, model: ModelType) -> Option<ModelDeclarations> {
        self.models.get(&model).map(|declarations| declarations.clone())
    }

    /// Types that received any declaration
    pub fn declared_types(&self) -> Vec<ModelType> {
        self.models.iter().map(|entry| *entry.key()).collect()
    }

    /// Types with model-level options
    pub fn declared_models(&self) -> Vec<ModelType> {
        self.models
            .iter()
            .filter(|entry| entry.value().options.is_some())
            .map(|entry| *entry.key())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Drop every declaration
    pub fn clear(&self) {
        self.models.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{AssociationType, AttributeType};
    use serde_json::json;

    struct User;
    struct Post;

    fn user() -> ModelType {
        ModelType::of::<User>()
    }

    #[test]
    fn test_model_options_merge() {
        let store = DeclarationStore::new();
        assert!(!store.has_model_options(user()));

        store.define_model_options(user(), ModelOptions::new().with("a", 1));
        store.define_model_options(user(), ModelOptions::new().with("b", 2));
        store.define_model_options(user(), ModelOptions::new().with("a", 3));

        let options = store.model_options(user()).unwrap();
        assert_eq!(options.extra.get("a"), Some(&json!(3)));
        assert_eq!(options.extra.get("b"), Some(&json!(2)));
        assert!(store.has_model_options(user()));
    }

    #[test]
    fn test_empty_model_options_still_count() {
        let store = DeclarationStore::new();
        store.define_model_options(user(), ModelOptions::new());
        assert!(store.has_model_options(user()));
        assert_eq!(store.declared_models(), vec![user()]);
    }

    #[test]
    fn test_attribute_declarations_compose() {
        let store = DeclarationStore::new();
        store.define_attribute(user(), "email", AttributeOptions::typed(AttributeType::String));
        store.define_attribute(user(), "email", AttributeOptions::new().unique(true));
        store.define_attribute(user(), "email", AttributeOptions::new().default_value("none"));

        let options = store.attribute_options(user(), "email").unwrap();
        assert_eq!(options.ty, Some(AttributeType::String));
        assert!(options.is_unique());
        assert_eq!(options.default_value, Some(json!("none")));
    }

    #[test]
    fn test_attribute_declaration_does_not_declare_model() {
        let store = DeclarationStore::new();
        store.define_attribute(user(), "email", AttributeOptions::typed(AttributeType::String));

        assert!(!store.has_model_options(user()));
        assert_eq!(store.declared_types(), vec![user()]);
        assert!(store.declared_models().is_empty());
    }

    #[test]
    fn test_association_declarations_compose() {
        let store = DeclarationStore::new();
        let has_many = || AssociationOptions::new(AssociationType::HasMany);
        store.define_association(user(), "posts", has_many());
        store.define_association(user(), "posts", has_many().target(ModelType::of::<Post>()));
        store.define_association(user(), "posts", has_many().with("foreignKey", "user_id"));

        let options = store.association_options(user(), "posts").unwrap();
        assert_eq!(options.ty, AssociationType::HasMany);
        assert_eq!(options.target.unwrap().resolve(), ModelType::of::<Post>());
        assert_eq!(options.extra.get("foreignKey"), Some(&json!("user_id")));
    }

    #[test]
    fn test_validations_append_in_order() {
        let store = DeclarationStore::new();
        let pass = |rule: &str| ValidationEntry::from_fn(rule, |_, _, _| Ok(()));

        store.define_attribute_validation(user(), "email", pass("v1"));
        store.define_attribute_validation(user(), "email", pass("v2"));
        store.define_attribute_validation(user(), "email", pass("v1"));

        let rules: Vec<String> = store
            .validations(user(), "email")
            .iter()
            .map(|entry| entry.rule_name().to_string())
            .collect();
        assert_eq!(rules, vec!["v1", "v2", "v1"]);
        assert!(store.validations(user(), "name").is_empty());
    }

    #[test]
    fn test_untouched_type_reads_empty() {
        let store = DeclarationStore::new();
        assert!(store.model_options(user()).is_none());
        assert!(store.attributes(user()).is_empty());
        assert!(store.associations(user()).is_empty());
        assert!(store.validations(user(), "email").is_empty());
        assert!(store.snapshot(user()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_parent_declaration() {
        let store = DeclarationStore::new();
        store.define_parent(ModelType::of::<Post>(), user());
        store.define_parent(user(), user());

        assert_eq!(store.parent_of(ModelType::of::<Post>()), Some(user()));
        assert_eq!(store.parent_of(user()), None);
    }

    #[test]
    fn test_clear() {
        let store = DeclarationStore::new();
        store.define_model_options(user(), ModelOptions::new());
        store.clear();
        assert!(!store.has_model_options(user()));
        assert!(store.is_empty());
    }
}
