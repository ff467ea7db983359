//! Model Descriptor Resolver - turns accumulated declarations into descriptors
//!
//! Resolution is a pure read of the [`DeclarationStore`]. Declarations
//! inherited from parent models are applied first, so a model's own
//! declarations override them field by field. Association targets are never
//! resolved here; callers do that explicitly through
//! [`Resolver::resolve_target`] or [`ModelDescriptor::resolve_target`].

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};
use crate::model_type::ModelType;
use crate::naming::normalize;
use crate::options::{
    merge_entry, AssociationOptions, AttributeOptions, Merge, ResolvedModelOptions,
};
use crate::property::{Association, Attribute, ModelProperty, Property};
use crate::store::DeclarationStore;
use crate::validation::{run_validations, ValidationEntry, ValidationError};

/// Read-side view over a declaration store
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    store: &'a DeclarationStore,
    config: &'a RegistryConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a DeclarationStore, config: &'a RegistryConfig) -> Self {
        Self { store, config }
    }

    /// `model` and its ancestors, root ancestor first
    pub fn lineage(&self, model: ModelType) -> Vec<ModelType> {
        let mut chain = vec![model];
        let mut current = model;

        while let Some(parent) = self.store.parent_of(current) {
            if chain.contains(&parent) {
                tracing::warn!("Inheritance cycle detected at model '{}'", parent);
                break;
            }
            chain.push(parent);
            current = parent;
        }

        chain.reverse();
        chain
    }

    /// Check whether `model` or one of its ancestors declared model options
    pub fn is_model(&self, model: ModelType) -> bool {
        self.lineage(model)
            .into_iter()
            .any(|ty| self.store.has_model_options(ty))
    }

    /// Merged model options with the name defaulted from the type identifier
    pub fn model_options(&self, model: ModelType) -> ResolvedModelOptions {
        let mut extra = serde_json::Map::new();
        for ty in self.lineage(model) {
            if let Some(options) = self.store.model_options(ty) {
                extra.merge(options.extra);
            }
        }

        let name = self
            .store
            .model_options(model)
            .and_then(|options| options.name)
            .unwrap_or_else(|| normalize(model.identifier(), self.config.model_naming));

        ResolvedModelOptions { name, extra }
    }

    /// Attribute options including inherited declarations
    pub fn attributes(&self, model: ModelType) -> IndexMap<String, AttributeOptions> {
        let mut merged: IndexMap<String, AttributeOptions> = IndexMap::new();
        for ty in self.lineage(model) {
            for (key, options) in self.store.attributes(ty) {
                merge_entry(&mut merged, key, options);
            }
        }
        merged
    }

    /// Association options including inherited declarations
    pub fn associations(&self, model: ModelType) -> IndexMap<String, AssociationOptions> {
        let mut merged: IndexMap<String, AssociationOptions> = IndexMap::new();
        for ty in self.lineage(model) {
            for (key, options) in self.store.associations(ty) {
                merge_entry(&mut merged, key, options);
            }
        }
        merged
    }

    /// Validation entries for `key`, inherited entries first
    pub fn attribute_validations(&self, model: ModelType, key: &str) -> Vec<ValidationEntry> {
        self.lineage(model)
            .into_iter()
            .flat_map(|ty| self.store.validations(ty, key))
            .collect()
    }

    fn all_validations(&self, model: ModelType) -> IndexMap<String, Vec<ValidationEntry>> {
        let mut merged: IndexMap<String, Vec<ValidationEntry>> = IndexMap::new();
        for ty in self.lineage(model) {
            if let Some(declarations) = self.store.snapshot(ty) {
                for (key, entries) in declarations.validations {
                    merged.entry(key).or_default().extend(entries);
                }
            }
        }
        merged
    }

    /// Property map for `model`.
    ///
    /// Attributes are inserted first and associations second, so an
    /// association declared under an attribute's key replaces it.
    pub fn properties(&self, model: ModelType) -> IndexMap<String, Property> {
        build_properties(
            model,
            &self.attributes(model),
            &self.associations(model),
            self.config.warn_on_collision,
        )
    }

    /// Resolve the target of the association `key`, invoking deferred targets
    pub fn resolve_target(&self, model: ModelType, key: &str) -> Option<ModelType> {
        let target = self.associations(model).swap_remove(key)?.target?;
        let resolved = target.resolve();
        tracing::trace!("Resolved target of '{}.{}' to '{}'", model, key, resolved);
        Some(resolved)
    }

    /// Snapshot of everything known about `model`
    pub fn describe(&self, model: ModelType) -> ModelDescriptor {
        let attributes = self.attributes(model);
        let associations = self.associations(model);
        let properties =
            build_properties(model, &attributes, &associations, self.config.warn_on_collision);

        ModelDescriptor {
            model,
            options: self.model_options(model),
            properties,
            attributes,
            associations,
            validations: self.all_validations(model),
        }
    }

    /// Check every association of every declared type.
    ///
    /// Each association must carry a target, and the target must be
    /// a declared model. This forces all deferred targets, so it must only run
    /// once every model has finished declaring itself.
    pub fn verify(&self) -> RegistryResult<()> {
        for model in self.store.declared_types() {
            let model_name = self.model_options(model).name;

            for (key, options) in self.associations(model) {
                let Some(target) = options.target else {
                    return Err(RegistryError::missing_target(model_name, key));
                };

                let target = target.resolve();
                if !self.is_model(target) {
                    tracing::warn!(
                        "Association '{}.{}' targets undeclared model '{}'",
                        model_name,
                        key,
                        target
                    );
                    return Err(RegistryError::unknown_target(
                        model_name,
                        key,
                        target.identifier(),
                    ));
                }
            }
        }

        Ok(())
    }
}

fn build_properties(
    model: ModelType,
    attributes: &IndexMap<String, AttributeOptions>,
    associations: &IndexMap<String, AssociationOptions>,
    warn_on_collision: bool,
) -> IndexMap<String, Property> {
    let mut properties: IndexMap<String, Property> =
        IndexMap::with_capacity(attributes.len() + associations.len());

    for (key, options) in attributes {
        let attribute = Attribute::new(options.resolved_type(), key.clone());
        properties.insert(key.clone(), attribute.into());
    }

    for (key, options) in associations {
        let association = Association::new(options.ty, key.clone());
        let previous = properties.insert(key.clone(), association.into());
        if warn_on_collision && previous.is_some() {
            tracing::warn!(
                "Association '{}' on model '{}' replaces an attribute with the same key",
                key,
                model
            );
        }
    }

    tracing::trace!("Resolved {} properties for model '{}'", properties.len(), model);
    properties
}

/// Immutable snapshot of a model's resolved declarations.
///
/// Later declarations do not show up here; resolve again to observe them.
#[derive(Debug, Clone)]
pub struct ModelDescriptor {
    model: ModelType,
    options: ResolvedModelOptions,
    properties: IndexMap<String, Property>,
    attributes: IndexMap<String, AttributeOptions>,
    associations: IndexMap<String, AssociationOptions>,
    validations: IndexMap<String, Vec<ValidationEntry>>,
}

impl ModelDescriptor {
    pub fn model_type(&self) -> ModelType {
        self.model
    }

    /// Resolved model name
    pub fn name(&self) -> &str {
        &self.options.name
    }

    pub fn options(&self) -> &ResolvedModelOptions {
        &self.options
    }

    pub fn properties(&self) -> &IndexMap<String, Property> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&Property> {
        self.properties.get(key)
    }

    pub fn attribute_options(&self, key: &str) -> Option<&AttributeOptions> {
        self.attributes.get(key)
    }

    pub fn association_options(&self, key: &str) -> Option<&AssociationOptions> {
        self.associations.get(key)
    }

    /// Names of properties that resolved to attributes
    pub fn attribute_names(&self) -> Vec<&str> {
        self.properties
            .values()
            .filter_map(Property::as_attribute)
            .map(|attribute| attribute.name())
            .collect()
    }

    /// Names of properties that resolved to associations
    pub fn association_names(&self) -> Vec<&str> {
        self.properties
            .values()
            .filter_map(Property::as_association)
            .map(|association| association.name())
            .collect()
    }

    /// Attributes flagged as primary
    pub fn primary_keys(&self) -> Vec<&str> {
        self.attribute_names()
            .into_iter()
            .filter(|key| self.attributes.get(*key).is_some_and(AttributeOptions::is_primary))
            .collect()
    }

    pub fn validations(&self, key: &str) -> &[ValidationEntry] {
        self.validations.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Run the validators of `key` in order, stopping at the first failure
    pub fn validate_attribute(&self, key: &str, value: &Value) -> Result<(), ValidationError> {
        run_validations(self.validations(key), key, value)
    }

    /// Resolve the target of the association `key`, invoking deferred targets
    pub fn resolve_target(&self, key: &str) -> Option<ModelType> {
        self.associations
            .get(key)?
            .target
            .as_ref()
            .map(|target| target.resolve())
    }
}
