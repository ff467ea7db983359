//! Model Registry - registration and read surface for model metadata
//!
//! Production code is expected to populate the registry once during startup
//! and treat it as read-only afterwards. The store is thread-safe, so reads
//! that race with late declarations are sound, but a descriptor only reflects
//! the declarations made before it was resolved.

use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::RegistryConfig;
use crate::error::RegistryResult;
use crate::model_type::ModelType;
use crate::options::{AssociationOptions, AttributeOptions, ModelOptions, ResolvedModelOptions};
use crate::property::{AssociationType, AttributeType, Property};
use crate::resolver::{ModelDescriptor, Resolver};
use crate::store::DeclarationStore;
use crate::target::TargetRef;
use crate::validation::ValidationEntry;

/// Types that know how to declare their own metadata
pub trait DeclareModel: 'static {
    fn declare(registry: &ModelRegistry);
}

/// Registry of model declarations
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    store: DeclarationStore,
    config: Arc<RegistryConfig>,
}

impl ModelRegistry {
    /// Create a new empty registry with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty registry
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            store: DeclarationStore::new(),
            config: Arc::new(config),
        }
    }

    /// Create a registry configured from the environment
    pub fn from_env() -> RegistryResult<Self> {
        Ok(Self::with_config(RegistryConfig::from_env()?))
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn store(&self) -> &DeclarationStore {
        &self.store
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.store, &self.config)
    }

    /// Drop every declaration
    pub fn reset(&self) {
        tracing::debug!("Resetting model registry");
        self.store.clear();
    }

    pub fn define_model_options(&self, model: ModelType, options: ModelOptions) {
        self.store.define_model_options(model, options);
    }

    pub fn define_attribute(
        &self,
        model: ModelType,
        key: impl Into<String>,
        options: AttributeOptions,
    ) {
        self.store.define_attribute(model, key, options);
    }

    pub fn define_association(
        &self,
        model: ModelType,
        key: impl Into<String>,
        options: AssociationOptions,
    ) {
        self.store.define_association(model, key, options);
    }

    pub fn define_attribute_validation(
        &self,
        model: ModelType,
        key: impl Into<String>,
        entry: ValidationEntry,
    ) {
        self.store.define_attribute_validation(model, key, entry);
    }

    /// Make `child` inherit the declarations of `parent`
    pub fn define_parent(&self, child: ModelType, parent: ModelType) {
        self.store.define_parent(child, parent);
    }

    /// Check whether model options were declared for `model` itself
    pub fn has_model_options(&self, model: ModelType) -> bool {
        self.store.has_model_options(model)
    }

    /// Check whether `model` or an ancestor was declared as a model
    pub fn is_model(&self, model: ModelType) -> bool {
        self.resolver().is_model(model)
    }

    pub fn get_model_options(&self, model: ModelType) -> ResolvedModelOptions {
        self.resolver().model_options(model)
    }

    pub fn get_properties(&self, model: ModelType) -> IndexMap<String, Property> {
        self.resolver().properties(model)
    }

    pub fn get_attribute_options(&self, model: ModelType, key: &str) -> Option<AttributeOptions> {
        self.resolver().attributes(model).swap_remove(key)
    }

    pub fn get_association_options(
        &self,
        model: ModelType,
        key: &str,
    ) -> Option<AssociationOptions> {
        self.resolver().associations(model).swap_remove(key)
    }

    pub fn get_attribute_validations(&self, model: ModelType, key: &str) -> Vec<ValidationEntry> {
        self.resolver().attribute_validations(model, key)
    }

    /// Resolve the target of an association, invoking deferred targets
    pub fn resolve_target(&self, model: ModelType, key: &str) -> Option<ModelType> {
        self.resolver().resolve_target(model, key)
    }

    /// Snapshot of everything declared for `model`
    pub fn describe(&self, model: ModelType) -> ModelDescriptor {
        self.resolver().describe(model)
    }

    /// Check that every association points at a declared model
    pub fn verify(&self) -> RegistryResult<()> {
        self.resolver().verify()
    }

    /// Start declaring metadata for `T`
    pub fn model<T: ?Sized + 'static>(&self) -> ModelBuilder<'_> {
        ModelBuilder {
            registry: self,
            model: ModelType::of::<T>(),
        }
    }

    /// Declare `T` as a model and run its own declarations
    pub fn register<T: DeclareModel>(&self) -> ModelType {
        let model = ModelType::of::<T>();
        self.define_model_options(model, ModelOptions::new());
        T::declare(self);
        model
    }
}

/// Chained declarations for one model type; every call is recorded immediately
#[derive(Debug, Clone, Copy)]
pub struct ModelBuilder<'r> {
    registry: &'r ModelRegistry,
    model: ModelType,
}

impl<'r> ModelBuilder<'r> {
    pub fn model_type(&self) -> ModelType {
        self.model
    }

    pub fn options(self, options: ModelOptions) -> Self {
        self.registry.define_model_options(self.model, options);
        self
    }

    pub fn name(self, name: impl Into<String>) -> Self {
        self.options(ModelOptions::new().name(name))
    }

    pub fn option(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options(ModelOptions::new().with(key, value))
    }

    pub fn attribute(self, key: impl Into<String>, ty: AttributeType) -> Self {
        self.attribute_with(key, AttributeOptions::typed(ty))
    }

    pub fn attribute_with(self, key: impl Into<String>, options: AttributeOptions) -> Self {
        self.registry.define_attribute(self.model, key, options);
        self
    }

    pub fn association(self, key: impl Into<String>, options: AssociationOptions) -> Self {
        self.registry.define_association(self.model, key, options);
        self
    }

    pub fn link(
        self,
        key: impl Into<String>,
        ty: AssociationType,
        target: impl Into<TargetRef>,
    ) -> Self {
        self.association(key, AssociationOptions::link(ty, target))
    }

    pub fn has_one(self, key: impl Into<String>, target: impl Into<TargetRef>) -> Self {
        self.link(key, AssociationType::HasOne, target)
    }

    pub fn has_many(self, key: impl Into<String>, target: impl Into<TargetRef>) -> Self {
        self.link(key, AssociationType::HasMany, target)
    }

    pub fn belongs_to(self, key: impl Into<String>, target: impl Into<TargetRef>) -> Self {
        self.link(key, AssociationType::BelongsTo, target)
    }

    pub fn belongs_to_many(self, key: impl Into<String>, target: impl Into<TargetRef>) -> Self {
        self.link(key, AssociationType::BelongsToMany, target)
    }

    pub fn validate(self, key: impl Into<String>, entry: ValidationEntry) -> Self {
        self.registry.define_attribute_validation(self.model, key, entry);
        self
    }

    /// Inherit the declarations of `P`
    pub fn extends<P: ?Sized + 'static>(self) -> Self {
        self.registry.define_parent(self.model, ModelType::of::<P>());
        self
    }
}

/// Global registry instance for the application
static GLOBAL_REGISTRY: OnceLock<ModelRegistry> = OnceLock::new();

/// Get the global model registry, configured from the environment on first use
pub fn global_registry() -> &'static ModelRegistry {
    GLOBAL_REGISTRY.get_or_init(|| {
        ModelRegistry::from_env().unwrap_or_else(|err| {
            tracing::warn!("Falling back to default model registry configuration: {}", err);
            ModelRegistry::new()
        })
    })
}
