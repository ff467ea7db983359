//! # elif-model-registry: Model metadata for elif.rs
//!
//! Attach attributes, associations and validation rules to model types with
//! explicit registration calls, in any order, and resolve them later into a
//! single descriptor per model.
//!
//! ```
//! use elif_model_registry::{AttributeType, ModelRegistry, ModelType, TargetRef};
//!
//! struct User;
//! struct Post;
//!
//! let registry = ModelRegistry::new();
//! registry
//!     .model::<User>()
//!     .name("users")
//!     .attribute("email", AttributeType::String)
//!     .has_many("posts", TargetRef::deferred(ModelType::of::<Post>));
//!
//! let properties = registry.get_properties(ModelType::of::<User>());
//! assert_eq!(properties["email"].to_string(), "email");
//! assert_eq!(
//!     registry.resolve_target(ModelType::of::<User>(), "posts"),
//!     Some(ModelType::of::<Post>())
//! );
//! ```

pub mod config;
pub mod error;
pub mod model_type;
pub mod naming;
pub mod options;
pub mod property;
pub mod registry;
pub mod resolver;
pub mod store;
pub mod target;
pub mod validation;

// Re-export core types
pub use config::{ConfigError, NamingStrategy, RegistryConfig};
pub use error::{RegistryError, RegistryResult};
pub use model_type::ModelType;
pub use options::{AssociationOptions, AttributeOptions, Merge, ModelOptions, ResolvedModelOptions};
pub use property::{
    Association, AssociationType, Attribute, AttributeType, ModelProperty, Property, PropertyKind,
};
pub use registry::{global_registry, DeclareModel, ModelBuilder, ModelRegistry};
pub use resolver::{ModelDescriptor, Resolver};
pub use store::{DeclarationStore, ModelDeclarations};
pub use target::TargetRef;
pub use validation::{run_validations, AttributeValidator, ValidationEntry, ValidationError};
