//! Association targets and deferred resolution

use std::fmt;
use std::sync::Arc;

use crate::model_type::ModelType;

/// Where an association points.
///
/// `Deferred` holds a function that is only called by [`TargetRef::resolve`],
/// so a model can reference a type whose declarations have not run yet.
#[derive(Clone)]
pub enum TargetRef {
    Direct(ModelType),
    Deferred(Arc<dyn Fn() -> ModelType + Send + Sync>),
}

impl TargetRef {
    /// Direct reference to `T`
    pub fn direct<T: ?Sized + 'static>() -> Self {
        Self::Direct(ModelType::of::<T>())
    }

    /// Direct reference to an existing identity
    pub fn of(model_type: ModelType) -> Self {
        Self::Direct(model_type)
    }

    /// Reference resolved later by calling `resolver`
    pub fn deferred<F>(resolver: F) -> Self
    where
        F: Fn() -> ModelType + Send + Sync + 'static,
    {
        Self::Deferred(Arc::new(resolver))
    }

    /// Produce the target type, invoking the resolver for deferred targets
    pub fn resolve(&self) -> ModelType {
        match self {
            Self::Direct(model_type) => *model_type,
            Self::Deferred(resolver) => resolver(),
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }
}

impl From<ModelType> for TargetRef {
    fn from(model_type: ModelType) -> Self {
        Self::Direct(model_type)
    }
}

impl fmt::Debug for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(model_type) => f.debug_tuple("Direct").field(model_type).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}
