//! Opaque identity of a model type
//!
//! Declarations are keyed by `ModelType`. The registry never looks inside the
//! type itself; it only needs a stable identity and the identifier used to
//! derive a default model name.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::naming::identifier_of;

/// Identity of a user-defined model type
#[derive(Clone, Copy)]
pub struct ModelType {
    id: TypeId,
    type_name: &'static str,
}

impl ModelType {
    /// Identity of `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// Fully qualified type name, as reported by the compiler
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Declared identifier, without module path or generics
    pub fn identifier(&self) -> &'static str {
        identifier_of(self.type_name)
    }

    /// Check whether this is the identity of `T`
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for ModelType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ModelType {}

impl Hash for ModelType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModelType({})", self.type_name)
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}
