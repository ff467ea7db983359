//! Resolved model properties
//!
//! A model exposes two kinds of properties: attributes (typed scalar fields)
//! and associations (links to other models). Both are addressed by name, and
//! the string form of a property is always exactly the key it was declared
//! under. Query layers use that string as the column or relation name.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage type of an attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeType {
    String,
    Text,
    Integer,
    Float,
    Decimal,
    Boolean,
    Date,
    DateTime,
    Uuid,
    Json,
    Binary,
    /// Application-defined type, identified by name
    Custom(String),
    /// No declaration supplied a type
    Unspecified,
}

impl AttributeType {
    /// Create a custom attribute type
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Returns true if the attribute holds a number
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float | Self::Decimal)
    }

    /// Returns true if the attribute holds a date or timestamp
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::DateTime)
    }
}

/// Defines the kind of link between two models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssociationType {
    /// One-to-one, foreign key on the target
    HasOne,
    /// One-to-many, foreign key on the target
    HasMany,
    /// Many-to-one, foreign key on this model
    BelongsTo,
    /// Many-to-many through a join table
    BelongsToMany,
}

impl AssociationType {
    /// Returns true if this association yields a collection
    pub fn is_collection(self) -> bool {
        matches!(self, Self::HasMany | Self::BelongsToMany)
    }

    /// Returns true if this model holds the foreign key
    pub fn is_owning(self) -> bool {
        matches!(self, Self::BelongsTo)
    }
}

impl fmt::Display for AssociationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::HasOne => "HAS_ONE",
            Self::HasMany => "HAS_MANY",
            Self::BelongsTo => "BELONGS_TO",
            Self::BelongsToMany => "BELONGS_TO_MANY",
        };
        f.write_str(name)
    }
}

/// Which variant a property is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Attribute,
    Association,
}

/// A named, typed thing that belongs to a model
pub trait ModelProperty: fmt::Display {
    /// Key the property was declared under
    fn name(&self) -> &str;

    /// Attribute or association
    fn kind(&self) -> PropertyKind;

    /// String handle used by query fragments and serializers
    fn as_ref_string(&self) -> String {
        self.name().to_string()
    }
}

/// A typed scalar field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    ty: AttributeType,
    name: String,
}

impl Attribute {
    pub fn new(ty: AttributeType, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
        }
    }

    pub fn ty(&self) -> &AttributeType {
        &self.ty
    }
}

impl ModelProperty for Attribute {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PropertyKind {
        PropertyKind::Attribute
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A link to another model.
///
/// The target is not stored here. It is looked up separately, and only when
/// the caller asks, so that models referencing each other can be declared in
/// any order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Association {
    ty: AssociationType,
    name: String,
}

impl Association {
    pub fn new(ty: AssociationType, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
        }
    }

    pub fn ty(&self) -> AssociationType {
        self.ty
    }
}

impl ModelProperty for Association {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PropertyKind {
        PropertyKind::Association
    }
}

impl fmt::Display for Association {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A resolved property, either variant
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Property {
    Attribute(Attribute),
    Association(Association),
}

impl Property {
    pub fn as_attribute(&self) -> Option<&Attribute> {
        match self {
            Self::Attribute(attribute) => Some(attribute),
            Self::Association(_) => None,
        }
    }

    pub fn as_association(&self) -> Option<&Association> {
        match self {
            Self::Association(association) => Some(association),
            Self::Attribute(_) => None,
        }
    }

    pub fn is_association(&self) -> bool {
        matches!(self, Self::Association(_))
    }
}

impl ModelProperty for Property {
    fn name(&self) -> &str {
        match self {
            Self::Attribute(attribute) => attribute.name(),
            Self::Association(association) => association.name(),
        }
    }

    fn kind(&self) -> PropertyKind {
        match self {
            Self::Attribute(_) => PropertyKind::Attribute,
            Self::Association(_) => PropertyKind::Association,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Attribute> for Property {
    fn from(attribute: Attribute) -> Self {
        Self::Attribute(attribute)
    }
}

impl From<Association> for Property {
    fn from(association: Association) -> Self {
        Self::Association(association)
    }
}
