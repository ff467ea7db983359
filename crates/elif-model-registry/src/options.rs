//! Partial option records and their merge rules
//!
//! Every declaration contributes a partial record. Records for the same key
//! are merged field by field: fields present in the newer record win, fields
//! it leaves out keep their earlier value. Open extension fields are JSON and
//! merge recursively, object by object.

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::property::{AssociationType, AttributeType};
use crate::target::TargetRef;

/// Field-wise merge of a partial record into an accumulated one
pub trait Merge {
    fn merge(&mut self, patch: Self);
}

impl<T> Merge for Option<T> {
    fn merge(&mut self, patch: Self) {
        if patch.is_some() {
            *self = patch;
        }
    }
}

impl Merge for Map<String, Value> {
    fn merge(&mut self, patch: Self) {
        for (key, value) in patch {
            match self.get_mut(&key) {
                Some(existing) => merge_json(existing, value),
                None => {
                    self.insert(key, value);
                }
            }
        }
    }
}

/// Merge `patch` into the record stored under `key`, or store it as the first one
pub fn merge_entry<V: Merge>(records: &mut IndexMap<String, V>, key: String, patch: V) {
    match records.entry(key) {
        Entry::Occupied(mut entry) => entry.get_mut().merge(patch),
        Entry::Vacant(entry) => {
            entry.insert(patch);
        }
    }
}

/// Deep merge `patch` into `target`. Objects merge key by key; anything else,
/// `null` included, replaces.
pub fn merge_json(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => target.merge(patch),
        (target, patch) => *target = patch,
    }
}

/// Model-level options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModelOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set an extension field
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl Merge for ModelOptions {
    fn merge(&mut self, patch: Self) {
        self.name.merge(patch.name);
        self.extra.merge(patch.extra);
    }
}

/// Model options after resolution; the name is always present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedModelOptions {
    pub name: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResolvedModelOptions {
    /// Look up an extension field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Options for a single attribute
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeOptions {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<AttributeType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AttributeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options carrying only a type
    pub fn typed(ty: AttributeType) -> Self {
        Self::new().ty(ty)
    }

    pub fn ty(mut self, ty: AttributeType) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = Some(optional);
        self
    }

    pub fn primary(mut self, primary: bool) -> Self {
        self.primary = Some(primary);
        self
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = Some(unique);
        self
    }

    /// Set an extension field
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Declared type, or `Unspecified`
    pub fn resolved_type(&self) -> AttributeType {
        self.ty.clone().unwrap_or(AttributeType::Unspecified)
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only.unwrap_or(false)
    }

    pub fn is_optional(&self) -> bool {
        self.optional.unwrap_or(false)
    }

    pub fn is_primary(&self) -> bool {
        self.primary.unwrap_or(false)
    }

    pub fn is_unique(&self) -> bool {
        self.unique.unwrap_or(false)
    }
}

impl Merge for AttributeOptions {
    fn merge(&mut self, patch: Self) {
        self.ty.merge(patch.ty);
        match (&mut self.default_value, patch.default_value) {
            (Some(existing), Some(value)) => merge_json(existing, value),
            (slot, value) => slot.merge(value),
        }
        self.read_only.merge(patch.read_only);
        self.optional.merge(patch.optional);
        self.primary.merge(patch.primary);
        self.unique.merge(patch.unique);
        self.extra.merge(patch.extra);
    }
}

/// Options for a single association.
///
/// Every declaration names the association type, so a merged record always
/// has one and the key always resolves to an association.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssociationOptions {
    #[serde(rename = "type")]
    pub ty: AssociationType,

    #[serde(skip)]
    pub target: Option<TargetRef>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AssociationOptions {
    pub fn new(ty: AssociationType) -> Self {
        Self {
            ty,
            target: None,
            extra: Map::new(),
        }
    }

    /// Options carrying a type and a target
    pub fn link(ty: AssociationType, target: impl Into<TargetRef>) -> Self {
        Self::new(ty).target(target)
    }

    pub fn target(mut self, target: impl Into<TargetRef>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Set an extension field
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl Merge for AssociationOptions {
    fn merge(&mut self, patch: Self) {
        self.ty = patch.ty;
        self.target.merge(patch.target);
        self.extra.merge(patch.extra);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_type::ModelType;
    use serde_json::json;

    struct Author;

    #[test]
    fn test_merge_adds_fields() {
        let mut options = AttributeOptions::new().with("a", 1);
        options.merge(AttributeOptions::new().with("b", 2));

        assert_eq!(options.extra.get("a"), Some(&json!(1)));
        assert_eq!(options.extra.get("b"), Some(&json!(2)));
    }

    #[test]
    fn test_merge_last_write_wins_per_field() {
        let mut options = AttributeOptions::new().with("a", 1).unique(true);
        options.merge(AttributeOptions::new().with("a", 2));

        assert_eq!(options.extra.get("a"), Some(&json!(2)));
        assert!(options.is_unique());
    }

    #[test]
    fn test_type_survives_partial_merge() {
        let mut options = AttributeOptions::typed(AttributeType::String);
        options.merge(AttributeOptions::new().optional(true));
        options.merge(AttributeOptions::new().default_value("guest"));

        assert_eq!(options.ty, Some(AttributeType::String));
        assert!(options.is_optional());
        assert_eq!(options.default_value, Some(json!("guest")));
    }

    #[test]
    fn test_nested_extension_fields_merge_deeply() {
        let mut options =
            ModelOptions::new().with("table", json!({ "schema": "public", "indexes": ["email"] }));
        options.merge(ModelOptions::new().with("table", json!({ "name": "accounts" })));

        assert_eq!(
            options.extra.get("table"),
            Some(&json!({ "schema": "public", "indexes": ["email"], "name": "accounts" }))
        );
    }

    #[test]
    fn test_null_replaces() {
        let mut value = json!({ "a": { "b": 1 } });
        merge_json(&mut value, json!({ "a": null }));
        assert_eq!(value, json!({ "a": null }));
    }

    #[test]
    fn test_object_default_values_merge() {
        let mut options = AttributeOptions::new().default_value(json!({ "theme": "dark" }));
        options.merge(AttributeOptions::new().default_value(json!({ "lang": "en" })));
        assert_eq!(options.default_value, Some(json!({ "theme": "dark", "lang": "en" })));
    }

    #[test]
    fn test_model_name_override() {
        let mut options = ModelOptions::new().name("users");
        options.merge(ModelOptions::new().with("timestamps", true));
        assert_eq!(options.name.as_deref(), Some("users"));

        options.merge(ModelOptions::new().name("accounts"));
        assert_eq!(options.name.as_deref(), Some("accounts"));
    }

    #[test]
    fn test_association_merge_keeps_target() {
        let mut options =
            AssociationOptions::link(AssociationType::BelongsTo, ModelType::of::<Author>());
        options.merge(
            AssociationOptions::new(AssociationType::BelongsTo).with("foreignKey", "author_id"),
        );

        assert_eq!(options.ty, AssociationType::BelongsTo);
        assert_eq!(
            options.target.map(|t| t.resolve()),
            Some(ModelType::of::<Author>())
        );
        assert_eq!(options.extra.get("foreignKey"), Some(&json!("author_id")));
    }

    #[test]
    fn test_association_type_follows_latest_declaration() {
        let mut options =
            AssociationOptions::link(AssociationType::HasOne, ModelType::of::<Author>());
        options.merge(AssociationOptions::new(AssociationType::HasMany));

        assert_eq!(options.ty, AssociationType::HasMany);
        assert!(options.target.is_some());
    }

    #[test]
    fn test_association_options_require_type() {
        let parsed: Result<AssociationOptions, _> =
            serde_json::from_value(json!({ "foreignKey": "author_id" }));
        assert!(parsed.is_err());

        let value = json!({ "type": "HAS_ONE", "foreignKey": "author_id" });
        let parsed: AssociationOptions = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.ty, AssociationType::HasOne);
        assert_eq!(parsed.extra.get("foreignKey"), Some(&json!("author_id")));
    }

    #[test]
    fn test_attribute_options_serialization() {
        let options = AttributeOptions::typed(AttributeType::Boolean)
            .read_only(true)
            .with("column", "is_active");

        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(value, json!({ "type": "boolean", "readOnly": true, "column": "is_active" }));

        let parsed: AttributeOptions = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, options);
    }
}
