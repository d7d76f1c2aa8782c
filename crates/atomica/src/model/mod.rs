mod field;


pub use field::{FieldKind, FieldModel};

use crate::{
    error::MutationError,
    value::{Value, coercion::cast_value},
};
use std::sync::Arc;

///
/// EntityModel
///
/// Immutable per-class schema: field definitions with store-name aliases and
/// declared kinds, strict-mode policy, and the ordered touch-on-change
/// relation table. Built once at model-definition time through
/// `ModelBuilder` and shared behind an `Arc`; never mutated afterwards.
///

#[derive(Debug)]
pub struct EntityModel {
    name: String,
    strict: bool,
    fields: Vec<FieldModel>,
    touchables: Vec<String>,
}

/// Logical name of the designated timestamp-refresh field.
pub const UPDATED_AT: &str = "updated_at";

impl EntityModel {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Strict models reject logical names that do not resolve to a declared
    /// field; permissive models pass them through as literal store names.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict
    }

    #[must_use]
    pub fn field(&self, logical: &str) -> Option<&FieldModel> {
        self.fields.iter().find(|f| f.name == logical)
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldModel] {
        &self.fields
    }

    /// Ordered touch-on-change relation names for this class.
    #[must_use]
    pub fn touchables(&self) -> &[String] {
        &self.touchables
    }

    #[must_use]
    pub fn declares_updated_at(&self) -> bool {
        self.field(UPDATED_AT).is_some()
    }

    /// Translate a logical field name into its store-native name.
    ///
    /// Deterministic and side-effect-free. Unresolvable names fail in strict
    /// mode and pass through as literals otherwise.
    pub fn store_field_name(&self, logical: &str) -> Result<String, MutationError> {
        match self.field(logical) {
            Some(field) => Ok(field.store_name.clone()),
            None if self.strict => Err(MutationError::unknown_field(logical)),
            None => Ok(logical.to_string()),
        }
    }

    /// Cast `value` against the declared kind of the field stored under
    /// `store_name`. Untyped and undeclared fields pass through unchanged.
    pub fn cast(&self, store_name: &str, value: Value) -> Result<Value, MutationError> {
        let declared = self
            .fields
            .iter()
            .find(|f| f.store_name == store_name)
            .and_then(|f| f.kind.as_ref());

        match declared {
            Some(kind) => cast_value(store_name, kind, value),
            None => Ok(value),
        }
    }

    /// As `cast`, but against a list field's element kind (push/pull values
    /// are single elements).
    pub fn cast_element(&self, store_name: &str, value: Value) -> Result<Value, MutationError> {
        let declared = self
            .fields
            .iter()
            .find(|f| f.store_name == store_name)
            .and_then(|f| f.kind.as_ref());

        match declared {
            Some(kind) => cast_value(store_name, kind.element(), value),
            None => Ok(value),
        }
    }
}

///
/// ModelBuilder
///
/// Definition-time builder for `EntityModel`. Touchable registration is
/// append-only and de-duplicated: registering the same relation name twice
/// yields one cascade visit.
///

#[derive(Debug)]
pub struct ModelBuilder {
    name: String,
    strict: bool,
    fields: Vec<FieldModel>,
    touchables: Vec<String>,
}

impl ModelBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            strict: false,
            fields: Vec::new(),
            touchables: Vec::new(),
        }
    }

    #[must_use]
    pub const fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Declare a typed field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldModel::new(name, Some(kind)));
        self
    }

    /// Declare an untyped pass-through field.
    #[must_use]
    pub fn untyped_field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldModel::new(name, None));
        self
    }

    /// Declare a field with full control over aliasing and kind.
    #[must_use]
    pub fn field_model(mut self, field: FieldModel) -> Self {
        self.fields.push(field);
        self
    }

    /// Register a relation as touch-on-change.
    #[must_use]
    pub fn touchable(mut self, relation: impl Into<String>) -> Self {
        let relation = relation.into();
        if !self.touchables.contains(&relation) {
            self.touchables.push(relation);
        }
        self
    }

    #[must_use]
    pub fn build(self) -> Arc<EntityModel> {
        Arc::new(EntityModel {
            name: self.name,
            strict: self.strict,
            fields: self.fields,
            touchables: self.touchables,
        })
    }
}
