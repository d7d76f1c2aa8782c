use crate::{changes::ChangeSet, document::Document, model::EntityModel, types::Id, value::Value};
use serde::Serialize;
use std::{cell::RefCell, rc::Rc, sync::Arc};

/// Shared entity handle. Entities are plain in-memory objects with no
/// internal locking; one thread owns an entity at a time.
pub type EntityRef = Rc<RefCell<Entity>>;

///
/// PersistenceState
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum PersistenceState {
    /// Constructed but never saved; atomic operations are silent no-ops.
    New,
    /// Present in the store; atomic operations and touches apply.
    Persisted,
}

///
/// Relation
///
/// Outbound link to another entity. `target == None` means the relation has
/// not been loaded; the touch cascade never materializes it.
///

#[derive(Clone, Debug)]
pub struct Relation {
    name: String,
    touch: bool,
    target: Option<EntityRef>,
}

impl Relation {
    #[must_use]
    pub fn loaded(name: impl Into<String>, touch: bool, target: EntityRef) -> Self {
        Self {
            name: name.into(),
            touch,
            target: Some(target),
        }
    }

    #[must_use]
    pub fn unloaded(name: impl Into<String>, touch: bool) -> Self {
        Self {
            name: name.into(),
            touch,
            target: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn is_touchable(&self) -> bool {
        self.touch
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.target.is_some()
    }

    #[must_use]
    pub const fn target(&self) -> Option<&EntityRef> {
        self.target.as_ref()
    }
}

///
/// Entity
///
/// Runtime mapped object: identity, schemaless attributes keyed by
/// store-native field names, dirty-change record, persistence state, and
/// outbound relation links.
///

#[derive(Debug)]
pub struct Entity {
    id: Id,
    model: Arc<EntityModel>,
    attributes: Document,
    changes: ChangeSet,
    state: PersistenceState,
    relations: Vec<Relation>,
}

impl Entity {
    #[must_use]
    pub fn new(id: Id, model: Arc<EntityModel>) -> Self {
        Self {
            id,
            model,
            attributes: Document::new(),
            changes: ChangeSet::new(),
            state: PersistenceState::New,
            relations: Vec::new(),
        }
    }

    #[must_use]
    pub fn into_ref(self) -> EntityRef {
        Rc::new(RefCell::new(self))
    }

    #[must_use]
    pub const fn id(&self) -> Id {
        self.id
    }

    #[must_use]
    pub fn model(&self) -> &Arc<EntityModel> {
        &self.model
    }

    #[must_use]
    pub const fn state(&self) -> PersistenceState {
        self.state
    }

    #[must_use]
    pub const fn is_new(&self) -> bool {
        matches!(self.state, PersistenceState::New)
    }

    /// Transition to `Persisted` after the first full save.
    pub const fn mark_persisted(&mut self) {
        self.state = PersistenceState::Persisted;
    }

    #[must_use]
    pub const fn attributes(&self) -> &Document {
        &self.attributes
    }

    /// Write an attribute with dirty tracking. `field` is the store-native
    /// name; the old value is recorded in the change set.
    pub fn write_attribute(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let old = self.attributes.get(&field).cloned().unwrap_or(Value::Null);
        self.changes.record(field.clone(), old);
        self.attributes.insert(field, value);
    }

    /// Write an attribute without touching the change set. Used for
    /// hydration and for reconciling state the store already holds.
    pub fn load_attribute(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(field, value);
    }

    /// Drop an attribute without touching the change set.
    pub fn unload_attribute(&mut self, field: &str) -> Option<Value> {
        self.attributes.remove(field)
    }

    #[must_use]
    pub const fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    pub const fn changes_mut(&mut self) -> &mut ChangeSet {
        &mut self.changes
    }

    #[must_use]
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    #[must_use]
    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.name() == name)
    }

    pub fn add_relation(&mut self, relation: Relation) {
        self.relations.push(relation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelBuilder;

    #[test]
    fn write_attribute_records_the_old_value_once() {
        let model = ModelBuilder::new("Person").build();
        let mut entity = Entity::new(Id::from_u128(1), model);
        entity.load_attribute("name", Value::from("a"));

        entity.write_attribute("name", Value::from("b"));
        entity.write_attribute("name", Value::from("c"));

        assert_eq!(entity.attributes().get("name"), Some(&Value::from("c")));
        assert_eq!(entity.changes().old_value("name"), Some(&Value::from("a")));
    }

    #[test]
    fn load_attribute_does_not_dirty_the_change_set() {
        let model = ModelBuilder::new("Person").build();
        let mut entity = Entity::new(Id::from_u128(1), model);
        entity.load_attribute("name", Value::from("a"));

        assert!(entity.changes().is_empty());
    }

    #[test]
    fn relation_loading_state_is_observable() {
        let model = ModelBuilder::new("Person").build();
        let target = Entity::new(Id::from_u128(2), model).into_ref();

        let loaded = Relation::loaded("post", true, target);
        let unloaded = Relation::unloaded("author", false);

        assert!(loaded.is_loaded());
        assert!(loaded.is_touchable());
        assert!(!unloaded.is_loaded());
        assert!(!unloaded.is_touchable());
    }

    #[test]
    fn entities_start_new_and_become_persisted() {
        let model = ModelBuilder::new("Person").build();
        let mut entity = Entity::new(Id::from_u128(1), model);

        assert!(entity.is_new());
        entity.mark_persisted();
        assert_eq!(entity.state(), PersistenceState::Persisted);
    }
}
