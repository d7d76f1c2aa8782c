//! Shared fixtures for unit tests: canned models, persisted entities, and a
//! resolver that recomputes embedded positions from a live root aggregate.

use crate::{
    entity::{Entity, EntityRef},
    error::MutationError,
    model::{EntityModel, FieldKind, FieldModel, ModelBuilder},
    position::{AtomicLocation, Position, PositionResolver},
    store::{MemoryStore, Selector},
    types::Id,
    value::Value,
};
use std::sync::Arc;

pub(crate) fn person_model() -> Arc<EntityModel> {
    ModelBuilder::new("Person")
        .field("name", FieldKind::Text)
        .field("age", FieldKind::Int)
        .field("scores", FieldKind::List(Box::new(FieldKind::Float)))
        .field("updated_at", FieldKind::Timestamp)
        .field_model(FieldModel::new("nickname", Some(FieldKind::Text)).stored_as("nick"))
        .untyped_field("extra")
        .build()
}

pub(crate) fn persisted(model: &Arc<EntityModel>, id: u128) -> EntityRef {
    let mut entity = Entity::new(Id::from_u128(id), Arc::clone(model));
    entity.mark_persisted();
    entity.into_ref()
}

/// Seed the store with the root's current attribute document.
pub(crate) fn seed_store(store: &MemoryStore, root: &EntityRef) {
    let root = root.borrow();
    store.put(root.id(), root.attributes().clone());
}

/// Embed `child` as a sub-document inside a list field on `root`, both in
/// the root entity's attributes and (via `seed_store`) in the store.
pub(crate) fn embed_child(root: &EntityRef, list_field: &str, child: &EntityRef) {
    let child_doc = {
        let child = child.borrow();
        let mut doc = child.attributes().clone();
        doc.insert("_id", Value::Id(child.id()));
        doc
    };

    let mut root = root.borrow_mut();
    let items = match root.attributes().get(list_field) {
        Some(Value::List(items)) => {
            let mut items = items.clone();
            items.push(Value::Document(child_doc));
            items
        }
        _ => vec![Value::Document(child_doc)],
    };
    root.load_attribute(list_field, Value::List(items));
}

///
/// TreeResolver
///
/// Resolves a child entity's position by scanning the root's live list field
/// for the sub-document carrying the child's id. No caching: the index is
/// recomputed on every call, so structural moves are always observed.
///

pub(crate) struct TreeResolver {
    pub(crate) root: EntityRef,
    pub(crate) list_field: String,
}

impl PositionResolver for TreeResolver {
    fn resolve(&self, entity: &Entity) -> Result<AtomicLocation, MutationError> {
        let root = self.root.borrow();

        if root.id() == entity.id() {
            return Ok(AtomicLocation {
                position: Position::root(),
                selector: Selector::by_id(root.id()),
            });
        }

        let items = root
            .attributes()
            .get(&self.list_field)
            .and_then(Value::as_list)
            .ok_or_else(|| MutationError::unresolvable("embedding list is absent"))?;

        let index = items
            .iter()
            .position(|item| {
                item.as_document()
                    .and_then(|doc| doc.get("_id"))
                    .and_then(Value::as_id)
                    == Some(entity.id())
            })
            .ok_or_else(|| MutationError::unresolvable("entity is not embedded in the root"))?;

        Ok(AtomicLocation {
            position: Position::new(format!("{}.{index}", self.list_field)),
            selector: Selector::by_id(root.id()),
        })
    }
}

/// Root aggregate entity used by embedding tests.
pub(crate) fn root_with_items(model: &Arc<EntityModel>, id: u128) -> EntityRef {
    let root = persisted(model, id);
    root.borrow_mut()
        .load_attribute("items", Value::List(Vec::new()));
    root
}
