use crate::{
    atomic::AtomicKind,
    document::{Document, PathError},
    store::{Modifier, Selector, StoreClient, StoreError},
    types::Id,
    value::Value,
};
use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
};

///
/// MemoryStore
///
/// In-process reference store: root aggregates keyed by id, modifiers
/// applied at dot paths with the same semantics a real document store gives
/// them. Backs the test suite and small embedded deployments.
///

#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RefCell<BTreeMap<Id, Document>>,
    updates: Cell<u64>,
    fail_next: RefCell<Option<StoreError>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a root aggregate.
    pub fn put(&self, id: Id, doc: Document) {
        self.docs.borrow_mut().insert(id, doc);
    }

    #[must_use]
    pub fn get(&self, id: Id) -> Option<Document> {
        self.docs.borrow().get(&id).cloned()
    }

    /// Number of update calls that reached the store.
    #[must_use]
    pub fn update_count(&self) -> u64 {
        self.updates.get()
    }

    /// Arrange for the next update call to fail with `error`.
    pub fn fail_next_update(&self, error: StoreError) {
        *self.fail_next.borrow_mut() = Some(error);
    }

    fn apply(doc: &mut Document, modifier: &Modifier) -> Result<(), StoreError> {
        let invalid = |path: &str, _: PathError| StoreError::InvalidPath {
            path: path.to_string(),
        };

        if let Some(entries) = modifier.entries(AtomicKind::Set) {
            for (path, value) in entries {
                doc.set_path(path, value.clone())
                    .map_err(|e| invalid(path, e))?;
            }
        }

        if let Some(entries) = modifier.entries(AtomicKind::Unset) {
            // the sentinel value is ignored; `$unset` removes whatever is there
            for path in entries.keys() {
                doc.remove_path(path).map_err(|e| invalid(path, e))?;
            }
        }

        if let Some(entries) = modifier.entries(AtomicKind::Inc) {
            for (path, delta) in entries {
                let base = doc.get_path(path).cloned().unwrap_or(Value::Null);
                let incremented =
                    base.checked_add(delta)
                        .ok_or_else(|| StoreError::TypeMismatch {
                            path: path.clone(),
                        })?;
                doc.set_path(path, incremented).map_err(|e| invalid(path, e))?;
            }
        }

        if let Some(entries) = modifier.entries(AtomicKind::Push) {
            for (path, value) in entries {
                let appended = match doc.get_path(path) {
                    Some(Value::List(items)) => {
                        let mut items = items.clone();
                        items.push(value.clone());
                        items
                    }
                    Some(Value::Null) | None => vec![value.clone()],
                    Some(_) => {
                        return Err(StoreError::TypeMismatch { path: path.clone() });
                    }
                };
                doc.set_path(path, Value::List(appended))
                    .map_err(|e| invalid(path, e))?;
            }
        }

        if let Some(entries) = modifier.entries(AtomicKind::Pull) {
            for (path, value) in entries {
                match doc.get_path(path) {
                    Some(Value::List(items)) => {
                        let retained: Vec<Value> =
                            items.iter().filter(|item| *item != value).cloned().collect();
                        doc.set_path(path, Value::List(retained))
                            .map_err(|e| invalid(path, e))?;
                    }
                    // pulling from a missing or null field is a no-op
                    Some(Value::Null) | None => {}
                    Some(_) => {
                        return Err(StoreError::TypeMismatch { path: path.clone() });
                    }
                }
            }
        }

        Ok(())
    }
}

impl StoreClient for MemoryStore {
    fn update(&self, selector: &Selector, modifier: &Modifier) -> Result<(), StoreError> {
        if let Some(error) = self.fail_next.borrow_mut().take() {
            return Err(error);
        }

        let id = selector.id().ok_or_else(|| StoreError::MissingDocument {
            selector: format!("{:?}", selector.document()),
        })?;

        let mut docs = self.docs.borrow_mut();
        let doc = docs.get_mut(&id).ok_or_else(|| StoreError::MissingDocument {
            selector: id.to_string(),
        })?;

        // apply against a scratch copy; one store call commits fully or not
        // at all
        let mut scratch = doc.clone();
        Self::apply(&mut scratch, modifier)?;
        *doc = scratch;
        self.updates.set(self.updates.get() + 1);

        Ok(())
    }
}
