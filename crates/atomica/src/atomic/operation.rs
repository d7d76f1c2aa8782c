use crate::{
    atomic::AtomicKind,
    entity::EntityRef,
    error::MutationError,
    obs::sink,
    position::{Position, PositionResolver},
    store::{Modifier, StoreClient},
    value::Value,
};

// Local attribute reconciliation computed before any I/O, applied after the
// store write succeeds. Memory lags the store inside one call, never the
// reverse.
enum LocalEffect {
    Remove(String),
    Write(String, Value),
    Keep,
}

///
/// AtomicOperation
///
/// Builder/executor for one field-level update: normalizes logical field
/// names into store names at construction, computes the modifier document
/// against the entity's current position, submits it against the ROOT
/// aggregate's selector, and reconciles local state afterwards.
///

#[derive(Debug)]
pub struct AtomicOperation {
    entity: EntityRef,
    kind: AtomicKind,
    fields: Vec<String>,
    value: Value,
}

impl AtomicOperation {
    /// Normalize `fields` into an ordered, de-duplicated list of store-native
    /// names. Fails fast on an empty set, and on unresolvable names when the
    /// entity's model is strict.
    pub fn new(
        entity: &EntityRef,
        kind: AtomicKind,
        fields: &[&str],
        value: Value,
    ) -> Result<Self, MutationError> {
        if fields.is_empty() {
            return Err(MutationError::EmptyFieldSet);
        }

        let translated = {
            let entity = entity.borrow();
            let model = entity.model();
            let mut out: Vec<String> = Vec::with_capacity(fields.len());
            for name in fields {
                let store_name = model.store_field_name(name)?;
                if !out.contains(&store_name) {
                    out.push(store_name);
                }
            }
            out
        };

        Ok(Self {
            entity: EntityRef::clone(entity),
            kind,
            fields: translated,
            value,
        })
    }

    /// Convenience constructor for the common single-field case.
    pub fn single(
        entity: &EntityRef,
        kind: AtomicKind,
        field: &str,
        value: Value,
    ) -> Result<Self, MutationError> {
        Self::new(entity, kind, &[field], value)
    }

    #[must_use]
    pub const fn kind(&self) -> AtomicKind {
        self.kind
    }

    /// The single store field name, when exactly one field was given.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self.fields.as_slice() {
            [single] => Some(single),
            _ => None,
        }
    }

    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Build the wire modifier for this operation at `position`.
    pub fn modifier(&self, position: &Position) -> Result<Modifier, MutationError> {
        let entity = self.entity.borrow();
        let model = entity.model();

        let mut modifier = Modifier::new();
        for field in &self.fields {
            let wire_value = match self.kind {
                AtomicKind::Unset => Value::Int(1),
                AtomicKind::Set | AtomicKind::Inc => model.cast(field, self.value.clone())?,
                AtomicKind::Push | AtomicKind::Pull => {
                    model.cast_element(field, self.value.clone())?
                }
            };
            modifier.insert(self.kind, position.field_path(field), wire_value);
        }

        Ok(modifier)
    }

    /// Send the update and clear the change-set markers for the affected
    /// fields. Silent no-op for a not-yet-persisted entity.
    pub fn execute(
        &self,
        store: &dyn StoreClient,
        resolver: &dyn PositionResolver,
    ) -> Result<(), MutationError> {
        {
            let entity = self.entity.borrow();
            if entity.is_new() {
                sink::record(sink::MutationEvent::UpdateSkippedNew);
                return Ok(());
            }

            // fresh position every call; embedded entities move between ops
            let location = resolver.resolve(&entity)?;
            let modifier = self.modifier(&location.position)?;
            store.update(&location.selector, &modifier)?;
        }

        let mut entity = self.entity.borrow_mut();
        if let Some(field) = self.field() {
            entity.changes_mut().remove(field);
        } else {
            entity
                .changes_mut()
                .remove_many(self.fields.iter().map(String::as_str));
        }

        sink::record(sink::MutationEvent::UpdateSent {
            operator: self.kind.operator(),
            fields: self.fields.len(),
        });

        Ok(())
    }

    /// Outward entry point: execute against the store, then apply the
    /// operation's local attribute effect so subsequent in-memory reads match
    /// the stored document. Validation of the local effect happens before any
    /// I/O; application happens only after the store call returns.
    pub fn persist(
        &self,
        store: &dyn StoreClient,
        resolver: &dyn PositionResolver,
    ) -> Result<(), MutationError> {
        if self.entity.borrow().is_new() {
            sink::record(sink::MutationEvent::UpdateSkippedNew);
            return Ok(());
        }

        let plan = self.local_plan()?;
        self.execute(store, resolver)?;

        let mut entity = self.entity.borrow_mut();
        for effect in plan {
            match effect {
                LocalEffect::Remove(field) => {
                    entity.unload_attribute(&field);
                }
                LocalEffect::Write(field, value) => entity.load_attribute(field, value),
                LocalEffect::Keep => {}
            }
        }

        Ok(())
    }

    // Compute the per-field local effect. Fallible so coercion and operand
    // mismatches surface before the store write.
    fn local_plan(&self) -> Result<Vec<LocalEffect>, MutationError> {
        let entity = self.entity.borrow();
        let model = entity.model();

        let mut plan = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let effect = match self.kind {
                AtomicKind::Unset => LocalEffect::Remove(field.clone()),
                AtomicKind::Set => {
                    LocalEffect::Write(field.clone(), model.cast(field, self.value.clone())?)
                }
                AtomicKind::Inc => {
                    let delta = model.cast(field, self.value.clone())?;
                    let base = entity
                        .attributes()
                        .get(field)
                        .cloned()
                        .unwrap_or(Value::Null);
                    let incremented =
                        base.checked_add(&delta)
                            .ok_or_else(|| MutationError::Coercion {
                                field: field.clone(),
                                expected: "numeric",
                                actual: base.type_name(),
                            })?;
                    LocalEffect::Write(field.clone(), incremented)
                }
                AtomicKind::Push => {
                    let element = model.cast_element(field, self.value.clone())?;
                    let appended = match entity.attributes().get(field) {
                        Some(Value::List(items)) => {
                            let mut items = items.clone();
                            items.push(element);
                            items
                        }
                        Some(Value::Null) | None => vec![element],
                        Some(other) => {
                            return Err(MutationError::Coercion {
                                field: field.clone(),
                                expected: "list",
                                actual: other.type_name(),
                            });
                        }
                    };
                    LocalEffect::Write(field.clone(), Value::List(appended))
                }
                AtomicKind::Pull => {
                    let element = model.cast_element(field, self.value.clone())?;
                    match entity.attributes().get(field) {
                        Some(Value::List(items)) => {
                            let retained: Vec<Value> = items
                                .iter()
                                .filter(|item| **item != element)
                                .cloned()
                                .collect();
                            LocalEffect::Write(field.clone(), Value::List(retained))
                        }
                        Some(Value::Null) | None => LocalEffect::Keep,
                        Some(other) => {
                            return Err(MutationError::Coercion {
                                field: field.clone(),
                                expected: "list",
                                actual: other.type_name(),
                            });
                        }
                    }
                }
            };
            plan.push(effect);
        }

        Ok(plan)
    }
}
