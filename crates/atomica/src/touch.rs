use crate::{
    atomic::AtomicKind,
    entity::EntityRef,
    error::MutationError,
    model::UPDATED_AT,
    obs::sink,
    position::PositionResolver,
    store::{Modifier, StoreClient},
    types::{Id, Timestamp},
    value::Value,
};
use std::collections::BTreeSet;

///
/// CascadePolicy
///
/// What happens when touching one touch-on-change relation fails after the
/// root write already succeeded.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CascadePolicy {
    /// Attempt every relation; report `PartialCascade` at the end if any
    /// failed. Nothing is rolled back.
    #[default]
    BestEffort,
    /// Abort on the first failing relation; later relations stay untouched.
    FailFast,
}

///
/// TouchOutcome
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TouchOutcome {
    /// Documents whose timestamp update reached the store.
    pub touched: usize,
    /// Touch-on-change relations skipped: unloaded targets, unpersisted
    /// targets, and entities already visited in this cascade.
    pub skipped: usize,
}

// Per-call cascade bookkeeping.
#[derive(Default)]
struct CascadeStats {
    attempted: usize,
    failed: usize,
}

///
/// TouchExecutor
///
/// Refreshes an entity's `updated_at` (and optionally one extra field) with
/// a single atomic `$set` against its root aggregate, then cascades the
/// touch across touch-on-change relations. Traversal never triggers lazy
/// materialization: an unloaded relation target is skipped, not fetched.
///

pub struct TouchExecutor<'a> {
    store: &'a dyn StoreClient,
    resolver: &'a dyn PositionResolver,
    policy: CascadePolicy,
}

impl<'a> TouchExecutor<'a> {
    #[must_use]
    pub fn new(store: &'a dyn StoreClient, resolver: &'a dyn PositionResolver) -> Self {
        Self {
            store,
            resolver,
            policy: CascadePolicy::default(),
        }
    }

    #[must_use]
    pub const fn with_policy(mut self, policy: CascadePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Touch at the current wall-clock time.
    pub fn touch(
        &self,
        entity: &EntityRef,
        extra_field: Option<&str>,
    ) -> Result<TouchOutcome, MutationError> {
        self.touch_at(entity, extra_field, Timestamp::now())
    }

    /// Touch with an explicit timestamp. One timestamp value is shared by
    /// the whole cascade.
    pub fn touch_at(
        &self,
        entity: &EntityRef,
        extra_field: Option<&str>,
        now: Timestamp,
    ) -> Result<TouchOutcome, MutationError> {
        let mut visited: BTreeSet<Id> = BTreeSet::new();
        let mut outcome = TouchOutcome::default();
        let mut stats = CascadeStats::default();

        self.touch_inner(entity, extra_field, now, &mut visited, &mut outcome, &mut stats)?;

        if stats.failed > 0 {
            return Err(MutationError::PartialCascade {
                attempted: stats.attempted,
                failed: stats.failed,
            });
        }

        Ok(outcome)
    }

    fn touch_inner(
        &self,
        entity: &EntityRef,
        extra_field: Option<&str>,
        now: Timestamp,
        visited: &mut BTreeSet<Id>,
        outcome: &mut TouchOutcome,
        stats: &mut CascadeStats,
    ) -> Result<(), MutationError> {
        // cycle/duplicate avoidance: each entity is touched at most once
        let id = entity.borrow().id();
        if !visited.insert(id) {
            outcome.skipped += 1;
            sink::record(sink::MutationEvent::CascadeRelationSkipped);
            return Ok(());
        }

        let (fields, targets) = {
            let mut e = entity.borrow_mut();

            // nothing in the store to refresh yet
            if e.is_new() {
                outcome.skipped += 1;
                sink::record(sink::MutationEvent::CascadeRelationSkipped);
                return Ok(());
            }

            let model = std::sync::Arc::clone(e.model());

            let mut fields: Vec<String> = Vec::new();
            if model.declares_updated_at() {
                fields.push(model.store_field_name(UPDATED_AT)?);
            }
            if let Some(extra) = extra_field {
                let store_name = model.store_field_name(extra)?;
                if !fields.contains(&store_name) {
                    fields.push(store_name);
                }
            }

            for field in &fields {
                e.write_attribute(field.clone(), Value::Timestamp(now));
            }

            let mut targets: Vec<EntityRef> = Vec::new();
            for name in model.touchables() {
                let Some(relation) = e.relation(name) else {
                    continue;
                };
                if !relation.is_touchable() {
                    continue;
                }
                match relation.target() {
                    Some(target) => targets.push(EntityRef::clone(target)),
                    None => {
                        // unloaded: skipped, never fetched
                        outcome.skipped += 1;
                        sink::record(sink::MutationEvent::CascadeRelationSkipped);
                    }
                }
            }

            (fields, targets)
        };

        // no updated_at and no extra field: nothing to write, nothing to
        // cascade from
        if fields.is_empty() {
            return Ok(());
        }

        // single batched $set for both fields; a failure here aborts the
        // whole call with no partial cascade
        {
            let e = entity.borrow();
            let location = self.resolver.resolve(&e)?;
            let mut modifier = Modifier::new();
            for field in &fields {
                modifier.insert(
                    AtomicKind::Set,
                    location.position.field_path(field),
                    Value::Timestamp(now),
                );
            }
            self.store.update(&location.selector, &modifier)?;
        }

        entity.borrow_mut().changes_mut().move_changes();
        outcome.touched += 1;
        sink::record(sink::MutationEvent::Touched);

        for target in targets {
            stats.attempted += 1;
            match self.touch_inner(&target, None, now, visited, outcome, stats) {
                Ok(()) => {}
                Err(err) => match self.policy {
                    CascadePolicy::FailFast => return Err(err),
                    CascadePolicy::BestEffort => {
                        stats.failed += 1;
                        sink::record(sink::MutationEvent::CascadeRelationFailed);
                    }
                },
            }
        }

        Ok(())
    }
}
