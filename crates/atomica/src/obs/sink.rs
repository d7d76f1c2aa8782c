//! Metrics sink boundary.
//!
//! Mutation logic MUST NOT touch counter state directly. All instrumentation
//! flows through `MutationEvent` and `MetricsSink`; this module is the only
//! bridge between executors and the process-local counters.

use crate::obs::with_counters;
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = const { RefCell::new(None) };
}

///
/// MutationEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MutationEvent {
    /// An atomic update reached the store.
    UpdateSent {
        operator: &'static str,
        fields: usize,
    },
    /// An atomic operation no-opped on a not-yet-persisted entity.
    UpdateSkippedNew,
    /// A touch wrote its timestamp update.
    Touched,
    /// A touch-on-change relation was skipped (unloaded or already visited).
    CascadeRelationSkipped,
    /// A touch-on-change relation failed under best-effort cascade.
    CascadeRelationFailed,
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MutationEvent);
}

///
/// GlobalMetricsSink
/// Default sink that writes into the process-local counters.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MutationEvent) {
        with_counters(|c| match event {
            MutationEvent::UpdateSent { .. } => c.updates_sent += 1,
            MutationEvent::UpdateSkippedNew => c.updates_skipped_new += 1,
            MutationEvent::Touched => c.touches += 1,
            MutationEvent::CascadeRelationSkipped => c.cascade_skipped += 1,
            MutationEvent::CascadeRelationFailed => c.cascade_failed += 1,
        });
    }
}

/// Route events to `sink` for the duration of `f` (test instrumentation).
/// The override is cleared even if `f` panics.
pub fn with_sink<R>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> R) -> R {
    struct ClearOnDrop;

    impl Drop for ClearOnDrop {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|s| *s.borrow_mut() = None);
        }
    }

    SINK_OVERRIDE.with(|s| *s.borrow_mut() = Some(sink));
    let _clear = ClearOnDrop;
    f()
}

/// Record an event against the active sink.
pub(crate) fn record(event: MutationEvent) {
    let overridden = SINK_OVERRIDE.with(|s| s.borrow().clone());
    match overridden {
        Some(sink) => sink.record(event),
        None => GlobalMetricsSink.record(event),
    }
}
