pub mod sink;

pub use sink::{MetricsSink, MutationEvent};

use std::cell::RefCell;

thread_local! {
    static COUNTERS: RefCell<MetricsSnapshot> = RefCell::new(MetricsSnapshot::default());
}

///
/// MetricsSnapshot
///
/// Process-local counters for mutation activity. Thread-local so tests can
/// assert on them without cross-test interference.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MetricsSnapshot {
    pub updates_sent: u64,
    pub updates_skipped_new: u64,
    pub touches: u64,
    pub cascade_skipped: u64,
    pub cascade_failed: u64,
}

/// Read the current counters.
#[must_use]
pub fn snapshot() -> MetricsSnapshot {
    COUNTERS.with(|c| *c.borrow())
}

/// Zero the counters (test setup).
pub fn reset() {
    COUNTERS.with(|c| *c.borrow_mut() = MetricsSnapshot::default());
}

pub(crate) fn with_counters(f: impl FnOnce(&mut MetricsSnapshot)) {
    COUNTERS.with(|c| f(&mut c.borrow_mut()));
}
