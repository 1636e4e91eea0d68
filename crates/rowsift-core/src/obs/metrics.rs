use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for row source activity.
///

#[derive(Clone, Debug, Default)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
    pub(crate) sources: BTreeMap<String, SourceCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Lifecycle
    pub executions_prepared: u64,
    pub cursors_bound: u64,
    pub storage_open_failures: u64,

    // Rows seen by filtering sources
    pub rows_scanned: u64,
    pub rows_emitted: u64,
    pub rows_suppressed: u64,
}

///
/// SourceCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SourceCounters {
    pub executions_prepared: u64,
    pub cursors_bound: u64,
    pub storage_open_failures: u64,
    pub partitions_finished: u64,
    pub rows_scanned: u64,
    pub rows_emitted: u64,
    pub rows_suppressed: u64,
}

///
/// EventReport
/// Point-in-time snapshot of the metrics state.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub sources: BTreeMap<String, SourceCounters>,
}

impl EventReport {
    #[must_use]
    pub fn source(&self, label: &str) -> Option<&SourceCounters> {
        self.sources.get(label)
    }
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

pub(crate) fn report() -> EventReport {
    with_state(|m| EventReport {
        ops: m.ops.clone(),
        sources: m.sources.clone(),
    })
}
