//! Metrics sink boundary.
//!
//! Row source logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
use crate::{db::PartitionId, obs::metrics};
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn MetricsSink>> = RefCell::new(None);
}

///
/// SourceKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SourceKind {
    Scan,
    Distinct,
}

impl SourceKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scan => "scan",
            Self::Distinct => "distinct",
        }
    }
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    ExecutionPrepared {
        source: SourceKind,
    },
    CursorBound {
        source: SourceKind,
        partition: PartitionId,
    },
    StorageOpenFailed {
        source: SourceKind,
        partition: PartitionId,
    },
    PartitionFinished {
        source: SourceKind,
        partition: PartitionId,
        rows_scanned: u64,
        rows_emitted: u64,
        rows_suppressed: u64,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default thread-local sink that writes into global metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::ExecutionPrepared { source } => {
                metrics::with_state_mut(|m| {
                    m.ops.executions_prepared = m.ops.executions_prepared.saturating_add(1);
                    let entry = m.sources.entry(source.label().to_string()).or_default();
                    entry.executions_prepared = entry.executions_prepared.saturating_add(1);
                });
            }

            MetricsEvent::CursorBound { source, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.cursors_bound = m.ops.cursors_bound.saturating_add(1);
                    let entry = m.sources.entry(source.label().to_string()).or_default();
                    entry.cursors_bound = entry.cursors_bound.saturating_add(1);
                });
            }

            MetricsEvent::StorageOpenFailed { source, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.storage_open_failures = m.ops.storage_open_failures.saturating_add(1);
                    let entry = m.sources.entry(source.label().to_string()).or_default();
                    entry.storage_open_failures = entry.storage_open_failures.saturating_add(1);
                });
            }

            MetricsEvent::PartitionFinished {
                source,
                rows_scanned,
                rows_emitted,
                rows_suppressed,
                ..
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.rows_scanned = m.ops.rows_scanned.saturating_add(rows_scanned);
                    m.ops.rows_emitted = m.ops.rows_emitted.saturating_add(rows_emitted);
                    m.ops.rows_suppressed = m.ops.rows_suppressed.saturating_add(rows_suppressed);

                    let entry = m.sources.entry(source.label().to_string()).or_default();
                    entry.partitions_finished = entry.partitions_finished.saturating_add(1);
                    entry.rows_scanned = entry.rows_scanned.saturating_add(rows_scanned);
                    entry.rows_emitted = entry.rows_emitted.saturating_add(rows_emitted);
                    entry.rows_suppressed = entry.rows_suppressed.saturating_add(rows_suppressed);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // - `ptr` was produced from a live `&dyn MetricsSink` in `with_metrics_sink`,
        //   which restores the previous slot on every exit, unwinding included.
        // - `record` is synchronous and never keeps `ptr` past this call.
        // - Only a shared reference is materialized, matching the installing borrow.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_METRICS_SINK.record(event);
    }
}

/// Snapshot the current thread's metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state on the current thread.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
///
/// Events recorded on this thread while `f` runs go to `sink` instead of
/// the global state. Overrides nest; the previous sink is restored on exit.
// Only tests install overrides today.
#[cfg_attr(not(test), allow(dead_code))]
pub(crate) fn with_metrics_sink<T>(sink: &dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // - The erased pointer is installed only for this dynamic scope and
    //   `Guard` restores the previous slot on all exits, including panic.
    // - `record` dereferences it synchronously and never persists it.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn MetricsSink, *const dyn MetricsSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| {
        let mut slot = cell.borrow_mut();
        slot.replace(sink_ptr)
    });
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///
