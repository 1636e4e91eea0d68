//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! Row sources never touch metrics state directly; they emit typed
//! `MetricsEvent`s through `sink::record`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport, SourceCounters};
pub use sink::{MetricsEvent, MetricsSink, SourceKind, metrics_report, metrics_reset_all};
