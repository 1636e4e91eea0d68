//! Distinct-by-column filtering over a delegate row stream.
//!
//! For every row pulled from the delegate the filter reads the target
//! column's `i32` code and emits the row only if that code has not been
//! seen earlier in the current execution. Output order is delegate order
//! minus later duplicates: an ascending delegate keeps the first row per
//! code, a descending delegate keeps the latest.

mod cursor;
mod seen;

#[cfg(test)]
mod tests;

pub use seen::SeenValues;

use crate::{
    db::{
        ColumnIndex, Metadata,
        executor::{BindError, ExecutionContext, RowCursorBox, RowSource},
        store::PartitionSlice,
    },
    error::InternalError,
    obs::sink::{self, MetricsEvent, SourceKind},
};
use cursor::DistinctCursor;
use serde::{Deserialize, Serialize};

///
/// DistinctStats
///
/// Row counters for one execution, reset by `prepare`.
///
/// A row is counted when `has_next` locates it, not when `next` hands it
/// out. `rows_emitted` therefore includes a located first occurrence that
/// was never consumed because its cursor was reset or dropped.
/// `rows_scanned == rows_emitted + rows_suppressed` always holds.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct DistinctStats {
    pub rows_scanned: u64,
    pub rows_emitted: u64,
    pub rows_suppressed: u64,
}

impl DistinctStats {
    const fn observe(&mut self, first_seen: bool) {
        self.rows_scanned = self.rows_scanned.saturating_add(1);
        if first_seen {
            self.rows_emitted = self.rows_emitted.saturating_add(1);
        } else {
            self.rows_suppressed = self.rows_suppressed.saturating_add(1);
        }
    }
}

///
/// DistinctPhase
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum DistinctPhase {
    Unconfigured,
    Configured(ColumnIndex),
    Prepared(ColumnIndex),
}

///
/// DistinctRowSource
///
/// Wraps a delegate row source and suppresses every row whose column code
/// was already emitted during the current execution, across partitions.
///
/// The seen set is cleared only by `prepare` and is never evicted, so
/// memory grows with the number of distinct codes per execution.
///

pub struct DistinctRowSource<D> {
    delegate: D,
    column: String,
    phase: DistinctPhase,
    seen: SeenValues,
    stats: DistinctStats,
}

impl<D> DistinctRowSource<D>
where
    D: RowSource,
{
    #[must_use]
    pub fn new(delegate: D, column: impl Into<String>) -> Self {
        Self {
            delegate,
            column: column.into(),
            phase: DistinctPhase::Unconfigured,
            seen: SeenValues::new(),
            stats: DistinctStats::default(),
        }
    }

    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Column index resolved at bind time, if configured.
    #[must_use]
    pub const fn column_index(&self) -> Option<ColumnIndex> {
        match self.phase {
            DistinctPhase::Unconfigured => None,
            DistinctPhase::Configured(index) | DistinctPhase::Prepared(index) => Some(index),
        }
    }

    #[must_use]
    pub const fn seen(&self) -> &SeenValues {
        &self.seen
    }

    #[must_use]
    pub const fn stats(&self) -> DistinctStats {
        self.stats
    }

    #[must_use]
    pub const fn delegate(&self) -> &D {
        &self.delegate
    }

    #[must_use]
    pub fn into_delegate(self) -> D {
        self.delegate
    }
}

impl<D> RowSource for DistinctRowSource<D>
where
    D: RowSource,
{
    fn configure(&mut self, metadata: &dyn Metadata) -> Result<(), BindError> {
        if self.phase != DistinctPhase::Unconfigured {
            return Err(BindError::AlreadyConfigured {
                column: self.column.clone(),
            });
        }

        self.delegate.configure(metadata)?;

        let index =
            metadata
                .column_index(&self.column)
                .ok_or_else(|| BindError::ColumnNotFound {
                    column: self.column.clone(),
                })?;
        self.phase = DistinctPhase::Configured(index);

        Ok(())
    }

    fn prepare(&mut self, context: &ExecutionContext) {
        self.delegate.prepare(context);
        self.seen.clear();
        self.stats = DistinctStats::default();

        if let DistinctPhase::Configured(index) = self.phase {
            self.phase = DistinctPhase::Prepared(index);
        }

        sink::record(MetricsEvent::ExecutionPrepared {
            source: SourceKind::Distinct,
        });
    }

    fn prepare_cursor<'a>(
        &'a mut self,
        slice: &PartitionSlice,
    ) -> Result<RowCursorBox<'a>, InternalError> {
        let index = match self.phase {
            DistinctPhase::Prepared(index) => index,
            DistinctPhase::Configured(_) => {
                return Err(InternalError::executor_invariant(format!(
                    "distinct row source over '{}' bound to a partition before prepare",
                    self.column
                )));
            }
            DistinctPhase::Unconfigured => {
                return Err(InternalError::executor_invariant(format!(
                    "distinct row source over '{}' bound to a partition before configure",
                    self.column
                )));
            }
        };
        let partition = slice.partition_id();

        // Open the column before touching the delegate so a failed open
        // leaves nothing bound for this partition.
        let column = slice.partition().open_column(index).inspect_err(|_| {
            sink::record(MetricsEvent::StorageOpenFailed {
                source: SourceKind::Distinct,
                partition,
            });
        })?;
        let inner = self.delegate.prepare_cursor(slice)?;

        sink::record(MetricsEvent::CursorBound {
            source: SourceKind::Distinct,
            partition,
        });

        Ok(Box::new(DistinctCursor::new(
            inner,
            column,
            &mut self.seen,
            &mut self.stats,
            partition,
        )))
    }

    fn reset(&mut self) {
        self.delegate.reset();
    }
}
