use crate::{
    db::{
        PartitionId, RowId,
        executor::{RowCursor, RowCursorBox, distinct::{DistinctStats, SeenValues}},
        store::ColumnAccessorBox,
    },
    error::InternalError,
    obs::sink::{self, MetricsEvent, SourceKind},
};

///
/// DistinctCursor
///
/// Cursor over one partition. Owns the column accessor and the delegate's
/// cursor for that partition and borrows the execution-scoped seen set, so
/// every prior partition's codes keep suppressing rows here.
///

pub(super) struct DistinctCursor<'a> {
    inner: RowCursorBox<'a>,
    column: ColumnAccessorBox,
    seen: &'a mut SeenValues,
    stats: &'a mut DistinctStats,
    partition: PartitionId,
    partition_stats: DistinctStats,
    ready: Option<RowId>,
    exhausted: bool,
}

impl<'a> DistinctCursor<'a> {
    pub(super) fn new(
        inner: RowCursorBox<'a>,
        column: ColumnAccessorBox,
        seen: &'a mut SeenValues,
        stats: &'a mut DistinctStats,
        partition: PartitionId,
    ) -> Self {
        Self {
            inner,
            column,
            seen,
            stats,
            partition,
            partition_stats: DistinctStats::default(),
            ready: None,
            exhausted: false,
        }
    }
}

impl RowCursor for DistinctCursor<'_> {
    fn has_next(&mut self) -> Result<bool, InternalError> {
        if self.ready.is_some() {
            return Ok(true);
        }
        if self.exhausted {
            return Ok(false);
        }

        while self.inner.has_next()? {
            let row = self.inner.next()?;
            let code = self.column.value_at(row)?;
            let first_seen = self.seen.insert(code);

            self.partition_stats.observe(first_seen);
            self.stats.observe(first_seen);

            if first_seen {
                self.ready = Some(row);
                return Ok(true);
            }
        }

        self.exhausted = true;

        Ok(false)
    }

    fn next(&mut self) -> Result<RowId, InternalError> {
        self.ready.take().ok_or_else(|| {
            InternalError::cursor_invariant(
                "distinct cursor next() called without a preceding successful has_next()",
            )
        })
    }

    // The seen set is left intact: rewinding only replays the partition.
    fn reset(&mut self) {
        self.inner.reset();
        self.ready = None;
        self.exhausted = false;
    }
}

impl Drop for DistinctCursor<'_> {
    fn drop(&mut self) {
        sink::record(MetricsEvent::PartitionFinished {
            source: SourceKind::Distinct,
            partition: self.partition,
            rows_scanned: self.partition_stats.rows_scanned,
            rows_emitted: self.partition_stats.rows_emitted,
            rows_suppressed: self.partition_stats.rows_suppressed,
        });
    }
}
