use crate::{
    db::{
        Direction, Metadata, RowId,
        executor::{BindError, ExecutionContext, RowCursor, RowCursorBox, RowSource},
        store::PartitionSlice,
    },
    error::InternalError,
    obs::sink::{self, MetricsEvent, SourceKind},
};
use std::ops::Range;

///
/// ScanRowSource
///
/// Visits every row of a slice in `Direction` order. `Desc` yields the
/// newest row first, which turns a downstream distinct filter into a
/// "latest row per key" extractor.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ScanRowSource {
    direction: Direction,
}

impl ScanRowSource {
    #[must_use]
    pub const fn new(direction: Direction) -> Self {
        Self { direction }
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }
}

impl RowSource for ScanRowSource {
    fn configure(&mut self, _metadata: &dyn Metadata) -> Result<(), BindError> {
        Ok(())
    }

    fn prepare(&mut self, _context: &ExecutionContext) {
        sink::record(MetricsEvent::ExecutionPrepared {
            source: SourceKind::Scan,
        });
    }

    fn prepare_cursor<'a>(
        &'a mut self,
        slice: &PartitionSlice,
    ) -> Result<RowCursorBox<'a>, InternalError> {
        sink::record(MetricsEvent::CursorBound {
            source: SourceKind::Scan,
            partition: slice.partition_id(),
        });

        Ok(Box::new(ScanCursor::new(slice, self.direction)))
    }

    // Scan position lives entirely in the cursor; `ScanCursor::reset` rewinds.
    fn reset(&mut self) {}
}

///
/// ScanCursor
///

struct ScanCursor {
    bounds: Range<u64>,
    remaining: Range<u64>,
    direction: Direction,
}

impl ScanCursor {
    fn new(slice: &PartitionSlice, direction: Direction) -> Self {
        let bounds = slice.lo().get()..slice.hi().get();

        Self {
            remaining: bounds.clone(),
            bounds,
            direction,
        }
    }
}

impl RowCursor for ScanCursor {
    fn has_next(&mut self) -> Result<bool, InternalError> {
        Ok(!self.remaining.is_empty())
    }

    fn next(&mut self) -> Result<RowId, InternalError> {
        let offset = match self.direction {
            Direction::Asc => self.remaining.next(),
            Direction::Desc => self.remaining.next_back(),
        };

        offset.map(RowId::new).ok_or_else(|| {
            InternalError::cursor_invariant("scan cursor next() called after exhaustion")
        })
    }

    fn reset(&mut self) {
        self.remaining = self.bounds.clone();
    }
}

///
/// TESTS
///
