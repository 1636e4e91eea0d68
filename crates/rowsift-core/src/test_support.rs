use crate::{
    db::{
        ColumnIndex, Metadata, PartitionId, RowId,
        executor::{BindError, ExecutionContext, RowCursor, RowCursorBox, RowSource},
        store::{MemoryPartition, Partition, PartitionSlice},
    },
    error::InternalError,
    model::{
        column::{ColumnKind, ColumnModel},
        table::TableMetadata,
    },
};
use std::{collections::BTreeMap, sync::Arc};

pub(crate) const SYM: &str = "sym";

/// Two-column schema: `ts` (index 0) and `sym` (index 1).
pub(crate) fn quotes_table() -> TableMetadata {
    TableMetadata::new(
        "quotes",
        vec![
            ColumnModel::new("ts", ColumnKind::Int),
            ColumnModel::new(SYM, ColumnKind::Symbol),
        ],
    )
    .expect("test schema should be valid")
}

/// Partition whose `sym` column holds `codes`, one per row.
pub(crate) fn quotes_partition(id: u32, codes: &[i32]) -> Arc<dyn Partition> {
    let ts: Vec<i32> = (0..codes.len())
        .map(|offset| i32::try_from(offset).expect("test partition fits i32"))
        .collect();
    let partition = MemoryPartition::builder(PartitionId::new(id))
        .column(ts)
        .column(codes.to_vec())
        .build()
        .expect("test partition should build");

    Arc::new(partition)
}

/// Partition whose `sym` column has no backing data file.
pub(crate) fn partition_missing_sym(id: u32, rows: u64) -> Arc<dyn Partition> {
    let partition = MemoryPartition::builder(PartitionId::new(id))
        .column(vec![0; usize::try_from(rows).expect("test rows fit usize")])
        .missing_column()
        .build()
        .expect("test partition should build");

    Arc::new(partition)
}

pub(crate) fn rows(ids: &[u64]) -> Vec<RowId> {
    ids.iter().copied().map(RowId::new).collect()
}

///
/// ListRowSource
///
/// Delegate that yields a fixed row id order per partition and records
/// every lifecycle call it receives.
///

#[derive(Debug, Default)]
pub(crate) struct ListRowSource {
    orders: BTreeMap<PartitionId, Vec<RowId>>,
    pub(crate) configured: u32,
    pub(crate) executions: Vec<u64>,
    pub(crate) resets: u32,
    pub(crate) cursors: u32,
}

impl ListRowSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_order(mut self, partition: u32, ids: &[u64]) -> Self {
        self.orders.insert(PartitionId::new(partition), rows(ids));
        self
    }
}

impl RowSource for ListRowSource {
    fn configure(&mut self, _metadata: &dyn Metadata) -> Result<(), BindError> {
        self.configured += 1;
        Ok(())
    }

    fn prepare(&mut self, context: &ExecutionContext) {
        self.executions.push(context.execution_id());
    }

    fn prepare_cursor<'a>(
        &'a mut self,
        slice: &PartitionSlice,
    ) -> Result<RowCursorBox<'a>, InternalError> {
        self.cursors += 1;
        let order = self
            .orders
            .get(&slice.partition_id())
            .cloned()
            .unwrap_or_default();

        Ok(Box::new(ListCursor {
            order,
            position: 0,
        }))
    }

    fn reset(&mut self) {
        self.resets += 1;
    }
}

struct ListCursor {
    order: Vec<RowId>,
    position: usize,
}

impl RowCursor for ListCursor {
    fn has_next(&mut self) -> Result<bool, InternalError> {
        Ok(self.position < self.order.len())
    }

    fn next(&mut self) -> Result<RowId, InternalError> {
        let row = self
            .order
            .get(self.position)
            .copied()
            .ok_or_else(|| InternalError::cursor_invariant("list cursor exhausted"))?;
        self.position += 1;

        Ok(row)
    }

    fn reset(&mut self) {
        self.position = 0;
    }
}

/// Metadata catalog that knows no columns at all.
pub(crate) struct EmptyCatalog;

impl Metadata for EmptyCatalog {
    fn column_index(&self, _name: &str) -> Option<ColumnIndex> {
        None
    }
}
