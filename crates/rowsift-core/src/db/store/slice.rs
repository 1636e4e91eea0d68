use crate::db::{PartitionId, RowId, store::Partition};
use std::{fmt, sync::Arc};

///
/// PartitionSlice
///
/// One partition plus the half-open row range `[lo, hi)` to visit.
/// Supplied by the orchestrator and passed through unmodified to every
/// row source in a plan.
///

#[derive(Clone)]
pub struct PartitionSlice {
    partition: Arc<dyn Partition>,
    lo: RowId,
    hi: RowId,
}

impl PartitionSlice {
    /// Build a slice over `[lo, hi)`, clamping `hi` to the partition length.
    #[must_use]
    pub fn new(partition: Arc<dyn Partition>, lo: RowId, hi: RowId) -> Self {
        let hi = RowId::new(hi.get().min(partition.row_count()));
        let lo = RowId::new(lo.get().min(hi.get()));

        Self { partition, lo, hi }
    }

    /// Build a slice covering every row of the partition.
    #[must_use]
    pub fn full(partition: Arc<dyn Partition>) -> Self {
        let hi = RowId::new(partition.row_count());

        Self {
            partition,
            lo: RowId::new(0),
            hi,
        }
    }

    #[must_use]
    pub fn partition(&self) -> &dyn Partition {
        self.partition.as_ref()
    }

    #[must_use]
    pub fn partition_id(&self) -> PartitionId {
        self.partition.id()
    }

    #[must_use]
    pub const fn lo(&self) -> RowId {
        self.lo
    }

    #[must_use]
    pub const fn hi(&self) -> RowId {
        self.hi
    }

    #[must_use]
    pub const fn len(&self) -> u64 {
        self.hi.get().saturating_sub(self.lo.get())
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for PartitionSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartitionSlice")
            .field("partition", &self.partition.id())
            .field("lo", &self.lo)
            .field("hi", &self.hi)
            .finish()
    }
}
