//! Partition storage boundary.
//!
//! The executor never sees file layout or column encoding. It opens one
//! `ColumnAccessor` per (partition, column) pair and reads fixed-width
//! codes by row id.

mod memory;
mod slice;

pub use memory::{MemoryPartition, MemoryPartitionBuilder};
pub use slice::PartitionSlice;

use crate::{
    db::{ColumnIndex, PartitionId, RowId},
    error::InternalError,
};

///
/// Partition
///
/// One physically contiguous segment of a table.
///

pub trait Partition {
    fn id(&self) -> PartitionId;

    /// Number of rows currently stored in the partition.
    fn row_count(&self) -> u64;

    /// Open a random-access reader over one fixed-width column.
    ///
    /// Fails with a storage-open error (`InternalError::is_storage_open`)
    /// when the column's backing data is missing or unreadable.
    fn open_column(&self, column: ColumnIndex) -> Result<ColumnAccessorBox, InternalError>;
}

///
/// ColumnAccessor
///
/// Reader bound to one (column, partition) pair. Valid only for the
/// lifetime of the slice it was opened against.
///

pub trait ColumnAccessor {
    fn column(&self) -> ColumnIndex;

    fn value_at(&self, row: RowId) -> Result<i32, InternalError>;
}

pub type ColumnAccessorBox = Box<dyn ColumnAccessor>;
