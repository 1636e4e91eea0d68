//! Core runtime for rowsift: lazy row sources over partitioned columnar
//! storage, including the distinct-by-column filter.
#![warn(unreachable_pub)]

pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod obs;

#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains the row source vocabulary needed to build and drive a
/// plan. Metrics plumbing stays under `obs`.
///

pub mod prelude {
    pub use crate::{
        db::{
            ColumnIndex, Direction, Metadata, PartitionId, RowId,
            executor::{
                BindError, DistinctRowSource, ExecutionContext, RowCursor, RowSource,
                ScanRowSource, collect_rows,
            },
            store::{ColumnAccessor, MemoryPartition, Partition, PartitionSlice},
        },
        error::InternalError,
        model::{
            column::{ColumnKind, ColumnModel},
            table::TableMetadata,
        },
    };
}
