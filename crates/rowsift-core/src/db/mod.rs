//! Row identity, catalog and storage boundaries, and the row source executor.

mod direction;
mod metadata;
mod row;

pub mod executor;
pub mod store;

// re-exports
pub use direction::Direction;
pub use metadata::Metadata;
pub use row::{ColumnIndex, PartitionId, RowId};
