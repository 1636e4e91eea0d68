//! Pull-based row sources.
//!
//! Every variant implements the same `RowSource`/`RowCursor` contract, so
//! sources compose by wrapping: a distinct filter over a scan is just a
//! `DistinctRowSource<ScanRowSource>`.

mod context;
mod row_source;

pub mod distinct;
pub mod scan;

pub use context::ExecutionContext;
pub use distinct::{DistinctRowSource, DistinctStats, SeenValues};
pub use row_source::{
    BindError, RowCursor, RowCursorBox, RowSource, RowSourceBox, collect_rows,
};
pub use scan::ScanRowSource;
