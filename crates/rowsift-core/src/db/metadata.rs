use crate::db::ColumnIndex;

///
/// Metadata
///
/// Bind-time schema catalog boundary.
/// Implementations must be immutable for the lifetime of one query plan.
///

pub trait Metadata {
    /// Resolve a column name to its stable index, or `None` when absent.
    fn column_index(&self, name: &str) -> Option<ColumnIndex>;
}
