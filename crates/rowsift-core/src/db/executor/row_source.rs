use crate::{
    db::{Metadata, RowId, executor::ExecutionContext, store::PartitionSlice},
    error::InternalError,
};
use thiserror::Error as ThisError;

///
/// BindError
///
/// Bind-time failure raised by `RowSource::configure`.
/// Aborts plan construction; never retried.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum BindError {
    #[error("column not found: '{column}'")]
    ColumnNotFound { column: String },

    #[error("row source over column '{column}' is already configured")]
    AlreadyConfigured { column: String },
}

///
/// RowSource
///
/// Composable, lazily evaluated producer of row ids.
///
/// Lifecycle: `configure` once per plan, `prepare` once per execution, then
/// `prepare_cursor` once per visited partition. The returned cursor borrows
/// the source exclusively, so it cannot outlive the next `prepare_cursor`.
///

pub trait RowSource {
    /// Resolve schema dependencies. Called exactly once, before any execution.
    fn configure(&mut self, metadata: &dyn Metadata) -> Result<(), BindError>;

    /// Reset per-execution state. Called once at the start of each execution.
    fn prepare(&mut self, context: &ExecutionContext);

    /// Bind to one partition and return a cursor over its rows.
    fn prepare_cursor<'a>(
        &'a mut self,
        slice: &PartitionSlice,
    ) -> Result<RowCursorBox<'a>, InternalError>;

    /// Forward an iteration reset through composed sources.
    /// Never clears execution-scoped memory; only `prepare` does that.
    fn reset(&mut self);
}

impl<T> RowSource for Box<T>
where
    T: RowSource + ?Sized,
{
    fn configure(&mut self, metadata: &dyn Metadata) -> Result<(), BindError> {
        self.as_mut().configure(metadata)
    }

    fn prepare(&mut self, context: &ExecutionContext) {
        self.as_mut().prepare(context);
    }

    fn prepare_cursor<'a>(
        &'a mut self,
        slice: &PartitionSlice,
    ) -> Result<RowCursorBox<'a>, InternalError> {
        self.as_mut().prepare_cursor(slice)
    }

    fn reset(&mut self) {
        self.as_mut().reset();
    }
}

pub type RowSourceBox = Box<dyn RowSource>;

///
/// RowCursor
///
/// Pull iterator over the row ids of one partition.
/// `next` is valid only immediately after `has_next` returned `true`.
///

pub trait RowCursor {
    /// Locate the next row. Keeps returning `false` once exhausted.
    fn has_next(&mut self) -> Result<bool, InternalError>;

    /// Take the row located by the preceding successful `has_next`.
    fn next(&mut self) -> Result<RowId, InternalError>;

    /// Rewind to the first row of the bound partition.
    fn reset(&mut self);
}

impl<T> RowCursor for Box<T>
where
    T: RowCursor + ?Sized,
{
    fn has_next(&mut self) -> Result<bool, InternalError> {
        self.as_mut().has_next()
    }

    fn next(&mut self) -> Result<RowId, InternalError> {
        self.as_mut().next()
    }

    fn reset(&mut self) {
        self.as_mut().reset();
    }
}

pub type RowCursorBox<'a> = Box<dyn RowCursor + 'a>;

/// Drain a cursor into a vector of row ids.
pub fn collect_rows(cursor: &mut dyn RowCursor) -> Result<Vec<RowId>, InternalError> {
    let mut out = Vec::new();
    while cursor.has_next()? {
        out.push(cursor.next()?);
    }

    Ok(out)
}
