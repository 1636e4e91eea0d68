use crate::{
    db::{
        ColumnIndex, PartitionId, RowId,
        store::{ColumnAccessor, ColumnAccessorBox, Partition},
    },
    error::{ErrorClass, ErrorOrigin, InternalError},
};
use std::sync::Arc;

///
/// MemoryColumn
///

#[derive(Clone, Debug)]
enum MemoryColumn {
    Data(Arc<[i32]>),
    Missing,
    Corrupt(String),
}

///
/// MemoryPartition
///
/// In-memory partition with fixed-width `i32` columns.
/// Columns may be declared missing or corrupt so that open failures can be
/// produced deterministically.
///

#[derive(Clone, Debug)]
pub struct MemoryPartition {
    id: PartitionId,
    row_count: u64,
    columns: Vec<MemoryColumn>,
}

impl MemoryPartition {
    #[must_use]
    pub const fn builder(id: PartitionId) -> MemoryPartitionBuilder {
        MemoryPartitionBuilder {
            id,
            row_count: None,
            columns: Vec::new(),
        }
    }
}

impl Partition for MemoryPartition {
    fn id(&self) -> PartitionId {
        self.id
    }

    fn row_count(&self) -> u64 {
        self.row_count
    }

    fn open_column(&self, column: ColumnIndex) -> Result<ColumnAccessorBox, InternalError> {
        match self.columns.get(column.get()) {
            Some(MemoryColumn::Data(values)) => Ok(Box::new(MemoryColumnAccessor {
                partition: self.id,
                column,
                values: Arc::clone(values),
            })),
            Some(MemoryColumn::Missing) => Err(InternalError::storage_open(
                ErrorClass::NotFound,
                self.id,
                column,
                "missing data file",
            )),
            Some(MemoryColumn::Corrupt(reason)) => Err(InternalError::storage_open(
                ErrorClass::Corruption,
                self.id,
                column,
                reason.clone(),
            )),
            None => Err(InternalError::storage_open(
                ErrorClass::NotFound,
                self.id,
                column,
                format!("partition has {} columns", self.columns.len()),
            )),
        }
    }
}

///
/// MemoryPartitionBuilder
///
/// Columns are appended in schema order. Every data column must hold the
/// same number of rows.
///

#[derive(Debug)]
pub struct MemoryPartitionBuilder {
    id: PartitionId,
    row_count: Option<u64>,
    columns: Vec<MemoryColumn>,
}

impl MemoryPartitionBuilder {
    #[must_use]
    pub fn column(mut self, values: impl Into<Vec<i32>>) -> Self {
        self.columns.push(MemoryColumn::Data(Arc::from(values.into())));
        self
    }

    /// Declare a column whose backing data file is absent.
    #[must_use]
    pub fn missing_column(mut self) -> Self {
        self.columns.push(MemoryColumn::Missing);
        self
    }

    /// Declare a column that fails to open as corrupt.
    #[must_use]
    pub fn corrupt_column(mut self, reason: impl Into<String>) -> Self {
        self.columns.push(MemoryColumn::Corrupt(reason.into()));
        self
    }

    /// Fix the row count explicitly; required when no data column exists.
    #[must_use]
    pub fn rows(mut self, row_count: u64) -> Self {
        self.row_count = Some(row_count);
        self
    }

    pub fn build(self) -> Result<MemoryPartition, InternalError> {
        let mut row_count = self.row_count;

        for (position, column) in self.columns.iter().enumerate() {
            let MemoryColumn::Data(values) = column else {
                continue;
            };
            let len = values.len() as u64;

            match row_count {
                None => row_count = Some(len),
                Some(expected) if expected != len => {
                    return Err(InternalError::new(
                        ErrorClass::Unsupported,
                        ErrorOrigin::Store,
                        format!(
                            "partition {} column {position} has {len} rows, expected {expected}",
                            self.id
                        ),
                    ));
                }
                Some(_) => {}
            }
        }

        Ok(MemoryPartition {
            id: self.id,
            row_count: row_count.unwrap_or(0),
            columns: self.columns,
        })
    }
}

///
/// MemoryColumnAccessor
///

struct MemoryColumnAccessor {
    partition: PartitionId,
    column: ColumnIndex,
    values: Arc<[i32]>,
}

impl ColumnAccessor for MemoryColumnAccessor {
    fn column(&self) -> ColumnIndex {
        self.column
    }

    fn value_at(&self, row: RowId) -> Result<i32, InternalError> {
        usize::try_from(row.get())
            .ok()
            .and_then(|offset| self.values.get(offset).copied())
            .ok_or_else(|| {
                InternalError::row_out_of_bounds(self.partition, row, self.values.len() as u64)
            })
    }
}

///
/// TESTS
///
