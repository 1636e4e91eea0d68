use crate::{
    db::{ColumnIndex, Metadata},
    model::column::ColumnModel,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// ModelError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum ModelError {
    #[error("duplicate column '{column}' in table '{table}'")]
    DuplicateColumn { table: String, column: String },
}

///
/// TableMetadata
///
/// Immutable schema of one partitioned table. Column indexes are positions
/// in declaration order.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "RawTableMetadata", into = "RawTableMetadata")]
pub struct TableMetadata {
    name: String,
    columns: Vec<ColumnModel>,
    by_name: BTreeMap<String, ColumnIndex>,
}

impl TableMetadata {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnModel>) -> Result<Self, ModelError> {
        let name = name.into();
        let mut by_name = BTreeMap::new();

        for (position, column) in columns.iter().enumerate() {
            if by_name
                .insert(column.name.clone(), ColumnIndex::new(position))
                .is_some()
            {
                return Err(ModelError::DuplicateColumn {
                    table: name,
                    column: column.name.clone(),
                });
            }
        }

        Ok(Self {
            name,
            columns,
            by_name,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnModel] {
        &self.columns
    }

    #[must_use]
    pub fn column(&self, index: ColumnIndex) -> Option<&ColumnModel> {
        self.columns.get(index.get())
    }
}

impl Metadata for TableMetadata {
    fn column_index(&self, name: &str) -> Option<ColumnIndex> {
        self.by_name.get(name).copied()
    }
}

///
/// RawTableMetadata
/// Serialized form; validated into [`TableMetadata`].
///

#[derive(Deserialize, Serialize)]
struct RawTableMetadata {
    name: String,
    columns: Vec<ColumnModel>,
}

impl TryFrom<RawTableMetadata> for TableMetadata {
    type Error = ModelError;

    fn try_from(raw: RawTableMetadata) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.columns)
    }
}

impl From<TableMetadata> for RawTableMetadata {
    fn from(table: TableMetadata) -> Self {
        Self {
            name: table.name,
            columns: table.columns,
        }
    }
}

///
/// TESTS
///
