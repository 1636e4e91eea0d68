use serde::{Deserialize, Serialize};

///
/// ColumnModel
/// Runtime column metadata used at bind time.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ColumnModel {
    /// Column name as referenced by row sources.
    pub name: String,
    /// Encoding of the fixed-width value stored per row.
    pub kind: ColumnKind,
}

impl ColumnModel {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

///
/// ColumnKind
///
/// Both kinds are stored as one `i32` code per row; the distinction is
/// informational for row sources that compare codes.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Raw integer attribute.
    Int,
    /// Dictionary-encoded categorical value.
    Symbol,
}
