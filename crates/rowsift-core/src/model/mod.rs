//! Runtime schema models.
//!
//! Types in `model` are what the metadata catalog hands to row sources at
//! bind time. They carry names and value encodings only; physical layout
//! lives behind `db::store`.

pub mod column;
pub mod table;
