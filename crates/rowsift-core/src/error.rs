use crate::db::{ColumnIndex, PartitionId, RowId};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Every failure after bind time (storage open, column reads, cursor
/// protocol misuse) surfaces as one of these.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    /// Construct an InternalError without origin-specific detail.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct an executor-origin invariant violation.
    pub(crate) fn executor_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Executor,
            message.into(),
        )
    }

    /// Construct a cursor-origin invariant violation (pull protocol misuse).
    pub(crate) fn cursor_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Cursor,
            message.into(),
        )
    }

    /// Construct a storage-open failure for one (partition, column) pair.
    pub fn storage_open(
        class: ErrorClass,
        partition: PartitionId,
        column: ColumnIndex,
        reason: impl Into<String>,
    ) -> Self {
        let reason = reason.into();
        let detail = StoreError::Open {
            partition,
            column,
            reason,
        };

        Self {
            class,
            origin: ErrorOrigin::Store,
            message: detail.to_string(),
            detail: Some(ErrorDetail::Store(detail)),
        }
    }

    /// Construct a row-out-of-bounds corruption error for a column read.
    pub(crate) fn row_out_of_bounds(partition: PartitionId, row: RowId, len: u64) -> Self {
        let detail = StoreError::RowOutOfBounds {
            partition,
            row,
            len,
        };

        Self {
            class: ErrorClass::Corruption,
            origin: ErrorOrigin::Store,
            message: detail.to_string(),
            detail: Some(ErrorDetail::Store(detail)),
        }
    }

    /// True when this error reports that a column could not be opened.
    #[must_use]
    pub const fn is_storage_open(&self) -> bool {
        matches!(
            self.detail,
            Some(ErrorDetail::Store(StoreError::Open { .. }))
        )
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Store(StoreError),
}

///
/// StoreError
///
/// Store-specific structured error detail.
/// Never returned directly; always wrapped in [`ErrorDetail::Store`].
///

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("cannot open column {column} of partition {partition}: {reason}")]
    Open {
        partition: PartitionId,
        column: ColumnIndex,
        reason: String,
    },

    #[error("row {row} out of bounds for partition {partition} ({len} rows)")]
    RowOutOfBounds {
        partition: PartitionId,
        row: RowId,
        len: u64,
    },
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Corruption,
    NotFound,
    Unsupported,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Corruption => "corruption",
            Self::NotFound => "not_found",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Store,
    Executor,
    Cursor,
    Config,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Store => "store",
            Self::Executor => "executor",
            Self::Cursor => "cursor",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
