//! Error types for rowtable.

use thiserror::Error;

/// Result type alias for rowtable operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for rowtable operations.
///
/// Every variant is raised before any state is touched, so a failed call
/// leaves the table exactly as it was.
#[derive(Debug, Error)]
pub enum Error {
    /// More values were supplied than the table declares columns.
    #[error("row shape mismatch: {supplied} values supplied for {declared} declared columns")]
    RowShape { supplied: usize, declared: usize },
    /// The number of parallel value sequences differs from the column count.
    #[error("arity mismatch: {supplied} value sequences supplied, table has {expected} columns")]
    Arity { supplied: usize, expected: usize },
    /// A parallel value sequence has a different length than the first one.
    #[error("column {column} has {supplied} values, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        supplied: usize,
    },
    /// No column definition to derive a signature from.
    #[error("signature definition missing: a schema needs at least one column")]
    DefinitionMissing,
    /// Invalid schema definition.
    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },
    /// Exported table could not be rendered. Always present: serde_json is
    /// a hard dependency of this crate through the schema signature.
    #[error("export failed: {0}")]
    Export(#[from] serde_json::Error),
}

impl Error {
    /// Creates a row shape error.
    pub fn row_shape(supplied: usize, declared: usize) -> Self {
        Error::RowShape { supplied, declared }
    }

    /// Creates an arity error.
    pub fn arity(supplied: usize, expected: usize) -> Self {
        Error::Arity { supplied, expected }
    }

    /// Creates a ragged column error.
    pub fn column_length(column: impl Into<String>, expected: usize, supplied: usize) -> Self {
        Error::ColumnLength {
            column: column.into(),
            expected,
            supplied,
        }
    }

    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Error::InvalidSchema {
            message: message.into(),
        }
    }

    /// Returns true for errors caused by the shape of caller input.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Error::RowShape { .. } | Error::Arity { .. } | Error::ColumnLength { .. }
        )
    }
}
