//! Error types for SchemaGrid

use thiserror::Error;

use crate::{ColumnId, RowId};

/// Core error type for record store operations
///
/// A rejected field write is not an error; stores report it through
/// [`WriteOutcome::Rejected`](crate::WriteOutcome). These variants cover
/// requests that can never succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown row: {0}")]
    UnknownRow(RowId),

    #[error("Unknown column: {0}")]
    UnknownColumn(ColumnId),

    #[error("Row {0} is not the current placeholder")]
    NotPlaceholder(RowId),

    #[error("Reorder destination {destination} is out of range (row count {count})")]
    DestinationOutOfRange { destination: usize, count: usize },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
