//! Error types for the grid engine
//!
//! Rejected writes are values (`WriteOutcome::Rejected`), not errors. The
//! variants below signal workflow misuse: a host asked for a transition the
//! current state does not allow.

use schemagrid_core::{ColumnId, CoreError, RowId};
use thiserror::Error;

pub type GridResult<T> = Result<T, GridError>;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("No edit session is active")]
    NoActiveSession,

    #[error("No drag is in progress")]
    NoDragInProgress,

    #[error("Cannot start editing while rows are being dragged")]
    DragInProgress,

    #[error("Column '{0}' cannot be edited on the placeholder row")]
    PlaceholderNotEditable(ColumnId),

    #[error("Column '{0}' is not edited inline")]
    NotInlineEditable(ColumnId),

    #[error("Column '{0}' is read-only")]
    ReadOnly(ColumnId),

    #[error("Column '{0}' does not apply to this row")]
    NotApplicable(ColumnId),

    #[error("Column '{0}' is not a checkbox column")]
    NotToggleable(ColumnId),

    #[error("Unknown row: {0}")]
    UnknownRow(RowId),

    #[error("Unknown column: {0}")]
    UnknownColumn(ColumnId),

    #[error("Column '{0}' is defined twice")]
    DuplicateColumn(ColumnId),

    #[error("This grid has no placeholder row")]
    NoPlaceholder,

    #[error("Choice {index} is out of range ({len} choices)")]
    ChoiceOutOfRange { index: usize, len: usize },

    #[error("Store error: {0}")]
    Store(#[from] CoreError),
}
