//! Error types for the table designer

use schemagrid_core::{CoreError, RowId};
use schemagrid_grid::GridError;
use thiserror::Error;

pub type DesignerResult<T> = Result<T, DesignerError>;

#[derive(Debug, Error)]
pub enum DesignerError {
    #[error("Unknown index: {0}")]
    UnknownIndex(RowId),

    #[error("Unknown foreign key: {0}")]
    UnknownForeignKey(RowId),

    #[error("No column is selected")]
    NoColumnSelected,

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Store(#[from] CoreError),
}
