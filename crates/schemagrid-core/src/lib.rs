//! SchemaGrid Core - shared vocabulary for the editable grid engine
//!
//! This crate provides the types every other SchemaGrid crate depends on:
//!
//! - `RecordStore` - the backend collection a grid is bound to
//! - `RowId` / `ColumnId` - stable row identity and column keys
//! - `Value` / `WriteOutcome` - cell values and the result of a field write

mod error;
mod store;
mod types;

pub use error::*;
pub use store::*;
pub use types::*;
