//! The record store contract
//!
//! A `RecordStore` is the backend collection one grid is bound to: the
//! columns of a table, the indexes of a table, the columns of one index, and
//! so on. The grid engine never caches store content; it rebuilds its rows
//! from the store after every mutation.

use crate::{ColumnId, Result, RowId, Value, WriteOutcome};

/// Ordered backend collection keyed by stable row identifiers
///
/// All calls are synchronous and happen on the UI thread.
///
/// # Placeholder rows
///
/// Growable stores expose the id of the trailing placeholder row through
/// [`placeholder_id`](RecordStore::placeholder_id). Editing that row goes
/// through [`activate_placeholder`](RecordStore::activate_placeholder), which
/// lets the store fill in defaults, followed by ordinary
/// [`set_field`](RecordStore::set_field) calls. The first accepted write turns
/// the placeholder into a real record that keeps the same `RowId`, and the
/// store allocates a new placeholder id. An activated placeholder that never
/// received an accepted write is discarded by
/// [`deactivate_placeholder`](RecordStore::deactivate_placeholder).
pub trait RecordStore {
    /// Number of real (materialized) rows
    fn count(&self) -> usize;

    /// Id of the real row at `index`, in display order
    fn row_id(&self, index: usize) -> Option<RowId>;

    /// Id of the current placeholder row
    ///
    /// Stores whose membership is fixed by another collection (for example
    /// the columns of an index, which list every table column) return `None`.
    fn placeholder_id(&self) -> Option<RowId>;

    /// Read one field
    ///
    /// `None` means the field does not apply to the row in its current state
    /// (e.g. auto increment on a text column). Such cells render empty and
    /// disabled.
    fn get_field(&self, row: RowId, column: &ColumnId) -> Option<Value>;

    /// Write one field
    ///
    /// A write may change other fields of the same row; callers re-read the
    /// whole row after an accepted write.
    fn set_field(&mut self, row: RowId, column: &ColumnId, value: Value) -> WriteOutcome;

    /// Mark the placeholder as being edited and apply defaults
    ///
    /// Returns `true` when defaults were applied.
    ///
    /// # Errors
    /// Returns an error if `row` is not the current placeholder.
    fn activate_placeholder(&mut self, row: RowId) -> Result<bool>;

    /// Undo [`activate_placeholder`](RecordStore::activate_placeholder)
    ///
    /// Does nothing if the placeholder was already materialized or never
    /// activated.
    fn deactivate_placeholder(&mut self, row: RowId);

    /// Move `rows` as one block so that they land at `destination`
    ///
    /// `destination` is an index into the row list before the move, in the
    /// range `0..=count()`. The moved rows keep their relative order.
    ///
    /// # Errors
    /// Returns an error if a row is unknown or the destination is out of range.
    fn reorder(&mut self, rows: &[RowId], destination: usize) -> Result<()>;

    /// Delete real rows
    ///
    /// # Errors
    /// Returns an error if a row is unknown.
    fn remove(&mut self, rows: &[RowId]) -> Result<()>;

    /// Position of a real row, if it exists
    fn index_of(&self, row: RowId) -> Option<usize> {
        (0..self.count()).find(|&i| self.row_id(i) == Some(row))
    }
}

/// Compute the order of a block move
///
/// `ids` is the current order, `moved` the rows to move, `destination` an
/// index into `ids` before the move. Shared by stores that keep their rows in
/// a vector.
pub fn reordered<T: Copy + PartialEq>(ids: &[T], moved: &[T], destination: usize) -> Vec<T> {
    let before = ids[..destination.min(ids.len())]
        .iter()
        .filter(|id| moved.contains(id))
        .count();
    let mut remaining: Vec<T> = ids.iter().copied().filter(|id| !moved.contains(id)).collect();
    let insert_at = destination.saturating_sub(before).min(remaining.len());
    let block: Vec<T> = ids.iter().copied().filter(|id| moved.contains(id)).collect();
    remaining.splice(insert_at..insert_at, block);
    remaining
}
