//! Record stores over a shared table design
//!
//! Each grid of the table editor is bound to one store. All stores of an
//! editor share the same [`TableDesign`], so a write through one grid is
//! visible to the others on their next read.

mod columns;
mod foreign_key_columns;
mod foreign_keys;
mod index_columns;
mod indexes;

use std::cell::RefCell;
use std::rc::Rc;

use schemagrid_core::{CoreError, Result, RowId, Value, reordered};

use crate::models::{ReferenceCatalog, TableDesign};

pub use columns::ColumnsStore;
pub use foreign_key_columns::ForeignKeyColumnsStore;
pub use foreign_keys::ForeignKeysStore;
pub use index_columns::IndexColumnsStore;
pub use indexes::IndexesStore;

pub type SharedDesign = Rc<RefCell<TableDesign>>;

/// Move `rows` of `items` as one block to `destination`
pub(crate) fn reorder_by_id<T>(
    items: &mut Vec<T>,
    id_of: impl Fn(&T) -> RowId,
    rows: &[RowId],
    destination: usize,
) -> Result<()> {
    if destination > items.len() {
        return Err(CoreError::DestinationOutOfRange {
            destination,
            count: items.len(),
        });
    }
    let ids: Vec<RowId> = items.iter().map(&id_of).collect();
    if let Some(unknown) = rows.iter().find(|id| !ids.contains(id)) {
        return Err(CoreError::UnknownRow(*unknown));
    }

    let order = reordered(&ids, rows, destination);
    let mut old: Vec<Option<T>> = std::mem::take(items).into_iter().map(Some).collect();
    for id in order {
        if let Some(position) = ids.iter().position(|i| *i == id)
            && let Some(item) = old[position].take()
        {
            items.push(item);
        }
    }
    Ok(())
}

/// Fail with `UnknownRow` unless every row is known
pub(crate) fn ensure_known(rows: &[RowId], known: impl Fn(RowId) -> bool) -> Result<()> {
    match rows.iter().find(|id| !known(**id)) {
        Some(unknown) => Err(CoreError::UnknownRow(*unknown)),
        None => Ok(()),
    }
}

pub(crate) fn text_of(value: &Value) -> std::result::Result<&str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("Expected text, got '{}'", value))
}

pub(crate) fn flag_of(value: &Value) -> std::result::Result<bool, String> {
    value
        .as_bool()
        .ok_or_else(|| format!("Expected a checkbox value, got '{}'", value))
}

/// Tables a foreign key of `design` may reference: the catalog plus the
/// table itself
pub fn referenceable_tables(design: &TableDesign, catalog: &ReferenceCatalog) -> Vec<String> {
    let mut tables = catalog.table_names();
    if !design.table_name.is_empty() && !catalog.contains(&design.table_name) {
        tables.push(design.table_name.clone());
    }
    tables
}

/// Columns of a referenceable table; a self reference lists the design's
/// own columns
pub fn referenced_table_columns(
    design: &TableDesign,
    catalog: &ReferenceCatalog,
    table: &str,
) -> Vec<String> {
    if table == design.table_name {
        return design.column_names().into_iter().map(String::from).collect();
    }
    catalog.columns(table).map(<[String]>::to_vec).unwrap_or_default()
}
