//! Store behind the foreign key columns grid
//!
//! Like the index columns grid, one row per table column. The hidden
//! `referenced_table` field lets the referenced column's domain follow the
//! bound foreign key.

use std::rc::Rc;

use schemagrid_core::{ColumnId, CoreError, RecordStore, Result, RowId, Value, WriteOutcome};

use super::{SharedDesign, flag_of, referenced_table_columns, text_of};
use crate::models::{ForeignKeyDesign, ReferenceCatalog, TableDesign};

pub struct ForeignKeyColumnsStore {
    design: SharedDesign,
    catalog: Rc<ReferenceCatalog>,
    foreign_key: Option<RowId>,
}

impl ForeignKeyColumnsStore {
    pub const ENABLED: &'static str = "enabled";
    pub const COLUMN: &'static str = "column";
    pub const REFERENCED_COLUMN: &'static str = "referenced_column";
    pub const REFERENCED_TABLE: &'static str = "referenced_table";

    pub fn new(design: SharedDesign, catalog: Rc<ReferenceCatalog>) -> Self {
        Self {
            design,
            catalog,
            foreign_key: None,
        }
    }

    pub fn bind(&mut self, foreign_key: Option<RowId>) {
        self.foreign_key = foreign_key;
    }

    pub fn bound(&self) -> Option<RowId> {
        self.foreign_key
    }

    fn is_bound(&self) -> bool {
        self.foreign_key
            .is_some_and(|id| self.design.borrow().foreign_key(id).is_some())
    }

    fn apply(
        &self,
        design: &TableDesign,
        fk: &mut ForeignKeyDesign,
        column: &str,
        field: &str,
        value: &Value,
    ) -> std::result::Result<(), String> {
        match field {
            Self::ENABLED => {
                if flag_of(value)? {
                    if fk.referenced_column(column).is_none() {
                        fk.set_reference(column, "");
                    }
                } else {
                    fk.remove_column(column);
                }
            }
            Self::REFERENCED_COLUMN => {
                let referenced = text_of(value)?.trim();
                if referenced.is_empty() {
                    fk.remove_column(column);
                    return Ok(());
                }
                if fk.referenced_table.is_empty() {
                    return Err("Choose a referenced table first".to_string());
                }
                let candidates = referenced_table_columns(design, &self.catalog, &fk.referenced_table);
                if !candidates.iter().any(|c| c == referenced) {
                    return Err(format!(
                        "Column '{}' does not exist in table '{}'",
                        referenced, fk.referenced_table
                    ));
                }
                fk.set_reference(column, referenced);
            }
            Self::COLUMN | Self::REFERENCED_TABLE => {
                return Err(format!("'{}' is read-only", field));
            }
            _ => return Err(format!("Unknown foreign key column field '{}'", field)),
        }
        Ok(())
    }
}

impl RecordStore for ForeignKeyColumnsStore {
    fn count(&self) -> usize {
        if self.is_bound() {
            self.design.borrow().columns.len()
        } else {
            0
        }
    }

    fn row_id(&self, index: usize) -> Option<RowId> {
        if !self.is_bound() {
            return None;
        }
        self.design.borrow().columns.get(index).map(|c| c.id)
    }

    fn placeholder_id(&self) -> Option<RowId> {
        None
    }

    fn get_field(&self, row: RowId, column: &ColumnId) -> Option<Value> {
        let design = self.design.borrow();
        let fk = design.foreign_key(self.foreign_key?)?;
        let name = design.column(row)?.name.as_str();
        let referenced = fk.referenced_column(name);
        match column.as_str() {
            Self::ENABLED => Some(Value::Bool(referenced.is_some())),
            Self::COLUMN => Some(Value::text(name)),
            Self::REFERENCED_COLUMN => Some(Value::choice(referenced.unwrap_or_default())),
            Self::REFERENCED_TABLE => Some(Value::text(&fk.referenced_table)),
            _ => None,
        }
    }

    fn set_field(&mut self, row: RowId, column: &ColumnId, value: Value) -> WriteOutcome {
        let Some(fk_id) = self.foreign_key else {
            return WriteOutcome::rejected("No foreign key is selected");
        };
        let design = self.design.clone();
        let mut design = design.borrow_mut();
        let Some(name) = design.column(row).map(|c| c.name.clone()) else {
            return WriteOutcome::rejected("The column no longer exists");
        };
        let Some(mut updated) = design.foreign_key(fk_id).cloned() else {
            return WriteOutcome::rejected("The foreign key no longer exists");
        };

        if let Err(reason) = self.apply(&design, &mut updated, &name, column.as_str(), &value) {
            return WriteOutcome::Rejected(reason);
        }
        if let Some(slot) = design.foreign_key_mut(fk_id) {
            *slot = updated;
        }
        WriteOutcome::Accepted
    }

    fn activate_placeholder(&mut self, row: RowId) -> Result<bool> {
        Err(CoreError::NotPlaceholder(row))
    }

    fn deactivate_placeholder(&mut self, _row: RowId) {}

    fn reorder(&mut self, _rows: &[RowId], _destination: usize) -> Result<()> {
        Err(CoreError::Other(
            "Foreign key columns follow the table's column order".to_string(),
        ))
    }

    fn remove(&mut self, _rows: &[RowId]) -> Result<()> {
        Err(CoreError::Other(
            "Foreign key columns are removed by unchecking them".to_string(),
        ))
    }
}
