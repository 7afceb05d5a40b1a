//! Store behind the foreign keys grid

use std::rc::Rc;
use std::str::FromStr;

use schemagrid_core::{ColumnId, CoreError, RecordStore, Result, RowId, Value, WriteOutcome};

use super::{SharedDesign, ensure_known, referenceable_tables, reorder_by_id, text_of};
use crate::models::{
    ForeignKeyAction, ForeignKeyDesign, ReferenceCatalog, TableDesign, next_free_name,
};
use crate::settings::DesignerSettings;

pub struct ForeignKeysStore {
    design: SharedDesign,
    catalog: Rc<ReferenceCatalog>,
    settings: DesignerSettings,
    placeholder: RowId,
    pending: Option<ForeignKeyDesign>,
}

impl ForeignKeysStore {
    pub const NAME: &'static str = "name";
    pub const REFERENCED_TABLE: &'static str = "referenced_table";
    pub const ON_UPDATE: &'static str = "on_update";
    pub const ON_DELETE: &'static str = "on_delete";

    pub fn new(
        design: SharedDesign,
        catalog: Rc<ReferenceCatalog>,
        settings: DesignerSettings,
    ) -> Self {
        Self {
            design,
            catalog,
            settings,
            placeholder: RowId::new(),
            pending: None,
        }
    }

    pub fn design(&self) -> &SharedDesign {
        &self.design
    }

    /// `fk_<table>_1`, `fk_<table>_2`, ... whichever is free first
    fn defaults(&self) -> ForeignKeyDesign {
        let design = self.design.borrow();
        let base = DesignerSettings::expand(
            &self.settings.unreferenced_foreign_key_name,
            &design.table_name,
            "",
        );
        let name = (1..)
            .map(|n| format!("{}{}", base, n))
            .find(|candidate| !design.has_foreign_key_named(candidate, None))
            .unwrap_or_else(|| base.clone());

        let mut fk = ForeignKeyDesign::new().named(name);
        fk.id = self.placeholder;
        fk.generated_name = true;
        fk
    }

    fn read(fk: &ForeignKeyDesign, field: &str) -> Option<Value> {
        match field {
            Self::NAME => Some(Value::text(&fk.name)),
            Self::REFERENCED_TABLE => Some(Value::choice(&fk.referenced_table)),
            Self::ON_UPDATE => Some(Value::choice(fk.on_update.to_string())),
            Self::ON_DELETE => Some(Value::choice(fk.on_delete.to_string())),
            _ => None,
        }
    }

    fn apply(
        &self,
        design: &TableDesign,
        fk: &mut ForeignKeyDesign,
        field: &str,
        value: &Value,
    ) -> std::result::Result<(), String> {
        match field {
            Self::NAME => {
                let name = text_of(value)?.trim();
                if name.is_empty() {
                    return Err("Foreign key name cannot be empty".to_string());
                }
                if design.has_foreign_key_named(name, Some(fk.id)) {
                    return Err(format!("Foreign key name '{}' already exists", name));
                }
                if name != fk.name {
                    fk.generated_name = false;
                }
                fk.name = name.to_string();
            }
            Self::REFERENCED_TABLE => {
                let table = text_of(value)?.trim();
                if !referenceable_tables(design, &self.catalog)
                    .iter()
                    .any(|t| t == table)
                {
                    return Err(format!("Unknown table '{}'", table));
                }
                if table != fk.referenced_table {
                    fk.columns.clear();
                    fk.referenced_columns.clear();
                }
                fk.referenced_table = table.to_string();
                if fk.generated_name {
                    let name = DesignerSettings::expand(
                        &self.settings.foreign_key_name,
                        &design.table_name,
                        table,
                    );
                    let id = fk.id;
                    fk.name = next_free_name(&name, |candidate| {
                        design.has_foreign_key_named(candidate, Some(id))
                    });
                }
            }
            Self::ON_UPDATE | Self::ON_DELETE => {
                let raw = text_of(value)?;
                let action = ForeignKeyAction::from_str(raw.trim())
                    .map_err(|_| format!("Unknown referential action '{}'", raw))?;
                if field == Self::ON_UPDATE {
                    fk.on_update = action;
                } else {
                    fk.on_delete = action;
                }
            }
            _ => return Err(format!("Unknown foreign key field '{}'", field)),
        }
        Ok(())
    }

    fn write_placeholder(&mut self, field: &str, value: &Value) -> WriteOutcome {
        let mut fk = match self.pending.take() {
            Some(fk) => fk,
            None => self.defaults(),
        };

        let design = self.design.clone();
        let mut design = design.borrow_mut();
        if let Err(reason) = self.apply(&design, &mut fk, field, value) {
            self.pending = Some(fk);
            return WriteOutcome::Rejected(reason);
        }

        tracing::debug!(table = %design.table_name, foreign_key = %fk.name, "added foreign key");
        design.foreign_keys.push(fk);
        self.placeholder = RowId::new();
        WriteOutcome::Accepted
    }
}

impl RecordStore for ForeignKeysStore {
    fn count(&self) -> usize {
        self.design.borrow().foreign_keys.len()
    }

    fn row_id(&self, index: usize) -> Option<RowId> {
        self.design.borrow().foreign_keys.get(index).map(|fk| fk.id)
    }

    fn placeholder_id(&self) -> Option<RowId> {
        Some(self.placeholder)
    }

    fn get_field(&self, row: RowId, column: &ColumnId) -> Option<Value> {
        if row == self.placeholder {
            return Self::read(self.pending.as_ref()?, column.as_str());
        }
        Self::read(self.design.borrow().foreign_key(row)?, column.as_str())
    }

    fn set_field(&mut self, row: RowId, column: &ColumnId, value: Value) -> WriteOutcome {
        if row == self.placeholder {
            return self.write_placeholder(column.as_str(), &value);
        }

        let design = self.design.clone();
        let mut design = design.borrow_mut();
        let Some(mut updated) = design.foreign_key(row).cloned() else {
            return WriteOutcome::rejected("The foreign key no longer exists");
        };
        if let Err(reason) = self.apply(&design, &mut updated, column.as_str(), &value) {
            return WriteOutcome::Rejected(reason);
        }
        if let Some(slot) = design.foreign_key_mut(row) {
            *slot = updated;
        }
        WriteOutcome::Accepted
    }

    fn activate_placeholder(&mut self, row: RowId) -> Result<bool> {
        if row != self.placeholder {
            return Err(CoreError::NotPlaceholder(row));
        }
        self.pending = Some(self.defaults());
        Ok(true)
    }

    fn deactivate_placeholder(&mut self, row: RowId) {
        if self.pending.as_ref().is_some_and(|fk| fk.id == row) {
            self.pending = None;
        }
    }

    fn reorder(&mut self, rows: &[RowId], destination: usize) -> Result<()> {
        let mut design = self.design.borrow_mut();
        reorder_by_id(&mut design.foreign_keys, |fk| fk.id, rows, destination)
    }

    fn remove(&mut self, rows: &[RowId]) -> Result<()> {
        let mut design = self.design.borrow_mut();
        ensure_known(rows, |id| design.foreign_key(id).is_some())?;
        design.foreign_keys.retain(|fk| !rows.contains(&fk.id));
        Ok(())
    }
}
