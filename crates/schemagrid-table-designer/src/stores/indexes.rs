//! Store behind the indexes grid

use std::str::FromStr;

use schemagrid_core::{ColumnId, CoreError, RecordStore, Result, RowId, Value, WriteOutcome};

use super::{SharedDesign, ensure_known, reorder_by_id, text_of};
use crate::models::{IndexDesign, IndexKind, TableDesign, next_free_name};
use crate::settings::DesignerSettings;

const PRIMARY_NAME: &str = "PRIMARY";

pub struct IndexesStore {
    design: SharedDesign,
    settings: DesignerSettings,
    placeholder: RowId,
    pending: Option<IndexDesign>,
}

impl IndexesStore {
    pub const NAME: &'static str = "name";
    pub const TYPE: &'static str = "type";
    pub const COMMENT: &'static str = "comment";

    pub fn new(design: SharedDesign, settings: DesignerSettings) -> Self {
        Self {
            design,
            settings,
            placeholder: RowId::new(),
            pending: None,
        }
    }

    pub fn design(&self) -> &SharedDesign {
        &self.design
    }

    fn defaults(&self) -> IndexDesign {
        let design = self.design.borrow();
        let base = DesignerSettings::expand(&self.settings.index_name, &design.table_name, "");
        let mut index = IndexDesign::named(next_free_name(&base, |name| {
            design.has_index_named(name, None)
        }));
        index.id = self.placeholder;
        index
    }

    fn read(index: &IndexDesign, field: &str) -> Option<Value> {
        match field {
            Self::NAME => Some(Value::text(&index.name)),
            Self::TYPE => Some(Value::choice(index.kind.to_string())),
            Self::COMMENT => Some(Value::text(index.comment.clone().unwrap_or_default())),
            _ => None,
        }
    }

    fn apply(
        design: &TableDesign,
        index: &mut IndexDesign,
        field: &str,
        value: &Value,
    ) -> std::result::Result<(), String> {
        if index.is_primary() && field != Self::COMMENT {
            return Err("The PRIMARY index is defined by the PK column flags".to_string());
        }
        match field {
            Self::NAME => {
                let name = text_of(value)?.trim();
                if name.is_empty() {
                    return Err("Index name cannot be empty".to_string());
                }
                if name.eq_ignore_ascii_case(PRIMARY_NAME) {
                    return Err("The name PRIMARY is reserved for the primary key".to_string());
                }
                if design.has_index_named(name, Some(index.id)) {
                    return Err(format!("Index name '{}' already exists", name));
                }
                index.name = name.to_string();
            }
            Self::TYPE => {
                let raw = text_of(value)?;
                let kind = IndexKind::from_str(raw.trim())
                    .map_err(|_| format!("Unknown index type '{}'", raw))?;
                if kind == IndexKind::Primary {
                    return Err("Mark columns as PK to define the primary key".to_string());
                }
                index.kind = kind;
            }
            Self::COMMENT => {
                let text = text_of(value)?;
                index.comment = (!text.is_empty()).then(|| text.to_string());
            }
            _ => return Err(format!("Unknown index field '{}'", field)),
        }
        Ok(())
    }

    fn write_placeholder(&mut self, field: &str, value: &Value) -> WriteOutcome {
        let mut index = match self.pending.take() {
            Some(index) => index,
            None => self.defaults(),
        };

        let mut design = self.design.borrow_mut();
        if let Err(reason) = Self::apply(&design, &mut index, field, value) {
            self.pending = Some(index);
            return WriteOutcome::Rejected(reason);
        }

        tracing::debug!(table = %design.table_name, index = %index.name, "added index");
        design.indexes.push(index);
        self.placeholder = RowId::new();
        WriteOutcome::Accepted
    }
}

impl RecordStore for IndexesStore {
    fn count(&self) -> usize {
        self.design.borrow().indexes.len()
    }

    fn row_id(&self, index: usize) -> Option<RowId> {
        self.design.borrow().indexes.get(index).map(|i| i.id)
    }

    fn placeholder_id(&self) -> Option<RowId> {
        Some(self.placeholder)
    }

    fn get_field(&self, row: RowId, column: &ColumnId) -> Option<Value> {
        if row == self.placeholder {
            return Self::read(self.pending.as_ref()?, column.as_str());
        }
        Self::read(self.design.borrow().index(row)?, column.as_str())
    }

    fn set_field(&mut self, row: RowId, column: &ColumnId, value: Value) -> WriteOutcome {
        if row == self.placeholder {
            return self.write_placeholder(column.as_str(), &value);
        }

        let mut design = self.design.borrow_mut();
        let Some(mut updated) = design.index(row).cloned() else {
            return WriteOutcome::rejected("The index no longer exists");
        };
        if let Err(reason) = Self::apply(&design, &mut updated, column.as_str(), &value) {
            return WriteOutcome::Rejected(reason);
        }
        if let Some(slot) = design.index_mut(row) {
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
        if self.pending.as_ref().is_some_and(|i| i.id == row) {
            self.pending = None;
        }
    }

    fn reorder(&mut self, rows: &[RowId], destination: usize) -> Result<()> {
        let mut design = self.design.borrow_mut();
        reorder_by_id(&mut design.indexes, |i| i.id, rows, destination)
    }

    /// Removing the PRIMARY index drops the primary key
    fn remove(&mut self, rows: &[RowId]) -> Result<()> {
        let mut design = self.design.borrow_mut();
        ensure_known(rows, |id| design.index(id).is_some())?;
        let drops_primary = design
            .indexes
            .iter()
            .any(|i| rows.contains(&i.id) && i.is_primary());
        design.indexes.retain(|i| !rows.contains(&i.id));
        if drops_primary {
            for column in &mut design.columns {
                column.is_primary_key = false;
            }
        }
        Ok(())
    }
}
