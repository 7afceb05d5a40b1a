//! Store behind the columns grid

use schemagrid_core::{ColumnId, CoreError, RecordStore, Result, RowId, Value, WriteOutcome};

use super::{SharedDesign, ensure_known, flag_of, reorder_by_id, text_of};
use crate::models::{ColumnDesign, TableDesign, next_free_name, parse_type};
use crate::settings::DesignerSettings;

/// Columns of the table, plus a placeholder for the next column
pub struct ColumnsStore {
    design: SharedDesign,
    settings: DesignerSettings,
    placeholder: RowId,
    /// Column being entered on the placeholder row
    pending: Option<ColumnDesign>,
}

impl ColumnsStore {
    pub const NAME: &'static str = "name";
    pub const TYPE: &'static str = "type";
    pub const PK: &'static str = "pk";
    pub const NN: &'static str = "nn";
    pub const UQ: &'static str = "uq";
    pub const UN: &'static str = "un";
    pub const ZF: &'static str = "zf";
    pub const AI: &'static str = "ai";
    pub const BIN: &'static str = "bin";
    pub const G: &'static str = "g";
    pub const DEFAULT: &'static str = "default";
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

    /// Column the placeholder starts out as
    ///
    /// The first column of a table defaults to an integer primary key named
    /// after the table; later ones get a numbered name and the default type.
    fn defaults(&self) -> ColumnDesign {
        let design = self.design.borrow();
        let table = design.table_name.as_str();
        let first = design.columns.is_empty();
        let (pattern, data_type) = if first {
            (&self.settings.first_column_name, &self.settings.first_column_type)
        } else {
            (&self.settings.column_name, &self.settings.column_type)
        };

        let mut column = ColumnDesign::new(design.columns.len()).data_type(data_type.as_str());
        column.id = self.placeholder;
        column.name = next_free_name(&DesignerSettings::expand(pattern, table, ""), |name| {
            design.has_column_named(name, None)
        });
        if first {
            column = column.primary_key();
        }
        column
    }

    fn read(column: &ColumnDesign, field: &str, design: &TableDesign) -> Option<Value> {
        let parsed = parse_type(&column.data_type, &design.dialect).ok();
        let numeric = parsed.as_ref().is_some_and(|t| t.is_numeric());
        let integer = parsed.as_ref().is_some_and(|t| t.is_integer());
        let textual = parsed.as_ref().is_some_and(|t| t.is_textual());
        match field {
            Self::NAME => Some(Value::text(&column.name)),
            Self::TYPE => Some(Value::choice(&column.data_type)),
            Self::PK => Some(Value::Bool(column.is_primary_key)),
            Self::NN => Some(Value::Bool(!column.nullable)),
            Self::UQ => Some(Value::Bool(column.is_unique)),
            Self::UN => numeric.then_some(Value::Bool(column.is_unsigned)),
            Self::ZF => numeric.then_some(Value::Bool(column.is_zerofill)),
            Self::AI => integer.then_some(Value::Bool(column.is_auto_increment)),
            Self::BIN => textual.then_some(Value::Bool(column.is_binary)),
            Self::G => Some(Value::Bool(column.is_generated)),
            Self::DEFAULT => Some(Value::text(column.default_value.clone().unwrap_or_default())),
            Self::COMMENT => Some(Value::text(column.comment.clone().unwrap_or_default())),
            _ => None,
        }
    }

    /// Validate `value` and apply it to `column`
    fn apply(
        design: &TableDesign,
        column: &mut ColumnDesign,
        field: &str,
        value: &Value,
    ) -> std::result::Result<(), String> {
        match field {
            Self::NAME => {
                let name = text_of(value)?.trim();
                if name.is_empty() {
                    return Err("Column name cannot be empty".to_string());
                }
                if design.has_column_named(name, Some(column.id)) {
                    return Err(format!("Column name '{}' already exists", name));
                }
                column.name = name.to_string();
            }
            Self::TYPE => {
                let parsed =
                    parse_type(text_of(value)?, &design.dialect).map_err(|err| err.message)?;
                column.data_type = parsed.to_string();
                if !parsed.is_integer() {
                    column.is_auto_increment = false;
                }
                if !parsed.is_numeric() {
                    column.is_unsigned = false;
                    column.is_zerofill = false;
                }
                if !parsed.is_textual() {
                    column.is_binary = false;
                }
            }
            Self::PK => {
                column.is_primary_key = flag_of(value)?;
                if column.is_primary_key {
                    column.nullable = false;
                }
            }
            Self::NN => {
                let not_null = flag_of(value)?;
                if !not_null && column.is_primary_key {
                    return Err("Primary key columns cannot be NULL".to_string());
                }
                column.nullable = !not_null;
            }
            Self::UQ => column.is_unique = flag_of(value)?,
            Self::UN | Self::ZF | Self::AI | Self::BIN => {
                let on = flag_of(value)?;
                let parsed = parse_type(&column.data_type, &design.dialect).ok();
                let applies = match field {
                    Self::AI => parsed.as_ref().is_some_and(|t| t.is_integer()),
                    Self::BIN => parsed.as_ref().is_some_and(|t| t.is_textual()),
                    _ => parsed.as_ref().is_some_and(|t| t.is_numeric()),
                };
                if !applies {
                    return Err(format!(
                        "{} does not apply to type {}",
                        field.to_uppercase(),
                        column.data_type
                    ));
                }
                match field {
                    Self::UN => column.is_unsigned = on,
                    Self::ZF => {
                        column.is_zerofill = on;
                        if on {
                            column.is_unsigned = true;
                        }
                    }
                    Self::BIN => column.is_binary = on,
                    _ => {
                        if on && column.is_generated {
                            return Err("Generated columns cannot be AUTO_INCREMENT".to_string());
                        }
                        column.is_auto_increment = on;
                    }
                }
            }
            Self::G => {
                column.is_generated = flag_of(value)?;
                if column.is_generated {
                    column.is_auto_increment = false;
                }
            }
            Self::DEFAULT => {
                let text = text_of(value)?;
                column.default_value = (!text.is_empty()).then(|| text.to_string());
            }
            Self::COMMENT => {
                let text = text_of(value)?;
                column.comment = (!text.is_empty()).then(|| text.to_string());
            }
            _ => return Err(format!("Unknown column field '{}'", field)),
        }
        Ok(())
    }

    fn write_placeholder(&mut self, field: &str, value: &Value) -> WriteOutcome {
        let mut column = match self.pending.take() {
            Some(column) => column,
            None => self.defaults(),
        };

        let mut design = self.design.borrow_mut();
        if let Err(reason) = Self::apply(&design, &mut column, field, value) {
            self.pending = Some(column);
            return WriteOutcome::Rejected(reason);
        }

        column.ordinal = design.columns.len();
        tracing::debug!(table = %design.table_name, column = %column.name, "added column");
        design.columns.push(column);
        design.sync_primary_index();
        self.placeholder = RowId::new();
        WriteOutcome::Accepted
    }
}

impl RecordStore for ColumnsStore {
    fn count(&self) -> usize {
        self.design.borrow().columns.len()
    }

    fn row_id(&self, index: usize) -> Option<RowId> {
        self.design.borrow().columns.get(index).map(|c| c.id)
    }

    fn placeholder_id(&self) -> Option<RowId> {
        Some(self.placeholder)
    }

    fn get_field(&self, row: RowId, column: &ColumnId) -> Option<Value> {
        let design = self.design.borrow();
        if row == self.placeholder {
            let pending = self.pending.as_ref()?;
            return Self::read(pending, column.as_str(), &design);
        }
        Self::read(design.column(row)?, column.as_str(), &design)
    }

    fn set_field(&mut self, row: RowId, column: &ColumnId, value: Value) -> WriteOutcome {
        if row == self.placeholder {
            return self.write_placeholder(column.as_str(), &value);
        }

        let mut design = self.design.borrow_mut();
        let Some(mut updated) = design.column(row).cloned() else {
            return WriteOutcome::rejected("The column no longer exists");
        };
        if let Err(reason) = Self::apply(&design, &mut updated, column.as_str(), &value) {
            return WriteOutcome::Rejected(reason);
        }

        design.rename_column(row, updated.name.clone());
        if let Some(slot) = design.column_mut(row) {
            *slot = updated;
        }
        design.sync_primary_index();
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
        if self.pending.as_ref().is_some_and(|c| c.id == row) {
            self.pending = None;
        }
    }

    fn reorder(&mut self, rows: &[RowId], destination: usize) -> Result<()> {
        let mut design = self.design.borrow_mut();
        reorder_by_id(&mut design.columns, |c| c.id, rows, destination)?;
        design.renumber();
        Ok(())
    }

    fn remove(&mut self, rows: &[RowId]) -> Result<()> {
        let mut design = self.design.borrow_mut();
        ensure_known(rows, |id| design.column(id).is_some())?;
        design.remove_columns(rows);
        Ok(())
    }
}
