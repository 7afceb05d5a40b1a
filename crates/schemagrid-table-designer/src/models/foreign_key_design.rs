//! Foreign key design model

use schemagrid_core::RowId;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Referential action for ON UPDATE / ON DELETE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum ForeignKeyAction {
    #[default]
    #[strum(to_string = "NO ACTION")]
    NoAction,
    #[strum(to_string = "RESTRICT")]
    Restrict,
    #[strum(to_string = "CASCADE")]
    Cascade,
    #[strum(to_string = "SET NULL")]
    SetNull,
    #[strum(to_string = "SET DEFAULT")]
    SetDefault,
}

impl ForeignKeyAction {
    pub fn choices() -> Vec<String> {
        Self::iter().map(|action| action.to_string()).collect()
    }
}

/// Foreign key design model
///
/// `columns` and `referenced_columns` are parallel: the local column at
/// position `i` references `referenced_columns[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyDesign {
    /// Stable identity of the foreign key's grid row
    pub id: RowId,
    /// Constraint name
    pub name: String,
    /// Whether `name` was generated and may follow the referenced table
    pub generated_name: bool,
    /// Local columns
    pub columns: Vec<String>,
    /// Referenced table name
    pub referenced_table: String,
    /// Referenced columns
    pub referenced_columns: Vec<String>,
    /// Action on update
    pub on_update: ForeignKeyAction,
    /// Action on delete
    pub on_delete: ForeignKeyAction,
}

impl ForeignKeyDesign {
    /// Create a new empty foreign key design
    pub fn new() -> Self {
        Self {
            id: RowId::new(),
            name: String::new(),
            generated_name: false,
            columns: Vec::new(),
            referenced_table: String::new(),
            referenced_columns: Vec::new(),
            on_update: ForeignKeyAction::NoAction,
            on_delete: ForeignKeyAction::NoAction,
        }
    }

    /// Builder: set constraint name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder: add a local column referencing `referenced`
    pub fn column(mut self, name: impl Into<String>, referenced: impl Into<String>) -> Self {
        self.columns.push(name.into());
        self.referenced_columns.push(referenced.into());
        self
    }

    /// Builder: set referenced table
    pub fn references(mut self, table: impl Into<String>) -> Self {
        self.referenced_table = table.into();
        self
    }

    /// Builder: set on delete action
    pub fn on_delete(mut self, action: ForeignKeyAction) -> Self {
        self.on_delete = action;
        self
    }

    /// Builder: set on update action
    pub fn on_update(mut self, action: ForeignKeyAction) -> Self {
        self.on_update = action;
        self
    }

    /// Referenced column of a local column, if the column takes part
    pub fn referenced_column(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.referenced_columns.get(i))
            .map(String::as_str)
    }

    /// Add `column` or change what it references
    pub fn set_reference(&mut self, column: &str, referenced: impl Into<String>) {
        let referenced = referenced.into();
        match self.columns.iter().position(|c| c == column) {
            Some(i) => self.referenced_columns[i] = referenced,
            None => {
                self.columns.push(column.to_string());
                self.referenced_columns.push(referenced);
            }
        }
    }

    pub fn remove_column(&mut self, column: &str) {
        if let Some(i) = self.columns.iter().position(|c| c == column) {
            self.columns.remove(i);
            self.referenced_columns.remove(i);
        }
    }
}

impl Default for ForeignKeyDesign {
    fn default() -> Self {
        Self::new()
    }
}
