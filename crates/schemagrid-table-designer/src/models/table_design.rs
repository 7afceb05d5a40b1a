//! Table design model

use std::collections::HashSet;

use schemagrid_core::RowId;

use super::{ColumnDesign, DatabaseDialect, ForeignKeyDesign, IndexDesign, ValidationError};

/// Table design model shared by every grid of one table editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDesign {
    /// Table name
    pub table_name: String,
    /// Database dialect
    pub dialect: DatabaseDialect,
    /// Columns
    pub columns: Vec<ColumnDesign>,
    /// Indexes
    pub indexes: Vec<IndexDesign>,
    /// Foreign keys
    pub foreign_keys: Vec<ForeignKeyDesign>,
    /// Comment/description
    pub comment: Option<String>,
}

impl TableDesign {
    /// Create a new empty table design with a name
    pub fn new(table_name: impl Into<String>, dialect: DatabaseDialect) -> Self {
        Self {
            table_name: table_name.into(),
            dialect,
            columns: Vec::new(),
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
            comment: None,
        }
    }

    /// Builder: add a column
    ///
    /// Primary key flags are reflected in the `PRIMARY` index.
    pub fn with_column(mut self, column: ColumnDesign) -> Self {
        let ordinal = self.columns.len();
        let mut col = column;
        col.ordinal = ordinal;
        self.columns.push(col);
        self.sync_primary_index();
        self
    }

    /// Builder: add an index
    pub fn with_index(mut self, index: IndexDesign) -> Self {
        self.indexes.push(index);
        self
    }

    /// Builder: add a foreign key
    pub fn with_foreign_key(mut self, fk: ForeignKeyDesign) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    pub fn column(&self, id: RowId) -> Option<&ColumnDesign> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn column_mut(&mut self, id: RowId) -> Option<&mut ColumnDesign> {
        self.columns.iter_mut().find(|c| c.id == id)
    }

    pub fn index(&self, id: RowId) -> Option<&IndexDesign> {
        self.indexes.iter().find(|i| i.id == id)
    }

    pub fn index_mut(&mut self, id: RowId) -> Option<&mut IndexDesign> {
        self.indexes.iter_mut().find(|i| i.id == id)
    }

    pub fn foreign_key(&self, id: RowId) -> Option<&ForeignKeyDesign> {
        self.foreign_keys.iter().find(|fk| fk.id == id)
    }

    pub fn foreign_key_mut(&mut self, id: RowId) -> Option<&mut ForeignKeyDesign> {
        self.foreign_keys.iter_mut().find(|fk| fk.id == id)
    }

    /// Whether another column already uses `name` (case-insensitive)
    pub fn has_column_named(&self, name: &str, except: Option<RowId>) -> bool {
        self.columns
            .iter()
            .any(|c| Some(c.id) != except && c.name.eq_ignore_ascii_case(name))
    }

    pub fn has_index_named(&self, name: &str, except: Option<RowId>) -> bool {
        self.indexes
            .iter()
            .any(|i| Some(i.id) != except && i.name.eq_ignore_ascii_case(name))
    }

    pub fn has_foreign_key_named(&self, name: &str, except: Option<RowId>) -> bool {
        self.foreign_keys
            .iter()
            .any(|fk| Some(fk.id) != except && fk.name.eq_ignore_ascii_case(name))
    }

    /// Rename a column and every index or foreign key entry that lists it
    pub fn rename_column(&mut self, id: RowId, name: impl Into<String>) {
        let name = name.into();
        let Some(column) = self.column_mut(id) else {
            return;
        };
        let old = std::mem::replace(&mut column.name, name.clone());
        for index in &mut self.indexes {
            for member in index.columns.iter_mut().filter(|m| m.column == old) {
                member.column = name.clone();
            }
        }
        for fk in &mut self.foreign_keys {
            for column in fk.columns.iter_mut().filter(|c| **c == old) {
                *column = name.clone();
            }
        }
    }

    /// Remove columns along with their index and foreign key entries
    pub fn remove_columns(&mut self, ids: &[RowId]) {
        let removed: Vec<String> = self
            .columns
            .iter()
            .filter(|c| ids.contains(&c.id))
            .map(|c| c.name.clone())
            .collect();
        self.columns.retain(|c| !ids.contains(&c.id));
        for index in &mut self.indexes {
            index.columns.retain(|m| !removed.contains(&m.column));
        }
        for fk in &mut self.foreign_keys {
            for name in &removed {
                fk.remove_column(name);
            }
        }
        self.renumber();
        self.sync_primary_index();
    }

    /// Reset ordinals to the current column order
    pub fn renumber(&mut self) {
        for (i, col) in self.columns.iter_mut().enumerate() {
            col.ordinal = i;
        }
    }

    /// Make the `PRIMARY` index list exactly the primary key columns
    ///
    /// The index is created when the first column becomes part of the
    /// primary key and removed with the last one. Prefix lengths and sort
    /// orders of remaining members are kept.
    pub fn sync_primary_index(&mut self) {
        let pk: Vec<String> = self
            .columns
            .iter()
            .filter(|c| c.is_primary_key)
            .map(|c| c.name.clone())
            .collect();
        let existing = self.indexes.iter().position(|i| i.is_primary());

        match (existing, pk.is_empty()) {
            (Some(position), true) => {
                self.indexes.remove(position);
            }
            (Some(position), false) => {
                let index = &mut self.indexes[position];
                index.columns.retain(|m| pk.contains(&m.column));
                for name in &pk {
                    if index.member(name).is_none() {
                        index.columns.push(super::IndexColumnDesign::new(name.clone()));
                    }
                }
            }
            (None, false) => {
                self.indexes
                    .insert(0, IndexDesign::primary(pk.iter().map(String::as_str)));
            }
            (None, true) => {}
        }
    }

    /// Check if the design has any validation errors
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.table_name.is_empty() {
            errors.push(ValidationError::new("table_name", "Table name is required"));
        }

        if self.columns.is_empty() {
            errors.push(ValidationError::new(
                "columns",
                "At least one column is required",
            ));
        }

        for (i, col) in self.columns.iter().enumerate() {
            if col.name.is_empty() {
                errors.push(ValidationError::new(
                    format!("columns[{}].name", i),
                    format!("Column {} name is required", i + 1),
                ));
            }
            if let Err(err) = super::parse_type(&col.data_type, &self.dialect) {
                errors.push(ValidationError::new(
                    format!("columns[{}].data_type", i),
                    err.message,
                ));
            }
        }

        // Check for duplicate column names
        let mut seen_names = HashSet::new();
        for col in &self.columns {
            if !col.name.is_empty() && !seen_names.insert(col.name.to_lowercase()) {
                errors.push(ValidationError::new(
                    "columns",
                    format!("Duplicate column name: {}", col.name),
                ));
            }
        }

        // Validate index columns exist
        let column_names: HashSet<_> = self.columns.iter().map(|c| c.name.to_lowercase()).collect();
        for (i, idx) in self.indexes.iter().enumerate() {
            for member in &idx.columns {
                if !column_names.contains(&member.column.to_lowercase()) {
                    errors.push(ValidationError::new(
                        format!("indexes[{}].columns", i),
                        format!("Index column '{}' does not exist in table", member.column),
                    ));
                }
            }
        }

        // Validate foreign key columns exist
        for (i, fk) in self.foreign_keys.iter().enumerate() {
            if fk.referenced_table.is_empty() {
                errors.push(ValidationError::new(
                    format!("foreign_keys[{}].referenced_table", i),
                    format!("Foreign key '{}' has no referenced table", fk.name),
                ));
            }
            for col in &fk.columns {
                if !column_names.contains(&col.to_lowercase()) {
                    errors.push(ValidationError::new(
                        format!("foreign_keys[{}].columns", i),
                        format!("Foreign key column '{}' does not exist in table", col),
                    ));
                }
            }
        }

        errors
    }

    /// Get column names for use in dropdowns
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// `base`, or `base1`, `base2`, ... whichever is free first
pub(crate) fn next_free_name(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{}{}", base, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}
