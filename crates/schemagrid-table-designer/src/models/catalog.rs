//! Tables a foreign key may reference

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Other tables of the schema and their columns, in schema order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceCatalog {
    tables: IndexMap<String, Vec<String>>,
}

impl ReferenceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a table with its columns
    pub fn with_table<I, T>(mut self, table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.insert(table, columns);
        self
    }

    pub fn insert<I, T>(&mut self, table: impl Into<String>, columns: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tables
            .insert(table.into(), columns.into_iter().map(Into::into).collect());
    }

    pub fn contains(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    pub fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    pub fn columns(&self, table: &str) -> Option<&[String]> {
        self.tables.get(table).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
