//! Models for table design
//!
//! Core data structures for representing table structure, columns, indexes,
//! foreign keys and the tables a foreign key may reference.

mod catalog;
mod column_design;
mod data_types;
mod foreign_key_design;
mod index_design;
mod table_design;
mod validation;

use serde::{Deserialize, Serialize};

pub use catalog::ReferenceCatalog;
pub use column_design::ColumnDesign;
pub use data_types::{
    DataTypeCategory, DataTypeInfo, ParsedType, get_data_types, parse_type, type_suggestions,
};
pub use foreign_key_design::{ForeignKeyAction, ForeignKeyDesign};
pub use index_design::{IndexColumnDesign, IndexDesign, IndexKind, SortOrder};
pub use table_design::TableDesign;
pub(crate) use table_design::next_free_name;
pub use validation::ValidationError;

/// Database dialect whose data types the designer offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDialect {
    Sqlite,
    Postgres,
    #[default]
    Mysql,
}

impl DatabaseDialect {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            DatabaseDialect::Sqlite => "SQLite",
            DatabaseDialect::Postgres => "PostgreSQL",
            DatabaseDialect::Mysql => "MySQL",
        }
    }
}
