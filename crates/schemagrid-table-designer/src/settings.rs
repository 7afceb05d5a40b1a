//! Designer settings
//!
//! One TOML document configures the grid engine and the designer:
//!
//! ```toml
//! [grid]
//! row_advance = "next_row"
//!
//! [designer]
//! dialect = "mysql"
//! column_type = "VARCHAR(45)"
//! ```
//!
//! Name patterns may use `{table}` and, for foreign keys, `{referenced}`.

use anyhow::{Context, Result};
use schemagrid_grid::GridSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::DatabaseDialect;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignerSettings {
    pub dialect: DatabaseDialect,
    /// Name of the first column of an empty table
    pub first_column_name: String,
    pub first_column_type: String,
    /// Name of every later column; numbered when taken
    pub column_name: String,
    pub column_type: String,
    pub index_name: String,
    /// Foreign key name once the referenced table is known
    pub foreign_key_name: String,
    /// Foreign key name before a table is referenced; numbered from 1
    pub unreferenced_foreign_key_name: String,
}

impl Default for DesignerSettings {
    fn default() -> Self {
        Self {
            dialect: DatabaseDialect::Mysql,
            first_column_name: "id{table}".to_string(),
            first_column_type: "INT".to_string(),
            column_name: "{table}col".to_string(),
            column_type: "VARCHAR(45)".to_string(),
            index_name: "{table}_idx".to_string(),
            foreign_key_name: "fk_{table}_{referenced}".to_string(),
            unreferenced_foreign_key_name: "fk_{table}_".to_string(),
        }
    }
}

impl DesignerSettings {
    pub(crate) fn expand(pattern: &str, table: &str, referenced: &str) -> String {
        pattern
            .replace("{table}", table)
            .replace("{referenced}", referenced)
    }
}

/// Root of the settings file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaGridSettings {
    pub grid: GridSettings,
    pub designer: DesignerSettings,
}

impl SchemaGridSettings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse SchemaGrid settings")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read SchemaGrid settings from {}", path.display()))?;
        let settings = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), dialect = settings.designer.dialect.name(), "loaded settings");
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize SchemaGrid settings")
    }
}
