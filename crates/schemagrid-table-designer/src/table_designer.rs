//! Table Designer for SchemaGrid
//!
//! The MySQL-Workbench style table editor, built from five editable grids
//! over one shared [`TableDesign`].
//!
//! ## Features
//!
//! - Columns grid with type suggestions, PK/NN/UQ/UN/ZF/AI/BIN/G flags and
//!   numbered default names for new columns
//! - Indexes grid plus a member grid bound to the selected index
//! - Foreign keys grid plus a column mapping grid bound to the selected key
//! - Column detail panel that follows the columns grid selection
//! - Dialect-specific data type catalogs (SQLite, PostgreSQL, MySQL)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use schemagrid_table_designer::{ReferenceCatalog, SchemaGridSettings, TableEditor};
//! use schemagrid_grid::GridKey;
//!
//! let settings = SchemaGridSettings::load(path)?;
//! let catalog = ReferenceCatalog::new().with_table("users", ["id", "email"]);
//! let mut editor = TableEditor::new("orders", &settings, catalog)?;
//!
//! let columns = editor.columns();
//! let placeholder = columns.model().placeholder().unwrap();
//! columns.double_click(placeholder, &"name".into())?;
//! columns.handle_key(GridKey::Enter)?; // adds `idorders`, opens its type editor
//! ```

pub mod models;
pub mod stores;

mod detail_panel;
mod editor;
mod error;
mod grids;
mod settings;

// Re-exports for convenience
pub use detail_panel::{ColumnDetail, ColumnDetailPanel};
pub use editor::TableEditor;
pub use error::{DesignerError, DesignerResult};
pub use grids::{
    columns_grid, foreign_key_columns_grid, foreign_keys_grid, index_columns_grid, indexes_grid,
};
pub use models::{
    ColumnDesign, DataTypeCategory, DataTypeInfo, DatabaseDialect, ForeignKeyAction,
    ForeignKeyDesign, IndexDesign, IndexKind, ReferenceCatalog, SortOrder, TableDesign,
    ValidationError, get_data_types,
};
pub use settings::{DesignerSettings, SchemaGridSettings};
pub use stores::{
    ColumnsStore, ForeignKeyColumnsStore, ForeignKeysStore, IndexColumnsStore, IndexesStore,
    SharedDesign,
};
