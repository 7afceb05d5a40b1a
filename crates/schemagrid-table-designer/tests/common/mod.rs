//! Shared fixtures for the table designer integration tests

#![allow(dead_code)]

use schemagrid_core::{ColumnId, RowId};
use schemagrid_table_designer::{
    ColumnDesign, DatabaseDialect, ReferenceCatalog, SchemaGridSettings, TableDesign, TableEditor,
};

pub fn col(id: &str) -> ColumnId {
    ColumnId::from(id)
}

pub fn catalog() -> ReferenceCatalog {
    ReferenceCatalog::new()
        .with_table("users", ["id", "email"])
        .with_table("products", ["sku", "name"])
}

/// `users (idusers INT PK, email VARCHAR(45))`
pub fn users_design() -> TableDesign {
    TableDesign::new("users", DatabaseDialect::Mysql)
        .with_column(ColumnDesign::named("idusers").integer().primary_key())
        .with_column(ColumnDesign::named("email"))
}

/// `orders (idorders INT PK, user_id INT)`
pub fn orders_design() -> TableDesign {
    TableDesign::new("orders", DatabaseDialect::Mysql)
        .with_column(ColumnDesign::named("idorders").integer().primary_key())
        .with_column(ColumnDesign::named("user_id").integer().not_null())
}

pub fn editor_for(design: TableDesign) -> TableEditor {
    init_tracing();
    TableEditor::edit(design, &SchemaGridSettings::default(), catalog()).expect("should build editor")
}

pub fn new_table_editor(name: &str) -> TableEditor {
    init_tracing();
    TableEditor::new(name, &SchemaGridSettings::default(), catalog()).expect("should build editor")
}

/// Row id of the design column named `name`
pub fn column_id(editor: &TableEditor, name: &str) -> RowId {
    editor
        .design()
        .columns
        .iter()
        .find(|c| c.name == name)
        .map(|c| c.id)
        .expect("column exists")
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("schemagrid_grid=debug,schemagrid_table_designer=debug")
        .try_init();
}
