//! Column layouts of the five designer grids

use std::rc::Rc;

use schemagrid_core::{ColumnId, RecordStore, RowId};
use schemagrid_grid::{Column, DomainSource};

use crate::models::{
    DatabaseDialect, ForeignKeyAction, IndexKind, ReferenceCatalog, SortOrder, type_suggestions,
};
use crate::stores::{
    ColumnsStore, ForeignKeyColumnsStore, ForeignKeysStore, IndexColumnsStore, IndexesStore,
    SharedDesign, referenceable_tables, referenced_table_columns,
};

/// Raw string held by `field` of `row`, or an empty string
fn field_text(store: &dyn RecordStore, row: RowId, field: &str) -> String {
    store
        .get_field(row, &ColumnId::from(field))
        .and_then(|value| value.as_str().map(String::from))
        .unwrap_or_default()
}

pub fn columns_grid(dialect: DatabaseDialect) -> Vec<Column> {
    let types = DomainSource::row_dependent(move |store, row| {
        type_suggestions(&field_text(store, row, ColumnsStore::TYPE), &dialect)
    });

    vec![
        Column::text(ColumnsStore::NAME, "Column Name")
            .chained(0)
            .materializes(),
        Column::choice(ColumnsStore::TYPE, "Datatype", types)
            .chained(1)
            .materializes(),
        Column::boolean(ColumnsStore::PK, "PK"),
        Column::boolean(ColumnsStore::NN, "NN"),
        Column::boolean(ColumnsStore::UQ, "UQ"),
        Column::boolean(ColumnsStore::UN, "UN"),
        Column::boolean(ColumnsStore::ZF, "ZF"),
        Column::boolean(ColumnsStore::AI, "AI"),
        Column::boolean(ColumnsStore::BIN, "BIN"),
        Column::boolean(ColumnsStore::G, "G"),
        Column::text(ColumnsStore::DEFAULT, "Default"),
        Column::text(ColumnsStore::COMMENT, "Comment").detail_only(),
    ]
}

pub fn indexes_grid() -> Vec<Column> {
    vec![
        Column::text(IndexesStore::NAME, "Index Name")
            .chained(0)
            .materializes(),
        Column::choice(
            IndexesStore::TYPE,
            "Type",
            DomainSource::Static(IndexKind::choices()),
        )
        .chained(1),
        Column::text(IndexesStore::COMMENT, "Comment").detail_only(),
    ]
}

pub fn index_columns_grid() -> Vec<Column> {
    vec![
        Column::boolean(IndexColumnsStore::ENABLED, ""),
        Column::text(IndexColumnsStore::COLUMN, "Column").read_only(),
        Column::choice(
            IndexColumnsStore::ORDER,
            "Order",
            DomainSource::Static(SortOrder::choices()),
        ),
        Column::text(IndexColumnsStore::LENGTH, "Length"),
    ]
}

/// Referenced tables come from the catalog at the time the editor opens
pub fn foreign_keys_grid(design: SharedDesign, catalog: Rc<ReferenceCatalog>) -> Vec<Column> {
    let tables = DomainSource::row_dependent(move |_, _| {
        referenceable_tables(&design.borrow(), &catalog)
    });
    let actions = || DomainSource::Static(ForeignKeyAction::choices());

    vec![
        Column::text(ForeignKeysStore::NAME, "Foreign Key Name")
            .chained(0)
            .materializes(),
        Column::choice(ForeignKeysStore::REFERENCED_TABLE, "Referenced Table", tables).chained(1),
        Column::choice(ForeignKeysStore::ON_UPDATE, "On Update", actions()).detail_only(),
        Column::choice(ForeignKeysStore::ON_DELETE, "On Delete", actions()).detail_only(),
    ]
}

pub fn foreign_key_columns_grid(design: SharedDesign, catalog: Rc<ReferenceCatalog>) -> Vec<Column> {
    let referenced = DomainSource::row_dependent(move |store, row| {
        let table = field_text(store, row, ForeignKeyColumnsStore::REFERENCED_TABLE);
        if table.is_empty() {
            return Vec::new();
        }
        referenced_table_columns(&design.borrow(), &catalog, &table)
    });

    vec![
        Column::boolean(ForeignKeyColumnsStore::ENABLED, ""),
        Column::text(ForeignKeyColumnsStore::COLUMN, "Column").read_only(),
        Column::choice(
            ForeignKeyColumnsStore::REFERENCED_COLUMN,
            "Referenced Column",
            referenced,
        ),
    ]
}
