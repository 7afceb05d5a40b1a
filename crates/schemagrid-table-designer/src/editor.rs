//! Table editor
//!
//! Owns the five grids of one table design. The index columns and foreign
//! key columns grids are detail grids: they show the members of the row
//! selected in their master grid and are rebound whenever that selection
//! changes.
//!
//! Grids never refresh each other while an operation runs. Instead every
//! grid marks the editor dirty, and the next access to any grid refreshes
//! all of them from the shared design first.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use schemagrid_core::{ColumnId, RecordStore, RowId, Value, WriteOutcome};
use schemagrid_grid::{EditableGrid, GridEvent, GridSettings};

use crate::detail_panel::{ColumnDetail, ColumnDetailPanel};
use crate::error::{DesignerError, DesignerResult};
use crate::grids;
use crate::models::{ReferenceCatalog, TableDesign, ValidationError};
use crate::settings::SchemaGridSettings;
use crate::stores::{
    ColumnsStore, ForeignKeyColumnsStore, ForeignKeysStore, IndexColumnsStore, IndexesStore,
    SharedDesign,
};

pub struct TableEditor {
    design: SharedDesign,
    original: Option<TableDesign>,
    columns: EditableGrid<ColumnsStore>,
    indexes: EditableGrid<IndexesStore>,
    index_columns: EditableGrid<IndexColumnsStore>,
    foreign_keys: EditableGrid<ForeignKeysStore>,
    foreign_key_columns: EditableGrid<ForeignKeyColumnsStore>,
    panel: Rc<RefCell<ColumnDetailPanel>>,
    /// Set by grid listeners when the shared design changed
    dirty: Rc<Cell<bool>>,
    /// Suppresses `dirty` while the editor refreshes its own grids
    syncing: Rc<Cell<bool>>,
}

impl TableEditor {
    /// Editor for a table that does not exist yet
    pub fn new(
        table_name: impl Into<String>,
        settings: &SchemaGridSettings,
        catalog: ReferenceCatalog,
    ) -> DesignerResult<Self> {
        let design = TableDesign::new(table_name, settings.designer.dialect);
        Self::build(design, None, settings, catalog)
    }

    /// Editor for an existing table
    pub fn edit(
        design: TableDesign,
        settings: &SchemaGridSettings,
        catalog: ReferenceCatalog,
    ) -> DesignerResult<Self> {
        let original = Some(design.clone());
        Self::build(design, original, settings, catalog)
    }

    #[tracing::instrument(skip_all, fields(table = %design.table_name))]
    fn build(
        design: TableDesign,
        original: Option<TableDesign>,
        settings: &SchemaGridSettings,
        catalog: ReferenceCatalog,
    ) -> DesignerResult<Self> {
        let dialect = design.dialect;
        let design: SharedDesign = Rc::new(RefCell::new(design));
        let catalog = Rc::new(catalog);
        let grid_settings: &GridSettings = &settings.grid;
        let designer = &settings.designer;

        let mut columns = EditableGrid::new(
            ColumnsStore::new(design.clone(), designer.clone()),
            grids::columns_grid(dialect),
            grid_settings.clone(),
        )?;
        let mut indexes = EditableGrid::new(
            IndexesStore::new(design.clone(), designer.clone()),
            grids::indexes_grid(),
            grid_settings.clone(),
        )?;
        let mut index_columns = EditableGrid::new(
            IndexColumnsStore::new(design.clone()),
            grids::index_columns_grid(),
            grid_settings.clone(),
        )?;
        let mut foreign_keys = EditableGrid::new(
            ForeignKeysStore::new(design.clone(), catalog.clone(), designer.clone()),
            grids::foreign_keys_grid(design.clone(), catalog.clone()),
            grid_settings.clone(),
        )?;
        let mut foreign_key_columns = EditableGrid::new(
            ForeignKeyColumnsStore::new(design.clone(), catalog.clone()),
            grids::foreign_key_columns_grid(design.clone(), catalog),
            grid_settings.clone(),
        )?;

        let dirty = Rc::new(Cell::new(false));
        let syncing = Rc::new(Cell::new(false));
        watch(&mut columns, &dirty, &syncing);
        watch(&mut indexes, &dirty, &syncing);
        watch(&mut index_columns, &dirty, &syncing);
        watch(&mut foreign_keys, &dirty, &syncing);
        watch(&mut foreign_key_columns, &dirty, &syncing);

        let panel = Rc::new(RefCell::new(ColumnDetailPanel::new(design.clone())));
        let listener = panel.clone();
        columns.subscribe(move |event| listener.borrow_mut().on_event(event));

        tracing::debug!(columns = columns.model().real_row_count(), "table editor ready");
        Ok(Self {
            design,
            original,
            columns,
            indexes,
            index_columns,
            foreign_keys,
            foreign_key_columns,
            panel,
            dirty,
            syncing,
        })
    }

    pub fn columns(&mut self) -> &mut EditableGrid<ColumnsStore> {
        self.sync();
        &mut self.columns
    }

    pub fn indexes(&mut self) -> &mut EditableGrid<IndexesStore> {
        self.sync();
        &mut self.indexes
    }

    pub fn index_columns(&mut self) -> &mut EditableGrid<IndexColumnsStore> {
        self.sync();
        &mut self.index_columns
    }

    pub fn foreign_keys(&mut self) -> &mut EditableGrid<ForeignKeysStore> {
        self.sync();
        &mut self.foreign_keys
    }

    pub fn foreign_key_columns(&mut self) -> &mut EditableGrid<ForeignKeyColumnsStore> {
        self.sync();
        &mut self.foreign_key_columns
    }

    /// Show the members of `index` in the index columns grid
    pub fn select_index(&mut self, index: Option<RowId>) -> DesignerResult<()> {
        if let Some(id) = index
            && self.design.borrow().index(id).is_none()
        {
            return Err(DesignerError::UnknownIndex(id));
        }
        self.sync();
        self.indexes.select(index)?;
        self.sync();
        Ok(())
    }

    /// Show the members of `foreign_key` in the foreign key columns grid
    pub fn select_foreign_key(&mut self, foreign_key: Option<RowId>) -> DesignerResult<()> {
        if let Some(id) = foreign_key
            && self.design.borrow().foreign_key(id).is_none()
        {
            return Err(DesignerError::UnknownForeignKey(id));
        }
        self.sync();
        self.foreign_keys.select(foreign_key)?;
        self.sync();
        Ok(())
    }

    /// What the detail panel currently shows
    pub fn column_detail(&mut self) -> Option<ColumnDetail> {
        self.sync();
        self.panel.borrow().detail().cloned()
    }

    /// Write one field of the selected column from the detail panel
    pub fn set_column_detail(&mut self, field: &str, value: Value) -> DesignerResult<WriteOutcome> {
        self.sync();
        let row = self
            .columns
            .model()
            .selection()
            .ok_or(DesignerError::NoColumnSelected)?;
        let outcome = self
            .columns
            .model_mut()
            .write_cell(row, &ColumnId::from(field), value)?;
        self.sync();
        Ok(outcome)
    }

    /// Copy of the design as edited so far
    pub fn design(&self) -> TableDesign {
        self.design.borrow().clone()
    }

    pub fn table_name(&self) -> String {
        self.design.borrow().table_name.clone()
    }

    pub fn is_new(&self) -> bool {
        self.original.is_none()
    }

    /// Whether the design differs from the one the editor was opened with
    pub fn is_modified(&self) -> bool {
        match &self.original {
            Some(original) => *self.design.borrow() != *original,
            None => !self.design.borrow().columns.is_empty(),
        }
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        self.design.borrow().validate()
    }

    /// Refresh every grid from the shared design and rebind the detail grids
    fn sync(&mut self) {
        let index = self.indexes.model().selection();
        let foreign_key = self.foreign_keys.model().selection();
        let rebind_index = self.index_columns.store().bound() != index;
        let rebind_foreign_key = self.foreign_key_columns.store().bound() != foreign_key;
        if !self.dirty.get() && !rebind_index && !rebind_foreign_key {
            return;
        }

        self.syncing.set(true);
        self.dirty.set(false);
        if rebind_index {
            self.index_columns.cancel();
            self.index_columns.model_mut().store_mut().bind(index);
            tracing::debug!(index = ?index, "rebound index columns");
        }
        if rebind_foreign_key {
            self.foreign_key_columns.cancel();
            self.foreign_key_columns.model_mut().store_mut().bind(foreign_key);
            tracing::debug!(foreign_key = ?foreign_key, "rebound foreign key columns");
        }
        self.columns.refresh();
        self.indexes.refresh();
        self.index_columns.refresh();
        self.foreign_keys.refresh();
        self.foreign_key_columns.refresh();
        self.syncing.set(false);
    }
}

fn watch<S>(grid: &mut EditableGrid<S>, dirty: &Rc<Cell<bool>>, syncing: &Rc<Cell<bool>>)
where
    S: RecordStore,
{
    let dirty = dirty.clone();
    let syncing = syncing.clone();
    grid.subscribe(move |event| {
        let changed = matches!(
            event,
            GridEvent::ValueChanged { .. } | GridEvent::RowChanged(_) | GridEvent::Rebuilt { .. }
        );
        if changed && !syncing.get() {
            dirty.set(true);
        }
    });
}
