//! Host-facing grid
//!
//! Pairs a [`GridModel`] with its [`EditingWorkflow`] and translates input
//! gestures into workflow calls.

use schemagrid_core::{ColumnId, RecordStore, RowId, WriteOutcome};

use crate::binding::Column;
use crate::error::{GridError, GridResult};
use crate::events::{GridEvent, SubscriptionId};
use crate::model::GridModel;
use crate::reorder::{DropPosition, ReorderOutcome, RowReorderer};
use crate::settings::GridSettings;
use crate::workflow::{CommitOutcome, EditingWorkflow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKey {
    Tab,
    Enter,
    Escape,
}

pub struct EditableGrid<S> {
    model: GridModel<S>,
    workflow: EditingWorkflow,
}

impl<S: RecordStore> EditableGrid<S> {
    pub fn new(store: S, columns: Vec<Column>, settings: GridSettings) -> GridResult<Self> {
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.id == column.id) {
                return Err(GridError::DuplicateColumn(column.id.clone()));
            }
        }
        Ok(Self {
            model: GridModel::new(store, columns),
            workflow: EditingWorkflow::new(settings),
        })
    }

    pub fn model(&self) -> &GridModel<S> {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut GridModel<S> {
        &mut self.model
    }

    pub fn workflow(&self) -> &EditingWorkflow {
        &self.workflow
    }

    pub fn store(&self) -> &S {
        self.model.store()
    }

    /// Tab and Enter commit and advance; Escape cancels
    ///
    /// Returns `None` when no editor was open.
    pub fn handle_key(&mut self, key: GridKey) -> GridResult<Option<CommitOutcome>> {
        if !self.workflow.is_editing() {
            return Ok(None);
        }
        match key {
            GridKey::Tab | GridKey::Enter => self.workflow.commit_and_advance(&mut self.model).map(Some),
            GridKey::Escape => {
                self.workflow.cancel(&mut self.model);
                Ok(Some(CommitOutcome::Cancelled))
            }
        }
    }

    /// Select the clicked row, then toggle a checkbox cell in place or open
    /// an editor on any other cell
    pub fn double_click(&mut self, row: RowId, column: &ColumnId) -> GridResult<()> {
        if self.workflow.is_dragging() {
            return Err(GridError::DragInProgress);
        }
        let is_boolean = self.model.column(column)?.binding.is_boolean();
        self.model.select(Some(row))?;
        if is_boolean {
            self.workflow.toggle(&mut self.model, row, column)?;
        } else {
            self.workflow.begin_edit(&mut self.model, row, column)?;
        }
        Ok(())
    }

    pub fn begin_edit(&mut self, row: RowId, column: &ColumnId) -> GridResult<()> {
        self.workflow.begin_edit(&mut self.model, row, column)?;
        Ok(())
    }

    pub fn type_text(&mut self, text: impl Into<String>) -> GridResult<()> {
        self.workflow.set_text(text)
    }

    pub fn choose(&mut self, index: usize) -> GridResult<()> {
        self.workflow.choose(index)
    }

    pub fn commit(&mut self) -> GridResult<CommitOutcome> {
        self.workflow.commit_and_advance(&mut self.model)
    }

    pub fn cancel(&mut self) {
        self.workflow.cancel(&mut self.model);
    }

    pub fn focus_lost(&mut self) -> GridResult<Option<CommitOutcome>> {
        self.workflow.on_focus_lost(&mut self.model)
    }

    pub fn toggle(&mut self, row: RowId, column: &ColumnId) -> GridResult<WriteOutcome> {
        self.workflow.toggle(&mut self.model, row, column)
    }

    pub fn select(&mut self, row: Option<RowId>) -> GridResult<()> {
        self.model.select(row)
    }

    pub fn refresh(&mut self) {
        self.model.refresh();
    }

    pub fn begin_drag(&mut self, selection: &[RowId]) -> GridResult<bool> {
        self.workflow.begin_drag(&mut self.model, selection)
    }

    /// Drag-over feedback for the slot next to the row at `node_index`
    pub fn can_drop_at(&self, node_index: usize, position: DropPosition) -> bool {
        let target = RowReorderer::drop_target(&self.model, node_index, position);
        self.workflow.can_drop(&self.model, target)
    }

    pub fn drop_at(&mut self, node_index: usize, position: DropPosition) -> GridResult<ReorderOutcome> {
        let target = RowReorderer::drop_target(&self.model, node_index, position);
        self.workflow.drop_rows(&mut self.model, target)
    }

    pub fn end_drag(&mut self) {
        self.workflow.end_drag();
    }

    /// Delete real rows; an open editor is discarded first
    pub fn remove_rows(&mut self, rows: &[RowId]) -> GridResult<()> {
        self.workflow.cancel(&mut self.model);
        self.model.remove_rows(rows)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&GridEvent) + 'static) -> SubscriptionId {
        self.model.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.model.unsubscribe(id)
    }

    pub fn take_events(&mut self) -> Vec<GridEvent> {
        self.model.take_events()
    }
}
