//! Editing workflow
//!
//! Per-grid state machine that sequences edit sessions:
//!
//! ```text
//! Idle ──begin_edit──▶ Editing ──commit_and_advance──▶ Editing (next cell) | Idle
//!  ▲                      │
//!  └──cancel / focus lost─┘
//! Idle ──begin_drag──▶ Dragging ──drop / end_drag──▶ Idle
//! ```
//!
//! A commit runs to completion, rebuild included, before any event reaches
//! subscribers and before the next editor opens.

use schemagrid_core::{ColumnId, RecordStore, RowId, Value, WriteOutcome};

use crate::binding::Column;
use crate::error::{GridError, GridResult};
use crate::events::GridEvent;
use crate::model::{GridModel, Materialization};
use crate::reorder::{DragSession, ReorderOutcome, RowReorderer};
use crate::settings::{FocusLoss, GridSettings, RowAdvance};

/// An open inline editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub row: RowId,
    pub column: ColumnId,
    /// Raw editor text; nothing reaches the store before commit
    pub text: String,
    /// Value the store held when the editor opened
    pub original: Option<Value>,
    pub on_placeholder: bool,
    /// The placeholder was activated for this session and must be rolled
    /// back unless a write is accepted
    pub placeholder_active: bool,
    /// Choices offered by an enum editor, computed when it opened
    pub domain: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    Editing(EditSession),
    Dragging(DragSession),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The value was stored; `next` is the cell whose editor opened after it
    Committed {
        row: RowId,
        next: Option<(RowId, ColumnId)>,
    },
    /// The store refused the value; the chain stopped
    Rejected {
        row: RowId,
        column: ColumnId,
        reason: String,
    },
    /// Nothing was written
    Cancelled,
}

#[derive(Debug, Default)]
pub struct EditingWorkflow {
    state: WorkflowState,
    settings: GridSettings,
}

impl EditingWorkflow {
    pub fn new(settings: GridSettings) -> Self {
        Self {
            state: WorkflowState::Idle,
            settings,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn session(&self) -> Option<&EditSession> {
        match &self.state {
            WorkflowState::Editing(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, WorkflowState::Editing(_))
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, WorkflowState::Dragging(_))
    }

    /// Open an editor on a cell
    ///
    /// The placeholder row may only be edited through columns that
    /// materialize it; opening such an editor activates the placeholder so
    /// the editor shows the store's defaults. Any open editor is committed
    /// first, without advancing.
    pub fn begin_edit<S: RecordStore>(
        &mut self,
        model: &mut GridModel<S>,
        row: RowId,
        column: &ColumnId,
    ) -> GridResult<&EditSession> {
        let same_cell = match &self.state {
            WorkflowState::Dragging(_) => return Err(GridError::DragInProgress),
            WorkflowState::Editing(session) => Some(session.row == row && &session.column == column),
            WorkflowState::Idle => None,
        };
        match same_cell {
            Some(true) => return self.session().ok_or(GridError::NoActiveSession),
            Some(false) => {
                self.finish(model, false)?;
            }
            None => {}
        }

        let col = model.column(column)?;
        if !col.inline || col.binding.is_boolean() {
            return Err(GridError::NotInlineEditable(column.clone()));
        }
        if col.binding.is_read_only() {
            return Err(GridError::ReadOnly(column.clone()));
        }
        let materializes = col.materializes;
        if !model.contains(row) {
            return Err(GridError::UnknownRow(row));
        }

        let on_placeholder = model.is_placeholder(row);
        if on_placeholder {
            if !materializes {
                return Err(GridError::PlaceholderNotEditable(column.clone()));
            }
            model.activate_deferred()?;
        }

        let original = model.read(row, column)?;
        if original.is_none() && !on_placeholder {
            return Err(GridError::NotApplicable(column.clone()));
        }
        let text = model.column(column)?.binding.display(original.as_ref());
        let domain = model.domain(row, column)?;

        model.emit(GridEvent::CellEditRequested {
            row,
            column: column.clone(),
        });
        model.flush_events();

        tracing::debug!(row = %row, column = %column, on_placeholder, "editor opened");
        self.state = WorkflowState::Editing(EditSession {
            row,
            column: column.clone(),
            text,
            original,
            on_placeholder,
            placeholder_active: on_placeholder,
            domain,
        });
        self.session().ok_or(GridError::NoActiveSession)
    }

    /// Replace the editor text (keystrokes); nothing is written
    pub fn set_text(&mut self, text: impl Into<String>) -> GridResult<()> {
        match &mut self.state {
            WorkflowState::Editing(session) => {
                session.text = text.into();
                Ok(())
            }
            _ => Err(GridError::NoActiveSession),
        }
    }

    /// Pick an entry of an enum editor's domain
    pub fn choose(&mut self, index: usize) -> GridResult<()> {
        match &mut self.state {
            WorkflowState::Editing(session) => {
                let len = session.domain.len();
                let choice = session
                    .domain
                    .get(index)
                    .cloned()
                    .ok_or(GridError::ChoiceOutOfRange { index, len })?;
                session.text = choice;
                Ok(())
            }
            _ => Err(GridError::NoActiveSession),
        }
    }

    /// Tab / Enter: commit the cell and open the next one in the chain
    #[tracing::instrument(skip(self, model))]
    pub fn commit_and_advance<S: RecordStore>(
        &mut self,
        model: &mut GridModel<S>,
    ) -> GridResult<CommitOutcome> {
        self.finish(model, true)
    }

    /// The editor lost focus: commit without opening another editor, or
    /// discard, depending on settings
    pub fn on_focus_lost<S: RecordStore>(
        &mut self,
        model: &mut GridModel<S>,
    ) -> GridResult<Option<CommitOutcome>> {
        if !self.is_editing() {
            return Ok(None);
        }
        match self.settings.focus_loss {
            FocusLoss::Commit => self.finish(model, false).map(Some),
            FocusLoss::Discard => {
                self.cancel(model);
                Ok(Some(CommitOutcome::Cancelled))
            }
        }
    }

    /// Escape: close the editor without writing
    ///
    /// A placeholder activated for this session is rolled back.
    pub fn cancel<S: RecordStore>(&mut self, model: &mut GridModel<S>) {
        if !self.is_editing() {
            return;
        }
        if let WorkflowState::Editing(session) = std::mem::take(&mut self.state) {
            tracing::debug!(row = %session.row, column = %session.column, "edit cancelled");
            if session.placeholder_active {
                model.deactivate_deferred();
            }
            model.flush_events();
        }
    }

    /// Flip a checkbox cell
    ///
    /// Toggling a checkbox on the placeholder materializes it. Cells that do
    /// not apply to their row are rejected without reaching the store.
    pub fn toggle<S: RecordStore>(
        &mut self,
        model: &mut GridModel<S>,
        row: RowId,
        column: &ColumnId,
    ) -> GridResult<WriteOutcome> {
        if self.is_dragging() {
            return Err(GridError::DragInProgress);
        }
        if self.is_editing() {
            self.finish(model, false)?;
        }

        let col = model.column(column)?;
        if !col.binding.is_boolean() {
            return Err(GridError::NotToggleable(column.clone()));
        }
        let header = col.header.clone();
        if !model.contains(row) {
            return Err(GridError::UnknownRow(row));
        }

        let outcome = if model.is_placeholder(row) {
            match model.materialize_deferred(column, Value::Bool(true))? {
                Materialization::Materialized(_) => WriteOutcome::Accepted,
                Materialization::Rejected(reason) => WriteOutcome::Rejected(reason),
            }
        } else {
            match model.read(row, column)? {
                Some(current) => {
                    let flipped = !current.as_bool().unwrap_or(false);
                    model.write_deferred(row, column, Value::Bool(flipped))?
                }
                None => WriteOutcome::rejected(format!("{} does not apply to this row", header)),
            }
        };
        model.flush_events();
        Ok(outcome)
    }

    /// Pick up rows for a drag
    ///
    /// Closes any open editor without committing and leaves the placeholder
    /// out of the dragged set. Returns `false` when nothing can be dragged.
    pub fn begin_drag<S: RecordStore>(
        &mut self,
        model: &mut GridModel<S>,
        selection: &[RowId],
    ) -> GridResult<bool> {
        self.cancel(model);
        match DragSession::new(model, selection)? {
            Some(drag) => {
                tracing::debug!(rows = drag.rows.len(), "drag started");
                self.state = WorkflowState::Dragging(drag);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drag-over check: whether dropping at `target` would move anything
    pub fn can_drop<S: RecordStore>(&self, model: &GridModel<S>, target: usize) -> bool {
        match &self.state {
            WorkflowState::Dragging(drag) => !RowReorderer::is_noop(model, &drag.rows, target),
            _ => false,
        }
    }

    /// Drop the dragged rows at `target` and end the drag
    pub fn drop_rows<S: RecordStore>(
        &mut self,
        model: &mut GridModel<S>,
        target: usize,
    ) -> GridResult<ReorderOutcome> {
        match std::mem::take(&mut self.state) {
            WorkflowState::Dragging(drag) => RowReorderer::reorder(model, &drag.rows, target),
            other => {
                self.state = other;
                Err(GridError::NoDragInProgress)
            }
        }
    }

    /// Abort a drag without moving anything
    pub fn end_drag(&mut self) {
        if self.is_dragging() {
            self.state = WorkflowState::Idle;
        }
    }

    fn finish<S: RecordStore>(
        &mut self,
        model: &mut GridModel<S>,
        advance: bool,
    ) -> GridResult<CommitOutcome> {
        let session = match std::mem::take(&mut self.state) {
            WorkflowState::Editing(session) => session,
            other => {
                self.state = other;
                return Err(GridError::NoActiveSession);
            }
        };
        let column = model.column(&session.column)?.clone();
        let row = session.row;

        // An empty entry on the placeholder means the user backed out.
        if session.on_placeholder && session.text.trim().is_empty() {
            if session.placeholder_active {
                model.deactivate_deferred();
            }
            model.flush_events();
            return Ok(CommitOutcome::Cancelled);
        }

        let value = column.binding.parse(&session.text);
        let outcome = if session.on_placeholder {
            match model.materialize_deferred(&column.id, value)? {
                Materialization::Materialized(_) => WriteOutcome::Accepted,
                Materialization::Rejected(reason) => WriteOutcome::Rejected(reason),
            }
        } else if session.original.as_ref() == Some(&value) {
            WriteOutcome::Accepted
        } else if !model.contains(row) {
            tracing::warn!(row = %row, "edited row disappeared before commit");
            model.flush_events();
            return Ok(CommitOutcome::Cancelled);
        } else {
            model.write_deferred(row, &column.id, value)?
        };

        if let WriteOutcome::Rejected(reason) = outcome {
            model.flush_events();
            return Ok(CommitOutcome::Rejected {
                row,
                column: column.id,
                reason,
            });
        }

        // Positions may have shifted during the rebuild; the next cell is
        // resolved from the row id, never from the position the editor had.
        let wants_advance =
            advance && (!session.text.trim().is_empty() || self.settings.advance_on_empty);
        let target = if wants_advance {
            self.next_cell(model, row, &column)
        } else {
            None
        };
        if let Some((next_row, _)) = &target
            && *next_row != row
        {
            model.select_deferred(Some(*next_row))?;
        }
        model.flush_events();

        let next = match target {
            Some((next_row, next_column)) => match self.begin_edit(model, next_row, &next_column) {
                Ok(_) => Some((next_row, next_column)),
                Err(err) => {
                    tracing::debug!(%err, "chain stopped");
                    None
                }
            },
            None => None,
        };

        Ok(CommitOutcome::Committed { row, next })
    }

    fn next_cell<S: RecordStore>(
        &self,
        model: &GridModel<S>,
        row: RowId,
        column: &Column,
    ) -> Option<(RowId, ColumnId)> {
        let chain = model.chain();
        let index = chain.iter().position(|c| c.id == column.id)?;
        if let Some(next) = chain.get(index + 1) {
            return Some((row, next.id.clone()));
        }

        let position = model.position_of(row)?;
        let next_row = model.row_at(position + 1)?;
        let first = chain.first()?;
        match self.settings.row_advance {
            RowAdvance::Never => None,
            RowAdvance::NextRow => Some((next_row.id, first.id.clone())),
            RowAdvance::PlaceholderOnly if next_row.is_placeholder() => {
                Some((next_row.id, first.id.clone()))
            }
            RowAdvance::PlaceholderOnly => None,
        }
    }
}
