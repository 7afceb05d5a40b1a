//! Grid model
//!
//! Rebuilds the row list from the store, owns the placeholder row lifecycle
//! and keeps the selection attached to a row identity across rebuilds.
//!
//! Every store mutation is followed by a full rebuild. The model never
//! patches its row list incrementally and never keeps positions across calls:
//! the `RowId → position` map is recomputed with each rebuild.

use std::collections::HashMap;

use schemagrid_core::{ColumnId, RecordStore, RowId, Value, WriteOutcome};

use crate::binding::{CellValue, Column, ColumnBinding};
use crate::error::{GridError, GridResult};
use crate::events::{EventBus, GridEvent, SubscriptionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Real,
    Placeholder,
}

/// One displayed row; derived from the store on every rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    pub id: RowId,
    pub kind: RowKind,
}

impl Row {
    pub fn is_placeholder(&self) -> bool {
        self.kind == RowKind::Placeholder
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelState {
    Clean,
    Rebuilding,
}

/// The highlighted row and where it was at the last rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub row: RowId,
    pub position: usize,
}

/// Result of writing to the placeholder row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Materialization {
    /// The placeholder is now a real row with this id
    Materialized(RowId),
    /// The write was refused and the activation rolled back
    Rejected(String),
}

pub struct GridModel<S> {
    store: S,
    columns: Vec<Column>,
    rows: Vec<Row>,
    positions: HashMap<RowId, usize>,
    selection: Option<Selection>,
    state: ModelState,
    active_placeholder: Option<RowId>,
    rejections: HashMap<(RowId, ColumnId), String>,
    events: EventBus,
}

fn find_column<'a>(columns: &'a [Column], id: &ColumnId) -> GridResult<&'a Column> {
    columns
        .iter()
        .find(|c| &c.id == id)
        .ok_or_else(|| GridError::UnknownColumn(id.clone()))
}

impl<S: RecordStore> GridModel<S> {
    pub fn new(store: S, columns: Vec<Column>) -> Self {
        let mut model = Self {
            store,
            columns,
            rows: Vec::new(),
            positions: HashMap::new(),
            selection: None,
            state: ModelState::Clean,
            active_placeholder: None,
            rejections: HashMap::new(),
            events: EventBus::new(),
        };
        model.rebuild();
        model.flush_events();
        model
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Direct store access for commands outside the grid (e.g. a toolbar
    /// action). Call [`refresh`](Self::refresh) afterwards.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, id: &ColumnId) -> GridResult<&Column> {
        find_column(&self.columns, id)
    }

    /// Columns that take part in chained editing, in chain order
    pub fn chain(&self) -> Vec<&Column> {
        let mut chain: Vec<&Column> = self.columns.iter().filter(|c| c.chain.is_some()).collect();
        chain.sort_by_key(|c| c.chain);
        chain
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Displayed rows, including the placeholder
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn real_row_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.is_placeholder()).count()
    }

    pub fn row_at(&self, position: usize) -> Option<Row> {
        self.rows.get(position).copied()
    }

    pub fn position_of(&self, row: RowId) -> Option<usize> {
        self.positions.get(&row).copied()
    }

    pub fn contains(&self, row: RowId) -> bool {
        self.positions.contains_key(&row)
    }

    pub fn placeholder(&self) -> Option<RowId> {
        self.rows.last().filter(|r| r.is_placeholder()).map(|r| r.id)
    }

    pub fn is_placeholder(&self, row: RowId) -> bool {
        self.placeholder() == Some(row)
    }

    pub fn active_placeholder(&self) -> Option<RowId> {
        self.active_placeholder
    }

    pub fn state(&self) -> ModelState {
        self.state
    }

    pub fn selection(&self) -> Option<RowId> {
        self.selection.map(|s| s.row)
    }

    pub fn selected_position(&self) -> Option<usize> {
        self.selection.map(|s| s.position)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&GridEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn take_events(&mut self) -> Vec<GridEvent> {
        self.events.take_events()
    }

    /// Read one cell for display
    ///
    /// Only the requested cell touches the store.
    pub fn cell(&self, row: RowId, column: &ColumnId) -> GridResult<CellValue> {
        if !self.contains(row) {
            return Err(GridError::UnknownRow(row));
        }
        let col = find_column(&self.columns, column)?;
        let value = col.binding.read(&self.store, row, column);
        let enabled = value.is_some()
            || self.is_placeholder(row)
            || matches!(col.binding, ColumnBinding::Boolean { tri_state: true });
        Ok(CellValue {
            value,
            enabled,
            rejected: self.rejections.get(&(row, column.clone())).cloned(),
        })
    }

    /// Typed read used by editors
    pub fn read(&self, row: RowId, column: &ColumnId) -> GridResult<Option<Value>> {
        let col = find_column(&self.columns, column)?;
        Ok(col.binding.read(&self.store, row, column))
    }

    /// Choices for an enum cell, computed now
    pub fn domain(&self, row: RowId, column: &ColumnId) -> GridResult<Vec<String>> {
        let col = find_column(&self.columns, column)?;
        Ok(col.binding.domain(&self.store, row))
    }

    /// Rebuild the row list from the store
    ///
    /// Idempotent; safe to call after any store change, including changes
    /// made by other commands.
    pub fn refresh(&mut self) {
        self.rebuild();
        self.flush_events();
    }

    /// Highlight a row, or clear the highlight
    pub fn select(&mut self, row: Option<RowId>) -> GridResult<()> {
        self.select_deferred(row)?;
        self.flush_events();
        Ok(())
    }

    /// Write one cell
    ///
    /// Writes to the placeholder row are routed through
    /// [`materialize_placeholder`](Self::materialize_placeholder).
    pub fn write_cell(
        &mut self,
        row: RowId,
        column: &ColumnId,
        value: Value,
    ) -> GridResult<WriteOutcome> {
        let outcome = if self.is_placeholder(row) {
            match self.materialize_deferred(column, value)? {
                Materialization::Materialized(_) => WriteOutcome::Accepted,
                Materialization::Rejected(reason) => WriteOutcome::Rejected(reason),
            }
        } else {
            self.write_deferred(row, column, value)?
        };
        self.flush_events();
        Ok(outcome)
    }

    /// Mark the placeholder as being edited so the store applies defaults
    ///
    /// Activation happens at most once until the placeholder is materialized
    /// or deactivated. Returns whether this call activated it.
    pub fn activate_placeholder(&mut self) -> GridResult<bool> {
        let activated = self.activate_deferred()?;
        self.flush_events();
        Ok(activated)
    }

    /// Roll back an activated placeholder that received no accepted write
    pub fn deactivate_placeholder(&mut self) {
        self.deactivate_deferred();
        self.flush_events();
    }

    /// Turn the placeholder into a real row by writing its first value
    #[tracing::instrument(skip(self, value))]
    pub fn materialize_placeholder(
        &mut self,
        column: &ColumnId,
        value: Value,
    ) -> GridResult<Materialization> {
        let result = self.materialize_deferred(column, value)?;
        self.flush_events();
        Ok(result)
    }

    /// Delete real rows
    ///
    /// The selection moves to the row now at the selected position, clamped
    /// to the last real row; the placeholder is selected only when no real
    /// rows remain.
    #[tracing::instrument(skip(self))]
    pub fn remove_rows(&mut self, rows: &[RowId]) -> GridResult<()> {
        let targets: Vec<RowId> = rows
            .iter()
            .copied()
            .filter(|id| self.contains(*id) && !self.is_placeholder(*id))
            .collect();
        if targets.is_empty() {
            return Ok(());
        }

        let saved = self.selection;
        self.store.remove(&targets)?;
        self.rebuild();

        if let Some(saved) = saved
            && targets.contains(&saved.row)
        {
            let real = self.real_row_count();
            let replacement = if real > 0 {
                self.row_at(saved.position.min(real - 1)).map(|r| r.id)
            } else {
                self.placeholder()
            };
            self.select_deferred(replacement)?;
        }
        tracing::debug!(removed = targets.len(), "removed rows");
        self.flush_events();
        Ok(())
    }

    pub(crate) fn flush_events(&mut self) {
        self.events.flush();
    }

    pub(crate) fn emit(&mut self, event: GridEvent) {
        self.events.emit(event);
    }

    pub(crate) fn rebuild(&mut self) {
        self.state = ModelState::Rebuilding;

        let count = self.store.count();
        let mut rows = Vec::with_capacity(count + 1);
        for index in 0..count {
            match self.store.row_id(index) {
                Some(id) => rows.push(Row {
                    id,
                    kind: RowKind::Real,
                }),
                None => tracing::warn!(index, count, "store reported no row id within its count"),
            }
        }
        let placeholder = self.store.placeholder_id();
        if let Some(id) = placeholder {
            rows.push(Row {
                id,
                kind: RowKind::Placeholder,
            });
        }

        self.positions = rows.iter().enumerate().map(|(i, r)| (r.id, i)).collect();
        self.rows = rows;

        // A placeholder that is no longer the placeholder was materialized by
        // an accepted write.
        if let Some(active) = self.active_placeholder
            && placeholder != Some(active)
        {
            self.active_placeholder = None;
        }

        let positions = &self.positions;
        self.rejections.retain(|(row, _), _| positions.contains_key(row));

        let previous = self.selection;
        self.selection = previous.and_then(|s| {
            self.positions
                .get(&s.row)
                .map(|&position| Selection { row: s.row, position })
        });
        if let Some(stale) = previous
            && self.selection.is_none()
        {
            tracing::debug!(row = %stale.row, "selected row is gone, clearing selection");
            self.events.emit(GridEvent::SelectionChanged(None));
        }

        self.state = ModelState::Clean;
        self.events.emit(GridEvent::Rebuilt {
            rows: self.rows.len(),
        });
    }

    pub(crate) fn select_deferred(&mut self, row: Option<RowId>) -> GridResult<()> {
        let selection = match row {
            Some(id) => {
                let position = self.position_of(id).ok_or(GridError::UnknownRow(id))?;
                Some(Selection { row: id, position })
            }
            None => None,
        };
        let changed = self.selection.map(|s| s.row) != selection.map(|s| s.row);
        self.selection = selection;
        if changed {
            self.events.emit(GridEvent::SelectionChanged(row));
        }
        Ok(())
    }

    pub(crate) fn activate_deferred(&mut self) -> GridResult<bool> {
        let placeholder = self.placeholder().ok_or(GridError::NoPlaceholder)?;
        if self.active_placeholder == Some(placeholder) {
            return Ok(false);
        }
        let defaults = self.store.activate_placeholder(placeholder)?;
        self.active_placeholder = Some(placeholder);
        tracing::debug!(row = %placeholder, defaults, "activated placeholder");
        self.events.emit(GridEvent::RowChanged(placeholder));
        Ok(true)
    }

    pub(crate) fn deactivate_deferred(&mut self) {
        if let Some(placeholder) = self.active_placeholder.take() {
            self.store.deactivate_placeholder(placeholder);
            tracing::debug!(row = %placeholder, "deactivated placeholder");
            self.rejections.retain(|(row, _), _| *row != placeholder);
            self.rebuild();
            self.events.emit(GridEvent::RowChanged(placeholder));
        }
    }

    pub(crate) fn write_deferred(
        &mut self,
        row: RowId,
        column: &ColumnId,
        value: Value,
    ) -> GridResult<WriteOutcome> {
        if !self.contains(row) {
            return Err(GridError::UnknownRow(row));
        }
        let col = find_column(&self.columns, column)?;
        let outcome = col.binding.write(&mut self.store, row, column, value);
        match &outcome {
            WriteOutcome::Accepted => {
                self.rejections.remove(&(row, column.clone()));
                self.rebuild();
                self.emit_accepted(row, column);
            }
            WriteOutcome::Rejected(reason) => self.record_rejection(row, column, reason),
        }
        Ok(outcome)
    }

    pub(crate) fn materialize_deferred(
        &mut self,
        column: &ColumnId,
        value: Value,
    ) -> GridResult<Materialization> {
        let placeholder = self.placeholder().ok_or(GridError::NoPlaceholder)?;
        find_column(&self.columns, column)?;
        self.activate_deferred()?;

        let col = find_column(&self.columns, column)?;
        match col.binding.write(&mut self.store, placeholder, column, value) {
            WriteOutcome::Accepted => {
                self.active_placeholder = None;
                self.rejections.retain(|(row, _), _| *row != placeholder);
                self.rebuild();
                if self.is_placeholder(placeholder) || !self.contains(placeholder) {
                    tracing::warn!(row = %placeholder, "store did not materialize the placeholder");
                }
                tracing::debug!(row = %placeholder, column = %column, "materialized placeholder");
                self.emit_accepted(placeholder, column);
                Ok(Materialization::Materialized(placeholder))
            }
            WriteOutcome::Rejected(reason) => {
                self.deactivate_deferred();
                self.record_rejection(placeholder, column, &reason);
                Ok(Materialization::Rejected(reason))
            }
        }
    }

    pub(crate) fn reorder_deferred(&mut self, rows: &[RowId], destination: usize) -> GridResult<()> {
        self.store.reorder(rows, destination)?;
        self.rebuild();
        Ok(())
    }

    fn emit_accepted(&mut self, row: RowId, column: &ColumnId) {
        let value = find_column(&self.columns, column)
            .ok()
            .and_then(|c| c.binding.read(&self.store, row, column));
        self.events.emit(GridEvent::ValueChanged {
            row,
            column: column.clone(),
            value,
        });
        self.events.emit(GridEvent::RowChanged(row));
    }

    fn record_rejection(&mut self, row: RowId, column: &ColumnId, reason: &str) {
        tracing::debug!(row = %row, column = %column, reason, "write rejected");
        self.rejections
            .insert((row, column.clone()), reason.to_string());
        self.events.emit(GridEvent::WriteRejected {
            row,
            column: column.clone(),
            reason: reason.to_string(),
        });
    }
}
