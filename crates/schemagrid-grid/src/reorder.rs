//! Drag reordering of real rows

use schemagrid_core::{RecordStore, RowId};

use crate::error::{GridError, GridResult};
use crate::model::GridModel;

/// Which side of the row under the cursor a drop lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// The drop would leave every row where it is; the store was not called
    NoOp,
    Moved,
}

/// Rows picked up by a drag gesture; never contains the placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub rows: Vec<RowId>,
}

pub struct RowReorderer;

impl RowReorderer {
    /// Rows of `selection` that may be dragged, in display order
    pub fn draggable<S: RecordStore>(model: &GridModel<S>, selection: &[RowId]) -> Vec<RowId> {
        let mut rows: Vec<(usize, RowId)> = selection
            .iter()
            .filter(|id| !model.is_placeholder(**id))
            .filter_map(|id| model.position_of(*id).map(|p| (p, *id)))
            .collect();
        rows.sort_by_key(|(position, _)| *position);
        rows.dedup_by_key(|(_, id)| *id);
        rows.into_iter().map(|(_, id)| id).collect()
    }

    /// Target index for a drop on the row at `node_index`
    ///
    /// Drops on or after the placeholder land after the last real row.
    pub fn drop_target<S: RecordStore>(
        model: &GridModel<S>,
        node_index: usize,
        position: DropPosition,
    ) -> usize {
        let target = match position {
            DropPosition::Before => node_index,
            DropPosition::After => node_index + 1,
        };
        target.min(model.real_row_count())
    }

    /// Whether dropping `rows` at `target` is refused
    ///
    /// The drop is refused when any dragged row sits at `target` or right
    /// before it, so a selection is never dropped onto one of its own rows.
    pub fn is_noop<S: RecordStore>(model: &GridModel<S>, rows: &[RowId], target: usize) -> bool {
        if rows.is_empty() {
            return true;
        }
        rows.iter().any(|id| match model.position_of(*id) {
            Some(index) => index == target || index + 1 == target,
            None => true,
        })
    }

    /// Move `rows` to `target` in one batched store call
    #[tracing::instrument(skip(model))]
    pub fn reorder<S: RecordStore>(
        model: &mut GridModel<S>,
        rows: &[RowId],
        target: usize,
    ) -> GridResult<ReorderOutcome> {
        let rows = Self::draggable(model, rows);
        let target = target.min(model.real_row_count());
        if Self::is_noop(model, &rows, target) {
            tracing::debug!(target, "drop would not move anything");
            return Ok(ReorderOutcome::NoOp);
        }

        model.reorder_deferred(&rows, target)?;
        tracing::debug!(moved = rows.len(), target, "reordered rows");
        model.flush_events();
        Ok(ReorderOutcome::Moved)
    }
}

impl DragSession {
    pub fn new<S: RecordStore>(model: &GridModel<S>, selection: &[RowId]) -> GridResult<Option<Self>> {
        if let Some(unknown) = selection.iter().find(|id| !model.contains(**id)) {
            return Err(GridError::UnknownRow(*unknown));
        }
        let rows = RowReorderer::draggable(model, selection);
        Ok((!rows.is_empty()).then_some(Self { rows }))
    }
}
