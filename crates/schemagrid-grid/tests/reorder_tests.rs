//! Integration tests for drag reordering

mod common;

use pretty_assertions::assert_eq;
use schemagrid_core::{ColumnId, RowId, Value};
use schemagrid_grid::{
    DropPosition, EditableGrid, GridError, GridSettings, ReorderOutcome, RowReorderer,
    WorkflowState,
};

use common::{MockStore, StoreCall, init_tracing, name_type_columns};

/// Four real rows a, b, c, d plus the placeholder
fn grid() -> (EditableGrid<MockStore>, Vec<RowId>) {
    init_tracing();
    let store = ["a", "b", "c", "d"]
        .iter()
        .fold(MockStore::new(), |store, name| {
            store.with_row(&[("name", Value::text(*name))])
        });
    let ids = store.ids();
    let grid = EditableGrid::new(store, name_type_columns(), GridSettings::default())
        .expect("should build grid");
    (grid, ids)
}

fn reorder_calls(grid: &EditableGrid<MockStore>) -> Vec<StoreCall> {
    grid.store()
        .calls()
        .into_iter()
        .filter(|c| matches!(c, StoreCall::Reorder(..)))
        .collect()
}

#[test]
fn drop_onto_itself_or_next_slot_is_noop() {
    let (mut grid, ids) = grid();

    for target in [1, 2] {
        assert!(grid.begin_drag(&[ids[1]]).expect("drag"));
        let outcome = RowReorderer::reorder(grid.model_mut(), &[ids[1]], target).expect("drop");
        assert_eq!(outcome, ReorderOutcome::NoOp);
        grid.end_drag();
    }

    assert!(reorder_calls(&grid).is_empty());
    assert_eq!(grid.store().ids(), ids);
}

#[test]
fn drop_moves_rows_in_one_batch() {
    let (mut grid, ids) = grid();

    assert!(grid.begin_drag(&[ids[2], ids[0]]).expect("drag"));
    let outcome = grid.drop_at(3, DropPosition::After).expect("drop");

    assert_eq!(outcome, ReorderOutcome::Moved);
    assert_eq!(
        reorder_calls(&grid),
        vec![StoreCall::Reorder(vec![ids[0], ids[2]], 4)]
    );
    assert_eq!(grid.store().ids(), vec![ids[1], ids[3], ids[0], ids[2]]);
    assert_eq!(*grid.workflow().state(), WorkflowState::Idle);
}

#[test]
fn drop_on_placeholder_lands_after_last_real_row() {
    let (mut grid, ids) = grid();

    assert_eq!(
        RowReorderer::drop_target(grid.model(), 4, DropPosition::After),
        4
    );
    assert!(grid.begin_drag(&[ids[0]]).expect("drag"));
    grid.drop_at(4, DropPosition::Before).expect("drop");

    assert_eq!(grid.store().ids(), vec![ids[1], ids[2], ids[3], ids[0]]);
    assert!(grid.model().rows().last().is_some_and(|r| r.is_placeholder()));
}

#[test]
fn placeholder_is_never_dragged() {
    let (mut grid, ids) = grid();
    let placeholder = grid.model().placeholder().expect("placeholder");

    assert!(!grid.begin_drag(&[placeholder]).expect("drag"));
    assert!(!grid.workflow().is_dragging());

    assert!(grid.begin_drag(&[placeholder, ids[3]]).expect("drag"));
    match grid.workflow().state() {
        WorkflowState::Dragging(drag) => assert_eq!(drag.rows, vec![ids[3]]),
        other => panic!("expected a drag, got {:?}", other),
    }
}

#[test]
fn drag_suspends_editing() {
    let (mut grid, ids) = grid();
    assert!(grid.begin_drag(&[ids[0]]).expect("drag"));

    assert!(matches!(
        grid.begin_edit(ids[1], &ColumnId::from("name")),
        Err(GridError::DragInProgress)
    ));
    assert!(matches!(
        grid.double_click(ids[1], &ColumnId::from("name")),
        Err(GridError::DragInProgress)
    ));

    grid.end_drag();
    grid.begin_edit(ids[1], &ColumnId::from("name"))
        .expect("editing resumes after the drag");
}

#[test]
fn starting_a_drag_discards_the_open_editor() {
    let (mut grid, ids) = grid();
    grid.begin_edit(ids[0], &ColumnId::from("name")).expect("edit");
    grid.type_text("changed").expect("type");

    assert!(grid.begin_drag(&[ids[1]]).expect("drag"));

    assert_eq!(grid.store().field(ids[0], "name"), Some(Value::text("a")));
    assert!(grid.workflow().is_dragging());
}

#[test]
fn can_drop_reports_noop_targets() {
    let (mut grid, ids) = grid();
    assert!(!grid.can_drop_at(0, DropPosition::Before), "no drag yet");

    grid.begin_drag(&[ids[1]]).expect("drag");
    assert!(!grid.can_drop_at(1, DropPosition::Before));
    assert!(!grid.can_drop_at(1, DropPosition::After));
    assert!(grid.can_drop_at(0, DropPosition::Before));
    assert!(grid.can_drop_at(3, DropPosition::After));
}

#[test]
fn drop_without_drag_is_an_error() {
    let (mut grid, _) = grid();
    assert!(matches!(
        grid.drop_at(0, DropPosition::Before),
        Err(GridError::NoDragInProgress)
    ));
}

#[test]
fn unknown_rows_cannot_be_dragged() {
    let (mut grid, _) = grid();
    assert!(matches!(
        grid.begin_drag(&[RowId::new()]),
        Err(GridError::UnknownRow(_))
    ));
}

#[test]
fn selection_follows_dragged_row() {
    let (mut grid, ids) = grid();
    grid.select(Some(ids[0])).expect("select");

    grid.begin_drag(&[ids[0]]).expect("drag");
    grid.drop_at(2, DropPosition::After).expect("drop");

    assert_eq!(grid.model().selection(), Some(ids[0]));
    assert_eq!(grid.model().selected_position(), Some(2));
}

#[test]
fn multi_row_drop_onto_own_row_is_refused() {
    let (mut grid, ids) = grid();

    assert!(grid.begin_drag(&[ids[0], ids[2]]).expect("drag"));
    assert!(!grid.can_drop_at(0, DropPosition::Before));
    assert!(!grid.can_drop_at(2, DropPosition::After));
    let outcome = grid.drop_at(0, DropPosition::Before).expect("drop");

    assert_eq!(outcome, ReorderOutcome::NoOp);
    assert!(reorder_calls(&grid).is_empty());
    assert_eq!(grid.store().ids(), ids);
}
