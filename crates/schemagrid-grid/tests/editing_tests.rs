//! Integration tests for EditingWorkflow
//!
//! Drives an EditableGrid over the MockStore: placeholder materialization,
//! chained editing, rejection handling and cancel/focus-loss behavior.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use schemagrid_core::{ColumnId, RowId, Value, WriteOutcome};
use schemagrid_grid::{
    CommitOutcome, EditableGrid, FocusLoss, GridError, GridEvent, GridKey, GridSettings,
    RowAdvance, WorkflowState,
};

use common::{MockStore, StoreCall, init_tracing, name_type_columns, people_store};

fn grid_with(store: MockStore, settings: GridSettings) -> EditableGrid<MockStore> {
    init_tracing();
    EditableGrid::new(store, name_type_columns(), settings).expect("should build grid")
}

fn grid() -> EditableGrid<MockStore> {
    grid_with(people_store(), GridSettings::default())
}

fn col(id: &str) -> ColumnId {
    ColumnId::from(id)
}

fn activations(grid: &EditableGrid<MockStore>) -> usize {
    grid.store()
        .calls()
        .iter()
        .filter(|c| matches!(c, StoreCall::Activate(_)))
        .count()
}

fn deactivations(grid: &EditableGrid<MockStore>) -> usize {
    grid.store()
        .calls()
        .iter()
        .filter(|c| matches!(c, StoreCall::Deactivate(_)))
        .count()
}

fn writes(grid: &EditableGrid<MockStore>) -> Vec<StoreCall> {
    grid.store()
        .calls()
        .into_iter()
        .filter(|c| matches!(c, StoreCall::SetField(..)))
        .collect()
}

fn editing(grid: &EditableGrid<MockStore>) -> Option<(RowId, String)> {
    grid.workflow()
        .session()
        .map(|s| (s.row, s.column.to_string()))
}

fn assert_single_trailing_placeholder(grid: &EditableGrid<MockStore>) {
    let rows = grid.model().rows();
    let placeholders = rows.iter().filter(|r| r.is_placeholder()).count();
    assert_eq!(placeholders, 1, "exactly one placeholder row");
    assert!(rows.last().is_some_and(|r| r.is_placeholder()));
}

// ============ End-to-end ============

#[test]
fn new_column_typed_into_placeholder_opens_type_editor() {
    let mut grid = grid();
    let placeholder = grid.model().placeholder().expect("placeholder");

    grid.double_click(placeholder, &col("name"))
        .expect("should open editor");
    grid.type_text("email").expect("should type");
    let outcome = grid
        .handle_key(GridKey::Enter)
        .expect("should commit")
        .expect("editor was open");

    assert_eq!(
        outcome,
        CommitOutcome::Committed {
            row: placeholder,
            next: Some((placeholder, col("type"))),
        }
    );
    assert_eq!(activations(&grid), 1);
    assert_eq!(
        writes(&grid),
        vec![StoreCall::SetField(
            placeholder,
            "name".to_string(),
            Value::text("email")
        )]
    );
    assert_eq!(grid.model().real_row_count(), 3);
    assert_eq!(grid.model().row_count(), 4);
    assert_single_trailing_placeholder(&grid);
    assert_ne!(grid.model().placeholder(), Some(placeholder));
    assert_eq!(editing(&grid), Some((placeholder, "type".to_string())));
}

// ============ Placeholder lifecycle ============

#[test]
fn placeholder_stays_last_across_accepted_edits() {
    let mut grid = grid();
    for name in ["a", "b", "c"] {
        let placeholder = grid.model().placeholder().expect("placeholder");
        grid.begin_edit(placeholder, &col("name")).expect("edit");
        grid.type_text(name).expect("type");
        grid.focus_lost().expect("commit");
        assert_single_trailing_placeholder(&grid);
    }

    let first = grid.model().row_at(0).expect("row").id;
    grid.begin_edit(first, &col("name")).expect("edit");
    grid.type_text("renamed").expect("type");
    grid.handle_key(GridKey::Tab).expect("commit");

    assert_eq!(grid.model().real_row_count(), 5);
    assert_single_trailing_placeholder(&grid);
}

#[test]
fn activation_happens_once_per_materialization() {
    let mut grid = grid();
    let placeholder = grid.model().placeholder().expect("placeholder");

    grid.begin_edit(placeholder, &col("name")).expect("edit");
    grid.type_text("email").expect("type");
    grid.handle_key(GridKey::Tab).expect("commit");
    assert_eq!(activations(&grid), 1);

    // Editing the materialized row never activates again.
    grid.choose(1).expect("choose");
    grid.focus_lost().expect("commit type");
    grid.begin_edit(placeholder, &col("name")).expect("edit again");
    grid.type_text("email_address").expect("type");
    grid.focus_lost().expect("commit");
    assert_eq!(activations(&grid), 1);

    assert_eq!(
        grid.store().field(placeholder, "type"),
        Some(Value::choice("VARCHAR(45)"))
    );
}

#[test]
fn placeholder_defaults_are_shown_in_the_editor() {
    let store = people_store().with_default("name", Value::text("col3"));
    let mut grid = grid_with(store, GridSettings::default());
    let placeholder = grid.model().placeholder().expect("placeholder");

    grid.begin_edit(placeholder, &col("name")).expect("edit");
    let session = grid.workflow().session().expect("session");
    assert_eq!(session.text, "col3");
    assert!(session.placeholder_active);
}

#[test]
fn placeholder_rejects_non_materializing_columns() {
    let mut grid = grid();
    let placeholder = grid.model().placeholder().expect("placeholder");

    let err = grid.begin_edit(placeholder, &col("type")).unwrap_err();
    assert!(matches!(err, GridError::PlaceholderNotEditable(_)));
    assert_eq!(activations(&grid), 0);
    assert_eq!(*grid.workflow().state(), WorkflowState::Idle);
}

#[test]
fn toggling_placeholder_checkbox_materializes_it() {
    let mut grid = grid();
    let placeholder = grid.model().placeholder().expect("placeholder");

    let outcome = grid.toggle(placeholder, &col("nn")).expect("toggle");
    assert_eq!(outcome, WriteOutcome::Accepted);
    assert_eq!(grid.model().real_row_count(), 3);
    assert_eq!(grid.store().field(placeholder, "nn"), Some(Value::Bool(true)));
    assert_eq!(activations(&grid), 1);
}

// ============ Rejections ============

#[test]
fn rejected_write_restores_store_value() {
    let store = people_store().with_validator(|column, value| {
        (column == "name" && value.as_str() == Some("bad")).then(|| "bad name".to_string())
    });
    let mut grid = grid_with(store, GridSettings::default());
    let row = grid.model().row_at(0).expect("row").id;
    let before = grid.model().cell(row, &col("name")).expect("cell").value;

    grid.begin_edit(row, &col("name")).expect("edit");
    grid.type_text("bad").expect("type");
    let outcome = grid.handle_key(GridKey::Enter).expect("commit");

    assert_eq!(
        outcome,
        Some(CommitOutcome::Rejected {
            row,
            column: col("name"),
            reason: "bad name".to_string(),
        })
    );
    let cell = grid.model().cell(row, &col("name")).expect("cell");
    assert_eq!(cell.value, before);
    assert_eq!(cell.rejected.as_deref(), Some("bad name"));
    assert_eq!(*grid.workflow().state(), WorkflowState::Idle);

    // The next accepted write clears the rejection.
    grid.begin_edit(row, &col("name")).expect("edit");
    grid.type_text("good").expect("type");
    grid.handle_key(GridKey::Enter).expect("commit");
    assert!(!grid.model().cell(row, &col("name")).expect("cell").is_rejected());
}

#[test]
fn rejected_materialization_deactivates_placeholder() {
    let store = people_store().with_validator(|_, _| Some("duplicate column name".to_string()));
    let mut grid = grid_with(store, GridSettings::default());
    let placeholder = grid.model().placeholder().expect("placeholder");

    grid.begin_edit(placeholder, &col("name")).expect("edit");
    grid.type_text("id").expect("type");
    let outcome = grid.handle_key(GridKey::Enter).expect("commit");

    assert!(matches!(outcome, Some(CommitOutcome::Rejected { .. })));
    assert_eq!(deactivations(&grid), 1);
    assert_eq!(grid.model().real_row_count(), 2);
    assert_eq!(grid.model().placeholder(), Some(placeholder));
    assert!(!grid.store().has_pending());
    assert_eq!(grid.model().active_placeholder(), None);
}

#[test]
fn toggle_on_not_applicable_cell_is_rejected_locally() {
    let mut grid = grid();
    let row = grid.model().row_at(0).expect("row").id;
    assert!(!grid.model().cell(row, &col("nn")).expect("cell").enabled);

    let outcome = grid.toggle(row, &col("nn")).expect("toggle");
    assert!(!outcome.is_accepted());
    assert!(writes(&grid).is_empty());
}

#[test]
fn not_applicable_cell_has_no_inline_editor() {
    let store = people_store().with_row(&[("name", Value::text("notes"))]);
    let mut grid = grid_with(store, GridSettings::default());
    let row = grid.model().row_at(2).expect("row").id;
    assert!(!grid.model().cell(row, &col("type")).expect("cell").enabled);

    assert!(matches!(
        grid.begin_edit(row, &col("type")),
        Err(GridError::NotApplicable(column)) if column == col("type")
    ));
    assert!(!grid.workflow().is_editing());
    assert!(writes(&grid).is_empty());
    assert_eq!(grid.store().field(row, "type"), None);
}

#[test]
fn chain_stops_before_not_applicable_cell() {
    let store = people_store().with_row(&[("name", Value::text("notes"))]);
    let mut grid = grid_with(store, GridSettings::default());
    let row = grid.model().row_at(2).expect("row").id;

    grid.begin_edit(row, &col("name")).expect("edit");
    grid.type_text("remarks").expect("type");
    let outcome = grid.commit().expect("commit");

    assert_eq!(outcome, CommitOutcome::Committed { row, next: None });
    assert!(!grid.workflow().is_editing());
    assert_eq!(grid.store().field(row, "name"), Some(Value::text("remarks")));
}

// ============ Chained editing ============

#[test]
fn name_commit_opens_type_on_same_row() {
    let mut grid = grid();
    let row = grid.model().row_at(0).expect("row").id;

    grid.begin_edit(row, &col("name")).expect("edit");
    grid.type_text("user_id").expect("type");
    grid.handle_key(GridKey::Tab).expect("commit");

    assert_eq!(editing(&grid), Some((row, "type".to_string())));
    let session = grid.workflow().session().expect("session");
    assert_eq!(session.text, "INT");
    assert_eq!(session.domain, vec!["INT", "VARCHAR(45)", "TEXT"]);
}

#[test]
fn last_chained_column_advances_to_next_row() {
    let mut grid = grid();
    let first = grid.model().row_at(0).expect("row").id;
    let second = grid.model().row_at(1).expect("row").id;

    grid.begin_edit(first, &col("type")).expect("edit");
    grid.choose(2).expect("choose");
    grid.handle_key(GridKey::Enter).expect("commit");
    assert_eq!(editing(&grid), Some((second, "name".to_string())));
    assert_eq!(grid.model().selection(), Some(second));

    // From the last real row the chain moves onto the placeholder.
    grid.begin_edit(second, &col("type")).expect("edit");
    grid.choose(0).expect("choose");
    grid.handle_key(GridKey::Enter).expect("commit");

    let placeholder = grid.model().placeholder().expect("placeholder");
    assert_eq!(editing(&grid), Some((placeholder, "name".to_string())));
    assert_eq!(activations(&grid), 1);
}

#[test]
fn row_advance_setting_limits_chain() {
    let settings = GridSettings {
        row_advance: RowAdvance::Never,
        ..GridSettings::default()
    };
    let mut grid = grid_with(people_store(), settings);
    let first = grid.model().row_at(0).expect("row").id;

    grid.begin_edit(first, &col("type")).expect("edit");
    grid.choose(2).expect("choose");
    let outcome = grid.handle_key(GridKey::Enter).expect("commit");

    assert_eq!(
        outcome,
        Some(CommitOutcome::Committed {
            row: first,
            next: None
        })
    );
    assert!(!grid.workflow().is_editing());

    let settings = GridSettings {
        row_advance: RowAdvance::PlaceholderOnly,
        ..GridSettings::default()
    };
    let mut grid = grid_with(people_store(), settings);
    let first = grid.model().row_at(0).expect("row").id;
    grid.begin_edit(first, &col("type")).expect("edit");
    grid.choose(2).expect("choose");
    grid.handle_key(GridKey::Enter).expect("commit");
    assert!(!grid.workflow().is_editing());
}

#[test]
fn empty_commit_does_not_advance() {
    let mut grid = grid();
    let row = grid.model().row_at(0).expect("row").id;

    grid.begin_edit(row, &col("name")).expect("edit");
    grid.type_text("").expect("type");
    let outcome = grid.handle_key(GridKey::Tab).expect("commit");

    assert_eq!(
        outcome,
        Some(CommitOutcome::Committed { row, next: None })
    );
    assert_eq!(grid.store().field(row, "name"), Some(Value::text("")));
}

#[test]
fn focus_loss_commits_without_advancing() {
    let mut grid = grid();
    let row = grid.model().row_at(1).expect("row").id;

    grid.begin_edit(row, &col("name")).expect("edit");
    grid.type_text("full_name").expect("type");
    let outcome = grid.focus_lost().expect("focus lost");

    assert_eq!(
        outcome,
        Some(CommitOutcome::Committed { row, next: None })
    );
    assert!(!grid.workflow().is_editing());
    assert_eq!(grid.store().field(row, "name"), Some(Value::text("full_name")));
}

#[test]
fn focus_loss_can_discard() {
    let settings = GridSettings {
        focus_loss: FocusLoss::Discard,
        ..GridSettings::default()
    };
    let mut grid = grid_with(people_store(), settings);
    let row = grid.model().row_at(1).expect("row").id;

    grid.begin_edit(row, &col("name")).expect("edit");
    grid.type_text("full_name").expect("type");
    let outcome = grid.focus_lost().expect("focus lost");

    assert_eq!(outcome, Some(CommitOutcome::Cancelled));
    assert!(writes(&grid).is_empty());
}

#[test]
fn unchanged_value_is_not_written() {
    let mut grid = grid();
    let row = grid.model().row_at(0).expect("row").id;

    grid.begin_edit(row, &col("name")).expect("edit");
    grid.handle_key(GridKey::Tab).expect("commit");

    assert!(writes(&grid).is_empty());
    assert_eq!(editing(&grid), Some((row, "type".to_string())));
}

// ============ Cancel ============

#[test]
fn cancel_on_placeholder_deactivates_it() {
    let mut grid = grid();
    let placeholder = grid.model().placeholder().expect("placeholder");

    grid.double_click(placeholder, &col("name")).expect("edit");
    grid.type_text("email").expect("type");
    let outcome = grid.handle_key(GridKey::Escape).expect("cancel");

    assert_eq!(outcome, Some(CommitOutcome::Cancelled));
    assert_eq!(grid.model().real_row_count(), 2);
    assert_eq!(deactivations(&grid), 1);
    assert!(writes(&grid).is_empty());
    assert!(!grid.store().has_pending());
}

#[test]
fn empty_commit_on_placeholder_is_a_cancel() {
    let mut grid = grid();
    let placeholder = grid.model().placeholder().expect("placeholder");

    grid.begin_edit(placeholder, &col("name")).expect("edit");
    grid.type_text("   ").expect("type");
    let outcome = grid.handle_key(GridKey::Enter).expect("commit");

    assert_eq!(outcome, Some(CommitOutcome::Cancelled));
    assert_eq!(deactivations(&grid), 1);
    assert_eq!(grid.model().real_row_count(), 2);
}

#[test]
fn cancel_on_real_row_never_writes() {
    let mut grid = grid();
    let row = grid.model().row_at(0).expect("row").id;

    grid.begin_edit(row, &col("name")).expect("edit");
    grid.type_text("changed").expect("type");
    grid.cancel();

    assert!(writes(&grid).is_empty());
    assert_eq!(deactivations(&grid), 0);
    assert_eq!(grid.store().field(row, "name"), Some(Value::text("id")));
}

// ============ Misuse ============

#[test]
fn commit_without_session_is_an_error() {
    let mut grid = grid();
    assert!(matches!(grid.commit(), Err(GridError::NoActiveSession)));
    assert!(grid.handle_key(GridKey::Enter).expect("no-op").is_none());
}

#[test]
fn detail_only_and_checkbox_columns_have_no_inline_editor() {
    let mut grid = grid();
    let row = grid.model().row_at(0).expect("row").id;

    assert!(matches!(
        grid.begin_edit(row, &col("comment")),
        Err(GridError::NotInlineEditable(_))
    ));
    assert!(matches!(
        grid.begin_edit(row, &col("nn")),
        Err(GridError::NotInlineEditable(_))
    ));
    assert!(matches!(grid.choose(9), Err(GridError::NoActiveSession)));
}

#[test]
fn choose_out_of_range() {
    let mut grid = grid();
    let row = grid.model().row_at(0).expect("row").id;
    grid.begin_edit(row, &col("type")).expect("edit");

    assert!(matches!(
        grid.choose(3),
        Err(GridError::ChoiceOutOfRange { index: 3, len: 3 })
    ));
}

// ============ Selection and events ============

#[test]
fn selection_survives_edit_of_another_row() {
    let mut grid = grid();
    let first = grid.model().row_at(0).expect("row").id;
    let second = grid.model().row_at(1).expect("row").id;

    grid.select(Some(first)).expect("select");
    grid.begin_edit(second, &col("name")).expect("edit");
    grid.type_text("title").expect("type");
    grid.handle_key(GridKey::Tab).expect("commit");

    assert_eq!(grid.model().selection(), Some(first));
    assert_eq!(grid.model().selected_position(), Some(0));
}

#[test]
fn listeners_see_committed_row() {
    let mut grid = grid();
    let row = grid.model().row_at(0).expect("row").id;
    grid.take_events();
    let seen: Rc<RefCell<Vec<GridEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    grid.subscribe(move |event| sink.borrow_mut().push(event.clone()));

    grid.begin_edit(row, &col("name")).expect("edit");
    grid.type_text("uid").expect("type");
    grid.handle_key(GridKey::Tab).expect("commit");

    let events = seen.borrow().clone();
    let rebuilt = events
        .iter()
        .position(|e| matches!(e, GridEvent::Rebuilt { .. }))
        .expect("rebuilt");
    let changed = events
        .iter()
        .position(|e| {
            *e == GridEvent::ValueChanged {
                row,
                column: col("name"),
                value: Some(Value::text("uid")),
            }
        })
        .expect("value changed");
    assert!(rebuilt < changed);
    assert!(events.contains(&GridEvent::RowChanged(row)));
    assert_eq!(
        events.last(),
        Some(&GridEvent::CellEditRequested {
            row,
            column: col("type")
        })
    );
    assert_eq!(grid.take_events(), events);
}

#[test]
fn side_effects_are_visible_after_commit() {
    let store = people_store().with_side_effect(|column, value, fields| {
        if column == "type" && value.as_str() != Some("INT") {
            fields.remove("nn");
        } else if column == "type" {
            fields.insert("nn".to_string(), Value::Bool(false));
        }
    });
    let mut grid = grid_with(store, GridSettings::default());
    let row = grid.model().row_at(1).expect("row").id;
    assert!(!grid.model().cell(row, &col("nn")).expect("cell").enabled);

    grid.begin_edit(row, &col("type")).expect("edit");
    grid.choose(0).expect("choose");
    grid.focus_lost().expect("commit");

    let cell = grid.model().cell(row, &col("nn")).expect("cell");
    assert!(cell.enabled);
    assert_eq!(cell.value, Some(Value::Bool(false)));
}
