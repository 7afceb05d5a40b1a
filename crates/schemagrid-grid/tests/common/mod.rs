//! Common test utilities and mocks

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use schemagrid_core::{
    ColumnId, CoreError, RecordStore, Result, RowId, Value, WriteOutcome, reordered,
};
use schemagrid_grid::{Column, DomainSource};

/// One call made to the mock store, for assertion in tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    GetField(RowId, String),
    SetField(RowId, String, Value),
    Activate(RowId),
    Deactivate(RowId),
    Reorder(Vec<RowId>, usize),
    Remove(Vec<RowId>),
}

type Validator = Box<dyn Fn(&str, &Value) -> Option<String>>;
type SideEffect = Box<dyn Fn(&str, &Value, &mut HashMap<String, Value>)>;

#[derive(Debug, Clone)]
struct MockRecord {
    id: RowId,
    fields: HashMap<String, Value>,
}

/// In-memory store for testing grid logic without a real backend.
///
/// Supports configurable defaults applied on placeholder activation, a
/// validator that rejects writes, and side effects that change other fields
/// of the written row. Every contract call except `count`/`row_id` is logged.
pub struct MockStore {
    rows: Vec<MockRecord>,
    placeholder: Option<RowId>,
    /// Record being edited on the placeholder row
    pending: Option<MockRecord>,
    defaults: HashMap<String, Value>,
    validator: Option<Validator>,
    side_effect: Option<SideEffect>,
    calls: Rc<RefCell<Vec<StoreCall>>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            placeholder: Some(RowId::new()),
            pending: None,
            defaults: HashMap::new(),
            validator: None,
            side_effect: None,
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// A store whose membership is fixed: no placeholder row
    pub fn fixed() -> Self {
        Self {
            placeholder: None,
            ..Self::new()
        }
    }

    pub fn with_row(mut self, fields: &[(&str, Value)]) -> Self {
        self.rows.push(MockRecord {
            id: RowId::new(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });
        self
    }

    pub fn with_default(mut self, column: &str, value: Value) -> Self {
        self.defaults.insert(column.to_string(), value);
        self
    }

    pub fn with_validator(mut self, f: impl Fn(&str, &Value) -> Option<String> + 'static) -> Self {
        self.validator = Some(Box::new(f));
        self
    }

    pub fn with_side_effect(
        mut self,
        f: impl Fn(&str, &Value, &mut HashMap<String, Value>) + 'static,
    ) -> Self {
        self.side_effect = Some(Box::new(f));
        self
    }

    /// Shared handle on the call log; stays valid after the store moves into a grid
    pub fn call_log(&self) -> Rc<RefCell<Vec<StoreCall>>> {
        self.calls.clone()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.borrow().clone()
    }

    pub fn ids(&self) -> Vec<RowId> {
        self.rows.iter().map(|r| r.id).collect()
    }

    pub fn field(&self, row: RowId, column: &str) -> Option<Value> {
        self.record(row).and_then(|r| r.fields.get(column).cloned())
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn record(&self, row: RowId) -> Option<&MockRecord> {
        self.rows
            .iter()
            .find(|r| r.id == row)
            .or_else(|| self.pending.as_ref().filter(|p| p.id == row))
    }

    fn log(&self, call: StoreCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl RecordStore for MockStore {
    fn count(&self) -> usize {
        self.rows.len()
    }

    fn row_id(&self, index: usize) -> Option<RowId> {
        self.rows.get(index).map(|r| r.id)
    }

    fn placeholder_id(&self) -> Option<RowId> {
        self.placeholder
    }

    fn get_field(&self, row: RowId, column: &ColumnId) -> Option<Value> {
        self.log(StoreCall::GetField(row, column.to_string()));
        self.record(row)
            .and_then(|r| r.fields.get(column.as_str()).cloned())
    }

    fn set_field(&mut self, row: RowId, column: &ColumnId, value: Value) -> WriteOutcome {
        self.log(StoreCall::SetField(row, column.to_string(), value.clone()));
        if let Some(validator) = &self.validator
            && let Some(reason) = validator(column.as_str(), &value)
        {
            return WriteOutcome::Rejected(reason);
        }

        let is_placeholder = self.placeholder == Some(row);
        if is_placeholder && self.pending.is_none() {
            self.pending = Some(MockRecord {
                id: row,
                fields: HashMap::new(),
            });
        }
        let record = if is_placeholder {
            self.pending.as_mut()
        } else {
            self.rows.iter_mut().find(|r| r.id == row)
        };
        let Some(record) = record else {
            return WriteOutcome::rejected("unknown row");
        };
        record.fields.insert(column.to_string(), value.clone());
        if let Some(effect) = &self.side_effect {
            effect(column.as_str(), &value, &mut record.fields);
        }

        if is_placeholder && let Some(pending) = self.pending.take() {
            self.rows.push(pending);
            self.placeholder = Some(RowId::new());
        }
        WriteOutcome::Accepted
    }

    fn activate_placeholder(&mut self, row: RowId) -> Result<bool> {
        self.log(StoreCall::Activate(row));
        if self.placeholder != Some(row) {
            return Err(CoreError::NotPlaceholder(row));
        }
        self.pending = Some(MockRecord {
            id: row,
            fields: self.defaults.clone(),
        });
        Ok(!self.defaults.is_empty())
    }

    fn deactivate_placeholder(&mut self, row: RowId) {
        self.log(StoreCall::Deactivate(row));
        if self.pending.as_ref().is_some_and(|p| p.id == row) {
            self.pending = None;
        }
    }

    fn reorder(&mut self, rows: &[RowId], destination: usize) -> Result<()> {
        self.log(StoreCall::Reorder(rows.to_vec(), destination));
        if destination > self.rows.len() {
            return Err(CoreError::DestinationOutOfRange {
                destination,
                count: self.rows.len(),
            });
        }
        if let Some(unknown) = rows.iter().find(|id| self.record(**id).is_none()) {
            return Err(CoreError::UnknownRow(*unknown));
        }
        let order = reordered(&self.ids(), rows, destination);
        let mut old = std::mem::take(&mut self.rows);
        for id in order {
            if let Some(index) = old.iter().position(|r| r.id == id) {
                self.rows.push(old.swap_remove(index));
            }
        }
        Ok(())
    }

    fn remove(&mut self, rows: &[RowId]) -> Result<()> {
        self.log(StoreCall::Remove(rows.to_vec()));
        self.rows.retain(|r| !rows.contains(&r.id));
        Ok(())
    }
}

/// Two real rows ("id", "name") plus the placeholder; new rows start as VARCHAR(45)
pub fn people_store() -> MockStore {
    MockStore::new()
        .with_default("type", Value::choice("VARCHAR(45)"))
        .with_row(&[("name", Value::text("id")), ("type", Value::choice("INT"))])
        .with_row(&[("name", Value::text("name")), ("type", Value::choice("VARCHAR(45)"))])
}

/// Name → Type chain plus a checkbox column
pub fn name_type_columns() -> Vec<Column> {
    vec![
        Column::text("name", "Column Name").chained(0).materializes(),
        Column::choice(
            "type",
            "Datatype",
            DomainSource::fixed(["INT", "VARCHAR(45)", "TEXT"]),
        )
        .chained(1),
        Column::boolean("nn", "NN"),
        Column::text("comment", "Comment").detail_only(),
    ]
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("schemagrid_grid=debug")
        .try_init();
}
