//! Column bindings
//!
//! A binding describes how one column reads, writes and offers choices for
//! its cells. Dispatch is a plain `match` on the binding kind.

use std::fmt;
use std::rc::Rc;

use schemagrid_core::{ColumnId, RecordStore, RowId, Value, WriteOutcome};

/// Computes the choices of an enum cell from the current state of its row
pub type DomainFn = Rc<dyn Fn(&dyn RecordStore, RowId) -> Vec<String>>;

/// Where the choices of an enum column come from
#[derive(Clone)]
pub enum DomainSource {
    Static(Vec<String>),
    /// Recomputed every time an editor opens, never cached
    RowDependent(DomainFn),
}

impl DomainSource {
    pub fn fixed<I, T>(choices: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        DomainSource::Static(choices.into_iter().map(Into::into).collect())
    }

    pub fn row_dependent(f: impl Fn(&dyn RecordStore, RowId) -> Vec<String> + 'static) -> Self {
        DomainSource::RowDependent(Rc::new(f))
    }
}

impl fmt::Debug for DomainSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainSource::Static(choices) => f.debug_tuple("Static").field(choices).finish(),
            DomainSource::RowDependent(_) => f.write_str("RowDependent(..)"),
        }
    }
}

/// Read/write contract of one column type
#[derive(Debug, Clone)]
pub enum ColumnBinding {
    Text { read_only: bool },
    /// Tri-state checkboxes render a not-applicable value as indeterminate
    /// instead of disabled.
    Boolean { tri_state: bool },
    Enum(DomainSource),
}

impl ColumnBinding {
    pub fn text() -> Self {
        ColumnBinding::Text { read_only: false }
    }

    pub fn read_only() -> Self {
        ColumnBinding::Text { read_only: true }
    }

    pub fn boolean() -> Self {
        ColumnBinding::Boolean { tri_state: false }
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, ColumnBinding::Boolean { .. })
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self, ColumnBinding::Text { read_only: true })
    }

    /// Read a cell, coerced to the binding's value kind
    pub fn read(&self, store: &dyn RecordStore, row: RowId, column: &ColumnId) -> Option<Value> {
        let value = store.get_field(row, column)?;
        match (self, value) {
            (ColumnBinding::Text { .. }, Value::Choice(s)) => Some(Value::Text(s)),
            (ColumnBinding::Enum(_), Value::Text(s)) => Some(Value::Choice(s)),
            (ColumnBinding::Boolean { .. }, Value::Text(s) | Value::Choice(s)) => {
                Some(Value::Bool(parse_flag(&s)))
            }
            (ColumnBinding::Text { .. } | ColumnBinding::Enum(_), Value::Bool(b)) => {
                Some(Value::Text(Value::Bool(b).to_string()))
            }
            (_, value) => Some(value),
        }
    }

    /// Push a committed value to the store
    ///
    /// Read-only columns and values of the wrong kind are rejected here
    /// without reaching the store.
    pub fn write(
        &self,
        store: &mut dyn RecordStore,
        row: RowId,
        column: &ColumnId,
        value: Value,
    ) -> WriteOutcome {
        let value = match (self, value) {
            (ColumnBinding::Text { read_only: true }, _) => {
                return WriteOutcome::rejected(format!("'{}' is read-only", column));
            }
            (ColumnBinding::Text { .. }, Value::Text(s) | Value::Choice(s)) => Value::Text(s),
            (ColumnBinding::Enum(_), Value::Text(s) | Value::Choice(s)) => Value::Choice(s),
            (ColumnBinding::Boolean { .. }, Value::Bool(b)) => Value::Bool(b),
            (_, value) => {
                return WriteOutcome::rejected(format!(
                    "'{}' does not accept the value '{}'",
                    column, value
                ));
            }
        };
        store.set_field(row, column, value)
    }

    /// Choices offered by an enum editor; empty for other kinds
    pub fn domain(&self, store: &dyn RecordStore, row: RowId) -> Vec<String> {
        match self {
            ColumnBinding::Enum(DomainSource::Static(choices)) => choices.clone(),
            ColumnBinding::Enum(DomainSource::RowDependent(f)) => f(store, row),
            ColumnBinding::Text { .. } | ColumnBinding::Boolean { .. } => Vec::new(),
        }
    }

    /// Convert raw editor text into a value of this binding's kind
    pub fn parse(&self, text: &str) -> Value {
        match self {
            ColumnBinding::Text { .. } => Value::Text(text.to_string()),
            ColumnBinding::Enum(_) => Value::Choice(text.trim().to_string()),
            ColumnBinding::Boolean { .. } => Value::Bool(parse_flag(text)),
        }
    }

    /// Editor text for a value
    pub fn display(&self, value: Option<&Value>) -> String {
        match value {
            Some(value) => value.to_string(),
            None => String::new(),
        }
    }
}

fn parse_flag(text: &str) -> bool {
    matches!(
        text.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Static metadata of one grid column
#[derive(Debug, Clone)]
pub struct Column {
    pub id: ColumnId,
    pub header: String,
    pub binding: ColumnBinding,
    /// Position in the edit chain; `None` means the column does not advance
    pub chain: Option<u16>,
    /// Whether editing this column may turn the placeholder into a record
    pub materializes: bool,
    /// `false` for columns edited in a detail panel beside the grid
    pub inline: bool,
}

impl Column {
    pub fn new(id: impl Into<ColumnId>, header: impl Into<String>, binding: ColumnBinding) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            binding,
            chain: None,
            materializes: false,
            inline: true,
        }
    }

    pub fn text(id: impl Into<ColumnId>, header: impl Into<String>) -> Self {
        Self::new(id, header, ColumnBinding::text())
    }

    pub fn boolean(id: impl Into<ColumnId>, header: impl Into<String>) -> Self {
        Self::new(id, header, ColumnBinding::boolean())
    }

    pub fn choice(id: impl Into<ColumnId>, header: impl Into<String>, domain: DomainSource) -> Self {
        Self::new(id, header, ColumnBinding::Enum(domain))
    }

    pub fn chained(mut self, order: u16) -> Self {
        self.chain = Some(order);
        self
    }

    pub fn materializes(mut self) -> Self {
        self.materializes = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.binding = ColumnBinding::read_only();
        self
    }

    pub fn tri_state(mut self) -> Self {
        if let ColumnBinding::Boolean { tri_state } = &mut self.binding {
            *tri_state = true;
        }
        self
    }

    pub fn detail_only(mut self) -> Self {
        self.inline = false;
        self
    }
}

/// What a host renders for one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellValue {
    /// `None` renders as an empty cell
    pub value: Option<Value>,
    pub enabled: bool,
    /// Reason of the last rejected write to this cell. The value shown is
    /// the store's, never the rejected input.
    pub rejected: Option<String>,
}

impl CellValue {
    pub fn text(&self) -> String {
        self.value.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    pub fn is_rejected(&self) -> bool {
        self.rejected.is_some()
    }
}
