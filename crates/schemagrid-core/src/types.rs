//! Core value types shared by stores and grids

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Stable identifier of one backend record
///
/// Row ids survive reordering and model rebuilds and are never handed out
/// twice within a session. Grid positions are not identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(Uuid);

impl RowId {
    /// Allocate a fresh row id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing uuid
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key of one grid column, e.g. `"name"` or `"type"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnId(Arc<str>);

impl ColumnId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColumnId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ColumnId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl PartialEq<str> for ColumnId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for ColumnId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A typed cell value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// Free text
    Text(String),
    /// Checkbox state
    Bool(bool),
    /// One entry of an enumerated domain
    Choice(String),
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    pub fn choice(value: impl Into<String>) -> Self {
        Value::Choice(value.into())
    }

    /// String content of text and choice values
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::Choice(s) => Some(s),
            Value::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Text(_) | Value::Choice(_) => None,
        }
    }

    /// Whether the value carries no user content (empty string or `false`)
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Text(s) | Value::Choice(s) => s.is_empty(),
            Value::Bool(b) => !b,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(v) | Value::Choice(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", if *v { "1" } else { "0" }),
        }
    }
}

/// Result of a single field write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Accepted,
    /// The store refused the value; the reason is shown to the user verbatim
    Rejected(String),
}

impl WriteOutcome {
    pub fn rejected(reason: impl Into<String>) -> Self {
        WriteOutcome::Rejected(reason.into())
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, WriteOutcome::Accepted)
    }
}
