//! Index design model

use schemagrid_core::RowId;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Kind of index, as offered by the index type column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum IndexKind {
    #[default]
    Index,
    Unique,
    Fulltext,
    Spatial,
    Primary,
}

impl IndexKind {
    /// Choices of the index type column
    pub fn choices() -> Vec<String> {
        Self::iter().map(|kind| kind.to_string()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn choices() -> Vec<String> {
        Self::iter().map(|order| order.to_string()).collect()
    }
}

/// One member column of an index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexColumnDesign {
    /// Name of the table column
    pub column: String,
    pub order: SortOrder,
    /// Prefix length for string columns
    pub length: Option<u32>,
}

impl IndexColumnDesign {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            order: SortOrder::Asc,
            length: None,
        }
    }
}

/// Index design model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDesign {
    /// Stable identity of the index's grid row
    pub id: RowId,
    /// Index name
    pub name: String,
    /// Columns in the index, in index order
    pub columns: Vec<IndexColumnDesign>,
    pub kind: IndexKind,
    /// Comment/description
    pub comment: Option<String>,
}

impl IndexDesign {
    /// Create a new empty index design
    pub fn new() -> Self {
        Self {
            id: RowId::new(),
            name: String::new(),
            columns: Vec::new(),
            kind: IndexKind::Index,
            comment: None,
        }
    }

    /// Create an index with a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::new()
        }
    }

    /// The primary key index, listing `columns`
    pub fn primary<'a>(columns: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            name: "PRIMARY".to_string(),
            kind: IndexKind::Primary,
            columns: columns.into_iter().map(IndexColumnDesign::new).collect(),
            ..Self::new()
        }
    }

    /// Builder: add a column
    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.columns.push(IndexColumnDesign::new(name));
        self
    }

    /// Builder: set the index kind
    pub fn kind(mut self, kind: IndexKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn is_primary(&self) -> bool {
        self.kind == IndexKind::Primary
    }

    pub fn member(&self, column: &str) -> Option<&IndexColumnDesign> {
        self.columns.iter().find(|c| c.column == column)
    }

    pub fn member_mut(&mut self, column: &str) -> Option<&mut IndexColumnDesign> {
        self.columns.iter_mut().find(|c| c.column == column)
    }
}

impl Default for IndexDesign {
    fn default() -> Self {
        Self::new()
    }
}
