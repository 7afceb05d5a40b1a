//! Column design model

use schemagrid_core::RowId;

/// Column design model for table designer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDesign {
    /// Stable identity of the column's grid row
    pub id: RowId,
    /// Column name
    pub name: String,
    /// Raw data type expression (e.g., "INT", "VARCHAR(45)", "DECIMAL(10,2)")
    pub data_type: String,
    /// Whether NULL values are allowed
    pub nullable: bool,
    /// Default value expression
    pub default_value: Option<String>,
    /// Is this column part of the primary key?
    pub is_primary_key: bool,
    /// Is this column auto-incrementing?
    pub is_auto_increment: bool,
    /// Is this column unique?
    pub is_unique: bool,
    pub is_unsigned: bool,
    pub is_zerofill: bool,
    /// Binary collation for character types
    pub is_binary: bool,
    pub is_generated: bool,
    /// Column ordinal position
    pub ordinal: usize,
    /// Comment/description
    pub comment: Option<String>,
}

impl ColumnDesign {
    /// Create a new empty column design
    pub fn new(ordinal: usize) -> Self {
        Self {
            id: RowId::new(),
            name: String::new(),
            data_type: "VARCHAR(45)".to_string(),
            nullable: true,
            default_value: None,
            is_primary_key: false,
            is_auto_increment: false,
            is_unique: false,
            is_unsigned: false,
            is_zerofill: false,
            is_binary: false,
            is_generated: false,
            ordinal,
            comment: None,
        }
    }

    /// Create a column with a specific name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::new(0)
        }
    }

    /// Builder: set data type
    pub fn data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = data_type.into();
        self
    }

    /// Builder: set as integer type
    pub fn integer(mut self) -> Self {
        self.data_type = "INT".to_string();
        self
    }

    /// Builder: set as primary key
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.nullable = false;
        self
    }

    /// Builder: set as not null
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Builder: set as unique
    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    /// Builder: set as auto increment
    pub fn auto_increment(mut self) -> Self {
        self.is_auto_increment = true;
        self
    }

    pub fn generated(mut self) -> Self {
        self.is_generated = true;
        self
    }

    /// Builder: set default value
    pub fn default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Builder: set comment
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}
