//! Data type information
//!
//! A static catalog of the types each dialect offers, and the small grammar
//! the column type cell accepts: `NAME`, `NAME(n)`, `NAME(p,s)` or, for
//! `ENUM`/`SET`, `NAME('a','b')`.

use super::{DatabaseDialect, ValidationError};

/// Category of data type for grouping in UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataTypeCategory {
    Integer,
    Float,
    Decimal,
    String,
    Binary,
    DateTime,
    Boolean,
    Json,
    Other,
}

impl DataTypeCategory {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataTypeCategory::Integer | DataTypeCategory::Float | DataTypeCategory::Decimal
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Params {
    None,
    Length { required: bool },
    /// Optional `(precision)` or `(precision,scale)`
    Precision,
    /// Quoted value list of ENUM and SET
    Values,
}

/// Information about a data type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataTypeInfo {
    /// Type name as used in SQL
    pub name: &'static str,
    /// Category for grouping
    pub category: DataTypeCategory,
    /// Arguments used when the type is picked from the list, e.g. `45`
    pub default_args: Option<&'static str>,
    /// Whether this is a common/frequently used type
    pub is_common: bool,
    params: Params,
}

impl DataTypeInfo {
    /// The type as offered in the type list
    pub fn suggestion(&self) -> Option<String> {
        match (self.params, self.default_args) {
            (_, Some(args)) => Some(format!("{}({})", self.name, args)),
            (Params::Length { required: true } | Params::Values, None) => None,
            _ => Some(self.name.to_string()),
        }
    }
}

const fn ty(
    name: &'static str,
    category: DataTypeCategory,
    params: Params,
    default_args: Option<&'static str>,
    is_common: bool,
) -> DataTypeInfo {
    DataTypeInfo {
        name,
        category,
        default_args,
        is_common,
        params,
    }
}

use DataTypeCategory as C;

const OPT_LEN: Params = Params::Length { required: false };
const REQ_LEN: Params = Params::Length { required: true };

const MYSQL_TYPES: &[DataTypeInfo] = &[
    ty("TINYINT", C::Integer, OPT_LEN, None, false),
    ty("SMALLINT", C::Integer, OPT_LEN, None, false),
    ty("MEDIUMINT", C::Integer, OPT_LEN, None, false),
    ty("INT", C::Integer, OPT_LEN, None, true),
    ty("BIGINT", C::Integer, OPT_LEN, None, true),
    ty("FLOAT", C::Float, Params::Precision, None, false),
    ty("DOUBLE", C::Float, Params::Precision, None, false),
    ty("DECIMAL", C::Decimal, Params::Precision, Some("10,2"), true),
    ty("CHAR", C::String, OPT_LEN, Some("1"), false),
    ty("VARCHAR", C::String, REQ_LEN, Some("45"), true),
    ty("TINYTEXT", C::String, Params::None, None, false),
    ty("TEXT", C::String, Params::None, None, true),
    ty("MEDIUMTEXT", C::String, Params::None, None, false),
    ty("LONGTEXT", C::String, Params::None, None, false),
    ty("BINARY", C::Binary, OPT_LEN, None, false),
    ty("VARBINARY", C::Binary, REQ_LEN, Some("45"), false),
    ty("BLOB", C::Binary, Params::None, None, true),
    ty("LONGBLOB", C::Binary, Params::None, None, false),
    ty("BIT", C::Binary, OPT_LEN, None, false),
    ty("DATE", C::DateTime, Params::None, None, true),
    ty("TIME", C::DateTime, Params::None, None, false),
    ty("DATETIME", C::DateTime, Params::None, None, true),
    ty("TIMESTAMP", C::DateTime, Params::None, None, true),
    ty("YEAR", C::DateTime, Params::None, None, false),
    ty("BOOLEAN", C::Boolean, Params::None, None, true),
    ty("JSON", C::Json, Params::None, None, true),
    ty("ENUM", C::Other, Params::Values, None, false),
    ty("SET", C::Other, Params::Values, None, false),
];

const POSTGRES_TYPES: &[DataTypeInfo] = &[
    ty("SMALLINT", C::Integer, Params::None, None, false),
    ty("INTEGER", C::Integer, Params::None, None, true),
    ty("BIGINT", C::Integer, Params::None, None, true),
    ty("SERIAL", C::Integer, Params::None, None, true),
    ty("BIGSERIAL", C::Integer, Params::None, None, false),
    ty("REAL", C::Float, Params::None, None, false),
    ty("DOUBLE PRECISION", C::Float, Params::None, None, true),
    ty("NUMERIC", C::Decimal, Params::Precision, Some("10,2"), false),
    ty("VARCHAR", C::String, OPT_LEN, Some("255"), true),
    ty("CHAR", C::String, OPT_LEN, Some("1"), false),
    ty("TEXT", C::String, Params::None, None, true),
    ty("BYTEA", C::Binary, Params::None, None, true),
    ty("BOOLEAN", C::Boolean, Params::None, None, true),
    ty("DATE", C::DateTime, Params::None, None, true),
    ty("TIME", C::DateTime, Params::None, None, false),
    ty("TIMESTAMP", C::DateTime, Params::None, None, true),
    ty("TIMESTAMPTZ", C::DateTime, Params::None, None, true),
    ty("JSON", C::Json, Params::None, None, false),
    ty("JSONB", C::Json, Params::None, None, true),
    ty("UUID", C::Other, Params::None, None, true),
];

const SQLITE_TYPES: &[DataTypeInfo] = &[
    ty("INTEGER", C::Integer, Params::None, None, true),
    ty("REAL", C::Float, Params::None, None, true),
    ty("NUMERIC", C::Decimal, Params::None, None, false),
    ty("TEXT", C::String, Params::None, None, true),
    ty("BLOB", C::Binary, Params::None, None, true),
];

/// Get available data types for a dialect
pub fn get_data_types(dialect: &DatabaseDialect) -> &'static [DataTypeInfo] {
    match dialect {
        DatabaseDialect::Sqlite => SQLITE_TYPES,
        DatabaseDialect::Postgres => POSTGRES_TYPES,
        DatabaseDialect::Mysql => MYSQL_TYPES,
    }
}

/// A type expression that passed [`parse_type`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedType {
    pub info: DataTypeInfo,
    pub args: Vec<String>,
}

impl ParsedType {
    pub fn is_integer(&self) -> bool {
        self.info.category == DataTypeCategory::Integer
    }

    pub fn is_numeric(&self) -> bool {
        self.info.category.is_numeric()
    }

    /// Character types, the only ones that take a binary collation
    pub fn is_textual(&self) -> bool {
        self.info.category == DataTypeCategory::String
    }
}

impl std::fmt::Display for ParsedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.args.is_empty() {
            write!(f, "{}", self.info.name)
        } else {
            write!(f, "{}({})", self.info.name, self.args.join(","))
        }
    }
}

/// Check a raw type expression against the dialect's catalog
pub fn parse_type(raw: &str, dialect: &DatabaseDialect) -> Result<ParsedType, ValidationError> {
    let raw = raw.trim();
    let malformed = || {
        ValidationError::new(
            "data_type",
            format!("The type '{}' contains errors and cannot be accepted", raw),
        )
    };
    if raw.is_empty() {
        return Err(ValidationError::new("data_type", "Data type is required"));
    }

    let (head, args) = match raw.find('(') {
        Some(open) => {
            let inner = raw[open + 1..].strip_suffix(')').ok_or_else(malformed)?;
            (&raw[..open], split_args(inner).ok_or_else(malformed)?)
        }
        None => (raw, Vec::new()),
    };

    let name = head
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();
    let info = get_data_types(dialect)
        .iter()
        .find(|t| t.name == name)
        .copied()
        .ok_or_else(malformed)?;

    let valid = match info.params {
        Params::None => args.is_empty(),
        Params::Length { required } => match args.as_slice() {
            [] => !required,
            [len] => is_number(len),
            _ => false,
        },
        Params::Precision => match args.as_slice() {
            [] => true,
            [p] => is_number(p),
            [p, s] => is_number(p) && is_number(s),
            _ => false,
        },
        Params::Values => !args.is_empty() && args.iter().all(|a| is_quoted(a)),
    };
    if !valid {
        return Err(malformed());
    }

    Ok(ParsedType { info, args })
}

/// Choices for the type cell of a column whose current type is `current`
///
/// The current type comes first, normalized, followed by the catalog's
/// common types and then the rest.
pub fn type_suggestions(current: &str, dialect: &DatabaseDialect) -> Vec<String> {
    let types = get_data_types(dialect);
    let mut suggestions: Vec<String> = Vec::with_capacity(types.len() + 1);
    if let Ok(parsed) = parse_type(current, dialect) {
        suggestions.push(parsed.to_string());
    }
    let common = types.iter().filter(|t| t.is_common);
    let rest = types.iter().filter(|t| !t.is_common);
    for suggestion in common.chain(rest).filter_map(DataTypeInfo::suggestion) {
        if !suggestions.contains(&suggestion) {
            suggestions.push(suggestion);
        }
    }
    suggestions
}

/// Split an argument list on the commas outside quoted values
///
/// `None` for an unterminated quote or a stray parenthesis.
fn split_args(inner: &str) -> Option<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for c in inner.chars() {
        match c {
            '\'' => {
                quoted = !quoted;
                current.push(c);
            }
            ',' if !quoted => args.push(std::mem::take(&mut current).trim().to_string()),
            '(' | ')' if !quoted => return None,
            _ => current.push(c),
        }
    }
    if quoted {
        return None;
    }
    args.push(current.trim().to_string());
    Some(args)
}

fn is_number(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

fn is_quoted(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'')
}
