//! Store behind the index columns grid
//!
//! Membership is fixed: there is one row per table column, identified by the
//! column's own row id, and the `enabled` flag says whether the column takes
//! part in the bound index. There is no placeholder row.

use std::str::FromStr;

use schemagrid_core::{ColumnId, CoreError, RecordStore, Result, RowId, Value, WriteOutcome};

use super::{SharedDesign, flag_of, text_of};
use crate::models::{IndexColumnDesign, IndexDesign, SortOrder};

pub struct IndexColumnsStore {
    design: SharedDesign,
    index: Option<RowId>,
}

impl IndexColumnsStore {
    pub const ENABLED: &'static str = "enabled";
    pub const COLUMN: &'static str = "column";
    pub const ORDER: &'static str = "order";
    pub const LENGTH: &'static str = "length";

    pub fn new(design: SharedDesign) -> Self {
        Self {
            design,
            index: None,
        }
    }

    /// Show the members of `index`, or nothing
    pub fn bind(&mut self, index: Option<RowId>) {
        self.index = index;
    }

    pub fn bound(&self) -> Option<RowId> {
        self.index
    }

    fn is_bound(&self) -> bool {
        self.index
            .is_some_and(|id| self.design.borrow().index(id).is_some())
    }

    fn apply(
        index: &mut IndexDesign,
        column: &str,
        field: &str,
        value: &Value,
    ) -> std::result::Result<(), String> {
        let membership_change = match field {
            Self::ENABLED => flag_of(value)? != index.member(column).is_some(),
            Self::ORDER | Self::LENGTH => index.member(column).is_none(),
            _ => false,
        };
        if membership_change && index.is_primary() {
            return Err("Columns of the PRIMARY index follow the PK column flags".to_string());
        }

        match field {
            Self::ENABLED => {
                if flag_of(value)? {
                    if index.member(column).is_none() {
                        index.columns.push(IndexColumnDesign::new(column));
                    }
                } else {
                    index.columns.retain(|m| m.column != column);
                }
            }
            Self::ORDER => {
                let raw = text_of(value)?;
                let order = SortOrder::from_str(raw.trim())
                    .map_err(|_| format!("Unknown sort order '{}'", raw))?;
                member(index, column).order = order;
            }
            Self::LENGTH => {
                let raw = text_of(value)?.trim();
                let length = if raw.is_empty() {
                    None
                } else {
                    Some(
                        raw.parse::<u32>()
                            .map_err(|_| "Index length must be a number".to_string())?,
                    )
                };
                member(index, column).length = length;
            }
            Self::COLUMN => return Err("The column name is edited in the columns grid".to_string()),
            _ => return Err(format!("Unknown index column field '{}'", field)),
        }
        Ok(())
    }
}

/// Member entry for `column`, enabling it first
fn member<'a>(index: &'a mut IndexDesign, column: &str) -> &'a mut IndexColumnDesign {
    let position = match index.columns.iter().position(|m| m.column == column) {
        Some(position) => position,
        None => {
            index.columns.push(IndexColumnDesign::new(column));
            index.columns.len() - 1
        }
    };
    &mut index.columns[position]
}

impl RecordStore for IndexColumnsStore {
    fn count(&self) -> usize {
        if self.is_bound() {
            self.design.borrow().columns.len()
        } else {
            0
        }
    }

    fn row_id(&self, index: usize) -> Option<RowId> {
        if !self.is_bound() {
            return None;
        }
        self.design.borrow().columns.get(index).map(|c| c.id)
    }

    fn placeholder_id(&self) -> Option<RowId> {
        None
    }

    fn get_field(&self, row: RowId, column: &ColumnId) -> Option<Value> {
        let design = self.design.borrow();
        let index = design.index(self.index?)?;
        let name = design.column(row)?.name.as_str();
        let member = index.member(name);
        match column.as_str() {
            Self::ENABLED => Some(Value::Bool(member.is_some())),
            Self::COLUMN => Some(Value::text(name)),
            Self::ORDER => Some(Value::choice(
                member.map(|m| m.order).unwrap_or_default().to_string(),
            )),
            Self::LENGTH => Some(Value::text(
                member
                    .and_then(|m| m.length)
                    .map(|l| l.to_string())
                    .unwrap_or_default(),
            )),
            _ => None,
        }
    }

    fn set_field(&mut self, row: RowId, column: &ColumnId, value: Value) -> WriteOutcome {
        let Some(index_id) = self.index else {
            return WriteOutcome::rejected("No index is selected");
        };
        let mut design = self.design.borrow_mut();
        let Some(name) = design.column(row).map(|c| c.name.clone()) else {
            return WriteOutcome::rejected("The column no longer exists");
        };
        let Some(index) = design.index_mut(index_id) else {
            return WriteOutcome::rejected("The index no longer exists");
        };

        let mut updated = index.clone();
        match Self::apply(&mut updated, &name, column.as_str(), &value) {
            Ok(()) => {
                *index = updated;
                WriteOutcome::Accepted
            }
            Err(reason) => WriteOutcome::Rejected(reason),
        }
    }

    fn activate_placeholder(&mut self, row: RowId) -> Result<bool> {
        Err(CoreError::NotPlaceholder(row))
    }

    fn deactivate_placeholder(&mut self, _row: RowId) {}

    fn reorder(&mut self, _rows: &[RowId], _destination: usize) -> Result<()> {
        Err(CoreError::Other(
            "Index columns follow the table's column order".to_string(),
        ))
    }

    fn remove(&mut self, _rows: &[RowId]) -> Result<()> {
        Err(CoreError::Other(
            "Index columns are removed by unchecking them".to_string(),
        ))
    }
}
