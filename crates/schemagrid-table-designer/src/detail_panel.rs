//! Column detail panel
//!
//! Mirrors the row selected in the columns grid. The panel only listens;
//! edits made in it are written back through the columns grid so they go
//! through the same validation as inline edits.

use schemagrid_core::RowId;
use schemagrid_grid::GridEvent;

use crate::models::{ColumnDesign, ParsedType, parse_type};
use crate::stores::SharedDesign;

/// Snapshot of one column as shown by the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDetail {
    pub name: String,
    pub data_type: String,
    pub default_value: String,
    pub comment: String,
    pub primary_key: bool,
    pub not_null: bool,
    pub unique: bool,
    /// `None` when the type is not numeric
    pub unsigned: Option<bool>,
    pub zerofill: Option<bool>,
    /// `None` when the type is not an integer type
    pub auto_increment: Option<bool>,
    /// `None` when the type is not a character type
    pub binary: Option<bool>,
    pub generated: bool,
}

impl ColumnDetail {
    fn of(column: &ColumnDesign, parsed: Option<&ParsedType>) -> Self {
        let numeric = parsed.is_some_and(|t| t.is_numeric());
        let integer = parsed.is_some_and(|t| t.is_integer());
        let textual = parsed.is_some_and(|t| t.is_textual());
        Self {
            name: column.name.clone(),
            data_type: column.data_type.clone(),
            default_value: column.default_value.clone().unwrap_or_default(),
            comment: column.comment.clone().unwrap_or_default(),
            primary_key: column.is_primary_key,
            not_null: !column.nullable,
            unique: column.is_unique,
            unsigned: numeric.then_some(column.is_unsigned),
            zerofill: numeric.then_some(column.is_zerofill),
            auto_increment: integer.then_some(column.is_auto_increment),
            binary: textual.then_some(column.is_binary),
            generated: column.is_generated,
        }
    }
}

pub struct ColumnDetailPanel {
    design: SharedDesign,
    row: Option<RowId>,
    detail: Option<ColumnDetail>,
    reloads: usize,
}

impl ColumnDetailPanel {
    pub fn new(design: SharedDesign) -> Self {
        Self {
            design,
            row: None,
            detail: None,
            reloads: 0,
        }
    }

    /// Row the panel shows, if any
    pub fn row(&self) -> Option<RowId> {
        self.row
    }

    /// `None` while nothing or the placeholder row is selected
    pub fn detail(&self) -> Option<&ColumnDetail> {
        self.detail.as_ref()
    }

    /// How often the panel re-read its column
    pub fn reloads(&self) -> usize {
        self.reloads
    }

    pub fn on_event(&mut self, event: &GridEvent) {
        match event {
            GridEvent::SelectionChanged(row) => {
                self.row = *row;
                self.reload();
            }
            GridEvent::RowChanged(row) | GridEvent::ValueChanged { row, .. } => {
                if self.row == Some(*row) {
                    self.reload();
                }
            }
            GridEvent::Rebuilt { .. } => self.reload(),
            GridEvent::CellEditRequested { .. } | GridEvent::WriteRejected { .. } => {}
        }
    }

    fn reload(&mut self) {
        self.reloads += 1;
        let design = self.design.borrow();
        self.detail = self.row.and_then(|row| design.column(row)).map(|column| {
            let parsed = parse_type(&column.data_type, &design.dialect).ok();
            ColumnDetail::of(column, parsed.as_ref())
        });
        tracing::trace!(row = ?self.row, shown = self.detail.is_some(), "detail panel reloaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DatabaseDialect, TableDesign};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_follows_selection() {
        let design = TableDesign::new("users", DatabaseDialect::Mysql)
            .with_column(ColumnDesign::named("id").integer().primary_key())
            .with_column(ColumnDesign::named("email"));
        let id = design.columns[0].id;
        let email = design.columns[1].id;
        let design = Rc::new(RefCell::new(design));
        let mut panel = ColumnDetailPanel::new(design.clone());

        panel.on_event(&GridEvent::SelectionChanged(Some(id)));
        let detail = panel.detail().expect("detail");
        assert_eq!(detail.name, "id");
        assert_eq!(detail.auto_increment, Some(false));

        panel.on_event(&GridEvent::SelectionChanged(Some(email)));
        let detail = panel.detail().expect("detail");
        assert_eq!(detail.auto_increment, None);
        assert_eq!(detail.unsigned, None);

        panel.on_event(&GridEvent::SelectionChanged(None));
        assert!(panel.detail().is_none());
    }

    #[test]
    fn test_ignores_other_rows() {
        let design = TableDesign::new("users", DatabaseDialect::Mysql)
            .with_column(ColumnDesign::named("id"));
        let id = design.columns[0].id;
        let mut panel = ColumnDetailPanel::new(Rc::new(RefCell::new(design)));
        panel.on_event(&GridEvent::SelectionChanged(Some(id)));
        let before = panel.reloads();

        panel.on_event(&GridEvent::RowChanged(RowId::new()));
        assert_eq!(panel.reloads(), before);
        panel.on_event(&GridEvent::RowChanged(id));
        assert_eq!(panel.reloads(), before + 1);
    }
}
