//! Editable grid engine for SchemaGrid
//!
//! Binds an ordered [`RecordStore`](schemagrid_core::RecordStore) to a
//! virtualized, inline-editable grid.
//!
//! ## Features
//!
//! - Lazy cell reads: only the cells a host asks for touch the store
//! - A trailing placeholder row that turns into a real record on its first
//!   accepted write
//! - Chained editing: Tab/Enter commits a cell and opens the next one
//! - Escape rolls back a placeholder that never received a value
//! - Batched drag reordering with no-op detection
//!
//! ## Usage
//!
//! ```rust,ignore
//! use schemagrid_grid::{Column, EditableGrid, GridKey, GridSettings};
//!
//! let columns = vec![
//!     Column::text("name", "Column Name").chained(0).materializes(),
//!     Column::choice("type", "Datatype", types).chained(1),
//! ];
//! let mut grid = EditableGrid::new(store, columns, GridSettings::default())?;
//!
//! let placeholder = grid.model().placeholder().unwrap();
//! grid.double_click(placeholder, &"name".into())?;
//! grid.type_text("email")?;
//! grid.handle_key(GridKey::Enter)?; // the type editor opens on the new row
//! ```

mod binding;
mod error;
mod events;
mod grid;
mod model;
mod reorder;
mod settings;
mod workflow;

pub use binding::{CellValue, Column, ColumnBinding, DomainFn, DomainSource};
pub use error::{GridError, GridResult};
pub use events::{EventBus, GridEvent, SubscriptionId};
pub use grid::{EditableGrid, GridKey};
pub use model::{GridModel, Materialization, ModelState, Row, RowKind, Selection};
pub use reorder::{DragSession, DropPosition, ReorderOutcome, RowReorderer};
pub use settings::{FocusLoss, GridSettings, RowAdvance};
pub use workflow::{CommitOutcome, EditSession, EditingWorkflow, WorkflowState};
