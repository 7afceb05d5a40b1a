//! Events emitted by a grid
//!
//! Events raised while an operation runs are queued and delivered only when
//! the operation has finished, including its rebuild. A detail panel that
//! reacts to `RowChanged` therefore always reads the committed row.

use schemagrid_core::{ColumnId, RowId, Value};

/// Oldest undrained events are dropped past this many
const MAX_OUTBOX: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEvent {
    /// The highlighted row changed
    SelectionChanged(Option<RowId>),
    /// An inline editor opened on a cell
    CellEditRequested { row: RowId, column: ColumnId },
    /// A write was accepted; `value` is what the store holds now
    ValueChanged {
        row: RowId,
        column: ColumnId,
        value: Option<Value>,
    },
    /// Any field of the row may have changed; re-read the whole row
    RowChanged(RowId),
    /// The row list was rebuilt from the store
    Rebuilt { rows: usize },
    /// The store refused a write; shown inline to the user
    WriteRejected {
        row: RowId,
        column: ColumnId,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&GridEvent)>;

/// Queue plus subscriber list of one grid
#[derive(Default)]
pub struct EventBus {
    pending: Vec<GridEvent>,
    outbox: Vec<GridEvent>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&GridEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub(crate) fn emit(&mut self, event: GridEvent) {
        tracing::trace!(?event, "queued grid event");
        self.pending.push(event);
    }

    /// Deliver queued events to subscribers and move them to the outbox
    pub(crate) fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let events = std::mem::take(&mut self.pending);
        for event in &events {
            for (_, listener) in self.listeners.iter_mut() {
                listener(event);
            }
        }
        self.outbox.extend(events);
        if self.outbox.len() > MAX_OUTBOX {
            let excess = self.outbox.len() - MAX_OUTBOX;
            self.outbox.drain(..excess);
        }
    }

    /// Delivered events not yet taken, oldest first
    pub fn take_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.outbox)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
