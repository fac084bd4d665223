//! Observer module - per-cell change notifications
//!
//! Rendering and hint overlays subscribe to individual cells and are told
//! when a cell rotates or its powered flag flips. Notification is a side
//! channel: engine correctness never depends on delivery, so events fire
//! synchronously after the grid state is final.

use std::fmt;

use crate::types::Position;

/// What changed on a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellChange {
    /// The cell's connector set rotated one step clockwise.
    Rotated,
    /// The cell's powered flag transitioned to the given value.
    Powered(bool),
}

/// A single cell-change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellEvent {
    pub position: Position,
    pub change: CellChange,
}

/// Handle returned by `Grid::subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u32);

/// Observer callback type
pub type ObserverFn = Box<dyn FnMut(&CellEvent)>;

/// Registry of per-cell observers, owned by the grid
///
/// Deliberately not part of cell state: cells stay plain data, deep copies
/// carry no subscribers.
#[derive(Default)]
pub(crate) struct ObserverRegistry {
    next_id: u32,
    entries: Vec<(ObserverId, Position, ObserverFn)>,
}

impl ObserverRegistry {
    pub(crate) fn subscribe(&mut self, position: Position, callback: ObserverFn) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push((id, position, callback));
        id
    }

    /// Remove a subscription; returns false if the id was unknown
    pub(crate) fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Deliver an event to every observer watching its position
    pub(crate) fn notify(&mut self, event: &CellEvent) {
        for (_, position, callback) in self.entries.iter_mut() {
            if *position == event.position {
                callback(event);
            }
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.entries.len())
            .finish()
    }
}
