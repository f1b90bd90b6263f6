use crate::dom::NodeId;
use crate::types::{LockSide, NodeRole};

/// Events the host delivers to a decorated table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEvent {
    /// Window resized.
    Resize,
    /// A node scrolled, by the user or by a programmatic write.
    Scroll { target: NodeId },
    /// Pointer entered the row with this row identity.
    RowMouseEnter { row: usize },
    /// Pointer left the row with this row identity.
    RowMouseLeave { row: usize },
}

/// Where a scroll event came from, resolved through the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollSource {
    pub node: NodeId,
    pub role: NodeRole,
    pub side: LockSide,
}

/// Window-level event kinds a decorator can listen to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    Resize,
}

/// Handle returned when adding a listener; pass it back to remove it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Window listeners registered by mounted decorators.
///
/// Listeners must be removed on unmount so that no callback touches nodes of
/// a torn-down table.
#[derive(Debug, Default)]
pub struct EventListeners {
    next_id: u64,
    listeners: Vec<(ListenerId, WindowEvent)>,
}

impl EventListeners {
    pub fn on(&mut self, event: WindowEvent) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, event));
        id
    }

    /// Returns true if the listener was registered.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        self.listeners.len() != before
    }

    pub fn is_listening(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|(listener, _)| *listener == id)
    }

    pub fn count(&self, event: WindowEvent) -> usize {
        self.listeners.iter().filter(|(_, e)| *e == event).count()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
