//! Cross-instance registration.
//!
//! Every mounted table instance registers its nodes under a
//! `(NodeRole, LockSide)` key and its handle under its `LockSide`. The
//! decorators only ever look nodes up through here, and every lookup
//! tolerates "not registered yet" and "already unmounted".

use std::collections::HashMap;
use std::fmt;

use crate::column::{ColumnLeaf, HeaderCell};
use crate::dom::{Dom, NodeId};
use crate::error::LookupError;
use crate::event::EventListeners;
use crate::schedule::Scheduler;
use crate::types::{LockSide, NodeRole};

/// Handle to a mounted base-table instance.
///
/// Row arguments are stable row identities (see
/// [`row_identity`](crate::props::row_identity)), column arguments are
/// indices into [`flat_columns`](TableInstance::flat_columns).
pub trait TableInstance {
    fn lock_side(&self) -> LockSide;

    /// Leaf columns in render order.
    fn flat_columns(&self) -> &[ColumnLeaf];

    /// Header layout, one entry per header row.
    fn header_rows(&self) -> &[Vec<HeaderCell>];

    fn cell_node(&self, row: usize, col: usize) -> Result<NodeId, LookupError>;

    fn header_cell_node(&self, row: usize, col: usize) -> Result<NodeId, LookupError>;

    fn header_row_node(&self, row: usize) -> Result<NodeId, LookupError>;

    fn row_node(&self, row: usize) -> Result<NodeId, LookupError>;

    /// Re-align a floating header overlay after header heights changed.
    fn reposition_affix(&self, _dom: &mut dyn Dom) {}
}

/// State shared between the decorators and the instances they render.
#[derive(Default)]
pub struct TableContext {
    nodes: HashMap<(NodeRole, LockSide), NodeId>,
    instances: HashMap<LockSide, Box<dyn TableInstance>>,
    lock_active: bool,
    pub listeners: EventListeners,
    pub scheduler: Scheduler,
}

impl fmt::Debug for TableContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sides: Vec<&LockSide> = self.instances.keys().collect();
        sides.sort();
        f.debug_struct("TableContext")
            .field("nodes", &self.nodes)
            .field("instances", &sides)
            .field("lock_active", &self.lock_active)
            .field("listeners", &self.listeners)
            .field("scheduler", &self.scheduler)
            .finish()
    }
}

impl TableContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node for `(role, side)`. `None` unregisters.
    pub fn get_node(&mut self, role: NodeRole, node: Option<NodeId>, side: LockSide) {
        match node {
            Some(node) => {
                self.nodes.insert((role, side), node);
            }
            None => {
                self.nodes.remove(&(role, side));
            }
        }
    }

    /// Register an instance handle for `side`. `None` unregisters.
    pub fn get_table_instance(&mut self, side: LockSide, instance: Option<Box<dyn TableInstance>>) {
        match instance {
            Some(instance) => {
                self.instances.insert(side, instance);
            }
            None => {
                self.instances.remove(&side);
            }
        }
    }

    /// Drop every node and the instance handle of one side.
    pub fn unregister_side(&mut self, side: LockSide) {
        self.nodes.retain(|(_, s), _| *s != side);
        self.instances.remove(&side);
    }

    pub fn node(&self, role: NodeRole, side: LockSide) -> Result<NodeId, LookupError> {
        self.nodes
            .get(&(role, side))
            .copied()
            .ok_or(LookupError::NotRegistered { role, side })
    }

    pub fn instance(&self, side: LockSide) -> Result<&dyn TableInstance, LookupError> {
        self.instances
            .get(&side)
            .map(Box::as_ref)
            .ok_or(LookupError::InstanceMissing(side))
    }

    pub fn has_instance(&self, side: LockSide) -> bool {
        self.instances.contains_key(&side)
    }

    /// Which registered role and side a node plays, if any.
    pub fn role_of(&self, node: NodeId) -> Option<(NodeRole, LockSide)> {
        self.nodes
            .iter()
            .find(|(_, registered)| **registered == node)
            .map(|(key, _)| *key)
    }

    /// Whether lock mode currently owns the header/body layout. Fixed-header
    /// sizing stands back while it does.
    pub fn lock_active(&self) -> bool {
        self.lock_active
    }

    pub fn set_lock_active(&mut self, active: bool) {
        self.lock_active = active;
    }

    // -------------------------------------------------------------------------
    // Live lookups: registered AND still attached, or None.
    // -------------------------------------------------------------------------

    pub fn live_node(&self, dom: &dyn Dom, role: NodeRole, side: LockSide) -> Option<NodeId> {
        live(dom, self.node(role, side))
    }

    pub fn cell(&self, dom: &dyn Dom, row: usize, col: usize, side: LockSide) -> Option<NodeId> {
        live(dom, self.instance(side).and_then(|inc| inc.cell_node(row, col)))
    }

    pub fn header_cell(&self, dom: &dyn Dom, row: usize, col: usize, side: LockSide) -> Option<NodeId> {
        live(dom, self.instance(side).and_then(|inc| inc.header_cell_node(row, col)))
    }

    pub fn header_row(&self, dom: &dyn Dom, row: usize, side: LockSide) -> Option<NodeId> {
        live(dom, self.instance(side).and_then(|inc| inc.header_row_node(row)))
    }

    pub fn row(&self, dom: &dyn Dom, row: usize, side: LockSide) -> Option<NodeId> {
        live(dom, self.instance(side).and_then(|inc| inc.row_node(row)))
    }
}

fn live(dom: &dyn Dom, lookup: Result<NodeId, LookupError>) -> Option<NodeId> {
    let checked = lookup.and_then(|node| {
        if dom.is_attached(node) {
            Ok(node)
        } else {
            Err(LookupError::Detached(node))
        }
    });
    match checked {
        Ok(node) => Some(node),
        Err(err) => {
            log::trace!("Lookup skipped: {err}");
            None
        }
    }
}
