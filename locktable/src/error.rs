//! Lookup errors.
//!
//! Nothing here is fatal. Callers turn a `LookupError` into "skip this
//! adjustment step"; the next pass re-resolves once the instance remounts.

use thiserror::Error;

use crate::dom::NodeId;
use crate::types::{LockSide, NodeRole};

/// A node or instance that could not be resolved for the current frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Nothing registered under this role for the side (not mounted yet).
    #[error("no {role} node registered for the {side} table")]
    NotRegistered { role: NodeRole, side: LockSide },

    /// No instance handle registered for the side.
    #[error("no table instance registered for the {0} side")]
    InstanceMissing(LockSide),

    /// The instance is mounted but has no node at this position.
    #[error("{what} ({row}, {col}) is out of range for the {side} table")]
    OutOfRange {
        what: &'static str,
        side: LockSide,
        row: usize,
        col: usize,
    },

    /// The node was registered but has since been removed from the tree.
    #[error("node {0} is detached")]
    Detached(NodeId),
}
