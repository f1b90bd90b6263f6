//! Column tree model.
//!
//! Columns form a tagged recursive tree: a [`ColumnNode`] is either a leaf
//! (one rendered column) or a group (a header spanning its children).

mod header;
mod partition;

pub use header::{header_rows, HeaderCell};
pub use partition::{normalize, split, ColumnPartition, Normalized};

use serde::Deserialize;

use crate::types::{LockSide, Px};

/// Requested lock for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lock {
    #[default]
    None,
    Left,
    Right,
}

impl Lock {
    pub const fn is_locked(self) -> bool {
        !matches!(self, Lock::None)
    }

    /// The table instance a column with this lock renders in.
    pub const fn side(self) -> LockSide {
        match self {
            Lock::None => LockSide::Center,
            Lock::Left => LockSide::Left,
            Lock::Right => LockSide::Right,
        }
    }
}

/// A single rendered column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLeaf {
    /// Key of the record field this column displays.
    pub data_index: String,
    pub title: String,
    /// Fixed pixel width. Required for locked columns.
    pub width: Option<Px>,
    pub lock: Lock,
    /// Column injected by the table itself (e.g. a selection checkbox column)
    /// rather than declared by the caller.
    pub generated: bool,
}

/// A header spanning an ordered set of child columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnGroup {
    pub title: String,
    pub children: Vec<ColumnNode>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ColumnDef")]
pub enum ColumnNode {
    Leaf(ColumnLeaf),
    Group(ColumnGroup),
}

impl ColumnNode {
    /// Create a leaf column.
    pub fn leaf(data_index: impl Into<String>) -> Self {
        let data_index = data_index.into();
        ColumnNode::Leaf(ColumnLeaf {
            title: data_index.clone(),
            data_index,
            width: None,
            lock: Lock::None,
            generated: false,
        })
    }

    /// Create a group column.
    pub fn group(title: impl Into<String>, children: Vec<ColumnNode>) -> Self {
        ColumnNode::Group(ColumnGroup {
            title: title.into(),
            children,
        })
    }

    /// Set the width of a leaf. No effect on groups.
    pub fn width(mut self, width: Px) -> Self {
        if let ColumnNode::Leaf(leaf) = &mut self {
            leaf.width = Some(width);
        }
        self
    }

    /// Lock this column. On a group, every descendant leaf that has no lock
    /// of its own inherits it.
    pub fn lock(mut self, lock: Lock) -> Self {
        match &mut self {
            ColumnNode::Leaf(leaf) => leaf.lock = lock,
            ColumnNode::Group(group) => inherit_lock(&mut group.children, lock),
        }
        self
    }

    /// Mark a leaf as table-generated.
    pub fn generated(mut self) -> Self {
        if let ColumnNode::Leaf(leaf) = &mut self {
            leaf.generated = true;
        }
        self
    }

    pub fn title(&self) -> &str {
        match self {
            ColumnNode::Leaf(leaf) => &leaf.title,
            ColumnNode::Group(group) => &group.title,
        }
    }

    /// Number of leaves under this node (1 for a leaf).
    pub fn leaf_count(&self) -> usize {
        match self {
            ColumnNode::Leaf(_) => 1,
            ColumnNode::Group(group) => group.children.iter().map(ColumnNode::leaf_count).sum(),
        }
    }

    /// Depth of the subtree: 1 for a leaf.
    pub fn depth(&self) -> usize {
        match self {
            ColumnNode::Leaf(_) => 1,
            ColumnNode::Group(group) => {
                1 + group.children.iter().map(ColumnNode::depth).max().unwrap_or(0)
            }
        }
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a ColumnLeaf>) {
        match self {
            ColumnNode::Leaf(leaf) => out.push(leaf),
            ColumnNode::Group(group) => {
                for child in &group.children {
                    child.collect_leaves(out);
                }
            }
        }
    }
}

fn inherit_lock(children: &mut [ColumnNode], lock: Lock) {
    for child in children {
        match child {
            ColumnNode::Leaf(leaf) if !leaf.lock.is_locked() => leaf.lock = lock,
            ColumnNode::Leaf(_) => {}
            ColumnNode::Group(group) => inherit_lock(&mut group.children, lock),
        }
    }
}

/// Leaves of a column forest in left-to-right order.
pub fn leaves(columns: &[ColumnNode]) -> Vec<&ColumnLeaf> {
    let mut out = Vec::new();
    for column in columns {
        column.collect_leaves(&mut out);
    }
    out
}

/// Owned copy of the leaves, as a base table instance keeps them.
pub fn flatten(columns: &[ColumnNode]) -> Vec<ColumnLeaf> {
    leaves(columns).into_iter().cloned().collect()
}

// =============================================================================
// Input shape
// =============================================================================

/// Column description as supplied by callers (JSON).
///
/// `lock` accepts `true` (meaning left), `false`, `"left"` or `"right"`.
/// A definition with children becomes a group.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    #[serde(default)]
    pub data_index: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub width: Option<Px>,
    #[serde(default)]
    pub lock: LockDef,
    #[serde(default)]
    pub children: Vec<ColumnDef>,
    #[serde(default, rename = "__normalized")]
    pub generated: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LockDef {
    Flag(bool),
    Side(String),
}

impl Default for LockDef {
    fn default() -> Self {
        LockDef::Flag(false)
    }
}

impl From<LockDef> for Lock {
    fn from(def: LockDef) -> Self {
        match def {
            LockDef::Flag(true) => Lock::Left,
            LockDef::Flag(false) => Lock::None,
            LockDef::Side(side) => match side.as_str() {
                "left" => Lock::Left,
                "right" => Lock::Right,
                other => {
                    log::warn!("Unknown lock value '{other}', column stays unlocked");
                    Lock::None
                }
            },
        }
    }
}

impl From<ColumnDef> for ColumnNode {
    fn from(def: ColumnDef) -> Self {
        let lock = Lock::from(def.lock);
        if def.children.is_empty() {
            ColumnNode::Leaf(ColumnLeaf {
                title: def.title.unwrap_or_else(|| def.data_index.clone()),
                data_index: def.data_index,
                width: def.width,
                lock,
                generated: def.generated,
            })
        } else {
            let group = ColumnNode::group(
                def.title.unwrap_or(def.data_index),
                def.children.into_iter().map(ColumnNode::from).collect(),
            );
            if lock.is_locked() {
                group.lock(lock)
            } else {
                group
            }
        }
    }
}
