//! Splitting a column tree into lock-left, center and lock-right trees.

use super::{leaves, ColumnLeaf, ColumnNode, Lock};
use crate::types::LockSide;

/// Column tree after normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub columns: Vec<ColumnNode>,
    /// At least one column asked to be locked. This is the caller's intent;
    /// whether locking actually happens is decided after layout.
    pub origin_lock: bool,
    /// Data indices of locked leaves that have no width.
    pub missing_width: Vec<String>,
}

/// Normalize a column tree for lock handling.
///
/// Warns for every locked leaf without a width: shadow tables cannot take
/// part in flexible layout, so their columns need fixed widths. When any
/// column locks, generated columns without a lock of their own are locked
/// left so they stay next to the row they act on.
pub fn normalize(columns: &[ColumnNode]) -> Normalized {
    let mut origin_lock = false;
    let mut missing_width = Vec::new();
    for leaf in leaves(columns) {
        if leaf.lock.is_locked() {
            origin_lock = true;
            if leaf.width.is_none() {
                log::warn!(
                    "Should config width for lock column named [ {} ].",
                    leaf.data_index
                );
                missing_width.push(leaf.data_index.clone());
            }
        }
    }

    let mut columns = columns.to_vec();
    if origin_lock {
        for column in &mut columns {
            if let ColumnNode::Leaf(leaf) = column {
                if leaf.generated && !leaf.lock.is_locked() {
                    leaf.lock = Lock::Left;
                }
            }
        }
    }

    Normalized {
        columns,
        origin_lock,
        missing_width,
    }
}

/// The three column trees rendered side by side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnPartition {
    pub lock_left: Vec<ColumnNode>,
    pub center: Vec<ColumnNode>,
    pub lock_right: Vec<ColumnNode>,
}

impl ColumnPartition {
    /// Columns of one side. `Center` means the unlocked remainder.
    pub fn side(&self, side: LockSide) -> &[ColumnNode] {
        match side {
            LockSide::Center => &self.center,
            LockSide::Left => &self.lock_left,
            LockSide::Right => &self.lock_right,
        }
    }

    /// True when at least one side has locked columns.
    pub fn has_locked(&self) -> bool {
        !self.lock_left.is_empty() || !self.lock_right.is_empty()
    }

    /// Left columns, then center, then right. This is the column order of
    /// the center instance and therefore the index space of every cell
    /// lookup against it.
    pub fn merged(&self) -> Vec<ColumnNode> {
        let mut merged =
            Vec::with_capacity(self.lock_left.len() + self.center.len() + self.lock_right.len());
        merged.extend(self.lock_left.iter().cloned());
        merged.extend(self.center.iter().cloned());
        merged.extend(self.lock_right.iter().cloned());
        merged
    }

    /// Drop the locked sides, keeping every column in the center tree.
    pub fn unlocked(&self) -> Self {
        Self {
            lock_left: Vec::new(),
            center: self.merged(),
            lock_right: Vec::new(),
        }
    }
}

/// Split a normalized column tree into its three partitions.
///
/// Each partition is filtered from its own copy of the tree. A leaf stays if
/// it belongs to the side; a group stays if any of its children stayed.
pub fn split(columns: &[ColumnNode]) -> ColumnPartition {
    let mut lock_left = columns.to_vec();
    let mut lock_right = columns.to_vec();
    let mut center = columns.to_vec();

    retain_leaves(&mut lock_left, &|leaf| leaf.lock == Lock::Left);
    retain_leaves(&mut lock_right, &|leaf| leaf.lock == Lock::Right);
    retain_leaves(&mut center, &|leaf| !leaf.lock.is_locked());

    ColumnPartition {
        lock_left,
        center,
        lock_right,
    }
}

fn retain_leaves(nodes: &mut Vec<ColumnNode>, keep: &dyn Fn(&ColumnLeaf) -> bool) {
    nodes.retain_mut(|node| match node {
        ColumnNode::Leaf(leaf) => keep(leaf),
        ColumnNode::Group(group) => {
            retain_leaves(&mut group.children, keep);
            !group.children.is_empty()
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::flatten;

    fn data_indices(columns: &[ColumnNode]) -> Vec<String> {
        flatten(columns)
            .into_iter()
            .map(|leaf| leaf.data_index)
            .collect()
    }

    #[test]
    fn test_split_flat_columns() {
        let columns = vec![
            ColumnNode::leaf("a").width(100).lock(Lock::Left),
            ColumnNode::leaf("b"),
            ColumnNode::leaf("c").width(80).lock(Lock::Right),
        ];

        let partition = split(&normalize(&columns).columns);

        assert_eq!(data_indices(&partition.lock_left), vec!["a"]);
        assert_eq!(data_indices(&partition.center), vec!["b"]);
        assert_eq!(data_indices(&partition.lock_right), vec!["c"]);
        assert_eq!(data_indices(&partition.merged()), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_mixed_group_is_split_across_sides() {
        let columns = vec![ColumnNode::group(
            "person",
            vec![
                ColumnNode::leaf("id").width(60).lock(Lock::Left),
                ColumnNode::leaf("name"),
                ColumnNode::leaf("age"),
            ],
        )];

        let partition = split(&columns);

        assert_eq!(partition.lock_left.len(), 1);
        assert_eq!(partition.lock_left[0].title(), "person");
        assert_eq!(data_indices(&partition.lock_left), vec!["id"]);
        assert_eq!(data_indices(&partition.center), vec!["name", "age"]);
        assert!(partition.lock_right.is_empty(), "group without right leaves is pruned");
    }

    #[test]
    fn test_nested_empty_groups_are_pruned() {
        let columns = vec![
            ColumnNode::group(
                "outer",
                vec![ColumnNode::group("inner", vec![ColumnNode::leaf("x")])],
            ),
            ColumnNode::leaf("y").width(50).lock(Lock::Right),
        ];

        let partition = split(&columns);

        assert!(partition.lock_left.is_empty());
        assert_eq!(partition.center.len(), 1);
        assert_eq!(partition.center[0].depth(), 3);
        assert_eq!(data_indices(&partition.lock_right), vec!["y"]);
    }

    #[test]
    fn test_normalize_flags_origin_lock() {
        assert!(!normalize(&[ColumnNode::leaf("a")]).origin_lock);
        assert!(normalize(&[ColumnNode::leaf("a").lock(Lock::Right)]).origin_lock);
    }

    #[test]
    fn test_generated_column_follows_left_lock() {
        let columns = vec![
            ColumnNode::leaf("__select").width(40).generated(),
            ColumnNode::leaf("a"),
            ColumnNode::leaf("b").width(80).lock(Lock::Right),
        ];

        let normalized = normalize(&columns);
        let partition = split(&normalized.columns);

        assert_eq!(data_indices(&partition.lock_left), vec!["__select"]);
        assert_eq!(data_indices(&partition.lock_right), vec!["b"]);
    }

    #[test]
    fn test_generated_column_without_locking_stays_center() {
        let columns = vec![ColumnNode::leaf("__select").generated(), ColumnNode::leaf("a")];
        let partition = split(&normalize(&columns).columns);
        assert_eq!(data_indices(&partition.center), vec!["__select", "a"]);
    }

    #[test]
    fn test_unlocked_keeps_merged_order() {
        let columns = vec![
            ColumnNode::leaf("b"),
            ColumnNode::leaf("a").width(10).lock(Lock::Left),
        ];
        let unlocked = split(&columns).unlocked();
        assert!(!unlocked.has_locked());
        assert_eq!(data_indices(&unlocked.center), vec!["a", "b"]);
    }
}
