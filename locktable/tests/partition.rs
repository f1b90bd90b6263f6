use locktable::column::{flatten, normalize, split};
use locktable::{ColumnNode, Lock, LockSide};
use serde_json::json;

fn columns(value: serde_json::Value) -> Vec<ColumnNode> {
    serde_json::from_value(value).unwrap()
}

fn data_indices(columns: &[ColumnNode]) -> Vec<String> {
    flatten(columns)
        .into_iter()
        .map(|leaf| leaf.data_index)
        .collect()
}

// ============================================================================
// Normalization
// ============================================================================

#[test]
fn test_lock_values_from_json() {
    let normalized = normalize(&columns(json!([
        {"dataIndex": "a", "lock": true, "width": 80},
        {"dataIndex": "b", "lock": "right", "width": 80},
        {"dataIndex": "c", "lock": false},
        {"dataIndex": "d"}
    ])));

    assert!(normalized.origin_lock);
    let locks: Vec<Lock> = flatten(&normalized.columns)
        .into_iter()
        .map(|leaf| leaf.lock)
        .collect();
    assert_eq!(locks, vec![Lock::Left, Lock::Right, Lock::None, Lock::None]);
}

#[test]
fn test_no_lock_request() {
    let normalized = normalize(&columns(json!([{"dataIndex": "a"}, {"dataIndex": "b"}])));
    assert!(!normalized.origin_lock);
    assert!(!split(&normalized.columns).has_locked());
}

#[test]
fn test_locked_columns_without_width_are_reported() {
    let normalized = normalize(&columns(json!([
        {"dataIndex": "id", "lock": "left"},
        {"dataIndex": "name"},
        {"title": "Meta", "lock": "right", "children": [
            {"dataIndex": "created", "width": 90},
            {"dataIndex": "updated"}
        ]}
    ])));

    assert!(normalized.origin_lock);
    assert_eq!(normalized.missing_width, vec!["id", "updated"]);
}

#[test]
fn test_widths_set_reports_nothing() {
    let normalized = normalize(&columns(json!([
        {"dataIndex": "id", "lock": true, "width": 60},
        {"dataIndex": "name"}
    ])));
    assert!(normalized.missing_width.is_empty(), "unlocked columns may stay flexible");
}

#[test]
fn test_generated_column_follows_lock() {
    let input = columns(json!([
        {"dataIndex": "select", "__normalized": true, "width": 40},
        {"dataIndex": "name"},
        {"dataIndex": "ops", "lock": "right", "width": 100}
    ]));

    let partition = split(&normalize(&input).columns);

    assert_eq!(data_indices(&partition.lock_left), vec!["select"]);
    assert_eq!(data_indices(&partition.lock_right), vec!["ops"]);
}

#[test]
fn test_generated_column_stays_when_nothing_locks() {
    let input = columns(json!([
        {"dataIndex": "select", "__normalized": true},
        {"dataIndex": "name"}
    ]));

    let partition = split(&normalize(&input).columns);
    assert!(partition.lock_left.is_empty());
    assert_eq!(data_indices(&partition.center), vec!["select", "name"]);
}

// ============================================================================
// Splitting
// ============================================================================

#[test]
fn test_every_leaf_lands_in_exactly_one_partition() {
    let input = columns(json!([
        {"dataIndex": "id", "lock": "left", "width": 60},
        {"title": "Person", "children": [
            {"dataIndex": "first", "lock": "left", "width": 100},
            {"dataIndex": "last"},
            {"dataIndex": "nick", "lock": "right", "width": 90}
        ]},
        {"dataIndex": "age"},
        {"dataIndex": "ops", "lock": "right", "width": 100}
    ]));

    let partition = split(&normalize(&input).columns);

    assert_eq!(data_indices(&partition.lock_left), vec!["id", "first"]);
    assert_eq!(data_indices(&partition.center), vec!["last", "age"]);
    assert_eq!(data_indices(&partition.lock_right), vec!["nick", "ops"]);

    let mut all = data_indices(&partition.merged());
    all.sort();
    let mut expected = data_indices(&input);
    expected.sort();
    assert_eq!(all, expected, "union of the partitions is the input");
}

#[test]
fn test_groups_keep_structure_per_side() {
    let input = columns(json!([
        {"title": "Person", "children": [
            {"dataIndex": "first", "lock": true, "width": 100},
            {"dataIndex": "last"}
        ]}
    ]));

    let partition = split(&normalize(&input).columns);

    for side in [LockSide::Left, LockSide::Center] {
        let columns = partition.side(side);
        assert_eq!(columns.len(), 1, "{side} keeps the group");
        assert_eq!(columns[0].title(), "Person");
        assert_eq!(columns[0].leaf_count(), 1);
    }
    assert!(partition.lock_right.is_empty(), "empty group is pruned");
}

#[test]
fn test_merged_order_is_left_center_right() {
    let input = vec![
        ColumnNode::leaf("a"),
        ColumnNode::leaf("r").width(50).lock(Lock::Right),
        ColumnNode::leaf("b"),
        ColumnNode::leaf("l").width(50).lock(Lock::Left),
    ];

    let partition = split(&normalize(&input).columns);

    assert_eq!(data_indices(&partition.merged()), vec!["l", "a", "b", "r"]);
}

#[test]
fn test_locked_group_locks_its_leaves() {
    let input = columns(json!([
        {"title": "Meta", "lock": "right", "children": [
            {"dataIndex": "created", "width": 90},
            {"dataIndex": "updated", "width": 90}
        ]},
        {"dataIndex": "name"}
    ]));

    let partition = split(&normalize(&input).columns);
    assert_eq!(data_indices(&partition.lock_right), vec!["created", "updated"]);
    assert_eq!(data_indices(&partition.center), vec!["name"]);
}
