use locktable::event::WindowEvent;
use locktable::{
    ColumnNode, DecoratedTable, Dom, FixedTable, HeadlessTable, Lock, LockMode, LockSide, LockTable,
    MemoryDom, NodeRole, StyleProp, TableEvent, TableProps,
};
use serde_json::{json, Value};

fn init_logging() {
    let _ = simplelog::TestLogger::init(simplelog::LevelFilter::Trace, simplelog::Config::default());
}

/// id (80, left) + name (120) + ops (80, right): 280px of columns.
fn columns() -> Vec<ColumnNode> {
    vec![
        ColumnNode::leaf("id").width(80).lock(Lock::Left),
        ColumnNode::leaf("name").width(120),
        ColumnNode::leaf("ops").width(80).lock(Lock::Right),
    ]
}

fn records(count: usize) -> Vec<Value> {
    (0..count).map(|i| json!({"id": i, "name": format!("row {i}")})).collect()
}

fn build(base: HeadlessTable, props: TableProps) -> DecoratedTable<HeadlessTable> {
    DecoratedTable::new(base, props)
        .with_layer(LockTable::new())
        .with_layer(FixedTable::new())
}

fn mounted(width: i32, props: TableProps) -> (MemoryDom, DecoratedTable<HeadlessTable>) {
    init_logging();
    let mut dom = MemoryDom::with_scrollbar(15, 15);
    let mut table = build(HeadlessTable::new().container_width(width), props);
    table.mount(&mut dom);
    (dom, table)
}

fn mode(table: &DecoratedTable<HeadlessTable>) -> LockMode {
    table.layer::<LockTable>().map(LockTable::mode).unwrap_or_default()
}

// ============================================================================
// Lock Mode
// ============================================================================

#[test]
fn test_narrow_container_keeps_lock() {
    let (dom, table) = mounted(200, TableProps::new(columns()).data_source(records(3)));

    assert_eq!(mode(&table), LockMode::Active);
    assert_eq!(
        table.base().mounted_sides(),
        vec![LockSide::Center, LockSide::Left, LockSide::Right]
    );
    assert!(table.context().lock_active());
    assert!(dom.find("left/body").is_some());
    assert_eq!(
        table.rendered_side(LockSide::Left).map(|props| props.columns.len()),
        Some(1)
    );
}

#[test]
fn test_wide_container_suppresses_lock() {
    let (dom, table) = mounted(400, TableProps::new(columns()).data_source(records(3)));

    assert_eq!(mode(&table), LockMode::Suppressed);
    assert_eq!(table.rendered().len(), 1);
    assert_eq!(table.base().mounted_sides(), vec![LockSide::Center]);
    assert!(!table.context().has_instance(LockSide::Left));
    assert!(!table.context().lock_active());
    assert!(dom.find("left/body").is_none());
    assert_eq!(
        table.rendered()[0].columns.len(),
        3,
        "the single table renders every column"
    );
}

#[test]
fn test_resize_restores_lock() {
    let (mut dom, mut table) = mounted(400, TableProps::new(columns()).data_source(records(3)));
    assert_eq!(mode(&table), LockMode::Suppressed);

    table.base_mut().resize(&mut dom, 200);
    table.dispatch(&mut dom, TableEvent::Resize);

    assert_eq!(mode(&table), LockMode::Active);
    assert_eq!(table.rendered().len(), 3);
    assert!(table.context().has_instance(LockSide::Right));
}

#[test]
fn test_resize_suppresses_lock() {
    let (mut dom, mut table) = mounted(200, TableProps::new(columns()).data_source(records(3)));

    table.base_mut().resize(&mut dom, 500);
    table.dispatch(&mut dom, TableEvent::Resize);

    assert_eq!(mode(&table), LockMode::Suppressed);
    assert_eq!(table.base().mounted_sides(), vec![LockSide::Center]);
}

#[test]
fn test_zero_width_container_defers() {
    let (dom, table) = mounted(0, TableProps::new(columns()).data_source(records(3)));

    assert_eq!(mode(&table), LockMode::Requested);
    assert_eq!(table.rendered().len(), 3);
    let left_header_row = dom.find("left/header-row[0]").unwrap();
    assert_eq!(
        dom.style(left_header_row, StyleProp::Height),
        None,
        "no adjustment before layout"
    );
}

#[test]
fn test_unlocked_columns_pass_through() {
    let props = TableProps::new(vec![ColumnNode::leaf("a"), ColumnNode::leaf("b")]);
    let (_dom, table) = mounted(200, props.clone());

    assert_eq!(mode(&table), LockMode::NotLocked);
    assert_eq!(table.rendered().len(), 1);
    assert_eq!(table.rendered()[0].columns, props.columns);
    assert_eq!(table.rendered()[0].class_name, None);
}

// ============================================================================
// Dimension Sync
// ============================================================================

#[test]
fn test_row_heights_are_mirrored() {
    init_logging();
    let mut dom = MemoryDom::with_scrollbar(15, 15);
    let base = HeadlessTable::new().container_width(200).center_row_height(1, 80);
    let mut table = build(base, TableProps::new(columns()).data_source(records(3)));
    table.mount(&mut dom);

    for label in ["left/cell[1,0]", "right/cell[1,0]"] {
        let cell = dom.find(label).unwrap();
        assert_eq!(dom.metrics(cell).map(|m| m.offset_height), Some(80), "{label}");
    }
    let untouched = dom.find("left/cell[0,0]").unwrap();
    assert_eq!(dom.style(untouched, StyleProp::Height), None, "equal heights are not written");
}

#[test]
fn test_row_heights_follow_row_identity() {
    init_logging();
    let mut dom = MemoryDom::with_scrollbar(15, 15);
    let base = HeadlessTable::new().container_width(200).center_row_height(7, 90);
    let data = vec![
        json!({"__rowIndex": 7, "id": 7}),
        json!({"__rowIndex": 3, "id": 3}),
    ];
    let mut table = build(base, TableProps::new(columns()).data_source(data));
    table.mount(&mut dom);

    let cell = dom.find("right/cell[7,0]").unwrap();
    assert_eq!(dom.metrics(cell).map(|m| m.offset_height), Some(90));
    let other = dom.find("right/cell[3,0]").unwrap();
    assert_eq!(dom.metrics(other).map(|m| m.offset_height), Some(40));
}

#[test]
fn test_lock_body_heights_and_header_mask() {
    let props = TableProps::new(columns())
        .data_source(records(10))
        .fixed_header()
        .max_body_height(locktable::BodyHeight::Px(120));
    let (dom, _table) = mounted(200, props);

    // Center body: 120 tall, 15 of it horizontal scrollbar.
    for label in ["left/body", "right/body"] {
        let body = dom.find(label).unwrap();
        assert_eq!(dom.style(body, StyleProp::MaxHeight), Some(105), "{label}");
    }
    let header = dom.find("center/header").unwrap();
    assert_eq!(dom.style(header, StyleProp::PaddingRight), Some(15));
    assert_eq!(dom.style(header, StyleProp::MarginRight), Some(15));
    assert_eq!(dom.style(header, StyleProp::MarginBottom), Some(-15));
    assert_eq!(dom.style(header, StyleProp::PaddingBottom), Some(15));

    let right_wrapper = dom.find("right/table").unwrap();
    assert_eq!(dom.style(right_wrapper, StyleProp::Right), Some(15));
}

#[test]
fn test_overlay_scrollbar_header_mask() {
    init_logging();
    let mut dom = MemoryDom::new();
    let mut table = build(
        HeadlessTable::new().container_width(200),
        TableProps::new(columns()).data_source(records(3)),
    );
    table.mount(&mut dom);

    let header = dom.find("center/header").unwrap();
    assert_eq!(dom.style(header, StyleProp::MarginBottom), Some(-20));
    assert_eq!(dom.style(header, StyleProp::PaddingBottom), Some(20));
    assert_eq!(dom.style(header, StyleProp::PaddingRight), Some(0));
    let right_wrapper = dom.find("right/table").unwrap();
    assert_eq!(dom.style(right_wrapper, StyleProp::Right), None);
}

#[test]
fn test_header_rows_synced_and_affix_repositioned() {
    init_logging();
    let mut dom = MemoryDom::with_scrollbar(15, 15);
    let base = HeadlessTable::new()
        .container_width(200)
        .center_header_height(0, 50)
        .center_header_height(1, 30)
        .with_affix();
    let columns = vec![
        ColumnNode::leaf("id").width(80).lock(Lock::Left),
        ColumnNode::group(
            "person",
            vec![ColumnNode::leaf("first").width(100), ColumnNode::leaf("last").width(100)],
        ),
        ColumnNode::leaf("ops").width(80).lock(Lock::Right),
    ];
    let mut table = build(base, TableProps::new(columns).data_source(records(2)));
    table.mount(&mut dom);

    // Shadow headers have a single row covering both center rows.
    for side in ["left", "right"] {
        let row = dom.find(&format!("{side}/header-row[0]")).unwrap();
        assert_eq!(dom.style(row, StyleProp::Height), Some(80), "{side}");
    }

    assert_eq!(table.context().scheduler.len(), 2);
    assert_eq!(table.tick(&mut dom), 2);
    let affix = dom.find("left/affix").unwrap();
    assert_eq!(dom.style(affix, StyleProp::Height), Some(80));
    assert_eq!(table.tick(&mut dom), 0);
}

#[test]
fn test_second_pass_writes_nothing() {
    let props = TableProps::new(columns())
        .data_source(records(10))
        .fixed_header();
    let (mut dom, mut table) = mounted(200, props);
    table.tick(&mut dom);
    let before = dom.write_count();

    table.update(&mut dom);
    table.tick(&mut dom);

    assert_eq!(dom.write_count(), before);
}

#[test]
fn test_suppressed_second_pass_writes_nothing() {
    let (mut dom, mut table) = mounted(400, TableProps::new(columns()).data_source(records(3)));
    let before = dom.write_count();

    table.update(&mut dom);

    assert_eq!(dom.write_count(), before);
}

// ============================================================================
// Hover
// ============================================================================

#[test]
fn test_row_hover_is_mirrored() {
    let (mut dom, mut table) = mounted(200, TableProps::new(columns()).data_source(records(3)));

    table.dispatch(&mut dom, TableEvent::RowMouseEnter { row: 2 });
    for side in ["center", "left", "right"] {
        let row = dom.find(&format!("{side}/row[2]")).unwrap();
        assert!(dom.has_class(row, "hovered"), "{side}");
    }

    table.dispatch(&mut dom, TableEvent::RowMouseLeave { row: 2 });
    let row = dom.find("left/row[2]").unwrap();
    assert!(!dom.has_class(row, "hovered"));
}

#[test]
fn test_row_hover_ignored_without_lock() {
    let (mut dom, mut table) = mounted(400, TableProps::new(columns()).data_source(records(3)));

    table.dispatch(&mut dom, TableEvent::RowMouseEnter { row: 0 });

    let row = dom.find("center/row[0]").unwrap();
    assert!(!dom.has_class(row, "hovered"));
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_unmount_removes_listener_and_nodes() {
    let (mut dom, mut table) = mounted(200, TableProps::new(columns()).data_source(records(3)));
    // One per decorator.
    assert_eq!(table.context().listeners.count(WindowEvent::Resize), 2);

    table.unmount(&mut dom);

    assert!(table.context().listeners.is_empty());
    assert_eq!(dom.nodes().count(), 0);
    assert!(table.context().node(NodeRole::Body, LockSide::Center).is_err());

    let writes = dom.write_count();
    table.dispatch(&mut dom, TableEvent::Resize);
    assert_eq!(dom.write_count(), writes, "unmounted table ignores events");
}

#[test]
fn test_updates_do_not_add_listeners() {
    let (mut dom, mut table) = mounted(200, TableProps::new(columns()).data_source(records(3)));

    table.update(&mut dom);
    table.set_props(&mut dom, TableProps::new(columns()).data_source(records(5)));

    assert_eq!(table.context().listeners.count(WindowEvent::Resize), 2);
}

#[test]
fn test_stale_shadow_nodes_are_skipped() {
    let (mut dom, mut table) = mounted(200, TableProps::new(columns()).data_source(records(3)));
    let left_body = dom.find("left/body").unwrap();

    table.base_mut().resize(&mut dom, 500);
    table.dispatch(&mut dom, TableEvent::Resize);
    assert!(!dom.is_attached(left_body));

    // A late scroll event from the removed shadow body resolves to nothing.
    let writes = dom.write_count();
    table.dispatch(&mut dom, TableEvent::Scroll { target: left_body });
    assert_eq!(dom.write_count(), writes);
}

#[test]
fn test_data_change_remounts_and_resyncs() {
    init_logging();
    let mut dom = MemoryDom::with_scrollbar(15, 15);
    let base = HeadlessTable::new().container_width(200).center_row_height(4, 70);
    let mut table = build(base, TableProps::new(columns()).data_source(records(3)));
    table.mount(&mut dom);
    assert!(dom.find("left/cell[4,0]").is_none());

    table.set_props(&mut dom, TableProps::new(columns()).data_source(records(5)));

    let cell = dom.find("left/cell[4,0]").unwrap();
    assert_eq!(dom.metrics(cell).map(|m| m.offset_height), Some(70));
}
