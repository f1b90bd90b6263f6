//! Headless base table.
//!
//! Lays instances out in a [`MemoryDom`] from declared column widths and row
//! heights, registers their nodes, and hands out [`TableInstance`] handles.
//! Stands in for a real renderer in tests and in the scenario runner.
//!
//! Row height overrides model center cells whose content wraps. Shadow cells
//! start at the default row height until the lock decorator aligns them.

use std::collections::{BTreeMap, HashMap};

use crate::column::{flatten, header_rows, ColumnLeaf, HeaderCell};
use crate::dom::{Dom, MemoryDom, NodeId, NodeMetrics, StyleProp};
use crate::error::LookupError;
use crate::geometry::{apply_styles, scrollbar, ScrollbarSize, StyleWrite};
use crate::props::{row_identity, TableProps, DEFAULT_MAX_BODY_HEIGHT};
use crate::registry::{TableContext, TableInstance};
use crate::table::BaseTable;
use crate::types::{LockSide, NodeRole, Px, Rect};

pub const DEFAULT_CONTAINER_WIDTH: Px = 800;
pub const DEFAULT_ROW_HEIGHT: Px = 40;
pub const DEFAULT_HEADER_ROW_HEIGHT: Px = 48;
pub const DEFAULT_COLUMN_WIDTH: Px = 120;

/// Box of a scrolling body holding `content_w` x `content_h` of rows inside
/// a `viewport_w` wide frame, optionally bounded in height.
fn body_metrics(
    viewport_w: Px,
    content_w: Px,
    content_h: Px,
    bounded: Option<Px>,
    bar: ScrollbarSize,
) -> NodeMetrics {
    let hbar = if content_w > viewport_w { bar.height } else { 0 };
    let natural = content_h + hbar;
    let offset_h = bounded.map_or(natural, |max| natural.min(max));
    let client_h = offset_h - hbar;
    let vbar = if content_h > client_h { bar.width } else { 0 };
    let client_w = viewport_w - vbar;
    NodeMetrics {
        offset_width: viewport_w,
        offset_height: offset_h,
        client_width: client_w,
        client_height: client_h,
        scroll_width: content_w.max(client_w),
        scroll_height: content_h.max(client_h),
    }
}

/// The header scrolls horizontally with the body, so it spans the full
/// column width.
fn header_metrics(viewport_w: Px, content_w: Px, header_h: Px) -> NodeMetrics {
    NodeMetrics {
        scroll_width: content_w.max(viewport_w),
        ..NodeMetrics::sized(viewport_w, header_h)
    }
}

/// What a mounted instance was built from. Instances are only rebuilt when
/// this changes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Signature {
    columns: Vec<(String, Px)>,
    rows: Vec<usize>,
    has_header: bool,
    body_height: Option<Px>,
    container_width: Px,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    content_w: Px,
    content_h: Px,
    header_h: Px,
    bounded: Option<Px>,
}

#[derive(Debug)]
struct Mounted {
    signature: Signature,
    frame: Frame,
    table: NodeId,
    header: Option<NodeId>,
    body: NodeId,
    nodes: Vec<NodeId>,
}

/// Handle of one headless instance.
#[derive(Debug)]
pub struct HeadlessInstance {
    side: LockSide,
    columns: Vec<ColumnLeaf>,
    header: Vec<Vec<HeaderCell>>,
    header_row_nodes: Vec<NodeId>,
    header_cell_nodes: Vec<Vec<NodeId>>,
    /// Row identity to row node and cell nodes.
    rows: HashMap<usize, (NodeId, Vec<NodeId>)>,
    affix: Option<NodeId>,
}

impl TableInstance for HeadlessInstance {
    fn lock_side(&self) -> LockSide {
        self.side
    }

    fn flat_columns(&self) -> &[ColumnLeaf] {
        &self.columns
    }

    fn header_rows(&self) -> &[Vec<HeaderCell>] {
        &self.header
    }

    fn cell_node(&self, row: usize, col: usize) -> Result<NodeId, LookupError> {
        self.rows
            .get(&row)
            .and_then(|(_, cells)| cells.get(col))
            .copied()
            .ok_or(LookupError::OutOfRange {
                what: "cell",
                side: self.side,
                row,
                col,
            })
    }

    fn header_cell_node(&self, row: usize, col: usize) -> Result<NodeId, LookupError> {
        self.header_cell_nodes
            .get(row)
            .and_then(|cells| cells.get(col))
            .copied()
            .ok_or(LookupError::OutOfRange {
                what: "header cell",
                side: self.side,
                row,
                col,
            })
    }

    fn header_row_node(&self, row: usize) -> Result<NodeId, LookupError> {
        self.header_row_nodes
            .get(row)
            .copied()
            .ok_or(LookupError::OutOfRange {
                what: "header row",
                side: self.side,
                row,
                col: 0,
            })
    }

    fn row_node(&self, row: usize) -> Result<NodeId, LookupError> {
        self.rows
            .get(&row)
            .map(|(node, _)| *node)
            .ok_or(LookupError::OutOfRange {
                what: "row",
                side: self.side,
                row,
                col: 0,
            })
    }

    /// The affix overlay covers the whole header.
    fn reposition_affix(&self, dom: &mut dyn Dom) {
        let Some(affix) = self.affix else {
            return;
        };
        let height = self
            .header_row_nodes
            .iter()
            .filter_map(|&node| dom.metrics(node))
            .map(|metrics| metrics.offset_height)
            .sum();
        apply_styles(dom, [StyleWrite::new(affix, StyleProp::Height, height)]);
    }
}

/// The headless base table.
#[derive(Debug)]
pub struct HeadlessTable {
    container_width: Px,
    row_height: Px,
    header_row_height: Px,
    column_width: Px,
    row_heights: HashMap<usize, Px>,
    header_heights: HashMap<usize, Px>,
    affix: bool,
    mounted: BTreeMap<LockSide, Mounted>,
}

impl Default for HeadlessTable {
    fn default() -> Self {
        Self {
            container_width: DEFAULT_CONTAINER_WIDTH,
            row_height: DEFAULT_ROW_HEIGHT,
            header_row_height: DEFAULT_HEADER_ROW_HEIGHT,
            column_width: DEFAULT_COLUMN_WIDTH,
            row_heights: HashMap::new(),
            header_heights: HashMap::new(),
            affix: false,
            mounted: BTreeMap::new(),
        }
    }
}

impl HeadlessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn container_width(mut self, width: Px) -> Self {
        self.container_width = width;
        self
    }

    pub fn row_height(mut self, height: Px) -> Self {
        self.row_height = height;
        self
    }

    pub fn header_row_height(mut self, height: Px) -> Self {
        self.header_row_height = height;
        self
    }

    /// Width of columns that declare none.
    pub fn column_width(mut self, width: Px) -> Self {
        self.column_width = width;
        self
    }

    /// Height of one center row, by row identity.
    pub fn center_row_height(mut self, row: usize, height: Px) -> Self {
        self.row_heights.insert(row, height);
        self
    }

    /// Height of one center header row.
    pub fn center_header_height(mut self, row: usize, height: Px) -> Self {
        self.header_heights.insert(row, height);
        self
    }

    /// Give every instance a floating header overlay.
    pub fn with_affix(mut self) -> Self {
        self.affix = true;
        self
    }

    /// Sides currently mounted, center first.
    pub fn mounted_sides(&self) -> Vec<LockSide> {
        self.mounted.keys().copied().collect()
    }

    /// Change the container width, as a window resize would. The center
    /// frame is relaid in place; every instance rebuilds on the next commit.
    pub fn resize(&mut self, dom: &mut MemoryDom, width: Px) {
        self.container_width = width;
        let Some(center) = self.mounted.get(&LockSide::Center) else {
            return;
        };
        let bar = scrollbar(dom);
        let frame = center.frame;
        let body = body_metrics(width, frame.content_w, frame.content_h, frame.bounded, bar);
        dom.set_metrics(center.body, body);
        dom.set_metrics(
            center.table,
            NodeMetrics::sized(width, frame.header_h + body.offset_height),
        );
        if let Some(header) = center.header {
            dom.set_metrics(header, header_metrics(width, frame.content_w, frame.header_h));
        }
    }

    fn body_row_height(&self, row: usize) -> Px {
        self.row_heights.get(&row).copied().unwrap_or(self.row_height)
    }

    fn header_height_of(&self, side: LockSide, row: usize) -> Px {
        match side {
            LockSide::Center => self
                .header_heights
                .get(&row)
                .copied()
                .unwrap_or(self.header_row_height),
            _ => self.header_row_height,
        }
    }

    fn column_widths(&self, columns: &[ColumnLeaf]) -> Vec<Px> {
        columns
            .iter()
            .map(|leaf| leaf.width.unwrap_or(self.column_width))
            .collect()
    }

    fn signature(&self, props: &TableProps) -> Signature {
        let columns = flatten(&props.columns);
        let widths = self.column_widths(&columns);
        Signature {
            columns: columns
                .into_iter()
                .map(|leaf| leaf.data_index)
                .zip(widths)
                .collect(),
            rows: props
                .data_source
                .iter()
                .enumerate()
                .map(|(index, record)| row_identity(index, record))
                .collect(),
            has_header: props.has_header,
            body_height: props
                .fixed_header
                .then(|| props.max_body_height.to_px().unwrap_or(DEFAULT_MAX_BODY_HEIGHT)),
            container_width: self.container_width,
        }
    }

    fn unmount_side(&mut self, dom: &mut MemoryDom, ctx: &mut TableContext, side: LockSide) {
        if let Some(mounted) = self.mounted.remove(&side) {
            for node in mounted.nodes {
                dom.remove(node);
            }
            log::debug!("Unmounted {side} instance");
        }
        ctx.unregister_side(side);
    }

    fn mount_instance(
        &self,
        dom: &mut MemoryDom,
        ctx: &mut TableContext,
        props: &TableProps,
        signature: Signature,
    ) -> Mounted {
        let side = props.lock_type;
        let columns = flatten(&props.columns);
        let widths = self.column_widths(&columns);
        let header = if props.has_header {
            header_rows(&props.columns)
        } else {
            Vec::new()
        };

        let content_w: Px = widths.iter().sum();
        let viewport_w = match side {
            LockSide::Center => self.container_width,
            _ => content_w,
        };
        let x = match side {
            LockSide::Right => self.container_width - content_w,
            _ => 0,
        };
        let header_heights: Vec<Px> = (0..header.len())
            .map(|row| self.header_height_of(side, row))
            .collect();
        let header_h: Px = header_heights.iter().sum();
        let content_h: Px = signature
            .rows
            .iter()
            .map(|&row| self.body_row_height(row))
            .sum();
        let bar = match side {
            LockSide::Center => scrollbar(dom),
            _ => ScrollbarSize::default(),
        };
        let frame = Frame {
            content_w,
            content_h,
            header_h,
            bounded: signature.body_height,
        };
        let body_box = body_metrics(viewport_w, content_w, content_h, frame.bounded, bar);

        let mut nodes = Vec::new();
        let mut create = |dom: &mut MemoryDom, label: String, metrics: NodeMetrics, rect: Rect| {
            let node = dom.create(label);
            dom.set_metrics(node, metrics);
            dom.set_rect(node, rect);
            nodes.push(node);
            node
        };

        let total_h = header_h + body_box.offset_height;
        let table = create(
            dom,
            format!("{side}/table"),
            NodeMetrics::sized(viewport_w, total_h),
            Rect::new(x, 0, viewport_w, total_h),
        );
        ctx.get_node(NodeRole::Table, Some(table), side);

        let mut header_row_nodes = Vec::new();
        let mut header_cell_nodes = Vec::new();
        let mut header_node = None;
        if props.has_header {
            let node = create(
                dom,
                format!("{side}/header"),
                header_metrics(viewport_w, content_w, header_h),
                Rect::new(x, 0, viewport_w, header_h),
            );
            ctx.get_node(NodeRole::Header, Some(node), side);
            header_node = Some(node);

            // Remaining row span of the cell occupying each leaf column.
            let mut busy = vec![0usize; widths.len()];
            let mut y = 0;
            for (r, cells) in header.iter().enumerate() {
                let row_h = header_heights[r];
                header_row_nodes.push(create(
                    dom,
                    format!("{side}/header-row[{r}]"),
                    NodeMetrics::sized(viewport_w, row_h),
                    Rect::new(x, y, viewport_w, row_h),
                ));

                let mut row_cells = Vec::with_capacity(cells.len());
                let mut col = 0;
                for (c, cell) in cells.iter().enumerate() {
                    while busy.get(col).is_some_and(|&span| span > 0) {
                        col += 1;
                    }
                    let end = (col + cell.col_span).min(widths.len());
                    let cell_x = x + widths[..col.min(end)].iter().sum::<Px>();
                    let cell_w: Px = widths[col.min(end)..end].iter().sum();
                    let cell_h: Px = header_heights.iter().skip(r).take(cell.row_span).sum();
                    row_cells.push(create(
                        dom,
                        format!("{side}/header-cell[{r},{c}]"),
                        NodeMetrics::sized(cell_w, cell_h),
                        Rect::new(cell_x, y, cell_w, cell_h),
                    ));
                    for span in busy.iter_mut().take(end).skip(col) {
                        *span = cell.row_span;
                    }
                    col = end;
                }
                for span in &mut busy {
                    *span = span.saturating_sub(1);
                }
                header_cell_nodes.push(row_cells);
                y += row_h;
            }
        }

        let body = create(
            dom,
            format!("{side}/body"),
            body_box,
            Rect::new(x, header_h, viewport_w, body_box.offset_height),
        );
        ctx.get_node(NodeRole::Body, Some(body), side);

        let mut rows = HashMap::new();
        let mut y = header_h;
        for &row in &signature.rows {
            let row_h = match side {
                LockSide::Center => self.body_row_height(row),
                _ => self.row_height,
            };
            let row_node = create(
                dom,
                format!("{side}/row[{row}]"),
                NodeMetrics::sized(content_w, row_h),
                Rect::new(x, y, content_w, row_h),
            );
            let mut cell_x = x;
            let cells = widths
                .iter()
                .enumerate()
                .map(|(c, &w)| {
                    let cell = create(
                        dom,
                        format!("{side}/cell[{row},{c}]"),
                        NodeMetrics::sized(w, row_h),
                        Rect::new(cell_x, y, w, row_h),
                    );
                    cell_x += w;
                    cell
                })
                .collect();
            rows.insert(row, (row_node, cells));
            y += self.body_row_height(row);
        }

        let affix = (self.affix && props.has_header).then(|| {
            create(
                dom,
                format!("{side}/affix"),
                NodeMetrics::sized(viewport_w, header_h),
                Rect::new(x, 0, viewport_w, header_h),
            )
        });

        log::debug!(
            "Mounted {side} instance: {} columns, {} rows",
            columns.len(),
            signature.rows.len()
        );
        ctx.get_table_instance(
            side,
            Some(Box::new(HeadlessInstance {
                side,
                columns,
                header,
                header_row_nodes,
                header_cell_nodes,
                rows,
                affix,
            })),
        );

        Mounted {
            signature,
            frame,
            table,
            header: header_node,
            body,
            nodes,
        }
    }
}

impl BaseTable for HeadlessTable {
    type Dom = MemoryDom;

    fn commit(&mut self, dom: &mut MemoryDom, ctx: &mut TableContext, instances: &[TableProps]) {
        let stale: Vec<LockSide> = self
            .mounted
            .keys()
            .filter(|&&side| !instances.iter().any(|props| props.lock_type == side))
            .copied()
            .collect();
        for side in stale {
            self.unmount_side(dom, ctx, side);
        }

        for props in instances {
            let side = props.lock_type;
            let signature = self.signature(props);
            if self
                .mounted
                .get(&side)
                .is_some_and(|mounted| mounted.signature == signature)
            {
                continue;
            }
            self.unmount_side(dom, ctx, side);
            let mounted = self.mount_instance(dom, ctx, props, signature);
            self.mounted.insert(side, mounted);
        }
    }

    fn unmount(&mut self, dom: &mut MemoryDom, ctx: &mut TableContext) {
        let sides = self.mounted_sides();
        for side in sides {
            self.unmount_side(dom, ctx, side);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::column::{ColumnNode, Lock};

    #[test]
    fn test_body_metrics_bounded_with_scrollbars() {
        let bar = ScrollbarSize { width: 15, height: 15 };
        let metrics = body_metrics(200, 280, 400, Some(200), bar);

        assert_eq!(metrics.offset_height, 200);
        assert_eq!(metrics.client_height, 185);
        assert_eq!(metrics.client_width, 185);
        assert!(metrics.has_vertical_overflow());
        assert!(metrics.has_horizontal_overflow());
    }

    #[test]
    fn test_body_metrics_unbounded_fits() {
        let metrics = body_metrics(400, 280, 120, None, ScrollbarSize::default());
        assert_eq!(metrics, NodeMetrics::sized(400, 120));
    }

    fn grouped_props() -> TableProps {
        TableProps::new(vec![
            ColumnNode::leaf("id").width(60).lock(Lock::Left),
            ColumnNode::group(
                "person",
                vec![ColumnNode::leaf("first").width(100), ColumnNode::leaf("last").width(100)],
            ),
        ])
        .data_source(vec![json!({"id": 1}), json!({"__rowIndex": 9})])
    }

    #[test]
    fn test_mount_registers_nodes_and_instance() {
        let mut dom = MemoryDom::new();
        let mut ctx = TableContext::new();
        let mut base = HeadlessTable::new().container_width(500);

        base.commit(&mut dom, &mut ctx, &[grouped_props()]);

        let center = ctx.instance(LockSide::Center).unwrap();
        assert_eq!(center.flat_columns().len(), 3);
        assert_eq!(center.header_rows().len(), 2);
        assert!(center.cell_node(9, 2).is_ok(), "rows are keyed by identity");
        assert!(center.cell_node(1, 0).is_err());
        assert!(ctx.node(NodeRole::Body, LockSide::Center).is_ok());

        // The `last` header cell sits after `id` and `first`.
        let last = center.header_cell_node(1, 1).unwrap();
        assert_eq!(dom.bounding_rect(last), Some(Rect::new(160, 48, 100, 48)));
        // `id` spans both header rows.
        let id = center.header_cell_node(0, 0).unwrap();
        assert_eq!(dom.metrics(id).map(|m| m.offset_height), Some(96));
    }

    #[test]
    fn test_commit_keeps_unchanged_instances() {
        let mut dom = MemoryDom::new();
        let mut ctx = TableContext::new();
        let mut base = HeadlessTable::new();

        base.commit(&mut dom, &mut ctx, &[grouped_props()]);
        let body = ctx.node(NodeRole::Body, LockSide::Center).unwrap();
        base.commit(&mut dom, &mut ctx, &[grouped_props()]);

        assert_eq!(ctx.node(NodeRole::Body, LockSide::Center), Ok(body));
        assert!(dom.is_attached(body));
    }

    #[test]
    fn test_commit_unmounts_missing_sides() {
        let mut dom = MemoryDom::new();
        let mut ctx = TableContext::new();
        let mut base = HeadlessTable::new();
        let left = TableProps {
            lock_type: LockSide::Left,
            ..grouped_props()
        };

        base.commit(&mut dom, &mut ctx, &[grouped_props(), left]);
        let left_body = ctx.node(NodeRole::Body, LockSide::Left).unwrap();
        base.commit(&mut dom, &mut ctx, &[grouped_props()]);

        assert!(!dom.is_attached(left_body));
        assert!(!ctx.has_instance(LockSide::Left));
        assert_eq!(base.mounted_sides(), vec![LockSide::Center]);
    }

    #[test]
    fn test_header_scrolls_with_columns_after_resize() {
        let mut dom = MemoryDom::new();
        let mut ctx = TableContext::new();
        let mut base = HeadlessTable::new().container_width(500);

        base.commit(&mut dom, &mut ctx, &[grouped_props()]);
        let header = ctx.node(NodeRole::Header, LockSide::Center).unwrap();
        assert_eq!(dom.metrics(header).map(|m| m.max_scroll_left()), Some(0));

        base.resize(&mut dom, 200);
        let metrics = dom.metrics(header).unwrap();
        assert_eq!(metrics.client_width, 200);
        assert_eq!(metrics.scroll_width, 260);
        assert_eq!(metrics.max_scroll_left(), 60);
    }

    #[test]
    fn test_reposition_affix_covers_header() {
        let mut dom = MemoryDom::new();
        let mut ctx = TableContext::new();
        let mut base = HeadlessTable::new().with_affix();

        base.commit(&mut dom, &mut ctx, &[grouped_props()]);
        let instance = ctx.instance(LockSide::Center).unwrap();
        let row = instance.header_row_node(1).unwrap();
        dom.set_style(row, StyleProp::Height, 60);
        instance.reposition_affix(&mut dom);

        let affix = dom.find("center/affix").unwrap();
        assert_eq!(dom.style(affix, StyleProp::Height), Some(108));
    }
}
