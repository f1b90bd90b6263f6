//! Dimension passes for locked tables.
//!
//! Each pass measures what it needs, plans a list of style writes from the
//! measurement alone, and leaves applying them to the caller. Planning never
//! touches the tree, so the geometry math is testable on plain values.

use crate::dom::{Dom, NodeId, NodeMetrics, StyleProp};
use crate::geometry::{scrollbar, trailing_props, ScrollbarSize, StyleWrite};
use crate::registry::TableContext;
use crate::types::{LockSide, NodeRole, Px};

/// Bottom mask used when the platform scrollbar takes no space.
pub const OVERLAY_SCROLLBAR_MASK: Px = 20;

/// Index in the center table of leaf `index` of a shadow table. Left leaves
/// lead the center column order, right leaves trail it.
pub fn center_column(side: LockSide, index: usize, center_len: usize, side_len: usize) -> usize {
    match side {
        LockSide::Right => center_len.saturating_sub(side_len) + index,
        _ => index,
    }
}

// =============================================================================
// Header rows
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderGeometry {
    /// Tallest single-row cell of each center header row.
    pub center_rows: Vec<Option<Px>>,
    /// Header row nodes of each mounted shadow table.
    pub shadow_rows: Vec<(LockSide, Vec<NodeId>)>,
}

pub fn measure_headers(dom: &dyn Dom, ctx: &TableContext) -> Option<HeaderGeometry> {
    let center = ctx.instance(LockSide::Center).ok()?;
    let center_rows = center
        .header_rows()
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| cell.row_span == 1)
                .filter_map(|(col, _)| ctx.header_cell(dom, row, col, LockSide::Center))
                .filter_map(|node| dom.metrics(node))
                .map(|metrics| metrics.offset_height)
                .max()
        })
        .collect();

    let shadow_rows = LockSide::SHADOWS
        .iter()
        .filter_map(|&side| {
            let instance = ctx.instance(side).ok()?;
            let rows = (0..instance.header_rows().len())
                .map(|row| ctx.header_row(dom, row, side))
                .collect::<Option<Vec<_>>>()?;
            Some((side, rows))
        })
        .collect();

    Some(HeaderGeometry {
        center_rows,
        shadow_rows,
    })
}

/// Height for every shadow header row. A shadow header with fewer rows than
/// the center one (its columns are nested less deeply) gives its last row the
/// combined height of the remaining center rows.
pub fn plan_header_heights(geometry: &HeaderGeometry) -> Vec<StyleWrite> {
    let mut writes = Vec::new();
    for (_, rows) in &geometry.shadow_rows {
        let last = rows.len().saturating_sub(1);
        for (index, &node) in rows.iter().enumerate() {
            let height = if index < last {
                geometry.center_rows.get(index).copied().flatten()
            } else {
                let rest: Vec<Px> = geometry
                    .center_rows
                    .iter()
                    .skip(index)
                    .filter_map(|height| *height)
                    .collect();
                (!rest.is_empty()).then(|| rest.iter().sum())
            };
            if let Some(height) = height {
                writes.push(StyleWrite::new(node, StyleProp::Height, height));
            }
        }
    }
    writes
}

// =============================================================================
// Body containers
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyGeometry {
    pub scrollbar: ScrollbarSize,
    /// Center body.
    pub body: NodeMetrics,
    /// Center header.
    pub header: Option<NodeId>,
    /// Bodies of the mounted shadow tables.
    pub lock_bodies: Vec<NodeId>,
    /// Wrapper of the right shadow table.
    pub right_wrapper: Option<NodeId>,
}

pub fn measure_body(dom: &mut dyn Dom, ctx: &TableContext) -> Option<BodyGeometry> {
    let body = ctx
        .live_node(&*dom, NodeRole::Body, LockSide::Center)
        .and_then(|node| dom.metrics(node))?;
    let scrollbar = scrollbar(dom);
    let dom = &*dom;
    Some(BodyGeometry {
        scrollbar,
        body,
        header: ctx.live_node(dom, NodeRole::Header, LockSide::Center),
        lock_bodies: LockSide::SHADOWS
            .iter()
            .filter_map(|&side| ctx.live_node(dom, NodeRole::Body, side))
            .collect(),
        right_wrapper: ctx.live_node(dom, NodeRole::Table, LockSide::Right),
    })
}

/// Size the header and the shadow bodies around the center body.
///
/// The header reserves the vertical scrollbar width on its trailing edge and
/// masks the horizontal-scrollbar gap at its bottom. Shadow bodies are as tall
/// as the center body minus its horizontal scrollbar so all three bottoms
/// line up. The right shadow table is pushed clear of the vertical scrollbar.
pub fn plan_body(geometry: &BodyGeometry, rtl: bool) -> Vec<StyleWrite> {
    let (padding, margin) = trailing_props(rtl);
    let width = geometry.scrollbar.width;
    let vertical = geometry.body.has_vertical_overflow();
    let trailing = if vertical && width > 0 { width } else { 0 };
    let mask = if width > 0 {
        width
    } else {
        OVERLAY_SCROLLBAR_MASK
    };

    let mut writes = Vec::new();
    if let Some(header) = geometry.header {
        writes.extend([
            StyleWrite::new(header, padding, trailing),
            StyleWrite::new(header, margin, trailing),
            StyleWrite::new(header, StyleProp::MarginBottom, -mask),
            StyleWrite::new(header, StyleProp::PaddingBottom, mask),
        ]);
    }

    let lock_body_height = geometry.body.offset_height - geometry.scrollbar.height;
    for &body in &geometry.lock_bodies {
        writes.push(StyleWrite::new(body, StyleProp::MaxHeight, lock_body_height));
    }

    if let Some(wrapper) = geometry.right_wrapper {
        if width > 0 {
            let edge = if rtl { StyleProp::Left } else { StyleProp::Right };
            let offset = if vertical { width } else { 0 };
            writes.push(StyleWrite::new(wrapper, edge, offset));
        }
    }
    writes
}

/// Header compensation while the shadow tables are not rendered: reserve the
/// scrollbar width at the bottom and drop the trailing margin.
pub fn plan_unlocked_header(header: NodeId, scrollbar: ScrollbarSize, rtl: bool) -> Vec<StyleWrite> {
    let (padding, margin) = trailing_props(rtl);
    let width = scrollbar.width;
    vec![
        StyleWrite::new(header, padding, width),
        StyleWrite::new(header, margin, 0),
        StyleWrite::new(header, StyleProp::MarginBottom, -width),
        StyleWrite::new(header, StyleProp::PaddingBottom, width),
    ]
}

// =============================================================================
// Row cells
// =============================================================================

/// A shadow cell and the center cell it must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPair {
    /// Rendered height of the center cell.
    pub source: Px,
    pub target: NodeId,
    /// Rendered height of the shadow cell.
    pub current: Px,
}

/// Pair every locked cell of every row with its center cell. `rows` are row
/// identities, so reordered data still pairs correctly when records carry
/// `__rowIndex`.
pub fn measure_cells(dom: &dyn Dom, ctx: &TableContext, rows: &[usize]) -> Vec<CellPair> {
    let Ok(center) = ctx.instance(LockSide::Center) else {
        return Vec::new();
    };
    let center_len = center.flat_columns().len();

    let mut pairs = Vec::new();
    for &row in rows {
        for side in LockSide::SHADOWS {
            let Ok(shadow) = ctx.instance(side) else {
                continue;
            };
            let side_len = shadow.flat_columns().len();
            for col in 0..side_len {
                let source_col = center_column(side, col, center_len, side_len);
                let Some(source) = ctx
                    .cell(dom, row, source_col, LockSide::Center)
                    .and_then(|node| dom.metrics(node))
                else {
                    continue;
                };
                let Some(target) = ctx.cell(dom, row, col, side) else {
                    continue;
                };
                let current = dom.metrics(target).map_or(0, |m| m.offset_height);
                pairs.push(CellPair {
                    source: source.offset_height,
                    target,
                    current,
                });
            }
        }
    }
    pairs
}

/// Height writes for the pairs that differ.
pub fn plan_cells(pairs: &[CellPair]) -> Vec<StyleWrite> {
    pairs
        .iter()
        .filter(|pair| pair.source != pair.current)
        .map(|pair| StyleWrite::new(pair.target, StyleProp::Height, pair.source))
        .collect()
}
