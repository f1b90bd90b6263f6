//! Vertical scroll sync between the center body and the locked bodies, the
//! `shadow` edge cue, initial scroll positioning and hover mirroring.
//!
//! Every write compares first. A programmatic scroll only fires an event when
//! the offset changed, so a write echoed back by its target finds the value
//! already in place and the chain ends.

use crate::dom::{Dom, NodeId};
use crate::geometry::toggle_class;
use crate::registry::TableContext;
use crate::types::{LockSide, NodeRole, Px};

pub const SHADOW_CLASS: &str = "shadow";
pub const HOVERED_CLASS: &str = "hovered";

/// Which shadow wrappers show the edge shadow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowCue {
    pub left: bool,
    pub right: bool,
}

/// Shadow cue for a horizontal scroll position: no shadow on the edge that
/// is fully scrolled to.
pub fn shadow_cue(scroll_left: Px, max_scroll_left: Px) -> ShadowCue {
    if scroll_left == 0 {
        ShadowCue {
            left: false,
            right: true,
        }
    } else if scroll_left == max_scroll_left {
        ShadowCue {
            left: true,
            right: false,
        }
    } else {
        ShadowCue {
            left: true,
            right: true,
        }
    }
}

fn copy_scroll_top(dom: &mut dyn Dom, node: NodeId, top: Px) -> bool {
    if dom.scroll_offset(node).map(|offset| offset.top) == Some(top) {
        return false;
    }
    dom.set_scroll_top(node, top)
}

/// Center body scrolled: carry its `scroll_top` into the locked bodies and
/// refresh the shadow cue.
pub fn on_lock_body_scroll(dom: &mut dyn Dom, ctx: &TableContext, rtl: bool) {
    let Some(body) = ctx.live_node(&*dom, NodeRole::Body, LockSide::Center) else {
        return;
    };
    let (Some(offset), Some(metrics)) = (dom.scroll_offset(body), dom.metrics(body)) else {
        return;
    };

    for side in LockSide::SHADOWS {
        if let Some(lock_body) = ctx.live_node(&*dom, NodeRole::Body, side) {
            copy_scroll_top(dom, lock_body, offset.top);
        }
    }

    let cue = shadow_cue(offset.left, metrics.max_scroll_left());
    let wrappers = [
        (LockSide::Left.physical(rtl), cue.left),
        (LockSide::Right.physical(rtl), cue.right),
    ];
    for (side, on) in wrappers {
        if let Some(wrapper) = ctx.live_node(&*dom, NodeRole::Table, side) {
            toggle_class(dom, wrapper, SHADOW_CLASS, on);
        }
    }
}

/// A locked body scrolled: carry its `scroll_top` into the center body only.
/// The center's own scroll event then reaches the other locked body.
pub fn on_lock_body_lr_scroll(dom: &mut dyn Dom, ctx: &TableContext, side: LockSide) {
    let Some(top) = ctx
        .live_node(&*dom, NodeRole::Body, side)
        .and_then(|node| dom.scroll_offset(node))
        .map(|offset| offset.top)
    else {
        return;
    };
    if let Some(body) = ctx.live_node(&*dom, NodeRole::Body, LockSide::Center) {
        copy_scroll_top(dom, body, top);
    }
}

/// Scroll the center body so the cell at column `col` (of `first_row`) and
/// the first cell of row `row` sit at the body's leading edges.
pub fn scroll_to(
    dom: &mut dyn Dom,
    ctx: &TableContext,
    first_row: usize,
    col: Option<usize>,
    row: Option<usize>,
) {
    if col.is_none() && row.is_none() {
        return;
    }
    let Some(body) = ctx.live_node(&*dom, NodeRole::Body, LockSide::Center) else {
        return;
    };
    let (Some(body_rect), Some(current)) = (dom.bounding_rect(body), dom.scroll_offset(body)) else {
        return;
    };

    let rect_of = |row: usize, col: usize| {
        ctx.cell(&*dom, row, col, LockSide::Center)
            .and_then(|cell| dom.bounding_rect(cell))
    };
    let col_rect = col.and_then(|col| rect_of(first_row, col));
    let row_rect = row.and_then(|row| rect_of(row, 0));

    if let Some(rect) = col_rect {
        dom.set_scroll_left(body, current.left + rect.left() - body_rect.left());
    }
    if let Some(rect) = row_rect {
        dom.set_scroll_top(body, current.top + rect.top() - body_rect.top());
    }
}

/// Add or remove the hover class on `row` in every mounted instance.
pub fn mirror_hover(dom: &mut dyn Dom, ctx: &TableContext, row: usize, entered: bool) {
    for side in LockSide::ALL {
        if let Some(node) = ctx.row(&*dom, row, side) {
            toggle_class(dom, node, HOVERED_CLASS, entered);
        }
    }
}
