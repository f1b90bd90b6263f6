//! Fixed-header decorator.
//!
//! Gives the body its own scroll region bounded by `max_body_height`, keeps
//! the header above it, mirrors horizontal scroll between the two and pads
//! the header by the vertical scrollbar width so header and body columns
//! line up.

use std::any::Any;

use crate::dom::{Dom, NodeMetrics, StyleProp};
use crate::event::{ListenerId, ScrollSource, WindowEvent};
use crate::geometry::{apply_styles, trailing_props, GeometrySnapshot, ScrollbarSize, StylePatch};
use crate::props::{class_names, TableProps};
use crate::registry::TableContext;
use crate::table::{Decorator, Outcome};
use crate::types::{LockSide, NodeRole};

/// Header compensation for a body of the given size.
///
/// Trailing padding and margin take the scrollbar width when the body
/// overflows vertically (leading edge under rtl). A non-zero scrollbar also
/// pulls the header down over the body by its width and pads the bottom to
/// mask the horizontal-scrollbar gap. A zero-width (overlay) scrollbar clears
/// everything.
pub fn plan_fixed_header(scrollbar: ScrollbarSize, body: NodeMetrics, rtl: bool) -> StylePatch {
    let (padding, margin) = trailing_props(rtl);
    let width = scrollbar.width;
    let trailing = if body.has_vertical_overflow() && width > 0 {
        width
    } else {
        0
    };

    let patch = StylePatch::new()
        .set(padding, trailing)
        .set(margin, trailing);
    if width > 0 {
        patch
            .set(StyleProp::MarginBottom, -width)
            .set(StyleProp::PaddingBottom, width)
    } else {
        patch
            .set(StyleProp::MarginBottom, 0)
            .set(StyleProp::PaddingBottom, 0)
    }
}

/// The fixed-header decorator.
#[derive(Debug, Default)]
pub struct FixedTable {
    has_header: bool,
    fixed_header: bool,
    rtl: bool,
    resize_listener: Option<ListenerId>,
}

impl FixedTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn adjust_fixed_header_size(&self, dom: &mut dyn Dom, ctx: &TableContext) {
        if !self.fixed_header || !self.has_header || ctx.lock_active() {
            return;
        }
        let Some(header) = ctx.live_node(&*dom, NodeRole::Header, LockSide::Center) else {
            return;
        };
        let geometry = GeometrySnapshot::measure(dom, ctx);
        let Some(body) = geometry.body else {
            return;
        };

        let patch = plan_fixed_header(geometry.scrollbar, body, self.rtl);
        let applied = apply_styles(dom, patch.on(header));
        if applied > 0 {
            log::debug!("Fixed header: {applied} style writes");
        }
    }

    /// Mirror `scroll_left` between the center body and its header.
    fn sync_horizontal(&self, dom: &mut dyn Dom, ctx: &TableContext, source: ScrollSource) {
        let (mirror_role, origin) = match source.role {
            NodeRole::Body => (NodeRole::Header, source.node),
            NodeRole::Header => (NodeRole::Body, source.node),
            NodeRole::Table => return,
        };
        let Some(left) = dom.scroll_offset(origin).map(|offset| offset.left) else {
            return;
        };
        let Some(mirror) = ctx.live_node(&*dom, mirror_role, LockSide::Center) else {
            return;
        };
        if dom.scroll_offset(mirror).map(|offset| offset.left) != Some(left) {
            dom.set_scroll_left(mirror, left);
        }
    }
}

impl Decorator for FixedTable {
    fn render(&mut self, _ctx: &mut TableContext, mut props: TableProps) -> Vec<TableProps> {
        if props.lock_type == LockSide::Center {
            self.has_header = props.has_header;
            self.fixed_header = props.fixed_header;
            self.rtl = props.rtl;
        }

        if props.fixed_header {
            props.components = props.components.with_fixed_defaults();
            let fixed = props.prefixed("table-fixed");
            let empty = props.prefixed("table-wrap-empty");
            let own = props.class_name.clone().unwrap_or_default();
            props.class_name = Some(class_names([
                (fixed.as_str(), true),
                (empty.as_str(), props.data_source.is_empty()),
                (own.as_str(), true),
            ]));
        }
        // Shadow instances never scroll horizontally.
        props.scroll_handler = props.lock_type == LockSide::Center;
        vec![props]
    }

    fn did_mount(&mut self, dom: &mut dyn Dom, ctx: &mut TableContext) -> Outcome {
        if self.resize_listener.is_none() {
            self.resize_listener = Some(ctx.listeners.on(WindowEvent::Resize));
        }
        self.adjust_fixed_header_size(dom, ctx);
        Outcome::Settled
    }

    fn did_update(&mut self, dom: &mut dyn Dom, ctx: &mut TableContext) -> Outcome {
        self.adjust_fixed_header_size(dom, ctx);
        Outcome::Settled
    }

    fn will_unmount(&mut self, ctx: &mut TableContext) {
        if let Some(listener) = self.resize_listener.take() {
            ctx.listeners.off(listener);
        }
    }

    /// A resize can change whether the body overflows vertically.
    fn on_resize(&mut self, dom: &mut dyn Dom, ctx: &mut TableContext) -> Outcome {
        if let Some(listener) = self.resize_listener {
            if ctx.listeners.is_listening(listener) {
                self.adjust_fixed_header_size(dom, ctx);
            }
        }
        Outcome::Settled
    }

    fn on_scroll(&mut self, dom: &mut dyn Dom, ctx: &mut TableContext, source: ScrollSource) {
        if source.side != LockSide::Center {
            return;
        }
        self.sync_horizontal(dom, ctx, source);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
