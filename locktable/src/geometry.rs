//! Shared geometry utilities: scrollbar measurement and inline style
//! application.

use crate::dom::{Dom, NodeId, NodeMetrics, StyleProp};
use crate::registry::TableContext;
use crate::types::{LockSide, NodeRole, Px};

/// Edge length of the probe used to measure scrollbars.
const PROBE_SIZE: Px = 100;

/// Space taken by the platform scrollbars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollbarSize {
    /// Width of a vertical scrollbar.
    pub width: Px,
    /// Height of a horizontal scrollbar.
    pub height: Px,
}

/// Measure the platform scrollbar by attaching an always-scrolling probe and
/// comparing its outer and inner size.
///
/// Overlay-scrollbar environments report zero.
pub fn scrollbar(dom: &mut dyn Dom) -> ScrollbarSize {
    let probe = dom.create_scroll_probe(PROBE_SIZE);
    let size = dom
        .metrics(probe)
        .map(|m| ScrollbarSize {
            width: (m.offset_width - m.client_width).max(0),
            height: (m.offset_height - m.client_height).max(0),
        })
        .unwrap_or_default();
    dom.remove(probe);
    size
}

/// The trailing padding and margin properties for a layout direction.
pub const fn trailing_props(rtl: bool) -> (StyleProp, StyleProp) {
    if rtl {
        (StyleProp::PaddingLeft, StyleProp::MarginLeft)
    } else {
        (StyleProp::PaddingRight, StyleProp::MarginRight)
    }
}

/// One inline style assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleWrite {
    pub node: NodeId,
    pub prop: StyleProp,
    pub value: Px,
}

impl StyleWrite {
    pub const fn new(node: NodeId, prop: StyleProp, value: Px) -> Self {
        Self { node, prop, value }
    }
}

/// An ordered set of property assignments for a single node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StylePatch {
    entries: Vec<(StyleProp, Px)>,
}

impl StylePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing an earlier value for the same property.
    pub fn set(mut self, prop: StyleProp, value: Px) -> Self {
        match self.entries.iter_mut().find(|(p, _)| *p == prop) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((prop, value)),
        }
        self
    }

    pub fn get(&self, prop: StyleProp) -> Option<Px> {
        self.entries
            .iter()
            .find(|(p, _)| *p == prop)
            .map(|(_, value)| *value)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Target the patch at a node.
    pub fn on(&self, node: NodeId) -> impl Iterator<Item = StyleWrite> + '_ {
        self.entries
            .iter()
            .map(move |&(prop, value)| StyleWrite::new(node, prop, value))
    }
}

/// Apply style writes, skipping every write whose value is already in place.
/// Returns the number of writes performed.
pub fn apply_styles(dom: &mut dyn Dom, writes: impl IntoIterator<Item = StyleWrite>) -> usize {
    let mut applied = 0;
    for write in writes {
        if !dom.is_attached(write.node) {
            log::trace!("Skipping {} on detached node {}", write.prop, write.node);
            continue;
        }
        if dom.style(write.node, write.prop) == Some(write.value) {
            continue;
        }
        dom.set_style(write.node, write.prop, write.value);
        applied += 1;
    }
    applied
}

/// Add or remove a class depending on `on`.
pub fn toggle_class(dom: &mut dyn Dom, node: NodeId, class: &str, on: bool) -> bool {
    if on {
        dom.add_class(node, class)
    } else {
        dom.remove_class(node, class)
    }
}

/// Measurements taken at the start of an adjustment pass.
///
/// Recomputed every pass: content and data changes move layout between
/// renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeometrySnapshot {
    pub scrollbar: ScrollbarSize,
    /// Outer node of the center instance.
    pub container: Option<NodeMetrics>,
    /// Center body.
    pub body: Option<NodeMetrics>,
    /// Center header.
    pub header: Option<NodeMetrics>,
}

impl GeometrySnapshot {
    pub fn measure(dom: &mut dyn Dom, ctx: &TableContext) -> Self {
        let scrollbar = scrollbar(dom);
        let metrics = |role| {
            ctx.live_node(&*dom, role, LockSide::Center)
                .and_then(|node| dom.metrics(node))
        };
        Self {
            scrollbar,
            container: metrics(NodeRole::Table),
            body: metrics(NodeRole::Body),
            header: metrics(NodeRole::Header),
        }
    }
}
