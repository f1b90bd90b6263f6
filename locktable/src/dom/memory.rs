use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use super::{Dom, NodeId, NodeMetrics, StyleProp};
use crate::geometry::ScrollbarSize;
use crate::types::{Px, Rect, ScrollOffset};

/// A node of [`MemoryDom`].
#[derive(Debug, Clone, Default)]
pub struct MemoryNode {
    /// Human-readable name used by [`MemoryDom::dump`].
    pub label: String,
    pub metrics: NodeMetrics,
    pub rect: Rect,
    pub scroll: ScrollOffset,
    pub styles: BTreeMap<StyleProp, Px>,
    pub classes: BTreeSet<String>,
    pub attached: bool,
}

/// In-memory node tree with a minimal layout model.
///
/// Writing `height` resizes the node; writing `max-height` caps its visible
/// height at the content height. Scroll offsets are clamped to the scrollable
/// range, and every scroll write that changes an offset queues a scroll event
/// the host drains with [`MemoryDom::take_scroll_events`].
#[derive(Debug, Default)]
pub struct MemoryDom {
    nodes: Vec<MemoryNode>,
    scrollbar: ScrollbarSize,
    writes: usize,
    scroll_events: Vec<NodeId>,
}

impl MemoryDom {
    /// A tree whose platform scrollbars take no space (overlay scrollbars).
    pub fn new() -> Self {
        Self::default()
    }

    /// A tree whose platform scrollbars are `width` wide (vertical bar) and
    /// `height` tall (horizontal bar).
    pub fn with_scrollbar(width: Px, height: Px) -> Self {
        Self {
            scrollbar: ScrollbarSize { width, height },
            ..Self::default()
        }
    }

    /// Create an attached node.
    pub fn create(&mut self, label: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len() as u64);
        self.nodes.push(MemoryNode {
            label: label.into(),
            attached: true,
            ..MemoryNode::default()
        });
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&MemoryNode> {
        self.nodes.get(id.0 as usize).filter(|node| node.attached)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut MemoryNode> {
        self.nodes.get_mut(id.0 as usize).filter(|node| node.attached)
    }

    pub fn set_metrics(&mut self, id: NodeId, metrics: NodeMetrics) {
        if let Some(node) = self.node_mut(id) {
            node.metrics = metrics;
        }
    }

    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        if let Some(node) = self.node_mut(id) {
            node.rect = rect;
        }
    }

    /// Find an attached node by label.
    pub fn find(&self, label: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.attached && node.label == label)
            .map(|index| NodeId(index as u64))
    }

    /// Number of mutations applied so far: style writes, class changes and
    /// scroll offset changes.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Scroll events fired since the last call, oldest first.
    pub fn take_scroll_events(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.scroll_events)
    }

    /// Attached nodes, in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &MemoryNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.attached)
            .map(|(index, node)| (NodeId(index as u64), node))
    }

    /// One line per attached node that carries inline styles, classes or a
    /// scroll offset.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (_, node) in self.nodes() {
            if node.styles.is_empty() && node.classes.is_empty() && node.scroll == ScrollOffset::default() {
                continue;
            }
            let _ = write!(out, "{}", node.label);
            for (prop, value) in &node.styles {
                let _ = write!(out, " {prop}:{value}px");
            }
            if !node.classes.is_empty() {
                let classes: Vec<&str> = node.classes.iter().map(String::as_str).collect();
                let _ = write!(out, " .{}", classes.join("."));
            }
            if node.scroll != ScrollOffset::default() {
                let _ = write!(out, " scroll({}, {})", node.scroll.left, node.scroll.top);
            }
            out.push('\n');
        }
        out
    }
}

impl Dom for MemoryDom {
    fn is_attached(&self, node: NodeId) -> bool {
        self.node(node).is_some()
    }

    fn metrics(&self, node: NodeId) -> Option<NodeMetrics> {
        self.node(node).map(|node| node.metrics)
    }

    fn bounding_rect(&self, node: NodeId) -> Option<Rect> {
        self.node(node).map(|node| node.rect)
    }

    fn scroll_offset(&self, node: NodeId) -> Option<ScrollOffset> {
        self.node(node).map(|node| node.scroll)
    }

    fn set_scroll_top(&mut self, id: NodeId, top: Px) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let top = top.clamp(0, node.metrics.max_scroll_top());
        if node.scroll.top == top {
            return false;
        }
        node.scroll.top = top;
        self.writes += 1;
        self.scroll_events.push(id);
        true
    }

    fn set_scroll_left(&mut self, id: NodeId, left: Px) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let left = left.clamp(0, node.metrics.max_scroll_left());
        if node.scroll.left == left {
            return false;
        }
        node.scroll.left = left;
        self.writes += 1;
        self.scroll_events.push(id);
        true
    }

    fn style(&self, node: NodeId, prop: StyleProp) -> Option<Px> {
        self.node(node).and_then(|node| node.styles.get(&prop).copied())
    }

    fn set_style(&mut self, id: NodeId, prop: StyleProp, value: Px) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        node.styles.insert(prop, value);
        match prop {
            StyleProp::Height => {
                node.metrics.offset_height = value;
                node.metrics.client_height = value;
                node.rect.height = value;
            }
            StyleProp::MaxHeight => {
                let visible = node.metrics.scroll_height.min(value).max(0);
                node.metrics.offset_height = visible;
                node.metrics.client_height = visible;
                node.rect.height = visible;
            }
            _ => {}
        }
        self.writes += 1;
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node).is_some_and(|node| node.classes.contains(class))
    }

    fn add_class(&mut self, id: NodeId, class: &str) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let added = node.classes.insert(class.to_string());
        if added {
            self.writes += 1;
        }
        added
    }

    fn remove_class(&mut self, id: NodeId, class: &str) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let removed = node.classes.remove(class);
        if removed {
            self.writes += 1;
        }
        removed
    }

    fn create_scroll_probe(&mut self, size: Px) -> NodeId {
        let ScrollbarSize { width, height } = self.scrollbar;
        let probe = self.create("scrollbar-probe");
        self.set_metrics(
            probe,
            NodeMetrics {
                offset_width: size,
                offset_height: size,
                client_width: size - width,
                client_height: size - height,
                scroll_width: size - width,
                scroll_height: size - height,
            },
        );
        probe
    }

    fn remove(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id.0 as usize) {
            node.attached = false;
        }
    }
}
