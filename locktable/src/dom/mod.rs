//! Host node-tree abstraction.
//!
//! The synchronization engine never owns the rendered tree. It reads
//! measurements and writes inline styles, classes and scroll offsets through
//! the [`Dom`] trait, so any retained node tree can host it.

mod memory;

pub use memory::{MemoryDom, MemoryNode};

use std::fmt;

use crate::types::{Px, Rect, ScrollOffset};

/// Opaque handle to a node in the host tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Laid-out box dimensions of a node.
///
/// `offset_*` include borders and scrollbars, `client_*` exclude them,
/// `scroll_*` are the full content extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeMetrics {
    pub offset_width: Px,
    pub offset_height: Px,
    pub client_width: Px,
    pub client_height: Px,
    pub scroll_width: Px,
    pub scroll_height: Px,
}

impl NodeMetrics {
    /// Metrics of a box whose content fits exactly.
    pub const fn sized(width: Px, height: Px) -> Self {
        Self {
            offset_width: width,
            offset_height: height,
            client_width: width,
            client_height: height,
            scroll_width: width,
            scroll_height: height,
        }
    }

    pub const fn has_vertical_overflow(&self) -> bool {
        self.scroll_height > self.client_height
    }

    pub const fn has_horizontal_overflow(&self) -> bool {
        self.scroll_width > self.client_width
    }

    /// Largest reachable `scroll_left`.
    pub fn max_scroll_left(&self) -> Px {
        (self.scroll_width - self.client_width).max(0)
    }

    /// Largest reachable `scroll_top`.
    pub fn max_scroll_top(&self) -> Px {
        (self.scroll_height - self.client_height).max(0)
    }
}

/// Inline style properties the engine writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleProp {
    Height,
    MaxHeight,
    PaddingLeft,
    PaddingRight,
    PaddingBottom,
    MarginLeft,
    MarginRight,
    MarginBottom,
    Left,
    Right,
}

impl StyleProp {
    pub const fn css_name(self) -> &'static str {
        match self {
            StyleProp::Height => "height",
            StyleProp::MaxHeight => "max-height",
            StyleProp::PaddingLeft => "padding-left",
            StyleProp::PaddingRight => "padding-right",
            StyleProp::PaddingBottom => "padding-bottom",
            StyleProp::MarginLeft => "margin-left",
            StyleProp::MarginRight => "margin-right",
            StyleProp::MarginBottom => "margin-bottom",
            StyleProp::Left => "left",
            StyleProp::Right => "right",
        }
    }
}

impl fmt::Display for StyleProp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

/// Access to the rendered node tree.
///
/// Every read returns `None` for unknown or detached nodes. Scroll setters
/// return whether the offset actually changed; hosts only fire a scroll event
/// for a write that changed something.
pub trait Dom {
    fn is_attached(&self, node: NodeId) -> bool;

    fn metrics(&self, node: NodeId) -> Option<NodeMetrics>;

    fn bounding_rect(&self, node: NodeId) -> Option<Rect>;

    fn scroll_offset(&self, node: NodeId) -> Option<ScrollOffset>;

    fn set_scroll_top(&mut self, node: NodeId, top: Px) -> bool;

    fn set_scroll_left(&mut self, node: NodeId, left: Px) -> bool;

    /// Current inline value of a style property.
    fn style(&self, node: NodeId, prop: StyleProp) -> Option<Px>;

    fn set_style(&mut self, node: NodeId, prop: StyleProp, value: Px);

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Returns true if the class was not present before.
    fn add_class(&mut self, node: NodeId, class: &str) -> bool;

    /// Returns true if the class was present before.
    fn remove_class(&mut self, node: NodeId, class: &str) -> bool;

    /// Attach an off-screen, always-scrolling box of `size` x `size` pixels
    /// used to measure the platform scrollbar.
    fn create_scroll_probe(&mut self, size: Px) -> NodeId;

    fn remove(&mut self, node: NodeId);
}
