use std::fmt;

/// Pixel length. Negative values are valid for margins.
pub type Px = i32;

/// Which of the (up to) three table instances a node or column belongs to.
///
/// `Center` is the primary, horizontally scrollable table. `Left` and
/// `Right` are the shadow tables that render the locked column subsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum LockSide {
    #[default]
    Center,
    Left,
    Right,
}

impl LockSide {
    /// The shadow sides, in render order.
    pub const SHADOWS: [LockSide; 2] = [LockSide::Left, LockSide::Right];

    /// All sides, center first.
    pub const ALL: [LockSide; 3] = [LockSide::Center, LockSide::Left, LockSide::Right];

    /// The `lockType` tag handed to a sub-instance (`""`, `"left"`, `"right"`).
    pub const fn lock_type(self) -> &'static str {
        match self {
            LockSide::Center => "",
            LockSide::Left => "left",
            LockSide::Right => "right",
        }
    }

    pub const fn is_shadow(self) -> bool {
        !matches!(self, LockSide::Center)
    }

    /// Physical side under the given layout direction. Right-to-left layout
    /// mirrors left and right.
    pub const fn physical(self, rtl: bool) -> Self {
        match (self, rtl) {
            (LockSide::Left, true) => LockSide::Right,
            (LockSide::Right, true) => LockSide::Left,
            (side, _) => side,
        }
    }
}

impl fmt::Display for LockSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockSide::Center => f.write_str("center"),
            side => f.write_str(side.lock_type()),
        }
    }
}

/// Logical role of a node registered by a table instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeRole {
    /// Outermost node of an instance. For the center instance this is the
    /// container whose width decides lock mode; for shadow instances it is the
    /// wrapper that carries the `shadow` class.
    Table,
    Header,
    Body,
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeRole::Table => "table",
            NodeRole::Header => "header",
            NodeRole::Body => "body",
        };
        f.write_str(name)
    }
}

/// Scroll position of a scrollable node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollOffset {
    pub left: Px,
    pub top: Px,
}

impl ScrollOffset {
    pub const fn new(left: Px, top: Px) -> Self {
        Self { left, top }
    }
}

/// Bounding box of a node in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: Px,
    pub y: Px,
    pub width: Px,
    pub height: Px,
}

impl Rect {
    pub const fn new(x: Px, y: Px, width: Px, height: Px) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn left(&self) -> Px {
        self.x
    }

    pub const fn right(&self) -> Px {
        self.x + self.width
    }

    pub const fn top(&self) -> Px {
        self.y
    }

    pub const fn bottom(&self) -> Px {
        self.y + self.height
    }
}
