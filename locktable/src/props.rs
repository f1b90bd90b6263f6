//! Table configuration and the props each decorator hands down.

use serde::Deserialize;
use serde_json::Value;

use crate::column::ColumnNode;
use crate::types::{LockSide, Px};

/// Record field carrying a row's stable identity.
pub const ROW_INDEX_FIELD: &str = "__rowIndex";

/// Default body height bound for fixed-header tables.
pub const DEFAULT_MAX_BODY_HEIGHT: Px = 200;

/// Stable identity of the record at `index`: its `__rowIndex` field when the
/// record is an object carrying one, otherwise its position.
///
/// Positional fallback does not survive reordering (sorting) of a data
/// source that lacks `__rowIndex`.
pub fn row_identity(index: usize, record: &Value) -> usize {
    record
        .get(ROW_INDEX_FIELD)
        .and_then(Value::as_u64)
        .map(|row| row as usize)
        .unwrap_or(index)
}

/// Maximum body height: a pixel count or any CSS length.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BodyHeight {
    Px(Px),
    Css(String),
}

impl Default for BodyHeight {
    fn default() -> Self {
        BodyHeight::Px(DEFAULT_MAX_BODY_HEIGHT)
    }
}

impl BodyHeight {
    /// Pixel value, when expressible without layout (`200`, `"200px"`,
    /// `"200"`).
    pub fn to_px(&self) -> Option<Px> {
        match self {
            BodyHeight::Px(px) => Some(*px),
            BodyHeight::Css(css) => {
                let css = css.trim();
                css.strip_suffix("px").unwrap_or(css).trim().parse().ok()
            }
        }
    }
}

/// Renderer used for one slot of the base table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ComponentKind {
    #[default]
    Base,
    FixedHeader,
    FixedBody,
    FixedWrapper,
    LockHeader,
    LockBody,
    LockRow,
    /// Caller-provided renderer, by name.
    Custom(String),
}

/// Overridable renderers. `None` means the base table's default.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Components {
    pub header: Option<ComponentKind>,
    pub body: Option<ComponentKind>,
    pub wrapper: Option<ComponentKind>,
    pub row: Option<ComponentKind>,
}

impl Components {
    fn or_default(slot: &mut Option<ComponentKind>, kind: ComponentKind) {
        if slot.is_none() {
            *slot = Some(kind);
        }
    }

    /// Fill empty slots with the fixed-header renderers.
    pub fn with_fixed_defaults(mut self) -> Self {
        Self::or_default(&mut self.header, ComponentKind::FixedHeader);
        Self::or_default(&mut self.body, ComponentKind::FixedBody);
        Self::or_default(&mut self.wrapper, ComponentKind::FixedWrapper);
        self
    }

    /// Fill empty slots with the lock renderers. Locked tables reuse the
    /// fixed wrapper.
    pub fn with_lock_defaults(mut self) -> Self {
        Self::or_default(&mut self.body, ComponentKind::LockBody);
        Self::or_default(&mut self.header, ComponentKind::LockHeader);
        Self::or_default(&mut self.wrapper, ComponentKind::FixedWrapper);
        Self::or_default(&mut self.row, ComponentKind::LockRow);
        self
    }
}

/// Join class names, keeping those whose flag is set.
pub fn class_names<'a>(classes: impl IntoIterator<Item = (&'a str, bool)>) -> String {
    classes
        .into_iter()
        .filter(|(name, on)| *on && !name.is_empty())
        .map(|(name, _)| name)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Props of a (decorated) table.
///
/// The caller fills the input fields; decorators rewrite `columns`,
/// `components`, `class_name` and the per-instance fields on the way down.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableProps {
    pub columns: Vec<ColumnNode>,
    pub data_source: Vec<Value>,
    pub has_header: bool,
    pub fixed_header: bool,
    pub max_body_height: BodyHeight,
    pub rtl: bool,
    /// Leaf column to scroll into view after the first mount.
    pub scroll_to_col: Option<usize>,
    /// Row to scroll into view after the first mount.
    pub scroll_to_row: Option<usize>,
    pub prefix: String,
    pub class_name: Option<String>,

    #[serde(skip)]
    pub components: Components,
    /// Which column subset this instance owns.
    #[serde(skip)]
    pub lock_type: LockSide,
    /// Shadow instances are hidden duplicates for assistive technology.
    #[serde(skip)]
    pub aria_hidden: bool,
    pub loading: bool,
    /// Whether this instance reports scroll events to the fixed-header
    /// synchronizer.
    #[serde(skip)]
    pub scroll_handler: bool,
}

impl Default for TableProps {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            data_source: Vec::new(),
            has_header: true,
            fixed_header: false,
            max_body_height: BodyHeight::default(),
            rtl: false,
            scroll_to_col: None,
            scroll_to_row: None,
            prefix: "next-".to_string(),
            class_name: None,
            components: Components::default(),
            lock_type: LockSide::Center,
            aria_hidden: false,
            loading: false,
            scroll_handler: false,
        }
    }
}

impl TableProps {
    pub fn new(columns: Vec<ColumnNode>) -> Self {
        Self {
            columns,
            ..Default::default()
        }
    }

    pub fn data_source(mut self, records: Vec<Value>) -> Self {
        self.data_source = records;
        self
    }

    pub fn has_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Pin the header and bound the body by `max_body_height`.
    pub fn fixed_header(mut self) -> Self {
        self.fixed_header = true;
        self
    }

    pub fn max_body_height(mut self, height: BodyHeight) -> Self {
        self.max_body_height = height;
        self
    }

    pub fn rtl(mut self) -> Self {
        self.rtl = true;
        self
    }

    pub fn scroll_to(mut self, col: Option<usize>, row: Option<usize>) -> Self {
        self.scroll_to_col = col;
        self.scroll_to_row = row;
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn components(mut self, components: Components) -> Self {
        self.components = components;
        self
    }

    /// `{prefix}{name}`, e.g. `next-table-lock`.
    pub fn prefixed(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }
}
