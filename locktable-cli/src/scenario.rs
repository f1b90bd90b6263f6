//! Scenario files: a table configuration plus the viewport it is laid out in.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use locktable::{DecoratedTable, FixedTable, HeadlessTable, LockTable, MemoryDom, Px, TableProps};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scenario: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decorator layers, outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Lock,
    Fixed,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Scrollbar {
    #[serde(default)]
    pub width: Px,
    #[serde(default)]
    pub height: Px,
}

/// Layout inputs of the headless renderer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Viewport {
    pub container_width: Px,
    pub row_height: Px,
    pub header_row_height: Px,
    pub column_width: Px,
    pub scrollbar: Scrollbar,
    /// Center row heights by row identity.
    pub row_heights: HashMap<usize, Px>,
    /// Center header row heights by row index.
    pub header_heights: HashMap<usize, Px>,
    pub affix: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            container_width: locktable::base::DEFAULT_CONTAINER_WIDTH,
            row_height: locktable::base::DEFAULT_ROW_HEIGHT,
            header_row_height: locktable::base::DEFAULT_HEADER_ROW_HEIGHT,
            column_width: locktable::base::DEFAULT_COLUMN_WIDTH,
            scrollbar: Scrollbar::default(),
            row_heights: HashMap::new(),
            header_heights: HashMap::new(),
            affix: false,
        }
    }
}

fn default_layers() -> Vec<Layer> {
    vec![Layer::Lock, Layer::Fixed]
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub table: TableProps,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default = "default_layers")]
    pub layers: Vec<Layer>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn dom(&self) -> MemoryDom {
        MemoryDom::with_scrollbar(self.viewport.scrollbar.width, self.viewport.scrollbar.height)
    }

    pub fn build(&self) -> DecoratedTable<HeadlessTable> {
        let viewport = &self.viewport;
        let mut base = HeadlessTable::new()
            .container_width(viewport.container_width)
            .row_height(viewport.row_height)
            .header_row_height(viewport.header_row_height)
            .column_width(viewport.column_width);
        for (&row, &height) in &viewport.row_heights {
            base = base.center_row_height(row, height);
        }
        for (&row, &height) in &viewport.header_heights {
            base = base.center_header_height(row, height);
        }
        if viewport.affix {
            base = base.with_affix();
        }

        self.layers
            .iter()
            .fold(DecoratedTable::new(base, self.table.clone()), |table, layer| match layer {
                Layer::Lock => table.with_layer(LockTable::new()),
                Layer::Fixed => table.with_layer(FixedTable::new()),
            })
    }
}
