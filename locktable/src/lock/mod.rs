//! Locked-column decorator.
//!
//! Renders the center table with every column plus one shadow table per
//! locked side, then keeps the shadows aligned with the center: header row
//! heights, body heights, row heights and vertical scroll. Whether the
//! shadows are worth rendering is decided from laid-out widths after every
//! mount and update (see [`LockMode`]).

pub mod adjust;
mod mode;
pub mod scroll;

pub use mode::{LockDecision, LockMode, WidthMeasurement};

use std::any::Any;

use crate::column::{normalize, split, ColumnPartition};
use crate::dom::{Dom, NodeId};
use crate::event::{ListenerId, ScrollSource, WindowEvent};
use crate::geometry::{apply_styles, scrollbar};
use crate::props::{class_names, row_identity, TableProps};
use crate::registry::TableContext;
use crate::schedule::Deferred;
use crate::table::{Decorator, Outcome};
use crate::types::{LockSide, NodeRole, Px};

/// The locked-column decorator.
#[derive(Debug, Default)]
pub struct LockTable {
    mode: LockMode,
    partition: ColumnPartition,
    rtl: bool,
    fixed_header: bool,
    scroll_to_col: Option<usize>,
    scroll_to_row: Option<usize>,
    /// Row identities of the current data source, in order.
    rows: Vec<usize>,
    resize_listener: Option<ListenerId>,
}

impl LockTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> LockMode {
        self.mode
    }

    /// Partition of the last render. Locked sides are empty while locking is
    /// suppressed.
    pub fn partition(&self) -> &ColumnPartition {
        &self.partition
    }

    /// Shadow tables are rendered and own at least one column.
    pub fn is_lock(&self) -> bool {
        self.mode.renders_shadows() && self.partition.has_locked()
    }

    fn measure_widths(&self, dom: &dyn Dom, ctx: &TableContext) -> WidthMeasurement {
        let width_of = |node: Option<NodeId>| {
            node.and_then(|node| dom.metrics(node))
                .map_or(0, |metrics| metrics.client_width)
        };
        let container_width = width_of(ctx.live_node(dom, NodeRole::Table, LockSide::Center));
        let columns = ctx
            .instance(LockSide::Center)
            .map_or(0, |center| center.flat_columns().len());
        let first_row = self.rows.first().copied().unwrap_or(0);

        let cells: Px = (0..columns)
            .map(|col| width_of(ctx.cell(dom, first_row, col, LockSide::Center)))
            .sum();
        let columns_width = if cells > 0 {
            cells
        } else {
            (0..columns)
                .map(|col| width_of(ctx.header_cell(dom, 0, col, LockSide::Center)))
                .sum()
        };

        WidthMeasurement {
            container_width,
            columns_width,
        }
    }

    fn adjust_size(&mut self, dom: &mut dyn Dom, ctx: &mut TableContext) -> Outcome {
        let (next, decision) = self.mode.decide(self.measure_widths(&*dom, ctx));
        if next != self.mode {
            log::debug!("Lock mode {:?} -> {:?}", self.mode, next);
        }
        self.mode = next;

        match decision {
            LockDecision::Defer => Outcome::Settled,
            LockDecision::Suppress | LockDecision::Restore => Outcome::Rerender,
            LockDecision::Proceed => {
                self.adjust_header_size(dom, ctx);
                self.adjust_body_size(dom, ctx);
                self.adjust_cell_size(dom, ctx);
                self.on_lock_body_scroll(dom, ctx);
                Outcome::Settled
            }
        }
    }

    fn adjust_header_size(&self, dom: &mut dyn Dom, ctx: &mut TableContext) {
        if !self.is_lock() {
            return;
        }
        let Some(geometry) = adjust::measure_headers(&*dom, ctx) else {
            return;
        };
        apply_styles(dom, adjust::plan_header_heights(&geometry));
        for (side, _) in &geometry.shadow_rows {
            ctx.scheduler.defer(Deferred::RepositionAffix(*side));
        }
    }

    fn adjust_body_size(&self, dom: &mut dyn Dom, ctx: &TableContext) {
        if self.is_lock() {
            if let Some(geometry) = adjust::measure_body(dom, ctx) {
                apply_styles(dom, adjust::plan_body(&geometry, self.rtl));
            }
            return;
        }
        // A fixed header is sized by the fixed-header decorator once the
        // shadow tables are gone.
        if self.fixed_header {
            return;
        }
        if let Some(header) = ctx.live_node(&*dom, NodeRole::Header, LockSide::Center) {
            let scrollbar = scrollbar(dom);
            apply_styles(dom, adjust::plan_unlocked_header(header, scrollbar, self.rtl));
        }
    }

    fn adjust_cell_size(&self, dom: &mut dyn Dom, ctx: &TableContext) {
        if !self.is_lock() {
            return;
        }
        let pairs = adjust::measure_cells(&*dom, ctx, &self.rows);
        let applied = apply_styles(dom, adjust::plan_cells(&pairs));
        if applied > 0 {
            log::debug!("Synced {applied} locked cell heights");
        }
    }

    fn on_lock_body_scroll(&self, dom: &mut dyn Dom, ctx: &TableContext) {
        if self.is_lock() {
            scroll::on_lock_body_scroll(dom, ctx, self.rtl);
        }
    }
}

impl Decorator for LockTable {
    fn render(&mut self, ctx: &mut TableContext, props: TableProps) -> Vec<TableProps> {
        if props.lock_type.is_shadow() {
            return vec![props];
        }

        let normalized = normalize(&props.columns);
        self.mode = self.mode.rendered(normalized.origin_lock);
        self.rtl = props.rtl;
        self.fixed_header = props.fixed_header;
        self.scroll_to_col = props.scroll_to_col;
        self.scroll_to_row = props.scroll_to_row;
        self.rows = props
            .data_source
            .iter()
            .enumerate()
            .map(|(index, record)| row_identity(index, record))
            .collect();

        let partition = split(&normalized.columns);
        self.partition = if self.mode.renders_shadows() {
            partition
        } else {
            partition.unlocked()
        };
        ctx.set_lock_active(self.is_lock());

        if !self.mode.is_origin_lock() {
            return vec![props];
        }

        let components = props.components.clone().with_lock_defaults();
        let shadows: Vec<TableProps> = LockSide::SHADOWS
            .into_iter()
            .filter(|&side| !self.partition.side(side).is_empty())
            .map(|side| TableProps {
                columns: self.partition.side(side).to_vec(),
                class_name: Some(props.prefixed(&format!("table-lock-{}", side.lock_type()))),
                components: components.clone(),
                lock_type: side,
                aria_hidden: true,
                loading: false,
                scroll_handler: false,
                ..props.clone()
            })
            .collect();

        let lock = props.prefixed("table-lock");
        let empty = props.prefixed("table-wrap-empty");
        let own = props.class_name.clone().unwrap_or_default();
        let class_name = class_names([
            (lock.as_str(), true),
            (empty.as_str(), props.data_source.is_empty()),
            (own.as_str(), true),
        ]);
        let center = TableProps {
            columns: self.partition.merged(),
            class_name: Some(class_name),
            components,
            ..props
        };

        let mut instances = Vec::with_capacity(1 + shadows.len());
        instances.push(center);
        instances.extend(shadows);
        instances
    }

    fn did_mount(&mut self, dom: &mut dyn Dom, ctx: &mut TableContext) -> Outcome {
        if self.resize_listener.is_none() {
            self.resize_listener = Some(ctx.listeners.on(WindowEvent::Resize));
        }
        let outcome = self.adjust_size(dom, ctx);
        let first_row = self.rows.first().copied().unwrap_or(0);
        scroll::scroll_to(dom, ctx, first_row, self.scroll_to_col, self.scroll_to_row);
        outcome
    }

    fn did_update(&mut self, dom: &mut dyn Dom, ctx: &mut TableContext) -> Outcome {
        self.adjust_size(dom, ctx)
    }

    fn will_unmount(&mut self, ctx: &mut TableContext) {
        if let Some(listener) = self.resize_listener.take() {
            ctx.listeners.off(listener);
        }
    }

    fn on_resize(&mut self, dom: &mut dyn Dom, ctx: &mut TableContext) -> Outcome {
        match self.resize_listener {
            Some(listener) if ctx.listeners.is_listening(listener) => self.adjust_size(dom, ctx),
            _ => Outcome::Settled,
        }
    }

    fn on_scroll(&mut self, dom: &mut dyn Dom, ctx: &mut TableContext, source: ScrollSource) {
        if !self.is_lock() || source.role != NodeRole::Body {
            return;
        }
        match source.side {
            LockSide::Center => scroll::on_lock_body_scroll(dom, ctx, self.rtl),
            side => scroll::on_lock_body_lr_scroll(dom, ctx, side),
        }
    }

    fn on_row_hover(&mut self, dom: &mut dyn Dom, ctx: &mut TableContext, row: usize, entered: bool) {
        if self.is_lock() {
            scroll::mirror_hover(dom, ctx, row, entered);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
