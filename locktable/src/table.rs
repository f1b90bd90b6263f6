//! Decorator composition and lifecycle.
//!
//! A [`DecoratedTable`] stacks decorators over a [`BaseTable`]. Rendering
//! flows outermost to innermost (a decorator may fan one props value out into
//! several instances); lifecycle hooks run innermost to outermost after the
//! base table committed, the same order a component tree mounts in.

use std::any::Any;

use crate::dom::{Dom, MemoryDom, NodeId};
use crate::event::{ScrollSource, TableEvent};
use crate::props::TableProps;
use crate::registry::TableContext;
use crate::schedule::Deferred;
use crate::types::LockSide;

/// Upper bound on forced re-renders triggered from a single commit.
const MAX_RERENDERS: usize = 4;

/// Upper bound on scroll events pumped by [`DecoratedTable::settle`].
const MAX_SCROLL_EVENTS: usize = 64;

/// Result of a lifecycle hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Settled,
    /// The decorator changed render-relevant state and needs another render
    /// pass.
    Rerender,
}

impl Outcome {
    fn merge(self, other: Outcome) -> Outcome {
        if self == Outcome::Rerender || other == Outcome::Rerender {
            Outcome::Rerender
        } else {
            Outcome::Settled
        }
    }
}

/// A layer wrapping the base table.
pub trait Decorator: Any {
    /// Transform the props flowing down. Returning several props mounts
    /// several instances.
    fn render(&mut self, ctx: &mut TableContext, props: TableProps) -> Vec<TableProps>;

    fn did_mount(&mut self, _dom: &mut dyn Dom, _ctx: &mut TableContext) -> Outcome {
        Outcome::Settled
    }

    fn did_update(&mut self, _dom: &mut dyn Dom, _ctx: &mut TableContext) -> Outcome {
        Outcome::Settled
    }

    fn will_unmount(&mut self, _ctx: &mut TableContext) {}

    fn on_resize(&mut self, _dom: &mut dyn Dom, _ctx: &mut TableContext) -> Outcome {
        Outcome::Settled
    }

    fn on_scroll(&mut self, _dom: &mut dyn Dom, _ctx: &mut TableContext, _source: ScrollSource) {}

    fn on_row_hover(&mut self, _dom: &mut dyn Dom, _ctx: &mut TableContext, _row: usize, _entered: bool) {}

    fn as_any(&self) -> &dyn Any;
}

/// The base table component: mounts instances and registers their nodes.
///
/// Mounting creates nodes, which the [`Dom`] trait does not offer, so a base
/// table names the concrete tree it renders into.
pub trait BaseTable {
    type Dom: Dom;

    /// Bring the mounted instances in line with `instances`: mount new ones,
    /// update changed ones, unmount and unregister the rest.
    fn commit(&mut self, dom: &mut Self::Dom, ctx: &mut TableContext, instances: &[TableProps]);

    /// Unmount everything.
    fn unmount(&mut self, dom: &mut Self::Dom, ctx: &mut TableContext);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Mount,
    Update,
}

/// A base table with its decorator stack.
pub struct DecoratedTable<B: BaseTable> {
    /// Outermost first.
    layers: Vec<Box<dyn Decorator>>,
    base: B,
    ctx: TableContext,
    props: TableProps,
    rendered: Vec<TableProps>,
    mounted: bool,
}

impl<B: BaseTable> DecoratedTable<B> {
    pub fn new(base: B, props: TableProps) -> Self {
        Self {
            layers: Vec::new(),
            base,
            ctx: TableContext::new(),
            props,
            rendered: Vec::new(),
            mounted: false,
        }
    }

    /// Wrap the current innermost layer around `layer`. The first call adds
    /// the outermost decorator.
    pub fn with_layer(mut self, layer: impl Decorator) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    pub fn context(&self) -> &TableContext {
        &self.ctx
    }

    pub fn base(&self) -> &B {
        &self.base
    }

    pub fn props(&self) -> &TableProps {
        &self.props
    }

    /// Props of every instance the last render produced, center first.
    pub fn rendered(&self) -> &[TableProps] {
        &self.rendered
    }

    pub fn base_mut(&mut self) -> &mut B {
        &mut self.base
    }

    /// The instance props rendered for one side, if any.
    pub fn rendered_side(&self, side: LockSide) -> Option<&TableProps> {
        self.rendered.iter().find(|props| props.lock_type == side)
    }

    /// First layer of type `T`.
    pub fn layer<T: Decorator>(&self) -> Option<&T> {
        self.layers
            .iter()
            .find_map(|layer| layer.as_any().downcast_ref::<T>())
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn mount(&mut self, dom: &mut B::Dom) {
        self.commit(dom, Phase::Mount);
        self.mounted = true;
    }

    /// Replace the props and re-render.
    pub fn set_props(&mut self, dom: &mut B::Dom, props: TableProps) {
        self.props = props;
        self.update(dom);
    }

    /// Re-render with the current props.
    pub fn update(&mut self, dom: &mut B::Dom) {
        if !self.mounted {
            return self.mount(dom);
        }
        self.commit(dom, Phase::Update);
    }

    pub fn unmount(&mut self, dom: &mut B::Dom) {
        for layer in self.layers.iter_mut().rev() {
            layer.will_unmount(&mut self.ctx);
        }
        self.base.unmount(dom, &mut self.ctx);
        self.rendered.clear();
        self.mounted = false;
    }

    /// Deliver a host event.
    pub fn dispatch(&mut self, dom: &mut B::Dom, event: TableEvent) {
        if !self.mounted {
            return;
        }
        match event {
            TableEvent::Resize => self.resize(dom),
            TableEvent::Scroll { target } => self.scroll(dom, target),
            TableEvent::RowMouseEnter { row } => self.row_hover(dom, row, true),
            TableEvent::RowMouseLeave { row } => self.row_hover(dom, row, false),
        }
    }

    fn resize(&mut self, dom: &mut B::Dom) {
        let mut outcome = Outcome::Settled;
        for layer in self.layers.iter_mut().rev() {
            outcome = outcome.merge(layer.on_resize(dom, &mut self.ctx));
        }
        if outcome == Outcome::Rerender {
            self.commit(dom, Phase::Update);
        }
    }

    fn scroll(&mut self, dom: &mut B::Dom, target: NodeId) {
        let Some((role, side)) = self.ctx.role_of(target) else {
            log::trace!("Scroll on unregistered node {target}");
            return;
        };
        let source = ScrollSource {
            node: target,
            role,
            side,
        };
        for layer in self.layers.iter_mut().rev() {
            layer.on_scroll(dom, &mut self.ctx, source);
        }
    }

    fn row_hover(&mut self, dom: &mut B::Dom, row: usize, entered: bool) {
        for layer in self.layers.iter_mut().rev() {
            layer.on_row_hover(dom, &mut self.ctx, row, entered);
        }
    }

    /// Run deferred work queued during the last passes. Returns the number of
    /// tasks run.
    pub fn tick(&mut self, dom: &mut B::Dom) -> usize {
        let tasks = self.ctx.scheduler.drain();
        for task in &tasks {
            match *task {
                Deferred::RepositionAffix(side) => {
                    if let Ok(instance) = self.ctx.instance(side) {
                        instance.reposition_affix(dom);
                    }
                }
            }
        }
        tasks.len()
    }

    fn render(&mut self) -> Vec<TableProps> {
        let mut instances = vec![self.props.clone()];
        for layer in &mut self.layers {
            instances = instances
                .into_iter()
                .flat_map(|props| layer.render(&mut self.ctx, props))
                .collect();
        }
        instances
    }

    fn commit(&mut self, dom: &mut B::Dom, mut phase: Phase) {
        for _ in 0..MAX_RERENDERS {
            let instances = self.render();
            self.base.commit(dom, &mut self.ctx, &instances);
            self.rendered = instances;

            let mut outcome = Outcome::Settled;
            for layer in self.layers.iter_mut().rev() {
                let result = match phase {
                    Phase::Mount => layer.did_mount(dom, &mut self.ctx),
                    Phase::Update => layer.did_update(dom, &mut self.ctx),
                };
                outcome = outcome.merge(result);
            }
            if outcome == Outcome::Settled {
                return;
            }
            phase = Phase::Update;
        }
        log::warn!("Table did not settle after {MAX_RERENDERS} renders");
    }
}

impl<B: BaseTable<Dom = MemoryDom>> DecoratedTable<B> {
    /// Deliver every scroll event queued in a [`MemoryDom`] until none are
    /// left. Returns the number of events delivered.
    pub fn settle(&mut self, dom: &mut MemoryDom) -> usize {
        let mut delivered = 0;
        while delivered < MAX_SCROLL_EVENTS {
            let events = dom.take_scroll_events();
            if events.is_empty() {
                return delivered;
            }
            for target in events {
                self.dispatch(dom, TableEvent::Scroll { target });
                delivered += 1;
            }
        }
        log::warn!("Scroll events still pending after {MAX_SCROLL_EVENTS} deliveries");
        delivered
    }
}
