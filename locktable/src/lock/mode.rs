//! Lock mode state machine.
//!
//! ```text
//! NotLocked                       no column asks to be locked
//! Requested --fits--> Suppressed  all columns fit: drop the shadow tables
//! Requested --overflow--> Active
//! Active --fits--> Suppressed
//! Suppressed --overflow--> Active (re-render with shadow tables)
//! ```
//!
//! The decision needs laid-out widths, so it only runs after mount/update.

use crate::types::Px;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockMode {
    #[default]
    NotLocked,
    /// Columns ask to be locked; no layout has been measured yet.
    Requested,
    /// Locked layout is rendered and needed.
    Active,
    /// Locking was requested but every column fits, so a single unified
    /// table is rendered.
    Suppressed,
}

/// Widths measured after layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WidthMeasurement {
    /// Client width of the table container.
    pub container_width: Px,
    /// Sum of the rendered column widths.
    pub columns_width: Px,
}

impl WidthMeasurement {
    /// Every column fits without horizontal scrolling.
    pub fn fits(&self) -> bool {
        self.columns_width > 0 && self.columns_width <= self.container_width
    }
}

/// What the decorator has to do after a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockDecision {
    /// Nothing laid out yet; decide on a later pass and adjust nothing now.
    Defer,
    /// Run the adjustment passes.
    Proceed,
    /// Re-render without the shadow tables.
    Suppress,
    /// Re-render with the shadow tables.
    Restore,
}

impl LockMode {
    /// State at render time. Losing every lock request resets the machine;
    /// otherwise a measured state carries over between renders.
    pub fn rendered(self, origin_lock: bool) -> Self {
        match (origin_lock, self) {
            (false, _) => LockMode::NotLocked,
            (true, LockMode::NotLocked) => LockMode::Requested,
            (true, mode) => mode,
        }
    }

    /// Whether shadow tables are part of the render.
    pub fn renders_shadows(self) -> bool {
        matches!(self, LockMode::Requested | LockMode::Active)
    }

    pub fn is_origin_lock(self) -> bool {
        !matches!(self, LockMode::NotLocked)
    }

    /// Decide from measured widths. Returns the next state and what to do.
    pub fn decide(self, measured: WidthMeasurement) -> (LockMode, LockDecision) {
        if self == LockMode::NotLocked {
            return (self, LockDecision::Proceed);
        }
        if measured.container_width == 0 {
            return (self, LockDecision::Defer);
        }
        match (self, measured.fits()) {
            (LockMode::Suppressed, true) => (LockMode::Suppressed, LockDecision::Proceed),
            (LockMode::Suppressed, false) => (LockMode::Active, LockDecision::Restore),
            (_, true) => (LockMode::Suppressed, LockDecision::Suppress),
            (_, false) => (LockMode::Active, LockDecision::Proceed),
        }
    }
}
