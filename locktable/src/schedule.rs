use std::collections::VecDeque;

use crate::types::LockSide;

/// Work deferred until after the current paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Re-align the floating header overlay of an instance. Queued after
    /// header heights change, once the new heights have taken effect.
    RepositionAffix(LockSide),
}

/// FIFO of deferred tasks, drained by the host once per tick.
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: VecDeque<Deferred>,
}

impl Scheduler {
    /// Queue a task unless an identical one is already pending.
    pub fn defer(&mut self, task: Deferred) {
        if !self.queue.contains(&task) {
            self.queue.push_back(task);
        }
    }

    pub fn drain(&mut self) -> Vec<Deferred> {
        self.queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
