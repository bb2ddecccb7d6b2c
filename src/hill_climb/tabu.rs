//! Short-term memory of forbidden operations.

use std::collections::{HashSet, VecDeque};

use crate::graph::Operation;

/// Operations that may not be applied again during the current restart.
///
/// FIFO queue plus a set for O(1) lookup; optionally bounded by a tenure.
#[derive(Debug, Clone, Default)]
pub struct TabuList {
    queue: VecDeque<Operation>,
    set: HashSet<Operation>,
    tenure: Option<usize>,
}

impl TabuList {
    pub fn new(tenure: Option<usize>) -> Self {
        Self {
            queue: VecDeque::new(),
            set: HashSet::new(),
            tenure,
        }
    }

    /// Forbids `op`, evicting the oldest entry if the tenure is exceeded.
    pub fn push(&mut self, op: Operation) {
        if !self.set.insert(op) {
            return;
        }
        self.queue.push_back(op);
        if let Some(tenure) = self.tenure {
            while self.queue.len() > tenure {
                if let Some(old) = self.queue.pop_front() {
                    self.set.remove(&old);
                }
            }
        }
    }

    /// Records the inverse of an applied operation when undoing it would
    /// be destructive: removals and flips.
    pub fn record_applied(&mut self, op: Operation) {
        if matches!(op, Operation::Remove(..) | Operation::Flip(..)) {
            self.push(op.inverse());
        }
    }

    pub fn contains(&self, op: &Operation) -> bool {
        self.set.contains(op)
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.set.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
