// manager/queue.rs
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;

/// Counts running work items and parks the ones that have to wait.
///
/// Slots are handed over in FIFO order: when a running item finishes, the
/// oldest waiter inherits its slot.
pub struct Queue {
    max_concurrent: usize,
    running: usize,
    waiting: VecDeque<Arc<Notify>>,
}

impl Queue {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
            running: 0,
            waiting: VecDeque::new(),
        }
    }

    /// Called before an item starts.
    /// Returns `None` if a slot was free, otherwise a handle to wait on.
    pub fn try_acquire_slot(&mut self) -> Option<Arc<Notify>> {
        if self.running < self.max_concurrent {
            self.running += 1;
            None
        } else {
            let notify = Arc::new(Notify::new());
            self.waiting.push_back(notify.clone());
            Some(notify)
        }
    }

    /// Called when an item completes, successfully or not.
    pub fn release_slot(&mut self) {
        self.running = self.running.saturating_sub(1);

        if let Some(waiting_task) = self.waiting.pop_front() {
            self.running += 1;
            // notify_one stores a permit, so a waiter that has not started
            // awaiting yet still wakes up.
            waiting_task.notify_one();
        }
    }

    pub fn running(&self) -> usize {
        self.running
    }

    pub fn waiting(&self) -> usize {
        self.waiting.len()
    }
}
