use std::collections::VecDeque;

use parking_lot::Mutex;

/// Outbound messages submitted while no connection was open.
///
/// FIFO and unbounded. The buffer is only allocated on the first queued
/// message, and [`take_all`](PendingQueue::take_all) swaps it out in one step
/// so a failure while flushing can never replay the same messages.
#[derive(Debug, Default)]
pub struct PendingQueue {
    messages: Mutex<Option<VecDeque<String>>>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &self,
        message: String,
    ) {
        self.messages.lock().get_or_insert_with(VecDeque::new).push_back(message);
    }

    /// Takes ownership of every queued message, leaving the queue empty.
    pub fn take_all(&self) -> VecDeque<String> {
        self.messages.lock().take().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().as_ref().map_or(0, VecDeque::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
