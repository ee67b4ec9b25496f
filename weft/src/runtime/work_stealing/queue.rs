use crate::runtime::task::Runnable;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A per-worker local task queue.
///
/// `LocalQueue` stores coroutines local to a pool worker. The owning
/// worker pushes and pops from the back (LIFO), which improves cache
/// locality; other workers steal from the front (FIFO), enabling load
/// balancing across the pool.
pub(crate) struct LocalQueue {
    /// Inner deque protected by a mutex.
    inner: Mutex<VecDeque<Arc<dyn Runnable>>>,
}

impl LocalQueue {
    /// Creates an empty local task queue.
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    /// Pushes a coroutine onto the back of the local queue.
    pub(crate) fn push(&self, task: Arc<dyn Runnable>) {
        self.inner.lock().unwrap().push_back(task);
    }

    /// Pops a coroutine from the back of the local queue.
    ///
    /// Returns `None` if the queue is empty.
    pub(crate) fn pop(&self) -> Option<Arc<dyn Runnable>> {
        self.inner.lock().unwrap().pop_back()
    }

    /// Steals a coroutine from the front of the local queue.
    ///
    /// Intended to be called by other worker threads.
    /// Returns `None` if the queue is empty.
    pub(crate) fn steal(&self) -> Option<Arc<dyn Runnable>> {
        self.inner.lock().unwrap().pop_front()
    }
}
