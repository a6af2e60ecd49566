//! FIFO message queue for inter-thread handoff.
//!
//! Producers move items into the queue; the consumer moves them back out in
//! arrival order and is responsible for releasing them (dropping, for owned
//! types). The backing store grows without bound, so `put` never blocks and
//! producers receive no backpressure signal.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use crate::timeout::Timeout;

struct Shared<T> {
    items: Mutex<VecDeque<T>>,
    ready: Condvar,
}

/// Unbounded multi-producer/single-consumer FIFO.
///
/// Cloned handles share the same queue. Enqueue and dequeue are serialized
/// by one internal lock, so the order observed by `get` is exactly the
/// completion order of the `put` calls (global FIFO, not merely
/// per-producer FIFO).
pub struct MessageQueue<T> {
    shared: Arc<Shared<T>>,
}

impl<T> MessageQueue<T> {
    /// Creates a new, empty queue.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                items: Mutex::new(VecDeque::new()),
                ready: Condvar::new(),
            }),
        }
    }

    /// Moves `item` into the queue tail and wakes the consumer.
    ///
    /// Never blocks. The only failure mode is allocation exhaustion while
    /// growing the backing store, which aborts the process.
    pub fn put(&self, item: T) {
        let mut items = self.shared.items.lock();
        items.push_back(item);
        self.shared.ready.notify_one();
    }

    /// Blocks until an item is available or `timeout` elapses, then removes
    /// and returns the head item. Returns `None` on timeout.
    ///
    /// With `Timeout::Forever` this always eventually returns once any
    /// producer calls [`put`](Self::put).
    pub fn get(&self, timeout: Timeout) -> Option<T> {
        let deadline = timeout.deadline();
        let mut items = self.shared.items.lock();
        loop {
            if let Some(item) = items.pop_front() {
                return Some(item);
            }
            match deadline {
                None => self.shared.ready.wait(&mut items),
                Some(at) => {
                    if self.shared.ready.wait_until(&mut items, at).timed_out() {
                        return items.pop_front();
                    }
                }
            }
        }
    }

    /// Removes and returns the head item without blocking.
    pub fn try_get(&self) -> Option<T> {
        self.shared.items.lock().pop_front()
    }

    /// Number of items currently queued.
    pub fn len(&self) -> usize {
        self.shared.items.lock().len()
    }

    /// Returns true if no items are queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for MessageQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for MessageQueue<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}
