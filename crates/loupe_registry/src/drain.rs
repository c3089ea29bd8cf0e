//! Per-unit bounded message queues.
//!
//! Each channel is an explicitly bounded queue rather than a pipe with an
//! assumed always-present reader: a producer never blocks, and when the
//! bound is reached the oldest buffered line is dropped to admit the new
//! one. Message production is unbounded; timeline memory is not.
//!
//! The consuming side ([`MessageDrain`]) lives inside the engine's unit
//! registration. The producing side ([`MessageSender`]) is handed to the
//! workload and holds only a weak reference, so once the unit is removed
//! the queue is gone and further pushes are silently discarded.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// Queue state shared between drain and senders.
#[derive(Debug)]
struct Shared {
    /// Pending lines, oldest first.
    queue: Mutex<VecDeque<String>>,
    /// Maximum number of buffered lines.
    capacity: usize,
    /// Lines dropped under the overflow policy since creation.
    dropped: AtomicU64,
}

/// Consuming side of one unit's message channel.
///
/// Drained once per tick by the sampling thread. Everything accumulated
/// since the previous drain becomes the unit's message contribution to the
/// new tick.
#[derive(Debug)]
pub struct MessageDrain {
    shared: Arc<Shared>,
}

impl MessageDrain {
    /// Creates a drain buffering at most `capacity` lines.
    ///
    /// A capacity of zero is treated as one: the queue always admits the
    /// newest line.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                queue: Mutex::new(VecDeque::new()),
                capacity: capacity.max(1),
                dropped: AtomicU64::new(0),
            }),
        }
    }

    /// Returns a new producer handle for this queue.
    #[must_use]
    pub fn sender(&self) -> MessageSender {
        MessageSender {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Atomically empties the queue, returning all pending lines in
    /// production order.
    #[must_use]
    pub fn drain(&self) -> Vec<String> {
        let mut queue = self.shared.queue.lock();
        std::mem::take(&mut *queue).into()
    }

    /// Returns the number of pending lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.queue.lock().len()
    }

    /// Returns true if no lines are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.queue.lock().is_empty()
    }

    /// Returns the configured buffer capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Returns how many lines have been dropped under the overflow policy
    /// since creation.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }
}

/// Producing side of one unit's message channel.
///
/// Cheap to clone; safe to call from the workload's own thread. A push
/// never blocks beyond the queue's own short-held lock.
#[derive(Clone, Debug)]
pub struct MessageSender {
    shared: Weak<Shared>,
}

impl MessageSender {
    /// Enqueues a line, dropping the oldest buffered line if the queue is
    /// at capacity.
    ///
    /// After the unit has been removed from the engine this is a no-op:
    /// the line is discarded.
    pub fn push(&self, line: impl Into<String>) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };

        let mut queue = shared.queue.lock();
        if queue.len() >= shared.capacity {
            queue.pop_front();
            shared.dropped.fetch_add(1, Ordering::Relaxed);
        }
        queue.push_back(line.into());
    }

    /// Returns true while the unit's queue still exists.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.shared.strong_count() > 0
    }
}
