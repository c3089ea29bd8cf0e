//! Ordered, replayable record of ticks.
//!
//! Backed by a persistent vector, so cloning a timeline is O(1) and yields
//! an immutable snapshot: a renderer's copy is unaffected by ticks
//! appended or resets performed afterwards. Readers therefore see either
//! the pre-reset or the post-reset timeline, never a mixture.

use std::sync::Arc;

use crate::tick::Tick;

/// Append-only (until reset) sequence of ticks, oldest first.
///
/// Sequence numbers are strictly increasing and gap-free while running;
/// a reset clears the timeline and numbering starts over from zero.
#[derive(Clone, Debug)]
pub struct Timeline {
    /// The ticks, oldest first.
    ticks: im::Vector<Arc<Tick>>,
    /// Maximum number of ticks before appends are refused.
    capacity: usize,
}

impl Timeline {
    /// Creates an empty timeline bounded to `capacity` ticks.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            ticks: im::Vector::new(),
            capacity,
        }
    }

    /// Returns the maximum number of ticks.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of recorded ticks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    /// Returns true if no ticks are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Returns true if the timeline is at capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.ticks.len() >= self.capacity
    }

    /// Appends a tick. Returns false (and records nothing) if the
    /// timeline is full.
    pub fn push(&mut self, tick: Tick) -> bool {
        if self.is_full() {
            return false;
        }
        debug_assert!(
            self.ticks.last().is_none_or(|prev| prev.seq < tick.seq),
            "sequence numbers must be strictly increasing"
        );
        self.ticks.push_back(Arc::new(tick));
        true
    }

    /// Returns the tick at a position, oldest first.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Arc<Tick>> {
        self.ticks.get(position)
    }

    /// Returns the most recent tick.
    #[must_use]
    pub fn latest(&self) -> Option<&Arc<Tick>> {
        self.ticks.last()
    }

    /// Iterates over ticks from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Tick>> {
        self.ticks.iter()
    }

    /// Discards all ticks.
    pub fn clear(&mut self) {
        self.ticks.clear();
    }
}
