//! Capability traits the sampling core consumes.
//!
//! The core never owns the workloads it watches. A monitored unit is an
//! independently scheduled thread that answers "are you suspended?" and
//! writes text lines into the message channel it was handed at
//! registration. A monitored entity is any stateful object reachable
//! through a [`SnapshotProvider`].

use crate::field::FieldSample;

/// An independently running execution unit whose run-state is sampled
/// once per tick.
///
/// Message output does not go through this trait: the engine hands the
/// caller a message sender at registration, and the workload writes into
/// that from its own thread.
pub trait MonitoredUnit: Send + Sync {
    /// Display name for the renderer's lifeline label.
    fn name(&self) -> &str;

    /// Whether the unit is currently suspended (sleeping or yielding).
    ///
    /// Polled once per tick from the sampling thread; must not block.
    fn is_suspended(&self) -> bool;
}

/// Produces a field-by-field snapshot of one monitored entity.
///
/// There is no reflection here: each workload is an explicit capability
/// that reports its own fields.
///
/// `capture` must be callable repeatedly, must not mutate the entity, and
/// must not block. The core does not assume the entity's fields are
/// updated atomically as a set: a snapshot of an unsynchronized entity may
/// show a torn intermediate state. That inconsistency is the thing this
/// instrument exists to make visible, so providers must report whatever
/// they read, not repair it.
pub trait SnapshotProvider: Send + Sync {
    /// Display label for the entity, shown above its field table.
    fn label(&self) -> String;

    /// Captures the current value of every reported field, in a stable
    /// order.
    fn capture(&self) -> Vec<FieldSample>;
}
