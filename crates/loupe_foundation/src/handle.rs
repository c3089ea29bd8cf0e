//! Registration handles with generational indices.
//!
//! A handle names one slot in a registry. The generation counter increments
//! when a slot is reused after removal, so a handle held across a concurrent
//! removal is detected as stale instead of silently addressing whatever
//! workload happens to occupy the slot now.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Generational identifier for one registry slot.
///
/// # Layout
/// - `index`: slot index into registry storage
/// - `generation`: generation counter for stale reference detection
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Handle {
    /// Slot index into registry storage.
    pub index: u32,
    /// Generation counter for stale reference detection.
    pub generation: u32,
}

impl Handle {
    /// Creates a new handle with the given index and generation.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Handle for a monitored unit registration.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnitId(pub Handle);

impl UnitId {
    /// Returns the underlying generational handle.
    #[must_use]
    pub const fn handle(self) -> Handle {
        self.0
    }
}

impl fmt::Debug for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnitId({}v{})", self.0.index, self.0.generation)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit {}", self.0)
    }
}

/// Handle for a monitored entity registration.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityId(pub Handle);

impl EntityId {
    /// Returns the underlying generational handle.
    #[must_use]
    pub const fn handle(self) -> Handle {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({}v{})", self.0.index, self.0.generation)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity {}", self.0)
    }
}
