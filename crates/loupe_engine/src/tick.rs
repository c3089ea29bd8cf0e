//! One sample instant and its captured state.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use loupe_foundation::{EntityId, FieldSample, UnitId};

/// What one monitored unit looked like at a sample instant.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnitSample {
    /// The unit's registration handle.
    pub id: UnitId,
    /// Display name at sample time.
    pub name: String,
    /// True if the unit was awake (not suspended) at sample time.
    pub awake: bool,
    /// Messages drained since the previous tick, in production order.
    pub messages: Vec<String>,
}

/// What one monitored entity looked like at a sample instant.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntitySample {
    /// The entity's registration handle.
    pub id: EntityId,
    /// Display label from the entity's snapshot provider.
    pub label: String,
    /// Field values captured at this instant.
    pub fields: Vec<FieldSample>,
}

/// One tick: a consistent snapshot of every registered unit and entity at
/// a single sample instant.
///
/// The unit and entity lists are exactly the registries' contents at the
/// instant of sampling: nothing appears before it was added or after it
/// was removed. A tick is immutable once appended to the timeline.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tick {
    /// Monotonically increasing sequence number, starting at zero after
    /// each reset.
    pub seq: u64,
    /// Registered units in insertion order.
    pub units: Vec<UnitSample>,
    /// Registered entities in insertion order.
    pub entities: Vec<EntitySample>,
}

impl Tick {
    /// Creates a tick from its captured parts.
    #[must_use]
    pub const fn new(seq: u64, units: Vec<UnitSample>, entities: Vec<EntitySample>) -> Self {
        Self {
            seq,
            units,
            entities,
        }
    }

    /// Returns the sample captured for a unit, if it was registered at
    /// this instant.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&UnitSample> {
        self.units.iter().find(|sample| sample.id == id)
    }

    /// Returns the sample captured for an entity, if it was registered at
    /// this instant.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&EntitySample> {
        self.entities.iter().find(|sample| sample.id == id)
    }

    /// Returns the total number of messages carried by this tick.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.units.iter().map(|sample| sample.messages.len()).sum()
    }
}
