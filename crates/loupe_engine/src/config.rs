//! Engine configuration.

use std::time::Duration;

/// Configuration for a sampling engine.
///
/// Capacities are fixed for the lifetime of the engine; the sampling
/// speed and auto-reset flag remain adjustable at runtime through the
/// engine itself.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Maximum number of simultaneously monitored units.
    pub max_units: usize,

    /// Maximum number of simultaneously monitored entities.
    pub max_entities: usize,

    /// Per-unit message buffer size. Once full, the oldest buffered line
    /// is dropped to admit a new one.
    pub message_capacity: usize,

    /// Maximum timeline length before the clock stops appending (or, with
    /// auto-reset, starts over from sequence zero).
    pub timeline_capacity: usize,

    /// Minimum accepted sampling speed.
    pub min_speed: u32,

    /// Maximum accepted sampling speed.
    pub max_speed: u32,

    /// Sampling speed at startup.
    pub initial_speed: u32,

    /// Tick period at speed 1. The effective period is
    /// `base_period / speed`.
    pub base_period: Duration,

    /// Whether the timeline starts over automatically when it reaches
    /// capacity.
    pub auto_reset: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_units: 10,
            max_entities: 10,
            message_capacity: 256,
            timeline_capacity: 200,
            min_speed: 1,
            max_speed: 10,
            initial_speed: 1,
            base_period: Duration::from_secs(1),
            auto_reset: true,
        }
    }
}

impl EngineConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the unit capacity.
    #[must_use]
    pub const fn with_max_units(mut self, max: usize) -> Self {
        self.max_units = max;
        self
    }

    /// Builder method to set the entity capacity.
    #[must_use]
    pub const fn with_max_entities(mut self, max: usize) -> Self {
        self.max_entities = max;
        self
    }

    /// Builder method to set the per-unit message buffer size.
    #[must_use]
    pub const fn with_message_capacity(mut self, capacity: usize) -> Self {
        self.message_capacity = capacity;
        self
    }

    /// Builder method to set the maximum timeline length.
    #[must_use]
    pub const fn with_timeline_capacity(mut self, capacity: usize) -> Self {
        self.timeline_capacity = capacity;
        self
    }

    /// Builder method to set the accepted speed range.
    ///
    /// The clock normalizes a degenerate range: a minimum of zero becomes
    /// one, and a maximum below the minimum is raised to it.
    #[must_use]
    pub const fn with_speed_range(mut self, min: u32, max: u32) -> Self {
        self.min_speed = min;
        self.max_speed = max;
        self
    }

    /// Builder method to set the startup speed.
    #[must_use]
    pub const fn with_initial_speed(mut self, speed: u32) -> Self {
        self.initial_speed = speed;
        self
    }

    /// Builder method to set the tick period at speed 1.
    #[must_use]
    pub const fn with_base_period(mut self, period: Duration) -> Self {
        self.base_period = period;
        self
    }

    /// Builder method to set the auto-reset flag.
    #[must_use]
    pub const fn with_auto_reset(mut self, enabled: bool) -> Self {
        self.auto_reset = enabled;
        self
    }
}
