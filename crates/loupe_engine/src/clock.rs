//! Lifecycle state machine for the sampling clock.
//!
//! The clock owns the idle/running/paused states, the elapsed tick count,
//! and the sampling speed. It is a plain state machine: the engine holds
//! it behind a mutex and runs the actual periodic firing on a background
//! thread, so every transition here is testable without timing.

use std::fmt;
use std::time::Duration;

use loupe_foundation::{Error, Result};

use crate::config::EngineConfig;

/// Lifecycle state of the sampling clock.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClockState {
    /// Not yet started, or hard-reset. The timeline is empty.
    Idle,
    /// Sampling at the configured rate.
    Running,
    /// Stopped after running. Sampling and the elapsed tick count are
    /// frozen until the next start.
    Paused,
}

impl fmt::Display for ClockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
        }
    }
}

/// The sampling clock's state machine.
///
/// Transitions: Idle -> Running on [`start`](Clock::start); Running ->
/// Paused on [`stop`](Clock::stop); Paused -> Running on `start` again;
/// any state -> Idle on [`hard_reset`](Clock::hard_reset). Redundant
/// transitions (`stop` while Idle, `start` while Running) are no-ops,
/// not errors.
#[derive(Clone, Debug)]
pub struct Clock {
    /// Current lifecycle state.
    state: ClockState,
    /// Ticks taken since the last hard reset.
    elapsed_ticks: u64,
    /// Current sampling speed.
    speed: u32,
    /// Minimum accepted speed.
    min_speed: u32,
    /// Maximum accepted speed.
    max_speed: u32,
    /// Tick period at speed 1.
    base_period: Duration,
    /// Whether the timeline starts over when it reaches capacity.
    auto_reset: bool,
}

impl Clock {
    /// Creates an idle clock from the engine configuration.
    ///
    /// The configured range is normalized here: the minimum is at least 1
    /// (speed divides the base period) and the maximum at least the
    /// minimum, so a degenerate range can never kill the clock thread. An
    /// out-of-range initial speed is brought to the nearer bound; runtime
    /// speed changes are strict (see [`set_speed`](Self::set_speed)).
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        let min_speed = config.min_speed.max(1);
        let max_speed = config.max_speed.max(min_speed);
        Self {
            state: ClockState::Idle,
            elapsed_ticks: 0,
            speed: config.initial_speed.clamp(min_speed, max_speed),
            min_speed,
            max_speed,
            base_period: config.base_period,
            auto_reset: config.auto_reset,
        }
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ClockState {
        self.state
    }

    /// Returns the number of ticks taken since the last hard reset.
    #[must_use]
    pub const fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    /// Returns the current sampling speed.
    #[must_use]
    pub const fn speed(&self) -> u32 {
        self.speed
    }

    /// Returns the auto-reset flag.
    #[must_use]
    pub const fn auto_reset(&self) -> bool {
        self.auto_reset
    }

    /// Sets the auto-reset flag.
    pub fn set_auto_reset(&mut self, enabled: bool) {
        self.auto_reset = enabled;
    }

    /// Returns the period between tick firings at the current speed.
    #[must_use]
    pub fn tick_period(&self) -> Duration {
        self.base_period / self.speed
    }

    /// Starts or resumes sampling. Returns true if the state changed.
    pub fn start(&mut self) -> bool {
        match self.state {
            ClockState::Running => false,
            ClockState::Idle | ClockState::Paused => {
                log::debug!("clock started from {}", self.state);
                self.state = ClockState::Running;
                true
            }
        }
    }

    /// Pauses sampling. Returns true if the state changed.
    ///
    /// Stopping while Idle is a no-op; an idle clock has nothing to
    /// pause.
    pub fn stop(&mut self) -> bool {
        match self.state {
            ClockState::Running => {
                log::debug!("clock paused at tick {}", self.elapsed_ticks);
                self.state = ClockState::Paused;
                true
            }
            ClockState::Idle | ClockState::Paused => false,
        }
    }

    /// Returns to Idle and clears the elapsed tick count.
    ///
    /// The engine pairs this with clearing the timeline.
    pub fn hard_reset(&mut self) {
        log::debug!("clock hard reset from {}", self.state);
        self.state = ClockState::Idle;
        self.elapsed_ticks = 0;
    }

    /// Sets the sampling speed.
    ///
    /// # Errors
    /// Returns [`Error::InvalidSpeed`] if `speed` is outside the
    /// configured range; the prior speed is retained.
    pub fn set_speed(&mut self, speed: u32) -> Result<()> {
        if speed < self.min_speed || speed > self.max_speed {
            return Err(Error::invalid_speed(speed, self.min_speed, self.max_speed));
        }
        self.speed = speed;
        Ok(())
    }

    /// Claims the next tick's sequence number and advances the elapsed
    /// count.
    pub fn next_seq(&mut self) -> u64 {
        let seq = self.elapsed_ticks;
        self.elapsed_ticks += 1;
        seq
    }

    /// Restarts tick numbering from zero while staying in the current
    /// state.
    ///
    /// Used by the auto-reset path, where the timeline starts over
    /// without the clock ever leaving Running.
    pub fn rewind(&mut self) {
        self.elapsed_ticks = 0;
    }
}
