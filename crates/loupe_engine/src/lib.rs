//! Sampling and timeline recording for Loupe.
//!
//! This crate wires the leaf structures from `loupe_registry` into the
//! observable core:
//! - [`Clock`] - The idle/running/paused lifecycle state machine
//! - [`Tick`] / [`Timeline`] - The replayable record of samples
//! - [`Engine`] - The orchestrator the control panel and renderer drive
//!
//! # Concurrency
//!
//! Three roles run in parallel: the engine's background clock thread takes
//! one consistent sample per tick; each monitored workload pushes into its
//! own message queue from its own thread; renderers poll
//! [`Engine::timeline`] at their own cadence. All shared mutation sits
//! behind short-held locks, and an appended tick is immutable.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod clock;
pub mod config;
pub mod engine;
pub mod tick;
pub mod timeline;

pub use clock::{Clock, ClockState};
pub use config::EngineConfig;
pub use engine::Engine;
pub use tick::{EntitySample, Tick, UnitSample};
pub use timeline::Timeline;
