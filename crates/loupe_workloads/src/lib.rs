//! Reference workloads for the Loupe engine.
//!
//! These are the stock subjects an instructor points the instrument at:
//! [`BusyCounter`] alternates between a hot counting loop and a sleep so
//! the run-state column visibly flips, and [`RandSource`] mutates a small
//! field record from a background thread so field snapshots show fresh
//! (and occasionally mixed) values every tick.
//!
//! Both manage their own worker thread: construct, register with the
//! engine, then `launch`. The engine never starts or stops a workload;
//! removing one from the engine only stops it being sampled.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod busy;
pub mod randgen;

pub use busy::BusyCounter;
pub use randgen::RandSource;
