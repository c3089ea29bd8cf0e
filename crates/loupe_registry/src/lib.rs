//! Capacity-bounded registries and message drains for Loupe.
//!
//! This crate provides the two leaf structures the sampling engine is
//! built on:
//! - [`Registry`] - Insertion-ordered, capacity-bounded slot storage with
//!   generational handles
//! - [`MessageDrain`] / [`MessageSender`] - Per-unit bounded message
//!   queues with non-blocking producers

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod drain;
pub mod registry;

pub use drain::{MessageDrain, MessageSender};
pub use registry::Registry;
