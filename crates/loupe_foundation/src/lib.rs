//! Core types and capability traits for Loupe.
//!
//! This crate provides:
//! - [`Handle`] - Generational slot identifiers
//! - [`UnitId`] / [`EntityId`] - Typed handles for the two registries
//! - [`FieldSample`] - One captured field of a monitored entity
//! - [`MonitoredUnit`] / [`SnapshotProvider`] - The capability surfaces
//!   monitored workloads expose to the sampling core
//! - [`Error`] - Error types shared across the workspace

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod capability;
pub mod error;
pub mod field;
pub mod handle;

pub use capability::{MonitoredUnit, SnapshotProvider};
pub use error::{Error, Result};
pub use field::FieldSample;
pub use handle::{EntityId, Handle, UnitId};
