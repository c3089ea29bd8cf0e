//! Loupe - Concurrency teaching instrument
//!
//! This crate re-exports all layers of the Loupe system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: loupe_workloads  — Reference workloads (busy counter, random record)
//! Layer 2: loupe_engine     — Clock, sampling, timeline recording
//! Layer 1: loupe_registry   — Capacity-bounded registries, message drains
//! Layer 0: loupe_foundation — Core types (Handle, FieldSample, Error)
//! ```

pub use loupe_engine as engine;
pub use loupe_foundation as foundation;
pub use loupe_registry as registry;
pub use loupe_workloads as workloads;
