//! Cross-layer integration tests for Loupe
//!
//! Tests that run real workloads against the engine and probe the
//! concurrency contract under contention.

mod monitoring;
mod races;
