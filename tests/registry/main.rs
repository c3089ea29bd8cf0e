//! Integration tests for Layer 1: Registry
//!
//! Tests for capacity-bounded registries and message drains through the
//! public API.

mod drains;
