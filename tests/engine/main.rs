//! Integration tests for Layer 2: Engine
//!
//! Tests for the clock lifecycle and tick sampling through the public API.
//! Timing-sensitive tests use short tick periods and generous deadlines so
//! they stay stable on loaded machines.
