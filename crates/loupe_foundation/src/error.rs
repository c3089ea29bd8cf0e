//! Error types for the Loupe system.
//!
//! Uses `thiserror` for ergonomic error definition. Every error here is
//! recoverable and local to the operation that raised it: a failed call
//! never corrupts a registry, a message queue, or the timeline, and the
//! engine stays usable afterwards. There is no fatal error class; failures
//! inside the monitored workloads themselves are outside the core's
//! contract.

use thiserror::Error;

use crate::handle::Handle;

/// Convenience result type for Loupe operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for Loupe operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Add was attempted on a registry already at its configured maximum.
    /// The caller must remove something first.
    #[error("capacity exceeded: registry is full at {capacity}")]
    CapacityExceeded {
        /// The configured maximum.
        capacity: usize,
    },

    /// An ordered-view position outside `0..count` was referenced.
    #[error("index out of range: position {position} (count {count})")]
    IndexOutOfRange {
        /// The position that was referenced.
        position: usize,
        /// The number of live registrations.
        count: usize,
    },

    /// A handle whose slot was removed (and possibly reused) was
    /// referenced.
    #[error("stale handle: {0}")]
    StaleHandle(Handle),

    /// A sampling speed outside the configured range was requested.
    /// The previously configured speed is retained.
    #[error("invalid speed: {speed} not in {min}..={max}")]
    InvalidSpeed {
        /// The rejected speed value.
        speed: u32,
        /// Minimum accepted speed.
        min: u32,
        /// Maximum accepted speed.
        max: u32,
    },
}

impl Error {
    /// Creates a capacity exceeded error.
    #[must_use]
    pub const fn capacity_exceeded(capacity: usize) -> Self {
        Self::CapacityExceeded { capacity }
    }

    /// Creates an index out of range error.
    #[must_use]
    pub const fn index_out_of_range(position: usize, count: usize) -> Self {
        Self::IndexOutOfRange { position, count }
    }

    /// Creates a stale handle error.
    #[must_use]
    pub const fn stale_handle(handle: Handle) -> Self {
        Self::StaleHandle(handle)
    }

    /// Creates an invalid speed error.
    #[must_use]
    pub const fn invalid_speed(speed: u32, min: u32, max: u32) -> Self {
        Self::InvalidSpeed { speed, min, max }
    }
}
