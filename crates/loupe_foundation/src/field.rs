//! Field samples captured from monitored entities.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One captured field of a monitored entity: name, type label, and the
/// value rendered as text.
///
/// Values are carried as display strings rather than typed data. The
/// renderer only ever shows them, and keeping the capture surface untyped
/// lets a [`SnapshotProvider`](crate::SnapshotProvider) report any field a
/// workload cares to expose.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldSample {
    /// Field name as declared by the workload.
    pub name: String,
    /// Type label, e.g. `"i64"` or `"f32"`.
    pub type_label: String,
    /// Current value, rendered as text at capture time.
    pub value: String,
}

impl FieldSample {
    /// Creates a new field sample.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        type_label: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_label: type_label.into(),
            value: value.into(),
        }
    }

    /// Creates a sample from any displayable value, using its Rust type
    /// name as the type label.
    #[must_use]
    pub fn of<T: fmt::Display>(name: impl Into<String>, value: &T) -> Self {
        Self::new(name, std::any::type_name::<T>(), value.to_string())
    }
}

impl fmt::Display for FieldSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} = {}", self.name, self.type_label, self.value)
    }
}
