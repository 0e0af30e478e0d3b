//! Identifiers that cross the network.
//!
//! Component and instance indices are the only way a client can name a
//! resource instance, so they are plain fixed-width integers wrapped in
//! newtypes to keep them from being mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Network-stable identifier of a replicated entity (e.g. a resource container).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Index of an instance pool component within its container.
///
/// Assigned once at container construction and never changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComponentIndex(pub u8);

impl ComponentIndex {
    /// Returns the index as a `usize` for slice addressing.
    #[inline]
    #[must_use]
    pub const fn get(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ComponentIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component#{}", self.0)
    }
}

/// Index of a rendered instance within its pool component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceIndex(pub u32);

impl InstanceIndex {
    /// Returns the index as a `usize` for slice addressing.
    #[inline]
    #[must_use]
    pub const fn get(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for InstanceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "instance#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(EntityId(7).to_string(), "entity#7");
        assert_eq!(ComponentIndex(2).to_string(), "component#2");
        assert_eq!(InstanceIndex(40).to_string(), "instance#40");
    }

    #[test]
    fn test_index_get() {
        assert_eq!(ComponentIndex(255).get(), 255);
        assert_eq!(InstanceIndex(9).get(), 9);
    }
}
