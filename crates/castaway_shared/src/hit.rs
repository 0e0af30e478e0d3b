//! Hit results produced by targeting.
//!
//! A hit names the struck component by handle rather than by pointer so the
//! same value is meaningful on the server and on every client.

use crate::ids::{ComponentIndex, EntityId, InstanceIndex};
use crate::math::Vec3;
use serde::{Deserialize, Serialize};

/// What kind of component a handle refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    /// The owner's root scene component.
    Root,
    /// A plain collision primitive.
    Collision,
    /// An instance pool component of a resource container.
    ResourceInstances {
        /// Fixed index of the pool within its container.
        index: ComponentIndex,
    },
}

impl ComponentKind {
    /// Wire code of this kind.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Root => 0,
            Self::Collision => 1,
            Self::ResourceInstances { .. } => 2,
        }
    }

    /// Rebuilds a kind from its wire code and component index byte.
    #[must_use]
    pub const fn from_code(code: u8, index: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Root),
            1 => Some(Self::Collision),
            2 => Some(Self::ResourceInstances {
                index: ComponentIndex(index),
            }),
            _ => None,
        }
    }
}

/// Network-stable reference to a component of a replicated entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentHandle {
    /// Entity owning the component.
    pub owner: EntityId,
    /// Component kind (and index, for pool components).
    pub kind: ComponentKind,
}

impl ComponentHandle {
    /// Handle to the pool component `index` of `owner`.
    #[must_use]
    pub const fn resource_instances(owner: EntityId, index: ComponentIndex) -> Self {
        Self {
            owner,
            kind: ComponentKind::ResourceInstances { index },
        }
    }
}

/// Result of a targeting trace against the world.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HitResult {
    /// Struck component, if the trace resolved one.
    pub component: Option<ComponentHandle>,
    /// Per-draw instance index of the struck item, `-1` when none.
    pub item: i32,
    /// World-space impact point.
    pub impact_point: Vec3,
    /// World-space impact normal.
    pub impact_normal: Vec3,
    /// Distance from trace start to impact.
    pub distance: f32,
}

impl HitResult {
    /// Hit on instance `item` of `component` at `impact_point`.
    #[must_use]
    pub const fn on_instance(component: ComponentHandle, item: InstanceIndex, impact_point: Vec3) -> Self {
        Self {
            component: Some(component),
            item: item.0 as i32,
            impact_point,
            impact_normal: Vec3::UP,
            distance: 0.0,
        }
    }

    /// The struck instance index, if `item` names one.
    #[must_use]
    pub fn instance_index(&self) -> Option<InstanceIndex> {
        u32::try_from(self.item).ok().map(InstanceIndex)
    }
}

impl Default for HitResult {
    fn default() -> Self {
        Self {
            component: None,
            item: -1,
            impact_point: Vec3::ZERO,
            impact_normal: Vec3::UP,
            distance: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes() {
        let kind = ComponentKind::ResourceInstances {
            index: ComponentIndex(3),
        };
        assert_eq!(ComponentKind::from_code(kind.code(), 3), Some(kind));
        assert_eq!(ComponentKind::from_code(0, 9), Some(ComponentKind::Root));
        assert_eq!(ComponentKind::from_code(7, 0), None);
    }

    #[test]
    fn test_instance_index() {
        let handle = ComponentHandle::resource_instances(EntityId(1), ComponentIndex(0));
        let hit = HitResult::on_instance(handle, InstanceIndex(12), Vec3::ZERO);
        assert_eq!(hit.instance_index(), Some(InstanceIndex(12)));
        assert_eq!(HitResult::default().instance_index(), None);
    }
}
