//! Per-instance health state.

use crate::definition::ResourceDefinition;
use castaway_shared::{InstanceIndex, Transform};
use std::sync::Arc;

/// Derived lifecycle state of a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotState {
    /// Full health.
    Populated,
    /// Damaged but alive.
    Damaged,
    /// Health reached zero. Terminal until the pool is repopulated.
    Depleted,
}

/// What applying damage to one instance did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DamageOutcome {
    /// Zero magnitude (rejected or harmless); nothing changed.
    Blocked,
    /// Health reduced; the instance is still alive.
    Damaged {
        /// Health left.
        remaining: f32,
    },
    /// This hit took health to zero.
    Depleted,
    /// The instance was already depleted; nothing changed.
    AlreadyDepleted,
}

/// One visual instance inside a pool component.
#[derive(Clone, Debug)]
pub struct InstanceSlot {
    index: InstanceIndex,
    health: f32,
    max_health: f32,
    definition: Arc<ResourceDefinition>,
    transform: Transform,
}

impl InstanceSlot {
    /// A slot at full health.
    #[must_use]
    pub fn new(index: InstanceIndex, definition: Arc<ResourceDefinition>, transform: Transform) -> Self {
        let max_health = definition.durability.max(0.0);
        Self {
            index,
            health: max_health,
            max_health,
            definition,
            transform,
        }
    }

    /// Index within the pool.
    #[must_use]
    pub const fn index(&self) -> InstanceIndex {
        self.index
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Health at populate time.
    #[must_use]
    pub const fn max_health(&self) -> f32 {
        self.max_health
    }

    /// Definition the slot was populated from.
    #[must_use]
    pub fn definition(&self) -> &Arc<ResourceDefinition> {
        &self.definition
    }

    /// Placement transform.
    #[must_use]
    pub const fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> SlotState {
        if self.health <= 0.0 {
            SlotState::Depleted
        } else if self.health < self.max_health {
            SlotState::Damaged
        } else {
            SlotState::Populated
        }
    }

    /// Returns true once health has reached zero.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.state() == SlotState::Depleted
    }

    /// Applies `damage`, which must already be finite and non-negative.
    pub(crate) fn take_damage(&mut self, damage: f32) -> DamageOutcome {
        if self.is_depleted() {
            return DamageOutcome::AlreadyDepleted;
        }
        if damage <= 0.0 {
            return DamageOutcome::Blocked;
        }
        self.health = (self.health - damage).max(0.0);
        if self.health <= 0.0 {
            DamageOutcome::Depleted
        } else {
            DamageOutcome::Damaged {
                remaining: self.health,
            }
        }
    }
}
