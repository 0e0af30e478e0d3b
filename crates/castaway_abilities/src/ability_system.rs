//! # Ability System
//!
//! Per-actor owner of attribute sets. Effects are executed here and routed
//! to the set that owns the modified attribute.

use crate::attributes::{AttributeId, AttributeSet, AttributeSetKind, ResourceAttributes};
use crate::effect::{EffectModCallbackData, ModifierOp};
use crate::notify::DamageReceived;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Replication policy of an ability system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplicationMode {
    /// Everything replicates to everyone.
    Full,
    /// Effects replicate to the owner only.
    #[default]
    Mixed,
    /// Only tags and cues replicate.
    Minimal,
}

/// Shared, lockable ability system.
pub type SharedAbilitySystem = Arc<RwLock<AbilitySystem>>;

/// What happened when an effect was executed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectExecution {
    /// A persistent attribute changed.
    Applied {
        /// Owning set.
        kind: AttributeSetKind,
        /// Value after the change.
        new_value: f32,
    },
    /// Damage resolved and was delivered to `subscribers`.
    DamageNotified {
        /// Subscribers reached.
        subscribers: usize,
    },
    /// No set owns the modified attribute.
    Unhandled,
}

/// Attribute sets owned by one actor.
#[derive(Debug)]
pub struct AbilitySystem {
    owner: String,
    replication_mode: ReplicationMode,
    sets: Vec<AttributeSet>,
}

impl AbilitySystem {
    /// Creates an empty ability system for `owner`.
    #[must_use]
    pub fn new(owner: impl Into<String>, replication_mode: ReplicationMode) -> Self {
        Self {
            owner: owner.into(),
            replication_mode,
            sets: Vec::new(),
        }
    }

    /// Builder form of [`Self::add_attribute_set`].
    #[must_use]
    pub fn with_attribute_set(mut self, set: AttributeSet) -> Self {
        self.add_attribute_set(set);
        self
    }

    /// Adds `set`, replacing any existing set of the same kind.
    pub fn add_attribute_set(&mut self, set: AttributeSet) {
        let kind = set.kind();
        if let Some(existing) = self.sets.iter_mut().find(|s| s.kind() == kind) {
            *existing = set;
        } else {
            self.sets.push(set);
        }
    }

    /// Owner name.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Replication policy.
    #[must_use]
    pub const fn replication_mode(&self) -> ReplicationMode {
        self.replication_mode
    }

    /// The set of `kind`, if present.
    #[must_use]
    pub fn attribute_set(&self, kind: AttributeSetKind) -> Option<&AttributeSet> {
        self.sets.iter().find(|s| s.kind() == kind)
    }

    /// Mutable access to the set of `kind`, if present.
    pub fn attribute_set_mut(&mut self, kind: AttributeSetKind) -> Option<&mut AttributeSet> {
        self.sets.iter_mut().find(|s| s.kind() == kind)
    }

    /// First set present among `kinds`, in order.
    #[must_use]
    pub fn find_attribute_set(&self, kinds: &[AttributeSetKind]) -> Option<&AttributeSet> {
        kinds.iter().find_map(|kind| self.attribute_set(*kind))
    }

    /// The resource set, if present.
    pub fn resource_attributes_mut(&mut self) -> Option<&mut ResourceAttributes> {
        match self.attribute_set_mut(AttributeSetKind::Resource) {
            Some(AttributeSet::Resource(resource)) => Some(resource),
            _ => None,
        }
    }

    /// Executes one evaluated modifier against the owning set.
    ///
    /// Damage is a meta attribute: it is never stored, only delivered to the
    /// resource set's subscribers.
    pub fn execute_effect(&mut self, data: EffectModCallbackData) -> EffectExecution {
        let EffectModCallbackData { spec, evaluated } = data;

        let Some(set) = self.sets.iter_mut().find(|s| s.owns(evaluated.attribute)) else {
            tracing::debug!(
                owner = %self.owner,
                attribute = ?evaluated.attribute,
                effect = %spec.name,
                "no attribute set owns modified attribute"
            );
            return EffectExecution::Unhandled;
        };

        if let AttributeSet::Resource(resource) = &mut *set {
            if evaluated.attribute == AttributeId::Damage {
                let subscribers = resource.receive_damage(&DamageReceived {
                    magnitude: evaluated.magnitude,
                    spec,
                });
                return EffectExecution::DamageNotified { subscribers };
            }
        }

        let current = set.get(evaluated.attribute).unwrap_or_default();
        let target = match evaluated.op {
            ModifierOp::Add => current + evaluated.magnitude,
            ModifierOp::Override => evaluated.magnitude,
        };
        set.set(evaluated.attribute, target);

        EffectExecution::Applied {
            kind: set.kind(),
            new_value: set.get(evaluated.attribute).unwrap_or(target),
        }
    }

    /// Wraps `self` for sharing between the effect pipeline and instigator handles.
    #[must_use]
    pub fn into_shared(self) -> SharedAbilitySystem {
        Arc::new(RwLock::new(self))
    }
}
