//! Effect specs as delivered by the ability/effect pipeline.
//!
//! The pipeline evaluates magnitudes; by the time a spec reaches this crate
//! it is read-only input.

use crate::ability_system::{AbilitySystem, SharedAbilitySystem};
use crate::attributes::AttributeId;
use castaway_shared::{HitResult, TagContainer};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};

/// How an evaluated modifier combines with the current value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierOp {
    /// Adds the magnitude to the current value.
    Add,
    /// Replaces the current value.
    Override,
}

/// A modifier after magnitude evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EvaluatedModifier {
    /// Target attribute.
    pub attribute: AttributeId,
    /// Combination rule.
    pub op: ModifierOp,
    /// Evaluated magnitude.
    pub magnitude: f32,
}

/// Weak reference to the ability system of whoever caused an effect.
///
/// Weak so a pending effect never keeps a departed player alive.
#[derive(Clone, Debug)]
pub struct InstigatorHandle {
    name: String,
    ability_system: Weak<RwLock<AbilitySystem>>,
}

impl InstigatorHandle {
    /// Handle to `ability_system`, displayed as `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, ability_system: &SharedAbilitySystem) -> Self {
        Self {
            name: name.into(),
            ability_system: Arc::downgrade(ability_system),
        }
    }

    /// Display name of the instigator.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The instigator's ability system, if it is still alive.
    #[must_use]
    pub fn ability_system(&self) -> Option<SharedAbilitySystem> {
        self.ability_system.upgrade()
    }
}

/// Context captured when the effect was created.
#[derive(Clone, Debug, Default)]
pub struct EffectContext {
    /// Who caused the effect.
    pub instigator: Option<InstigatorHandle>,
    /// What targeting hit, if targeting produced a hit.
    pub hit_result: Option<HitResult>,
}

impl EffectContext {
    /// The hit result, if any.
    #[must_use]
    pub fn hit_result(&self) -> Option<&HitResult> {
        self.hit_result.as_ref()
    }

    /// The instigator's ability system, if there is a live instigator.
    #[must_use]
    pub fn instigator_ability_system(&self) -> Option<SharedAbilitySystem> {
        self.instigator.as_ref().and_then(InstigatorHandle::ability_system)
    }

    /// Instigator display name, or `"<none>"`.
    #[must_use]
    pub fn instigator_name(&self) -> &str {
        self.instigator.as_ref().map_or("<none>", InstigatorHandle::name)
    }
}

/// An effect spec: identity, captured source tags and context.
#[derive(Clone, Debug)]
pub struct EffectSpec {
    /// Effect name, for diagnostics.
    pub name: String,
    /// Tags captured from the source when the spec was created.
    pub captured_source_tags: TagContainer,
    /// Effect context.
    pub context: EffectContext,
}

impl EffectSpec {
    /// Creates an empty spec named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            captured_source_tags: TagContainer::new(),
            context: EffectContext::default(),
        }
    }

    /// Sets the captured source tags.
    #[must_use]
    pub fn with_source_tags(mut self, tags: TagContainer) -> Self {
        self.captured_source_tags = tags;
        self
    }

    /// Sets the instigator.
    #[must_use]
    pub fn with_instigator(mut self, instigator: InstigatorHandle) -> Self {
        self.context.instigator = Some(instigator);
        self
    }

    /// Sets the hit result.
    #[must_use]
    pub fn with_hit(mut self, hit: HitResult) -> Self {
        self.context.hit_result = Some(hit);
        self
    }
}

/// Callback payload for an executed modifier.
#[derive(Clone, Debug)]
pub struct EffectModCallbackData {
    /// The spec being executed.
    pub spec: EffectSpec,
    /// The evaluated modifier.
    pub evaluated: EvaluatedModifier,
}

impl EffectModCallbackData {
    /// Additive damage of `magnitude` from `spec`.
    #[must_use]
    pub fn damage(spec: EffectSpec, magnitude: f32) -> Self {
        Self {
            spec,
            evaluated: EvaluatedModifier {
                attribute: AttributeId::Damage,
                op: ModifierOp::Add,
                magnitude,
            },
        }
    }
}
