//! # Castaway Abilities
//!
//! The attribute/capability layer the resource core integrates with.
//!
//! ## Flow
//!
//! ```text
//! effect pipeline ──EffectModCallbackData──> AbilitySystem::execute_effect
//!                                                   │
//!                                     ResourceAttributes (Damage meta)
//!                                                   │ notify
//!                                                   ▼
//!                                   Receiver<DamageReceived> (subscriber)
//! ```
//!
//! Magnitudes are computed upstream; this crate only routes them to the
//! owning attribute set and fans damage out to subscribers.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod ability_system;
pub mod attributes;
pub mod effect;
pub mod notify;

pub use ability_system::{AbilitySystem, EffectExecution, ReplicationMode, SharedAbilitySystem};
pub use attributes::{
    AttributeId, AttributeSet, AttributeSetKind, GenericAttributes, ResourceAttributes,
    SurvivorAttributes,
};
pub use effect::{
    EffectContext, EffectModCallbackData, EffectSpec, EvaluatedModifier, InstigatorHandle,
    ModifierOp,
};
pub use notify::{DamageNotifier, DamageReceived, NotifiesOnDamage};
