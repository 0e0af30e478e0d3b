//! # Attribute Sets
//!
//! Numeric gameplay attributes grouped by capability kind.
//!
//! Lookups go by [`AttributeSetKind`] instead of downcasting: a consumer asks
//! for an ordered list of kinds and takes the first one present.

use crate::notify::{DamageNotifier, DamageReceived, NotifiesOnDamage};
use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of a numeric attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeId {
    /// Current health.
    Health,
    /// Health ceiling.
    MaxHealth,
    /// Current stamina.
    Stamina,
    /// Strength of the equipped tool.
    ToolStrength,
    /// Aggregate durability of a resource.
    Durability,
    /// Durability ceiling.
    MaxDurability,
    /// Incoming damage (meta attribute, never persists).
    Damage,
}

/// Capability kind of an attribute set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeSetKind {
    /// Player/character attributes, including tool strength.
    Survivor,
    /// Harvestable resource attributes.
    Resource,
    /// Untyped attribute bag, used as the fallback kind.
    Generic,
}

/// Attributes of a playable survivor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurvivorAttributes {
    /// Current health.
    pub health: f32,
    /// Health ceiling.
    pub max_health: f32,
    /// Current stamina.
    pub stamina: f32,
    /// Strength of the equipped tool.
    pub tool_strength: f32,
}

impl SurvivorAttributes {
    /// Full health and stamina, holding a tool of `tool_strength`.
    #[must_use]
    pub const fn with_tool_strength(tool_strength: f32) -> Self {
        Self {
            health: 100.0,
            max_health: 100.0,
            stamina: 100.0,
            tool_strength,
        }
    }
}

impl Default for SurvivorAttributes {
    fn default() -> Self {
        Self::with_tool_strength(0.0)
    }
}

/// Attributes of a harvestable resource container.
#[derive(Debug, Default)]
pub struct ResourceAttributes {
    /// Aggregate durability (informational; instances track their own).
    pub durability: f32,
    /// Durability ceiling.
    pub max_durability: f32,
    damage: f32,
    notifier: DamageNotifier,
}

impl ResourceAttributes {
    /// Creates a set with `max_durability`, at full durability.
    #[must_use]
    pub fn new(max_durability: f32) -> Self {
        Self {
            durability: max_durability,
            max_durability,
            damage: 0.0,
            notifier: DamageNotifier::new(),
        }
    }

    /// Current value of the damage meta attribute (zero between executions).
    #[must_use]
    pub const fn pending_damage(&self) -> f32 {
        self.damage
    }

    /// Executes a damage modifier: records it, notifies subscribers, resets.
    ///
    /// Returns the number of subscribers notified.
    pub fn receive_damage(&mut self, event: &DamageReceived) -> usize {
        self.damage = event.magnitude;
        let reached = self.notifier.notify(event);
        tracing::trace!(magnitude = event.magnitude, reached, "resource damage resolved");
        self.damage = 0.0;
        reached
    }
}

impl NotifiesOnDamage for ResourceAttributes {
    fn subscribe_damage(&mut self) -> Receiver<DamageReceived> {
        self.notifier.subscribe()
    }
}

/// Untyped attribute bag.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenericAttributes {
    values: BTreeMap<AttributeId, f32>,
}

impl GenericAttributes {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces `attribute`.
    #[must_use]
    pub fn with(mut self, attribute: AttributeId, value: f32) -> Self {
        self.values.insert(attribute, value);
        self
    }
}

/// One attribute set, tagged by capability kind.
#[derive(Debug)]
pub enum AttributeSet {
    /// Survivor attributes.
    Survivor(SurvivorAttributes),
    /// Resource attributes.
    Resource(ResourceAttributes),
    /// Generic attributes.
    Generic(GenericAttributes),
}

impl AttributeSet {
    /// Capability kind of this set.
    #[must_use]
    pub const fn kind(&self) -> AttributeSetKind {
        match self {
            Self::Survivor(_) => AttributeSetKind::Survivor,
            Self::Resource(_) => AttributeSetKind::Resource,
            Self::Generic(_) => AttributeSetKind::Generic,
        }
    }

    /// Returns true if `attribute` belongs to this set.
    #[must_use]
    pub fn owns(&self, attribute: AttributeId) -> bool {
        match self {
            Self::Survivor(_) => matches!(
                attribute,
                AttributeId::Health
                    | AttributeId::MaxHealth
                    | AttributeId::Stamina
                    | AttributeId::ToolStrength
            ),
            Self::Resource(_) => matches!(
                attribute,
                AttributeId::Durability | AttributeId::MaxDurability | AttributeId::Damage
            ),
            Self::Generic(bag) => bag.values.contains_key(&attribute),
        }
    }

    /// Current value of `attribute`, if this set owns it.
    #[must_use]
    pub fn get(&self, attribute: AttributeId) -> Option<f32> {
        match (self, attribute) {
            (Self::Survivor(s), AttributeId::Health) => Some(s.health),
            (Self::Survivor(s), AttributeId::MaxHealth) => Some(s.max_health),
            (Self::Survivor(s), AttributeId::Stamina) => Some(s.stamina),
            (Self::Survivor(s), AttributeId::ToolStrength) => Some(s.tool_strength),
            (Self::Resource(r), AttributeId::Durability) => Some(r.durability),
            (Self::Resource(r), AttributeId::MaxDurability) => Some(r.max_durability),
            (Self::Resource(r), AttributeId::Damage) => Some(r.damage),
            (Self::Generic(bag), attribute) => bag.values.get(&attribute).copied(),
            _ => None,
        }
    }

    /// Sets `attribute`, clamping to the set's rules.
    ///
    /// Returns false if the set does not own `attribute`.
    pub fn set(&mut self, attribute: AttributeId, value: f32) -> bool {
        match (self, attribute) {
            (Self::Survivor(s), AttributeId::Health) => s.health = value.clamp(0.0, s.max_health),
            (Self::Survivor(s), AttributeId::MaxHealth) => {
                s.max_health = value.max(0.0);
                s.health = s.health.min(s.max_health);
            }
            (Self::Survivor(s), AttributeId::Stamina) => s.stamina = value.max(0.0),
            (Self::Survivor(s), AttributeId::ToolStrength) => s.tool_strength = value.max(0.0),
            (Self::Resource(r), AttributeId::Durability) => {
                r.durability = value.clamp(0.0, r.max_durability);
            }
            (Self::Resource(r), AttributeId::MaxDurability) => {
                r.max_durability = value.max(0.0);
                r.durability = r.durability.min(r.max_durability);
            }
            (Self::Generic(bag), attribute) if bag.values.contains_key(&attribute) => {
                bag.values.insert(attribute, value);
            }
            _ => return false,
        }
        true
    }

    /// Tool strength exposed by this set, if it carries one.
    #[must_use]
    pub fn tool_strength(&self) -> Option<f32> {
        match self {
            Self::Survivor(s) => Some(s.tool_strength),
            Self::Generic(bag) => bag.values.get(&AttributeId::ToolStrength).copied(),
            Self::Resource(_) => None,
        }
    }
}
