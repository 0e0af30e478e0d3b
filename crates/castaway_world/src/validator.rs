//! # Requirement Validator
//!
//! Decides whether an effect may damage a resource.
//!
//! ## Checks (in order, short-circuiting)
//!
//! 1. The effect's source tags cover every required tag
//! 2. The instigator's ability system is alive and carries an attribute set
//!    found by ordered fallback ([`INSTIGATOR_SET_FALLBACK`]) that exposes a
//!    tool strength
//! 3. That tool strength meets the resource's minimum
//!
//! A failed check is not an error: the damage is still broadcast, with a
//! magnitude of zero.

use crate::definition::ResourceDefinition;
use castaway_abilities::{AttributeSetKind, EffectSpec};
use castaway_core::{report, Reportable, Severity, SharedSink};
use castaway_shared::{NetMode, TagContainer};
use thiserror::Error;

/// Attribute set kinds searched on the instigator, most specific first.
pub const INSTIGATOR_SET_FALLBACK: [AttributeSetKind; 2] =
    [AttributeSetKind::Survivor, AttributeSetKind::Generic];

/// Why an effect failed its requirements.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequirementFailure {
    /// Source tags miss one or more required tags.
    #[error("failed to meet required tags, missing {missing}")]
    MissingTags {
        /// Required tags not covered.
        missing: TagContainer,
    },

    /// No instigator, or its ability system is gone.
    #[error("instigator ability system not found")]
    InstigatorUnavailable,

    /// The instigator has none of the fallback attribute set kinds.
    #[error("no survivor or generic attribute set on instigator '{instigator}'")]
    NoAttributeSet {
        /// Instigator name.
        instigator: String,
    },

    /// The found set carries no tool strength.
    #[error("attribute set of instigator '{instigator}' has no tool strength")]
    ToolStrengthUnavailable {
        /// Instigator name.
        instigator: String,
    },

    /// Tool strength below the resource's minimum.
    #[error("tool strength insufficient: have {have}, need {need}")]
    ToolStrengthInsufficient {
        /// Instigator tool strength.
        have: f32,
        /// Required tool strength.
        need: f32,
    },
}

impl Reportable for RequirementFailure {
    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn code(&self) -> &'static str {
        match self {
            Self::MissingTags { .. } => "requirement.missing_tags",
            Self::InstigatorUnavailable => "requirement.instigator_unavailable",
            Self::NoAttributeSet { .. } => "requirement.no_attribute_set",
            Self::ToolStrengthUnavailable { .. } => "requirement.tool_strength_unavailable",
            Self::ToolStrengthInsufficient { .. } => "requirement.tool_strength_insufficient",
        }
    }
}

/// Gate between a damage event and its broadcast.
#[derive(Clone)]
pub struct RequirementValidator {
    net_mode: NetMode,
    diagnostics: SharedSink,
}

impl std::fmt::Debug for RequirementValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequirementValidator")
            .field("net_mode", &self.net_mode)
            .finish_non_exhaustive()
    }
}

impl RequirementValidator {
    /// Creates a validator reporting to `diagnostics`.
    #[must_use]
    pub fn new(net_mode: NetMode, diagnostics: SharedSink) -> Self {
        Self {
            net_mode,
            diagnostics,
        }
    }

    /// Runs every check, returning the first failure.
    ///
    /// # Errors
    ///
    /// Returns the [`RequirementFailure`] of the first check that fails.
    pub fn check(spec: &EffectSpec, definition: &ResourceDefinition) -> Result<(), RequirementFailure> {
        let missing: TagContainer = spec
            .captured_source_tags
            .missing(&definition.required_tags)
            .into_iter()
            .collect();
        if !missing.is_empty() {
            return Err(RequirementFailure::MissingTags { missing });
        }

        let ability_system = spec
            .context
            .instigator_ability_system()
            .ok_or(RequirementFailure::InstigatorUnavailable)?;
        let ability_system = ability_system.read();
        let instigator = spec.context.instigator_name();

        if ability_system.attribute_set(AttributeSetKind::Survivor).is_none() {
            tracing::debug!(instigator, "no survivor attribute set, falling back");
        }
        let set = ability_system
            .find_attribute_set(&INSTIGATOR_SET_FALLBACK)
            .ok_or_else(|| RequirementFailure::NoAttributeSet {
                instigator: instigator.to_owned(),
            })?;
        let have = set
            .tool_strength()
            .ok_or_else(|| RequirementFailure::ToolStrengthUnavailable {
                instigator: instigator.to_owned(),
            })?;

        let need = definition.tool_strength;
        if have.is_nan() || need.is_nan() || have < need {
            return Err(RequirementFailure::ToolStrengthInsufficient { have, need });
        }
        Ok(())
    }

    /// Runs [`check`](Self::check), reporting any failure.
    #[must_use]
    pub fn validate(&self, spec: &EffectSpec, definition: &ResourceDefinition) -> bool {
        match Self::check(spec, definition) {
            Ok(()) => true,
            Err(failure) => {
                report(self.diagnostics.as_ref(), self.net_mode, &failure);
                false
            }
        }
    }
}
