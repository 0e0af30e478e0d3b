//! # World Error Types
//!
//! All errors that can occur while spawning, damaging or replicating
//! resource instances. Each one is reported to the diagnostics sink where it
//! is detected; the operation that hit it is a no-op.

use castaway_core::{Reportable, Severity};
use castaway_shared::{ComponentHandle, ComponentIndex, EntityId, NetMode};
use thiserror::Error;

/// Errors that can occur in pool components and resource containers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// Populate was called before a definition was bound.
    #[error("{component} has no resource definition bound")]
    DefinitionUnset {
        /// The pool component.
        component: ComponentIndex,
    },

    /// Instance index outside the populated batch.
    #[error("instance index {index} out of range for {component} ({count} instances)")]
    InstanceIndexOutOfRange {
        /// The pool component.
        component: ComponentIndex,
        /// The offending index (signed: hits may carry `-1`).
        index: i64,
        /// Instances in the batch.
        count: usize,
    },

    /// Component index outside the container's fixed pool set.
    #[error("exceeded max number of resource components: index {index}, container has {count}")]
    ComponentIndexOutOfRange {
        /// The offending index.
        index: u8,
        /// Pool components in the container.
        count: usize,
    },

    /// More transforms than the pool can hold.
    #[error("{component} capacity is {capacity}, dropped {dropped} of {requested} transforms")]
    CapacityExceeded {
        /// The pool component.
        component: ComponentIndex,
        /// Transforms requested.
        requested: usize,
        /// Pool capacity.
        capacity: usize,
        /// Transforms dropped.
        dropped: usize,
    },

    /// Damage origination attempted without authority.
    #[error("damage can only be originated by the server, not a {net_mode} instance")]
    NotAuthoritative {
        /// Net mode of the caller.
        net_mode: NetMode,
    },

    /// The effect context carried no hit result.
    #[error("targeting did not produce a hit result for instanced resource (effect '{effect}')")]
    MissingHitResult {
        /// Name of the effect.
        effect: String,
    },

    /// The hit component is not one of this container's pool components.
    #[error("hit component {component:?} is not a resource instance component of {container}")]
    ForeignComponent {
        /// The container that received the damage.
        container: EntityId,
        /// The struck component handle.
        component: Option<ComponentHandle>,
    },

    /// A broadcast addressed to another container.
    #[error("take damage for {got} delivered to {expected}")]
    WrongContainer {
        /// The receiving container.
        expected: EntityId,
        /// The addressed container.
        got: EntityId,
    },
}

impl Reportable for ResourceError {
    fn severity(&self) -> Severity {
        match self {
            Self::CapacityExceeded { .. }
            | Self::MissingHitResult { .. }
            | Self::ForeignComponent { .. } => Severity::Warning,
            Self::DefinitionUnset { .. }
            | Self::InstanceIndexOutOfRange { .. }
            | Self::ComponentIndexOutOfRange { .. }
            | Self::NotAuthoritative { .. }
            | Self::WrongContainer { .. } => Severity::Error,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::DefinitionUnset { .. } => "resource.definition_unset",
            Self::InstanceIndexOutOfRange { .. } => "resource.instance_out_of_range",
            Self::ComponentIndexOutOfRange { .. } => "resource.component_out_of_range",
            Self::CapacityExceeded { .. } => "resource.capacity_exceeded",
            Self::NotAuthoritative { .. } => "resource.not_authoritative",
            Self::MissingHitResult { .. } => "resource.missing_hit",
            Self::ForeignComponent { .. } => "resource.foreign_component",
            Self::WrongContainer { .. } => "resource.wrong_container",
        }
    }
}

/// Result type for resource operations.
pub type ResourceResult<T> = Result<T, ResourceError>;
