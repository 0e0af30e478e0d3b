//! World-level errors.

use castaway_core::{Reportable, Severity};
use castaway_shared::{EntityId, NetMode};
use castaway_world::{CatalogError, ConfigError, ResourceError};
use thiserror::Error;

/// Errors raised while building or driving a world.
#[derive(Error, Debug)]
pub enum WorldError {
    /// A server world was built for a side without authority.
    #[error("a server world needs authority, got {net_mode}")]
    NotAuthoritative {
        /// Requested side.
        net_mode: NetMode,
    },

    /// No container with this id exists in the world.
    #[error("unknown container {0}")]
    UnknownContainer(EntityId),

    /// A container with this id already exists.
    #[error("container {0} already exists")]
    DuplicateContainer(EntityId),

    /// Configuration failure.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Resource lookup failure.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Container operation failure.
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

impl Reportable for WorldError {
    fn severity(&self) -> Severity {
        match self {
            Self::Config(e) => e.severity(),
            Self::Catalog(e) => e.severity(),
            Self::Resource(e) => e.severity(),
            _ => Severity::Error,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::NotAuthoritative { .. } => "world.not_authoritative",
            Self::UnknownContainer(_) => "world.unknown_container",
            Self::DuplicateContainer(_) => "world.duplicate_container",
            Self::Config(e) => e.code(),
            Self::Catalog(e) => e.code(),
            Self::Resource(e) => e.code(),
        }
    }
}

/// Result type for world operations.
pub type WorldResult<T> = Result<T, WorldError>;
