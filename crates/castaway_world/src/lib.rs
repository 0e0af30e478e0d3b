//! # Castaway World
//!
//! Instanced resources: many visual instances of trees and rocks sharing a
//! small fixed set of replicated pool components, each instance with its own
//! health.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────── ResourceContainer ────────────────────────┐
//! │ AbilitySystem(ResourceAttributes) ──DamageReceived──┐             │
//! │                                                     ▼             │
//! │                              RequirementValidator ─ on_damage     │
//! │                                                     │ TakeDamage  │
//! │ pools: [InstancePool; N]  ◄── on_broadcast ◄────────┴──► multicast│
//! │   └─ slots (health) + InstanceStore (render)                      │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. **Fixed topology** - a container's pool count never changes, so a
//!    `ComponentIndex` means the same pool on every observer
//! 2. **Server decides** - only the authoritative side validates damage and
//!    issues broadcasts
//! 3. **One mutation path** - health changes only inside
//!    [`ResourceContainer::on_broadcast_received`], on the server too
//! 4. **No panics** - bad indices and missing data are reported through the
//!    injected diagnostics sink and become no-ops
//!
//! ## Example
//!
//! ```rust
//! use castaway_core::MemorySink;
//! use castaway_shared::{ComponentIndex, EntityId, NetMode, Transform};
//! use castaway_world::{ContainerConfig, ContainerServices, ResourceContainer, ResourceDefinition};
//! use std::sync::Arc;
//!
//! let services = ContainerServices::standalone(MemorySink::shared());
//! let mut container = ResourceContainer::new(
//!     EntityId(1),
//!     NetMode::Standalone,
//!     &ContainerConfig::default(),
//!     services,
//! )
//! .unwrap();
//!
//! let rock = Arc::new(ResourceDefinition::new("rock", 25.0));
//! let spawned = container
//!     .spawn_resource_group(ComponentIndex(0), rock, &[Transform::IDENTITY; 3])
//!     .unwrap();
//! assert_eq!(spawned, 3);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod container;
pub mod definition;
pub mod error;
pub mod pool;
pub mod slot;
pub mod validator;
pub mod yield_sink;

pub use config::{ConfigError, ContainerConfig, SpawnGroupConfig, WorldConfig};
pub use container::{ContainerServices, ResourceContainer};
pub use definition::{CatalogError, ResourceCatalog, ResourceDefinition};
pub use error::{ResourceError, ResourceResult};
pub use pool::{InstancePool, PoolServices};
pub use slot::{DamageOutcome, InstanceSlot, SlotState};
pub use validator::{RequirementFailure, RequirementValidator, INSTIGATOR_SET_FALLBACK};
pub use yield_sink::{DepletedInstance, NullYieldSink, SharedYieldSink, YieldQueue, YieldSink};
