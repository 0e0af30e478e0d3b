//! # Castaway Shared
//!
//! Common types used by both client and server.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on the renderer or the transport.
//! If you need GPU-facing types, put them in `castaway_rendering`.
//! If you need wire packets, put them in `castaway_networking`.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod hit;
pub mod ids;
pub mod math;
pub mod net_mode;
pub mod tags;

pub use constants::{MAX_INSTANCES_PER_COMPONENT, NUM_CUSTOM_DATA_FLOATS, NUM_RESOURCE_COMPONENTS};
pub use hit::{ComponentHandle, ComponentKind, HitResult};
pub use ids::{ComponentIndex, EntityId, InstanceIndex};
pub use math::{Quat, Transform, Vec3};
pub use net_mode::NetMode;
pub use tags::{GameplayTag, TagContainer};
