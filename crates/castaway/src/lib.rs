//! # CASTAWAY
//!
//! The main game crate, wiring the resource core into server and client
//! worlds.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │                           CASTAWAY WORLDS                             │
//! ├───────────────────────────────────────────────────────────────────────┤
//! │                                                                       │
//! │  ┌──────────────────────┐   TakeDamage    ┌──────────────────────┐    │
//! │  │   ServerWorld        │ ──────────────> │   ClientWorld (N)    │    │
//! │  │                      │  MulticastHub   │                      │    │
//! │  │  • validate          │                 │  • pump inbox        │    │
//! │  │  • broadcast         │                 │  • apply in order    │    │
//! │  │  • apply locally     │                 │                      │    │
//! │  └──────────┬───────────┘                 └──────────┬───────────┘    │
//! │             │                                        │                │
//! │             └──────── ContainerSet (same seeds) ─────┘                │
//! │                                                                       │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `server`: authoritative world
//! - `client`: replica world
//! - `containers`: container bookkeeping shared by both
//! - `placement`: deterministic transform scatter

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod containers;
pub mod error;
pub mod placement;
pub mod server;

// Re-export the layers
pub use castaway_abilities as abilities;
pub use castaway_core as core;
pub use castaway_networking as networking;
pub use castaway_shared as shared;
pub use castaway_world as world;

pub use client::{ClientWorld, PumpStats};
pub use containers::{ContainerSet, InstanceHealth};
pub use error::{WorldError, WorldResult};
pub use placement::scatter_transforms;
pub use server::ServerWorld;
