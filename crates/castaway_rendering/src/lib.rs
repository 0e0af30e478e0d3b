//! # Castaway Rendering
//!
//! The renderer side of resource instancing. Gameplay code writes transforms,
//! per-instance custom floats and visibility through [`InstanceStore`]; the
//! renderer uploads whatever the staging buffer marks dirty.
//!
//! ## Data Flow
//!
//! ```text
//! ┌────────────────────┐  add/hide/custom  ┌────────────────┐  take_dirty  ┌─────┐
//! │ Instance Pool (N)  │ ────────────────> │ InstanceBuffer │ ───────────> │ GPU │
//! └────────────────────┘                   └────────────────┘   as_bytes   └─────┘
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod instancing;

pub use instancing::{InstanceBuffer, InstanceData, InstanceStore};
