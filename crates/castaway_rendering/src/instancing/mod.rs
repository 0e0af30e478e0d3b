//! Instanced rendering of harvestable resources.
//!
//! ## Key Concepts
//!
//! - **Instance Store**: the interface a pool component renders through
//! - **Instance Data**: 48-byte GPU layout, one per instance
//! - **Dirty Range**: the span of instances changed since the last upload

mod buffer;
mod instance_data;
mod store;

pub use buffer::InstanceBuffer;
pub use instance_data::InstanceData;
pub use store::InstanceStore;
