//! # Resource Container Constants
//!
//! Defaults for the fixed replication topology of resource containers.
//!
//! **CRITICAL:** Server and clients must agree on these values. A container
//! built with a different component count addresses different components
//! for the same `ComponentIndex`.

/// Number of instance pool components preallocated per resource container.
pub const NUM_RESOURCE_COMPONENTS: usize = 10;

/// Fixed instance capacity of a single pool component.
pub const MAX_INSTANCES_PER_COMPONENT: usize = 2048;

/// Custom floats written per render instance (slot 0 holds the render tag).
pub const NUM_CUSTOM_DATA_FLOATS: usize = 1;
