//! The interface a pool component renders through.

use castaway_shared::Transform;

/// Renderer-side backing store for one pool component's instances.
///
/// Indices are assigned in insertion order starting at 0 after every
/// [`clear_instances`](InstanceStore::clear_instances) and never shift:
/// hiding an instance keeps its slot.
pub trait InstanceStore: Send + std::fmt::Debug {
    /// Removes every instance.
    fn clear_instances(&mut self);

    /// Appends `transforms` as visible instances.
    ///
    /// Returns how many were added (fewer than requested if the store is full).
    fn add_instances(&mut self, transforms: &[Transform]) -> usize;

    /// Writes custom float `slot` of instance `index`.
    ///
    /// Returns false if either is out of range.
    fn set_custom_data(&mut self, index: usize, slot: usize, value: f32) -> bool;

    /// Reads custom float `slot` of instance `index`.
    fn custom_data(&self, index: usize, slot: usize) -> Option<f32>;

    /// Hides instance `index`. Returns false if it is out of range.
    fn hide_instance(&mut self, index: usize) -> bool;

    /// Visibility of instance `index`, `None` if out of range.
    fn is_visible(&self, index: usize) -> Option<bool>;

    /// Number of instances, hidden ones included.
    fn instance_count(&self) -> usize;

    /// Custom floats carried per instance.
    fn num_custom_data_floats(&self) -> usize;
}
