//! CPU staging buffer for instanced rendering.
//!
//! Pre-allocates to the pool capacity so populating never reallocates.

use super::instance_data::InstanceData;
use super::store::InstanceStore;
use castaway_shared::Transform;
use std::ops::Range;

/// Staging buffer implementing [`InstanceStore`].
///
/// Custom float 0 lives inside [`InstanceData`]; further floats are kept in a
/// side array laid out `index * (floats - 1) + (slot - 1)`.
#[derive(Debug)]
pub struct InstanceBuffer {
    /// GPU-layout instance data.
    instances: Vec<InstanceData>,

    /// Custom floats beyond the first.
    extra_custom: Vec<f32>,

    /// Custom floats per instance (>= 1).
    num_custom_data_floats: usize,

    /// Maximum number of instances.
    capacity: usize,

    /// Instances changed since the last upload.
    dirty: Option<Range<usize>>,
}

impl InstanceBuffer {
    /// Creates a buffer holding up to `capacity` instances.
    ///
    /// `num_custom_data_floats` is raised to 1 if zero.
    #[must_use]
    pub fn new(capacity: usize, num_custom_data_floats: usize) -> Self {
        let floats = num_custom_data_floats.max(1);
        Self {
            instances: Vec::with_capacity(capacity),
            extra_custom: Vec::with_capacity(capacity * (floats - 1)),
            num_custom_data_floats: floats,
            capacity,
            dirty: None,
        }
    }

    /// Maximum number of instances.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Instance data, hidden instances included.
    #[must_use]
    pub fn instances(&self) -> &[InstanceData] {
        &self.instances
    }

    /// Instance data as bytes for GPU upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Returns and resets the range of instances changed since the last call.
    pub fn take_dirty(&mut self) -> Option<Range<usize>> {
        self.dirty.take()
    }

    fn mark_dirty(&mut self, changed: Range<usize>) {
        if changed.is_empty() {
            return;
        }
        self.dirty = Some(match self.dirty.take() {
            Some(range) => range.start.min(changed.start)..range.end.max(changed.end),
            None => changed,
        });
    }
}

impl InstanceStore for InstanceBuffer {
    fn clear_instances(&mut self) {
        self.instances.clear();
        self.extra_custom.clear();
        // The uploader sees an empty dirty range as "truncate to zero".
        self.dirty = Some(0..0);
    }

    fn add_instances(&mut self, transforms: &[Transform]) -> usize {
        let available = self.capacity - self.instances.len();
        let to_add = transforms.len().min(available);
        if to_add < transforms.len() {
            tracing::warn!(
                requested = transforms.len(),
                added = to_add,
                capacity = self.capacity,
                "instance buffer full"
            );
        }

        let start = self.instances.len();
        self.instances
            .extend(transforms[..to_add].iter().map(InstanceData::from_transform));
        self.extra_custom
            .resize(self.instances.len() * (self.num_custom_data_floats - 1), 0.0);
        self.mark_dirty(start..self.instances.len());
        to_add
    }

    fn set_custom_data(&mut self, index: usize, slot: usize, value: f32) -> bool {
        if index >= self.instances.len() || slot >= self.num_custom_data_floats {
            return false;
        }
        if slot == 0 {
            self.instances[index].set_custom(value);
        } else {
            let stride = self.num_custom_data_floats - 1;
            self.extra_custom[index * stride + slot - 1] = value;
        }
        self.mark_dirty(index..index + 1);
        true
    }

    fn custom_data(&self, index: usize, slot: usize) -> Option<f32> {
        if slot >= self.num_custom_data_floats {
            return None;
        }
        let data = self.instances.get(index)?;
        if slot == 0 {
            Some(data.custom())
        } else {
            let stride = self.num_custom_data_floats - 1;
            self.extra_custom.get(index * stride + slot - 1).copied()
        }
    }

    fn hide_instance(&mut self, index: usize) -> bool {
        let Some(data) = self.instances.get_mut(index) else {
            return false;
        };
        data.hide();
        self.mark_dirty(index..index + 1);
        true
    }

    fn is_visible(&self, index: usize) -> Option<bool> {
        self.instances.get(index).map(InstanceData::is_visible)
    }

    fn instance_count(&self) -> usize {
        self.instances.len()
    }

    fn num_custom_data_floats(&self) -> usize {
        self.num_custom_data_floats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use castaway_shared::Vec3;

    fn transforms(n: usize) -> Vec<Transform> {
        (0..n)
            .map(|i| Transform::from_translation(Vec3::new(i as f32, 0.0, 0.0)))
            .collect()
    }

    #[test]
    fn test_add_respects_capacity() {
        let mut buffer = InstanceBuffer::new(4, 1);
        assert_eq!(buffer.add_instances(&transforms(3)), 3);
        assert_eq!(buffer.add_instances(&transforms(3)), 1);
        assert_eq!(buffer.instance_count(), 4);
        assert_eq!(buffer.as_bytes().len(), 4 * InstanceData::SIZE);
    }

    #[test]
    fn test_hide_keeps_indices() {
        let mut buffer = InstanceBuffer::new(8, 1);
        buffer.add_instances(&transforms(3));
        assert!(buffer.hide_instance(1));
        assert!(!buffer.hide_instance(3));

        assert_eq!(buffer.instance_count(), 3);
        assert_eq!(buffer.is_visible(0), Some(true));
        assert_eq!(buffer.is_visible(1), Some(false));
        assert_eq!(buffer.is_visible(3), None);
        assert_eq!(buffer.instances()[2].translation_custom[0], 2.0);
    }

    #[test]
    fn test_custom_data_slots() {
        let mut buffer = InstanceBuffer::new(8, 3);
        buffer.add_instances(&transforms(2));

        assert!(buffer.set_custom_data(1, 0, 7.0));
        assert!(buffer.set_custom_data(1, 2, 9.0));
        assert!(!buffer.set_custom_data(1, 3, 1.0));
        assert!(!buffer.set_custom_data(2, 0, 1.0));

        assert_eq!(buffer.custom_data(1, 0), Some(7.0));
        assert_eq!(buffer.custom_data(1, 1), Some(0.0));
        assert_eq!(buffer.custom_data(1, 2), Some(9.0));
        assert_eq!(buffer.custom_data(0, 2), Some(0.0));
    }

    #[test]
    fn test_dirty_range_merges() {
        let mut buffer = InstanceBuffer::new(16, 1);
        buffer.add_instances(&transforms(10));
        assert_eq!(buffer.take_dirty(), Some(0..10));
        assert_eq!(buffer.take_dirty(), None);

        buffer.hide_instance(7);
        buffer.set_custom_data(2, 0, 1.0);
        assert_eq!(buffer.take_dirty(), Some(2..8));

        buffer.clear_instances();
        assert_eq!(buffer.take_dirty(), Some(0..0));
        assert_eq!(buffer.instance_count(), 0);
    }
}
