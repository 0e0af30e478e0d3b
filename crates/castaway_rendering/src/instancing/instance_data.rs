//! Instance data structures for GPU upload.

use bytemuck::{Pod, Zeroable};
use castaway_shared::Transform;

/// Per-instance data sent to the GPU.
///
/// Three vec4s, consumed directly by the resource vertex shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    /// World translation (x, y, z) + custom float 0 in w.
    pub translation_custom: [f32; 4],

    /// Rotation quaternion, `xyzw`.
    pub rotation: [f32; 4],

    /// Scale (x, y, z) + visibility in w (1.0 visible, 0.0 hidden).
    pub scale_visible: [f32; 4],
}

impl InstanceData {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Creates a visible instance at `transform` with custom float 0 unset.
    #[must_use]
    pub const fn from_transform(transform: &Transform) -> Self {
        let t = transform.translation;
        let s = transform.scale;
        Self {
            translation_custom: [t.x, t.y, t.z, 0.0],
            rotation: transform.rotation.to_array(),
            scale_visible: [s.x, s.y, s.z, 1.0],
        }
    }

    /// Custom float 0.
    #[must_use]
    pub const fn custom(&self) -> f32 {
        self.translation_custom[3]
    }

    /// Sets custom float 0.
    pub fn set_custom(&mut self, value: f32) {
        self.translation_custom[3] = value;
    }

    /// Returns true unless the instance was hidden.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.scale_visible[3] > 0.0
    }

    /// Hides the instance. The slot keeps its transform.
    pub fn hide(&mut self) {
        self.scale_visible[3] = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use castaway_shared::Vec3;

    #[test]
    fn test_instance_data_size() {
        // 3 vec4s * 16 bytes each
        assert_eq!(InstanceData::SIZE, 48);
    }

    #[test]
    fn test_from_transform() {
        let transform = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let mut data = InstanceData::from_transform(&transform);
        assert_eq!(data.translation_custom, [1.0, 2.0, 3.0, 0.0]);
        assert_eq!(data.rotation, [0.0, 0.0, 0.0, 1.0]);
        assert!(data.is_visible());

        data.hide();
        assert!(!data.is_visible());
        assert_eq!(data.scale_visible[..3], [1.0, 1.0, 1.0]);
    }
}
