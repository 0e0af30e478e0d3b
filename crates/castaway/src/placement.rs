//! Deterministic transform placement.
//!
//! Server and clients call [`scatter_transforms`] with the same seed and get
//! the same batch, so instance indices agree without replicating transforms.

use castaway_shared::{Quat, Transform, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Smallest uniform scale applied to a placed instance.
pub const MIN_SCALE: f32 = 0.8;

/// Largest uniform scale applied to a placed instance.
pub const MAX_SCALE: f32 = 1.2;

/// Scatters `count` transforms over the square `[-extent, extent]` on the
/// ground plane, each with a random yaw and uniform scale.
///
/// A non-positive or non-finite `extent` stacks every instance at the origin.
#[must_use]
pub fn scatter_transforms(seed: u64, count: usize, extent: f32) -> Vec<Transform> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let extent = if extent.is_finite() && extent > 0.0 { extent } else { 0.0 };

    (0..count)
        .map(|_| {
            let (x, y) = if extent > 0.0 {
                (rng.gen_range(-extent..=extent), rng.gen_range(-extent..=extent))
            } else {
                (0.0, 0.0)
            };
            let yaw = rng.gen::<f32>() * std::f32::consts::TAU;
            let scale = rng.gen_range(MIN_SCALE..=MAX_SCALE);
            Transform::new(Vec3::new(x, y, 0.0), Quat::from_yaw(yaw), Vec3::splat(scale))
        })
        .collect()
}
