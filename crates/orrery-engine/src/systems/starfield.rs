use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use crate::core::rng::Rng;

/// A single background star. Wire format: `[x, y, z]`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Star {
    pub const FLOATS: usize = 3;
}

/// Static backdrop of point stars scattered uniformly in a cube.
/// Generated once at startup from a seed; never changes afterwards.
#[derive(Debug, Clone, Default)]
pub struct StarField {
    stars: Vec<Star>,
}

impl StarField {
    /// Scatter `count` stars uniformly in `[-extent, extent]` on every axis.
    pub fn generate(count: usize, extent: f32, seed: u64) -> Self {
        let mut rng = Rng::new(seed);
        let stars = (0..count)
            .map(|_| Star {
                x: rng.range(-extent, extent),
                y: rng.range(-extent, extent),
                z: rng.range(-extent, extent),
            })
            .collect();
        Self { stars }
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.stars.iter().map(|s| Vec3::new(s.x, s.y, s.z))
    }

    /// Raw pointer to star positions for SharedArrayBuffer reads.
    pub fn ptr(&self) -> *const f32 {
        self.stars.as_ptr() as *const f32
    }
}
