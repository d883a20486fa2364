/// Point lights and ambient term for the 3D scene.
///
/// Lights are persistent: they stay until explicitly removed.
/// Each frame the host reads the active lights for its lighting pass.

use glam::Vec3;

/// A point light with position, color, intensity and range.
///
/// Wire format (8 floats / 32 bytes):
/// `[x, y, z, intensity, r, g, b, range]`
///
/// A `range` of 0 means no distance cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct PointLight {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub intensity: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub range: f32,
}

impl PointLight {
    /// Create a new point light at the given position.
    ///
    /// - `pos`: World-space position
    /// - `color`: RGB color in [0..1]
    /// - `intensity`: Light strength multiplier
    /// - `range`: Falloff distance in world units
    pub fn new(pos: Vec3, color: [f32; 3], intensity: f32, range: f32) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            z: pos.z,
            intensity,
            r: color[0],
            g: color[1],
            b: color[2],
            range,
        }
    }

    pub fn with_pos(mut self, pos: Vec3) -> Self {
        self.x = pos.x;
        self.y = pos.y;
        self.z = pos.z;
        self
    }

    pub fn pos(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Manages active lights and the ambient term.
///
/// Ambient defaults to white at full intensity, which renders lit meshes
/// unshaded when no point lights are present.
pub struct LightState {
    lights: Vec<PointLight>,
    ambient: [f32; 3],
    ambient_intensity: f32,
}

impl LightState {
    pub fn new() -> Self {
        Self::with_capacity(4)
    }

    /// Create a LightState with a specific light capacity.
    pub fn with_capacity(max_lights: usize) -> Self {
        Self {
            lights: Vec::with_capacity(max_lights),
            ambient: [1.0, 1.0, 1.0],
            ambient_intensity: 1.0,
        }
    }

    pub fn add(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    pub fn clear(&mut self) {
        self.lights.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &PointLight> {
        self.lights.iter()
    }

    pub fn count(&self) -> usize {
        self.lights.len()
    }

    pub fn set_ambient(&mut self, color: [f32; 3], intensity: f32) {
        self.ambient = color;
        self.ambient_intensity = intensity;
    }

    pub fn ambient(&self) -> [f32; 3] {
        self.ambient
    }

    pub fn ambient_intensity(&self) -> f32 {
        self.ambient_intensity
    }

    /// Pointer to the lights data for SAB serialization.
    pub fn buffer_ptr(&self) -> *const f32 {
        self.lights.as_ptr() as *const f32
    }
}

impl Default for LightState {
    fn default() -> Self {
        Self::new()
    }
}
