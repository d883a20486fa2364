use bytemuck::{Pod, Zeroable};

/// Per-instance mesh data read by the TypeScript renderer.
/// Must match the TypeScript protocol: 20 floats = 80 bytes stride.
///
/// Wire format:
/// `[x, y, z, scale] [shape, size_a, size_b, lit] [r, g, b, opacity] [qx, qy, qz, qw] [emissive, shininess, 0, 0]`
///
/// `size_a`/`size_b` are shape parameters in local units: sphere radius and 0,
/// or ring inner and outer radius.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct MeshInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// World-space uniform scale.
    pub scale: f32,
    /// 0 = sphere, 1 = ring.
    pub shape: f32,
    pub size_a: f32,
    pub size_b: f32,
    /// 1.0 if the mesh takes part in lighting, 0.0 for flat shading.
    pub lit: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub opacity: f32,
    /// World rotation quaternion.
    pub rotation: [f32; 4],
    pub emissive: f32,
    pub shininess: f32,
    pub _pad: [f32; 2],
}

impl MeshInstance {
    pub const FLOATS: usize = 20;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Render buffer holding all mesh instances for the current frame.
/// Opaque instances come first, translucent ones after `opaque_split`.
pub struct RenderBuffer {
    pub instances: Vec<MeshInstance>,
    pub opaque_split: u32,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(max_instances: usize) -> Self {
        Self {
            instances: Vec::with_capacity(max_instances),
            opaque_split: 0,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.opaque_split = 0;
    }

    pub fn push(&mut self, instance: MeshInstance) {
        self.instances.push(instance);
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for SharedArrayBuffer reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
