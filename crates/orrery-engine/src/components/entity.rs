use glam::{Quat, Vec3};
use crate::api::types::EntityId;
use crate::components::mesh::MeshComponent;

/// Fat scene node: a single struct with optional components.
///
/// `pos`, `rotation` and `scale` are world-space values written by
/// `TransformGraph::propagate`; games edit the local transform instead.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    /// String tag for finding nodes by name.
    pub tag: String,
    /// Inactive nodes are skipped by rendering and picking.
    pub active: bool,
    pub pos: Vec3,
    pub rotation: Quat,
    /// Uniform scale.
    pub scale: f32,
    /// Mesh component (grouping nodes have none).
    pub mesh: Option<MeshComponent>,
}

impl Entity {
    /// Create a new node with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
            mesh: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec3) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshComponent) -> Self {
        self.mesh = Some(mesh);
        self
    }

    /// World-space bounding sphere radius of the mesh, if it has one.
    pub fn bounding_radius(&self) -> Option<f32> {
        self.mesh.as_ref().map(|m| m.shape.bounding_radius() * self.scale)
    }
}
