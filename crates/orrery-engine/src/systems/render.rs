use crate::components::entity::Entity;
use crate::components::mesh::MeshShape;
use crate::renderer::instance::{MeshInstance, RenderBuffer};

/// Build the render buffer from a set of nodes.
/// Opaque meshes first, then translucent ones; sets `opaque_split` at the boundary.
/// Inactive nodes and nodes without a mesh are skipped.
pub fn build_render_buffer<'a>(entities: impl Iterator<Item = &'a Entity>, buffer: &mut RenderBuffer) {
    buffer.clear();

    let mut opaque: Vec<MeshInstance> = Vec::new();
    let mut translucent: Vec<MeshInstance> = Vec::new();

    for entity in entities {
        if !entity.active {
            continue;
        }

        let mesh = match &entity.mesh {
            Some(m) => m,
            None => continue,
        };

        let (size_a, size_b) = match mesh.shape {
            MeshShape::Sphere { radius } => (radius, 0.0),
            MeshShape::Ring { inner, outer } => (inner, outer),
        };

        let instance = MeshInstance {
            x: entity.pos.x,
            y: entity.pos.y,
            z: entity.pos.z,
            scale: entity.scale,
            shape: mesh.shape.type_id(),
            size_a,
            size_b,
            lit: if mesh.lit { 1.0 } else { 0.0 },
            r: mesh.color.r,
            g: mesh.color.g,
            b: mesh.color.b,
            opacity: mesh.opacity,
            rotation: entity.rotation.to_array(),
            emissive: mesh.emissive,
            shininess: mesh.shininess,
            _pad: [0.0; 2],
        };

        if mesh.opacity < 1.0 {
            translucent.push(instance);
        } else {
            opaque.push(instance);
        }
    }

    buffer.opaque_split = opaque.len() as u32;
    buffer.instances.extend(opaque);
    buffer.instances.extend(translucent);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;
    use crate::components::mesh::{MeshColor, MeshComponent};
    use glam::Vec3;

    #[test]
    fn build_buffer_puts_translucent_last() {
        let entities = vec![
            Entity::new(EntityId(1))
                .with_mesh(MeshComponent::ring(1.0, 2.0, MeshColor::default()).with_opacity(0.3)),
            Entity::new(EntityId(2))
                .with_pos(Vec3::new(8.0, 0.0, 0.0))
                .with_mesh(MeshComponent::sphere(1.0, MeshColor::from_hex(0x8C7853))),
            Entity::new(EntityId(3)),
        ];

        let mut buffer = RenderBuffer::new();
        build_render_buffer(entities.iter(), &mut buffer);

        assert_eq!(buffer.instance_count(), 2);
        assert_eq!(buffer.opaque_split, 1);
        assert_eq!(buffer.instances[0].x, 8.0);
        assert_eq!(buffer.instances[0].shape, 0.0);
        assert_eq!(buffer.instances[1].shape, 1.0);
        assert_eq!(buffer.instances[1].size_b, 2.0);
    }

    #[test]
    fn inactive_entities_are_skipped() {
        let mut entity = Entity::new(EntityId(1))
            .with_mesh(MeshComponent::default());
        entity.active = false;

        let entities = vec![entity];
        let mut buffer = RenderBuffer::new();
        build_render_buffer(entities.iter(), &mut buffer);
        assert_eq!(buffer.instance_count(), 0);
    }
}
