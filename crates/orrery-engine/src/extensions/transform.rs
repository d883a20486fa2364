// extensions/transform.rs
//
// Transform hierarchy: tracks parent-child relationships by EntityId.
// Decoupled from Entity/Scene internals.
//
// Usage:
//   let mut graph = TransformGraph::new();
//   graph.register_with(group_id, LocalTransform::new().with_rotation(tilt));
//   graph.register_with(body_id, LocalTransform::new().with_offset(orbit_pos));
//   graph.set_parent(body_id, Some(group_id));
//   graph.propagate(&mut scene);  // world pos = tilt * orbit_pos

use std::collections::HashMap;
use glam::{Quat, Vec3};
use crate::api::types::EntityId;
use crate::core::scene::Scene;

/// Local transform relative to the parent (or the world for roots).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    pub offset: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            offset: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }
}

impl LocalTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

#[derive(Debug, Clone, Default)]
struct TransformNode {
    parent: Option<EntityId>,
    children: Vec<EntityId>,
    local: LocalTransform,
}

/// Transform hierarchy graph. Manages parent-child relationships.
///
/// Lives beside the Scene rather than inside it: nodes carry world values,
/// the graph carries local ones.
#[derive(Debug, Default)]
pub struct TransformGraph {
    nodes: HashMap<EntityId, TransformNode>,
    /// Nodes with no parent, in registration order.
    roots: Vec<EntityId>,
    /// Set when a local transform or link changes, cleared after propagate.
    dirty: bool,
}

impl TransformGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node with the identity local transform.
    pub fn register(&mut self, id: EntityId) {
        self.register_with(id, LocalTransform::default());
    }

    /// Register a node with a specific local transform.
    pub fn register_with(&mut self, id: EntityId, local: LocalTransform) {
        let node = self.nodes.entry(id).or_default();
        node.local = local;
        if node.parent.is_none() && !self.roots.contains(&id) {
            self.roots.push(id);
        }
        self.dirty = true;
    }

    /// Set the parent of a node. Pass `None` to make it a root.
    /// Links that would make a node its own ancestor are refused.
    pub fn set_parent(&mut self, child: EntityId, parent: Option<EntityId>) {
        if let Some(p) = parent {
            if self.is_ancestor_or_self(child, p) {
                log::warn!("transform: refusing to parent {:?} under its descendant {:?}", child, p);
                return;
            }
            self.nodes.entry(p).or_default();
            if self.nodes.get(&p).map_or(false, |n| n.parent.is_none()) && !self.roots.contains(&p) {
                self.roots.push(p);
            }
        }
        self.nodes.entry(child).or_default();

        if let Some(old_parent) = self.nodes.get(&child).and_then(|n| n.parent) {
            if let Some(old_node) = self.nodes.get_mut(&old_parent) {
                old_node.children.retain(|&c| c != child);
            }
        }

        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = parent;
        }

        match parent {
            Some(p) => {
                if let Some(parent_node) = self.nodes.get_mut(&p) {
                    if !parent_node.children.contains(&child) {
                        parent_node.children.push(child);
                    }
                }
                self.roots.retain(|&r| r != child);
            }
            None => {
                if !self.roots.contains(&child) {
                    self.roots.push(child);
                }
            }
        }

        self.dirty = true;
    }

    /// True if `ancestor` is `id` or sits above it in the hierarchy.
    fn is_ancestor_or_self(&self, ancestor: EntityId, id: EntityId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.nodes.get(&current).and_then(|n| n.parent);
        }
        false
    }

    pub fn set_local(&mut self, id: EntityId, local: LocalTransform) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local = local;
            self.dirty = true;
        }
    }

    pub fn get_local(&self, id: EntityId) -> Option<&LocalTransform> {
        self.nodes.get(&id).map(|n| &n.local)
    }

    pub fn get_local_mut(&mut self, id: EntityId) -> Option<&mut LocalTransform> {
        self.dirty = true;
        self.nodes.get_mut(&id).map(|n| &mut n.local)
    }

    pub fn get_parent(&self, id: EntityId) -> Option<EntityId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn get_children(&self, id: EntityId) -> Option<&[EntityId]> {
        self.nodes.get(&id).map(|n| n.children.as_slice())
    }

    /// Propagate transforms from roots down through the hierarchy,
    /// writing world pos/rotation/scale into the scene's nodes.
    pub fn propagate(&mut self, scene: &mut Scene) {
        if !self.dirty {
            return;
        }

        for &root in &self.roots {
            self.propagate_recursive(root, Vec3::ZERO, Quat::IDENTITY, 1.0, scene);
        }

        self.dirty = false;
    }

    fn propagate_recursive(
        &self,
        id: EntityId,
        parent_pos: Vec3,
        parent_rot: Quat,
        parent_scale: f32,
        scene: &mut Scene,
    ) {
        let Some(node) = self.nodes.get(&id) else { return };
        let local = &node.local;

        let world_pos = parent_pos + parent_rot * (local.offset * parent_scale);
        let world_rot = parent_rot * local.rotation;
        let world_scale = parent_scale * local.scale;

        if let Some(entity) = scene.get_mut(id) {
            entity.pos = world_pos;
            entity.rotation = world_rot;
            entity.scale = world_scale;
        }

        for &child in &node.children {
            self.propagate_recursive(child, world_pos, world_rot, world_scale, scene);
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::Entity;

    #[test]
    fn parent_child_relationship() {
        let mut graph = TransformGraph::new();
        let parent = EntityId(1);
        let child = EntityId(2);

        graph.register(parent);
        graph.register(child);
        graph.set_parent(child, Some(parent));

        assert_eq!(graph.get_parent(child), Some(parent));
        assert_eq!(graph.get_children(parent), Some([child].as_slice()));
        assert!(!graph.roots.contains(&child));
    }

    #[test]
    fn rotated_parent_tilts_child_offset() {
        let mut graph = TransformGraph::new();
        let mut scene = Scene::new();
        let group = EntityId(1);
        let body = EntityId(2);
        scene.spawn(Entity::new(group));
        scene.spawn(Entity::new(body));

        // +90 degrees about X carries +Z onto -Y.
        let tilt = Quat::from_rotation_x(std::f32::consts::FRAC_PI_2);
        graph.register_with(group, LocalTransform::new().with_rotation(tilt));
        graph.register_with(body, LocalTransform::new().with_offset(Vec3::new(0.0, 0.0, 10.0)));
        graph.set_parent(body, Some(group));
        graph.propagate(&mut scene);

        let pos = scene.get(body).unwrap().pos;
        assert!((pos - Vec3::new(0.0, -10.0, 0.0)).length() < 1e-4, "pos = {pos:?}");
    }

    #[test]
    fn propagate_is_skipped_when_clean() {
        let mut graph = TransformGraph::new();
        let mut scene = Scene::new();
        let id = EntityId(1);
        scene.spawn(Entity::new(id));
        graph.register_with(id, LocalTransform::new().with_offset(Vec3::X));
        graph.propagate(&mut scene);
        assert!(!graph.is_dirty());

        // A stale write to the scene survives because nothing changed in the graph.
        scene.get_mut(id).unwrap().pos = Vec3::ZERO;
        graph.propagate(&mut scene);
        assert_eq!(scene.get(id).unwrap().pos, Vec3::ZERO);

        graph.set_local(id, LocalTransform::new().with_offset(Vec3::Y));
        graph.propagate(&mut scene);
        assert_eq!(scene.get(id).unwrap().pos, Vec3::Y);
    }

    #[test]
    fn cycles_are_refused() {
        let mut graph = TransformGraph::new();
        let a = EntityId(1);
        let b = EntityId(2);
        graph.register(a);
        graph.register(b);
        graph.set_parent(b, Some(a));
        graph.set_parent(a, Some(b));
        assert_eq!(graph.get_parent(a), None);
        assert_eq!(graph.get_parent(b), Some(a));
    }
}
