use glam::Vec3;
use crate::api::types::EntityId;
use crate::core::scene::Scene;

/// A half-line in world space. `direction` is always unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance along the ray to the first intersection with a sphere, if any.
    /// A ray starting inside the sphere hits its far side.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_d = disc.sqrt();
        let near = -b - sqrt_d;
        if near >= 0.0 {
            return Some(near);
        }
        let far = -b + sqrt_d;
        (far >= 0.0).then_some(far)
    }
}

/// A single ray intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub id: EntityId,
    pub distance: f32,
    pub point: Vec3,
}

/// Anything that can be queried with a ray.
///
/// Hits come back sorted nearest first. Equal distances keep the order of `targets`.
pub trait RayCaster {
    fn intersect(&self, ray: &Ray, targets: &[EntityId]) -> Vec<RayHit>;
}

/// Intersect a ray against the bounding spheres of the given scene nodes.
/// Inactive nodes and nodes without a mesh are never hit.
pub fn intersect(ray: &Ray, scene: &Scene, targets: &[EntityId]) -> Vec<RayHit> {
    let mut hits: Vec<RayHit> = targets
        .iter()
        .filter_map(|&id| {
            let entity = scene.get(id)?;
            if !entity.active {
                return None;
            }
            let radius = entity.bounding_radius()?;
            let distance = ray.intersect_sphere(entity.pos, radius)?;
            Some(RayHit { id, distance, point: ray.at(distance) })
        })
        .collect();
    // sort_by is stable, so ties keep target order.
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

impl RayCaster for Scene {
    fn intersect(&self, ray: &Ray, targets: &[EntityId]) -> Vec<RayHit> {
        intersect(ray, self, targets)
    }
}
