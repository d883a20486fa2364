use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3, Vec4};
use crate::systems::raycast::Ray;

/// Perspective camera for 3D rendering and picking.
///
/// Depth maps to [0, 1] (WebGPU convention). The camera always looks at
/// `target`; games move it by writing `position`.
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Viewport width / height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    /// World position, w = 1.
    pub position: [f32; 4],
}

impl CameraUniform {
    pub const FLOATS: usize = 20;
}

impl Default for Camera3D {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: 75f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera3D {
    pub fn new(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y,
            aspect,
            near,
            far,
            ..Default::default()
        }
    }

    pub fn look_at(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.target = target;
    }

    /// Update the aspect ratio after a viewport resize. Degenerate sizes are ignored.
    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) {
        if viewport_width > 0.0 && viewport_height > 0.0 {
            self.aspect = viewport_width / viewport_height;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        let forward = (self.target - self.position).normalize_or_zero();
        // Looking straight along `up` leaves look_at without a basis.
        let up = if forward.cross(self.up).length_squared() < 1e-8 {
            Vec3::Z
        } else {
            self.up
        };
        Mat4::look_at_rh(self.position, self.target, up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection().to_cols_array_2d(),
            position: [self.position.x, self.position.y, self.position.z, 1.0],
        }
    }

    /// Build a world-space ray from the camera through a normalized device coordinate.
    /// `ndc` is in [-1, 1] per axis, +Y up.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_projection().inverse();
        let far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let far = far.truncate() / far.w;
        Ray::new(self.position, far - self.position)
    }

    /// Map a screen pixel to NDC for a viewport of the given size.
    pub fn screen_to_ndc(screen: Vec2, viewport_width: f32, viewport_height: f32) -> Vec2 {
        Vec2::new(
            screen.x / viewport_width * 2.0 - 1.0,
            1.0 - screen.y / viewport_height * 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_20_floats() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), CameraUniform::FLOATS * 4);
    }

    #[test]
    fn center_ray_points_at_target() {
        let mut cam = Camera3D::default();
        cam.look_at(Vec3::new(0.0, 30.0, 60.0), Vec3::ZERO);
        let ray = cam.ray_from_ndc(Vec2::ZERO);
        let expected = (Vec3::ZERO - cam.position).normalize();
        assert!((ray.direction - expected).length() < 1e-4, "dir = {:?}", ray.direction);
        assert_eq!(ray.origin, cam.position);
    }

    #[test]
    fn right_edge_ray_leans_right() {
        let cam = Camera3D::default(); // at +Z looking at origin, +X is screen-right
        let ray = cam.ray_from_ndc(Vec2::new(1.0, 0.0));
        assert!(ray.direction.x > 0.0);
        assert!(ray.direction.z < 0.0);
    }

    #[test]
    fn screen_to_ndc_flips_y() {
        let ndc = Camera3D::screen_to_ndc(Vec2::new(0.0, 0.0), 800.0, 600.0);
        assert_eq!(ndc, Vec2::new(-1.0, 1.0));
        let ndc = Camera3D::screen_to_ndc(Vec2::new(400.0, 300.0), 800.0, 600.0);
        assert_eq!(ndc, Vec2::ZERO);
    }

    #[test]
    fn looking_straight_down_stays_finite() {
        let mut cam = Camera3D::default();
        cam.look_at(Vec3::new(0.0, 50.0, 0.0), Vec3::ZERO);
        let m = cam.view_projection();
        assert!(m.to_cols_array().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn resize_ignores_zero_height() {
        let mut cam = Camera3D::default();
        cam.resize(800.0, 400.0);
        assert_eq!(cam.aspect, 2.0);
        cam.resize(800.0, 0.0);
        assert_eq!(cam.aspect, 2.0);
    }
}
