use std::f64::consts::{FRAC_PI_2, TAU};

use glam::{Vec2, Vec3};

use crate::config::ControlConfig;

/// Pointer bookkeeping while a button is held.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    origin: Vec2,
    last: Vec2,
}

/// Orbit camera driven by pointer drags and the wheel.
///
/// Every setter clamps on write: `pitch` stays in [-π/2, π/2] and `distance`
/// in [min_distance, max_distance].
#[derive(Debug, Clone, PartialEq)]
pub struct CameraControlState {
    yaw: f64,
    pitch: f64,
    distance: f64,
    target: Vec3,
    yaw_sensitivity: f64,
    pitch_sensitivity: f64,
    zoom_sensitivity: f64,
    min_distance: f64,
    max_distance: f64,
    drag: Option<Drag>,
}

impl Default for CameraControlState {
    /// Starts where the scene camera first looks from: (0, 30, 60) toward the origin.
    fn default() -> Self {
        Self::with_orbit(&ControlConfig::default(), 0.0, 0.5f64.atan(), 4500f64.sqrt())
    }
}

impl CameraControlState {
    pub fn new(config: &ControlConfig) -> Self {
        let default = Self::default();
        Self::with_orbit(config, default.yaw, default.pitch, default.distance)
    }

    /// State at an explicit orbit position, clamped to the config's limits.
    pub fn with_orbit(config: &ControlConfig, yaw: f64, pitch: f64, distance: f64) -> Self {
        let mut state = Self {
            yaw: 0.0,
            pitch: 0.0,
            distance,
            target: Vec3::ZERO,
            yaw_sensitivity: 0.0,
            pitch_sensitivity: 0.0,
            zoom_sensitivity: 0.0,
            min_distance: 0.0,
            max_distance: 0.0,
            drag: None,
        };
        state.apply_config(config);
        state.set_yaw(yaw);
        state.set_pitch(pitch);
        state
    }

    /// Adopt new sensitivities and limits; the current distance is re-clamped.
    pub fn apply_config(&mut self, config: &ControlConfig) {
        self.yaw_sensitivity = config.yaw_sensitivity;
        self.pitch_sensitivity = config.pitch_sensitivity;
        self.zoom_sensitivity = config.zoom_sensitivity;
        self.min_distance = config.min_distance;
        self.max_distance = config.max_distance;
        self.set_distance(self.distance);
    }

    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    fn set_yaw(&mut self, yaw: f64) {
        if yaw.is_finite() {
            self.yaw = yaw.rem_euclid(TAU);
        }
    }

    fn set_pitch(&mut self, pitch: f64) {
        if pitch.is_finite() {
            self.pitch = pitch.clamp(-FRAC_PI_2, FRAC_PI_2);
        }
    }

    fn set_distance(&mut self, distance: f64) {
        let distance = if distance.is_finite() { distance } else { self.min_distance };
        self.distance = distance.max(self.min_distance).min(self.max_distance);
    }

    /// Rotate the orbit by a pointer delta in pixels.
    pub fn apply_drag(&mut self, delta_x: f64, delta_y: f64) {
        self.set_yaw(self.yaw + delta_x * self.yaw_sensitivity);
        self.set_pitch(self.pitch + delta_y * self.pitch_sensitivity);
    }

    /// Move toward or away from the target by a wheel delta. Positive zooms out.
    pub fn apply_zoom(&mut self, delta_scroll: f64) {
        self.set_distance(self.distance + delta_scroll * self.zoom_sensitivity);
    }

    /// Spherical-to-Cartesian camera position around the target.
    pub fn current_position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let offset = Vec3::new(
            (self.distance * sin_yaw * cos_pitch) as f32,
            (self.distance * sin_pitch) as f32,
            (self.distance * cos_yaw * cos_pitch) as f32,
        );
        self.target + offset
    }

    /// Screen-up direction for the current orbit: the pitch tangent of the sphere.
    /// Stays well defined at the pitch clamp, where world +Y is parallel to the view.
    pub fn up_vector(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(
            (-sin_yaw * sin_pitch) as f32,
            cos_pitch as f32,
            (-cos_yaw * sin_pitch) as f32,
        )
    }

    // ── Drag tracking ───────────────────────────────────────────────

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Pointer pressed at screen pixel `at`.
    pub fn begin_drag(&mut self, at: Vec2) {
        self.drag = Some(Drag { origin: at, last: at });
    }

    /// Pointer moved to `at`. While dragging, the delta from the previous sample
    /// rotates the orbit and this returns true; otherwise camera state is untouched.
    pub fn drag_to(&mut self, at: Vec2) -> bool {
        let Some(drag) = self.drag.as_mut() else { return false };
        let delta = at - drag.last;
        drag.last = at;
        self.apply_drag(delta.x as f64, delta.y as f64);
        true
    }

    /// Pointer released at `at`. Returns the straight-line travel since the press,
    /// or None if no drag was active.
    pub fn end_drag(&mut self, at: Vec2) -> Option<f32> {
        self.drag.take().map(|drag| (at - drag.origin).length())
    }
}
