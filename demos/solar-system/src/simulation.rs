/// The per-frame simulation step.
///
/// Angles advance by a fixed amount per step, so orbit speed follows the host's
/// frame rate unless the runner is configured with a fixed timestep.

use std::collections::BTreeMap;

use glam::Vec3;

use crate::bodies::{BodyRegistry, OrbitalBodyDescriptor, SUN_SPIN};
use crate::controls::CameraControlState;
use crate::error::Result;
use crate::state::{BodyState, PlaybackState};

/// Everything one step reads and produces.
#[derive(Debug, Clone, Default)]
pub struct SolarState {
    pub bodies: Vec<BodyState>,
    pub playback: PlaybackState,
    pub camera: CameraControlState,
    /// Accumulated spin of the star about Y.
    pub sun_spin: f64,
    /// Body positions within their orbital planes, from the last step.
    pub positions: BTreeMap<String, Vec3>,
    /// Camera position derived from `camera`, from the last step.
    pub camera_position: Vec3,
}

impl SolarState {
    pub fn new(bodies: Vec<BodyState>, camera: CameraControlState) -> Self {
        Self {
            bodies,
            camera,
            ..Default::default()
        }
    }
}

/// Advance every body's orbital angle and return its position in its own
/// orbital plane, keyed by body name.
///
/// `dt_hint` is accepted for host compatibility and does not affect the step.
/// While paused no angle moves, but positions are still reported.
/// Every state is resolved against the registry before anything is mutated, so an
/// `UnknownBody` error leaves `bodies` untouched.
pub fn advance(
    _dt_hint: f32,
    playback: &PlaybackState,
    bodies: &mut [BodyState],
    registry: &BodyRegistry,
) -> Result<BTreeMap<String, Vec3>> {
    let descriptors: Vec<&OrbitalBodyDescriptor> = bodies
        .iter()
        .map(|state| registry.describe(&state.name))
        .collect::<Result<_>>()?;

    let mut positions = BTreeMap::new();
    for (state, descriptor) in bodies.iter_mut().zip(descriptors) {
        if !playback.is_paused() {
            state.advance_angle(descriptor.base_angular_speed * state.speed_multiplier());
        }
        positions.insert(state.name.clone(), descriptor.plane_position(state.current_angle()));
    }
    Ok(positions)
}

/// Turn the star and every body about their own axes. Cosmetic only.
pub fn spin(state: &mut SolarState, registry: &BodyRegistry) -> Result<()> {
    if state.playback.is_paused() {
        return Ok(());
    }
    for body in state.bodies.iter_mut() {
        let (y, z) = registry.describe(&body.name)?.spin;
        body.add_spin(y, z);
    }
    state.sun_spin = (state.sun_spin + SUN_SPIN).rem_euclid(std::f64::consts::TAU);
    Ok(())
}

/// Set every multiplier back to 1.0. Angles are untouched.
pub fn reset_speeds(bodies: &mut [BodyState]) {
    for body in bodies.iter_mut() {
        body.set_speed_multiplier(1.0);
    }
}

/// One whole step: `state` in, next state out.
pub fn tick(state: &SolarState, dt: f32, registry: &BodyRegistry) -> Result<SolarState> {
    let mut next = state.clone();
    next.positions = advance(dt, &next.playback, &mut next.bodies, registry)?;
    spin(&mut next, registry)?;
    next.camera_position = next.camera.current_position();
    Ok(next)
}
