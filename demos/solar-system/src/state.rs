use std::f64::consts::TAU;

use orrery_engine::Rng;
use serde::Serialize;

use crate::bodies::BodyRegistry;

/// Mutable per-body simulation state, tied to its descriptor by key.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyState {
    pub name: String,
    current_angle: f64,
    speed_multiplier: f64,
    /// Accumulated cosmetic spin about the body's own Y and Z axes.
    pub spin: (f64, f64),
}

impl BodyState {
    pub fn new(name: impl Into<String>, angle: f64) -> Self {
        Self {
            name: name.into(),
            current_angle: angle.rem_euclid(TAU),
            speed_multiplier: 1.0,
            spin: (0.0, 0.0),
        }
    }

    /// One state per registry entry, each starting at a random angle in [0, 2π).
    pub fn for_registry(registry: &BodyRegistry, rng: &mut Rng) -> Vec<BodyState> {
        registry
            .iter()
            .map(|body| BodyState::new(body.name.clone(), rng.next_f64() * TAU))
            .collect()
    }

    /// Orbital angle in [0, 2π).
    pub fn current_angle(&self) -> f64 {
        self.current_angle
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    /// Any finite multiplier is accepted: 0 freezes the body, negatives run it retrograde.
    /// Non-finite values are ignored.
    pub fn set_speed_multiplier(&mut self, multiplier: f64) {
        if multiplier.is_finite() {
            self.speed_multiplier = multiplier;
        } else {
            log::warn!("{}: ignoring non-finite speed multiplier", self.name);
        }
    }

    /// Move the orbital angle by `delta` radians, wrapping into [0, 2π).
    pub fn advance_angle(&mut self, delta: f64) {
        self.current_angle = (self.current_angle + delta).rem_euclid(TAU);
    }

    pub fn add_spin(&mut self, y: f64, z: f64) {
        self.spin.0 = (self.spin.0 + y).rem_euclid(TAU);
        self.spin.1 = (self.spin.1 + z).rem_euclid(TAU);
    }
}

/// Background color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Dark,
    Light,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Dark => DisplayMode::Light,
            DisplayMode::Light => DisplayMode::Dark,
        }
    }

    /// Packed 0xRRGGBB background clear color.
    pub fn clear_color_hex(self) -> u32 {
        match self {
            DisplayMode::Dark => 0x000000,
            DisplayMode::Light => 0x001122,
        }
    }

    /// Wire value sent to the UI: 0 = dark, 1 = light.
    pub fn as_f32(self) -> f32 {
        match self {
            DisplayMode::Dark => 0.0,
            DisplayMode::Light => 1.0,
        }
    }
}

/// Pause flag and display mode. Both change only on explicit toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackState {
    paused: bool,
    display_mode: DisplayMode,
}

impl PlaybackState {
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    /// Flip pause. Returns the new value.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Flip the display mode. Returns the new mode.
    pub fn toggle_display(&mut self) -> DisplayMode {
        self.display_mode = self.display_mode.toggled();
        self.display_mode
    }
}
