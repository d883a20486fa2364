use std::collections::BTreeMap;

use serde::Deserialize;

use crate::bodies::BodyRegistry;
use crate::error::{OrreryError, Result};

/// Camera and control tuning, loadable from JSON. Missing fields take defaults.
///
/// ```json
/// { "zoom_sensitivity": 0.02, "max_distance": 150, "speed_multipliers": { "earth": 2.0 } }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Radians of yaw per pixel of horizontal drag.
    pub yaw_sensitivity: f64,
    /// Radians of pitch per pixel of vertical drag.
    pub pitch_sensitivity: f64,
    /// Distance units per unit of wheel delta.
    pub zoom_sensitivity: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    /// Pointer travel (pixels) below which a press-release counts as a click.
    pub click_threshold_px: f32,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Initial speed multipliers by body key.
    pub speed_multipliers: BTreeMap<String, f64>,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            yaw_sensitivity: 0.01,
            pitch_sensitivity: 0.01,
            zoom_sensitivity: 0.01,
            min_distance: 10.0,
            max_distance: 200.0,
            click_threshold_px: 5.0,
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            speed_multipliers: BTreeMap::new(),
        }
    }
}

impl ControlConfig {
    /// Parse and validate a JSON document against the given registry.
    pub fn from_json(json: &str, registry: &BodyRegistry) -> Result<Self> {
        let config: ControlConfig = serde_json::from_str(json)?;
        config.validate(registry)?;
        Ok(config)
    }

    pub fn validate(&self, registry: &BodyRegistry) -> Result<()> {
        let scalars = [
            ("yaw_sensitivity", self.yaw_sensitivity),
            ("pitch_sensitivity", self.pitch_sensitivity),
            ("zoom_sensitivity", self.zoom_sensitivity),
            ("min_distance", self.min_distance),
            ("max_distance", self.max_distance),
            ("click_threshold_px", self.click_threshold_px as f64),
            ("fov_y_degrees", self.fov_y_degrees as f64),
            ("near", self.near as f64),
            ("far", self.far as f64),
        ];
        if let Some((name, _)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
            return Err(OrreryError::InvalidConfig(format!("{name} must be finite")));
        }
        if self.min_distance <= 0.0 {
            return Err(OrreryError::InvalidConfig("min_distance must be positive".into()));
        }
        if self.min_distance > self.max_distance {
            return Err(OrreryError::InvalidConfig(format!(
                "min_distance {} exceeds max_distance {}",
                self.min_distance, self.max_distance
            )));
        }
        if self.near <= 0.0 || self.near >= self.far {
            return Err(OrreryError::InvalidConfig("need 0 < near < far".into()));
        }
        if !(self.fov_y_degrees > 0.0 && self.fov_y_degrees < 180.0) {
            return Err(OrreryError::InvalidConfig("fov_y_degrees must be in (0, 180)".into()));
        }
        for (key, multiplier) in &self.speed_multipliers {
            registry.describe(key)?;
            if !multiplier.is_finite() {
                return Err(OrreryError::InvalidConfig(format!("{key}: speed multiplier must be finite")));
            }
        }
        Ok(())
    }
}
