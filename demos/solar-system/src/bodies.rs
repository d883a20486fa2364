/// Orbital body registry: the fixed table of bodies circling the star.
///
/// Distances and sizes are scene units, speeds are radians per simulation step,
/// inclinations are degrees. Sizes are exaggerated for readability.

use glam::{Quat, Vec3};

use crate::error::{OrreryError, Result};

// ── Star ─────────────────────────────────────────────────────────────

pub const SUN_LABEL: &str = "Sun";
pub const SUN_DESCRIPTION: &str = "Our star - nuclear fusion powers the solar system";
pub const SUN_RADIUS: f32 = 2.0;
pub const SUN_COLOR: u32 = 0xFFD700;
/// Radians the star turns about its Y axis per step.
pub const SUN_SPIN: f64 = 0.005;

// ── Bodies ───────────────────────────────────────────────────────────

/// Radians every body turns about its own Y axis per step.
pub const BODY_SPIN: f64 = 0.01;

pub const BODY_COUNT: usize = 8;

/// key, label, distance, size, speed, inclination°, color, description
type BodyRow = (&'static str, &'static str, f64, f32, f64, f64, u32, &'static str);

const BODY_TABLE: [BodyRow; BODY_COUNT] = [
    ("mercury", "Mercury", 8.0, 1.0, 0.02, 7.0, 0x8C7853, "Closest to the Sun - extreme temperatures"),
    ("venus", "Venus", 12.0, 1.5, 0.015, 3.4, 0xFFA500, "Hottest planet - toxic atmosphere"),
    ("earth", "Earth", 16.0, 1.75, 0.01, 0.0, 0x4169E1, "Our home planet - the blue marble"),
    ("mars", "Mars", 20.0, 1.25, 0.008, 1.9, 0xDC143C, "The red planet - polar ice caps"),
    ("jupiter", "Jupiter", 28.0, 4.0, 0.006, 1.3, 0xFF8C00, "Largest planet - gas giant with Great Red Spot"),
    ("saturn", "Saturn", 36.0, 3.5, 0.005, 2.5, 0xDAA520, "Planet with rings - gas giant"),
    ("uranus", "Uranus", 44.0, 2.5, 0.004, 0.8, 0x00CED1, "Tilted ice giant - rotates on its side"),
    ("neptune", "Neptune", 52.0, 2.4, 0.003, 1.8, 0x0000FF, "Windiest planet - ice giant"),
];

/// Uranus rolls about Z as well as spinning about Y.
const URANUS_ROLL: f64 = 0.008;

/// Immutable description of one orbiting body.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalBodyDescriptor {
    /// Unique lookup key (lowercase).
    pub name: String,
    pub label: String,
    /// Radius of the circular orbit.
    pub orbital_distance: f64,
    /// Radians advanced per step at multiplier 1.0.
    pub base_angular_speed: f64,
    /// Tilt of the orbital plane from the reference plane, in [0, 90).
    pub inclination_degrees: f64,
    pub visual_radius: f32,
    /// 0xRRGGBB.
    pub color: u32,
    pub description: String,
    /// Cosmetic spin per step about the body's own Y and Z axes.
    pub spin: (f64, f64),
    /// Whether the body carries a flat ring system.
    pub ringed: bool,
}

impl OrbitalBodyDescriptor {
    /// A body with the given orbit and default visuals.
    pub fn new(name: impl Into<String>, orbital_distance: f64, base_angular_speed: f64, inclination_degrees: f64) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            orbital_distance,
            base_angular_speed,
            inclination_degrees,
            visual_radius: 1.0,
            color: 0xFFFFFF,
            description: String::new(),
            spin: (BODY_SPIN, 0.0),
            ringed: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_visual_radius(mut self, radius: f32) -> Self {
        self.visual_radius = radius;
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_spin(mut self, y: f64, z: f64) -> Self {
        self.spin = (y, z);
        self
    }

    pub fn with_rings(mut self) -> Self {
        self.ringed = true;
        self
    }

    /// Fixed rotation of the orbital plane: the inclination about the line of nodes (X).
    pub fn orbit_rotation(&self) -> Quat {
        Quat::from_rotation_x(self.inclination_degrees.to_radians() as f32)
    }

    /// Position at `angle` within the body's own orbital plane (y = 0).
    pub fn plane_position(&self, angle: f64) -> Vec3 {
        Vec3::new(
            (self.orbital_distance * angle.cos()) as f32,
            0.0,
            (self.orbital_distance * angle.sin()) as f32,
        )
    }

    /// Position at `angle` in the reference frame, after the inclination is applied.
    pub fn world_position(&self, angle: f64) -> Vec3 {
        self.orbit_rotation() * self.plane_position(angle)
    }

    fn validate(&self) -> Result<()> {
        let finite = [
            self.orbital_distance,
            self.base_angular_speed,
            self.inclination_degrees,
            self.visual_radius as f64,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(OrreryError::InvalidConfig(format!("{}: non-finite value", self.name)));
        }
        if self.orbital_distance <= 0.0 || self.base_angular_speed <= 0.0 || self.visual_radius <= 0.0 {
            return Err(OrreryError::InvalidConfig(format!(
                "{}: distance, speed and radius must be positive",
                self.name
            )));
        }
        if !(0.0..90.0).contains(&self.inclination_degrees) {
            return Err(OrreryError::InvalidConfig(format!(
                "{}: inclination {} outside [0, 90)",
                self.name, self.inclination_degrees
            )));
        }
        Ok(())
    }
}

/// The closed set of bodies, in table order.
#[derive(Debug, Clone)]
pub struct BodyRegistry {
    bodies: Vec<OrbitalBodyDescriptor>,
}

impl BodyRegistry {
    /// Build a registry from arbitrary descriptors. Keys must be unique and every
    /// descriptor must satisfy its range constraints.
    pub fn new(bodies: Vec<OrbitalBodyDescriptor>) -> Result<Self> {
        for (i, body) in bodies.iter().enumerate() {
            body.validate()?;
            if bodies[..i].iter().any(|b| b.name == body.name) {
                return Err(OrreryError::InvalidConfig(format!("duplicate body `{}`", body.name)));
            }
        }
        Ok(Self { bodies })
    }

    /// The eight planets.
    pub fn solar_system() -> Self {
        let bodies = BODY_TABLE
            .iter()
            .map(|&(key, label, distance, size, speed, inclination, color, description)| {
                let body = OrbitalBodyDescriptor::new(key, distance, speed, inclination)
                    .with_label(label)
                    .with_visual_radius(size)
                    .with_color(color)
                    .with_description(description);
                match key {
                    "saturn" => body.with_rings(),
                    "uranus" => body.with_spin(BODY_SPIN, URANUS_ROLL),
                    _ => body,
                }
            })
            .collect();
        Self { bodies }
    }

    /// Look up a body by key. Fails loudly on anything outside the closed set.
    pub fn describe(&self, name: &str) -> Result<&OrbitalBodyDescriptor> {
        self.bodies
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| OrreryError::UnknownBody(name.to_string()))
    }

    /// Table position of a body key.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.bodies
            .iter()
            .position(|b| b.name == name)
            .ok_or_else(|| OrreryError::UnknownBody(name.to_string()))
    }

    pub fn get(&self, index: usize) -> Option<&OrbitalBodyDescriptor> {
        self.bodies.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrbitalBodyDescriptor> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl Default for BodyRegistry {
    fn default() -> Self {
        Self::solar_system()
    }
}
