/// Linear RGB color for mesh rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl MeshColor {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed 0xRRGGBB value.
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for MeshColor {
    fn default() -> Self {
        Self { r: 0.6, g: 0.6, b: 0.8 }
    }
}

/// Mesh primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeshShape {
    Sphere { radius: f32 },
    /// Flat annulus in the node's local XZ plane.
    Ring { inner: f32, outer: f32 },
}

impl MeshShape {
    /// Wire value of the shape discriminant.
    pub fn type_id(&self) -> f32 {
        match self {
            MeshShape::Sphere { .. } => 0.0,
            MeshShape::Ring { .. } => 1.0,
        }
    }

    pub fn bounding_radius(&self) -> f32 {
        match *self {
            MeshShape::Sphere { radius } => radius,
            MeshShape::Ring { outer, .. } => outer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshComponent {
    pub shape: MeshShape,
    pub color: MeshColor,
    /// 0.0 = invisible, 1.0 = opaque.
    pub opacity: f32,
    /// Phong specular exponent (default: 30.0).
    pub shininess: f32,
    /// Self-illumination multiplier (default: 0.0, unlit surfaces react to lights only).
    pub emissive: f32,
    /// Whether the shape takes part in lighting at all (stars and guides do not).
    pub lit: bool,
}

impl Default for MeshComponent {
    fn default() -> Self {
        Self {
            shape: MeshShape::Sphere { radius: 1.0 },
            color: MeshColor::default(),
            opacity: 1.0,
            shininess: 30.0,
            emissive: 0.0,
            lit: true,
        }
    }
}

impl MeshComponent {
    pub fn new(shape: MeshShape, color: MeshColor) -> Self {
        Self {
            shape,
            color,
            ..Default::default()
        }
    }

    pub fn sphere(radius: f32, color: MeshColor) -> Self {
        Self::new(MeshShape::Sphere { radius }, color)
    }

    pub fn ring(inner: f32, outer: f32, color: MeshColor) -> Self {
        Self::new(MeshShape::Ring { inner, outer }, color)
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }

    pub fn with_emissive(mut self, emissive: f32) -> Self {
        self.emissive = emissive;
        self
    }

    pub fn unlit(mut self) -> Self {
        self.lit = false;
        self
    }
}
