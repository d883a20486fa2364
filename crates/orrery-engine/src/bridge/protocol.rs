/// SharedArrayBuffer layout.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 24 floats]
/// [Instances: max_instances × 20 floats]
/// [Lights: max_lights × 8 floats]
/// [Events: max_events × 4 floats]
/// [Camera: 20 floats]
/// [Stars: star_count × 3 floats]
/// ```
///
/// Capacities are written once into the header at init.
/// TypeScript reads them from the header to compute offsets dynamically.

use crate::api::game::GameConfig;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 24;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_PROTOCOL_VERSION: usize = 2;
pub const HEADER_MAX_INSTANCES: usize = 3;
pub const HEADER_INSTANCE_COUNT: usize = 4;
pub const HEADER_OPAQUE_SPLIT: usize = 5;
pub const HEADER_MAX_LIGHTS: usize = 6;
pub const HEADER_LIGHT_COUNT: usize = 7;
pub const HEADER_MAX_EVENTS: usize = 8;
pub const HEADER_EVENT_COUNT: usize = 9;
pub const HEADER_STAR_COUNT: usize = 10;
pub const HEADER_VIEWPORT_WIDTH: usize = 11;
pub const HEADER_VIEWPORT_HEIGHT: usize = 12;
pub const HEADER_CLEAR_R: usize = 13;
pub const HEADER_CLEAR_G: usize = 14;
pub const HEADER_CLEAR_B: usize = 15;
pub const HEADER_AMBIENT_R: usize = 16;
pub const HEADER_AMBIENT_G: usize = 17;
pub const HEADER_AMBIENT_B: usize = 18;
pub const HEADER_AMBIENT_INTENSITY: usize = 19;
// 20..24 reserved.

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per mesh instance (wire format, fixed).
pub const INSTANCE_FLOATS: usize = 20;

/// Floats per point light: x, y, z, intensity, r, g, b, range.
pub const LIGHT_FLOATS: usize = 8;

/// Floats per game event: kind, a, b, c.
pub const EVENT_FLOATS: usize = 4;

/// Floats in the camera block: view-projection matrix + position.
pub const CAMERA_FLOATS: usize = 20;

/// Floats per star: x, y, z.
pub const STAR_FLOATS: usize = 3;

pub const DEFAULT_MAX_LIGHTS: usize = 4;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_instances: usize,
    pub max_lights: usize,
    pub max_events: usize,
    /// Star count is fixed at init, so the star section is sized exactly.
    pub star_count: usize,

    pub instance_data_offset: usize,
    pub light_data_offset: usize,
    pub event_data_offset: usize,
    pub camera_data_offset: usize,
    pub star_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_instances: usize, max_lights: usize, max_events: usize, star_count: usize) -> Self {
        let instance_data_offset = HEADER_FLOATS;
        let light_data_offset = instance_data_offset + max_instances * INSTANCE_FLOATS;
        let event_data_offset = light_data_offset + max_lights * LIGHT_FLOATS;
        let camera_data_offset = event_data_offset + max_events * EVENT_FLOATS;
        let star_data_offset = camera_data_offset + CAMERA_FLOATS;
        let buffer_total_floats = star_data_offset + star_count * STAR_FLOATS;

        Self {
            max_instances,
            max_lights,
            max_events,
            star_count,
            instance_data_offset,
            light_data_offset,
            event_data_offset,
            camera_data_offset,
            star_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Compute layout from a GameConfig.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.max_instances,
            config.max_lights,
            config.max_events,
            config.star_count,
        )
    }

    /// Header with the capacity fields filled in and everything per-frame zeroed.
    pub fn initial_header(&self) -> [f32; HEADER_FLOATS] {
        let mut header = [0.0; HEADER_FLOATS];
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_MAX_INSTANCES] = self.max_instances as f32;
        header[HEADER_MAX_LIGHTS] = self.max_lights as f32;
        header[HEADER_MAX_EVENTS] = self.max_events as f32;
        header[HEADER_STAR_COUNT] = self.star_count as f32;
        header
    }
}
