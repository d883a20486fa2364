use crate::api::types::{EntityId, GameEvent};
use crate::components::entity::Entity;
use crate::core::scene::Scene;
use crate::extensions::transform::{LocalTransform, TransformGraph};
use crate::input::queue::InputQueue;
use crate::renderer::camera::Camera3D;
use crate::systems::lighting::LightState;
use crate::systems::starfield::StarField;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds. `None` runs exactly one update per host frame.
    pub fixed_dt: Option<f32>,
    /// Initial viewport width in CSS pixels (updated later by resize events).
    pub viewport_width: f32,
    /// Initial viewport height in CSS pixels.
    pub viewport_height: f32,
    /// Maximum number of mesh instances (default: 64).
    pub max_instances: usize,
    /// Maximum number of point lights (default: 4).
    pub max_lights: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    /// Number of background stars (default: 0, no star field).
    pub star_count: usize,
    /// Half-size of the cube the star field is scattered in.
    pub star_extent: f32,
    /// Seed for the engine RNG (star field and anything the game draws from it).
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: None,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            max_instances: 64,
            max_lights: crate::bridge::protocol::DEFAULT_MAX_LIGHTS,
            max_events: 32,
            star_count: 0,
            star_extent: 1000.0,
            seed: 42,
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn nodes, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One simulation update. Reads queued input, advances state, writes local transforms.
    /// `ctx.dt` holds the delta for this update.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Apply a JSON configuration document supplied by the page.
    /// Games decide how to report rejected documents; the default ignores them.
    fn load_config(&mut self, _json: &str) {}

    /// JSON snapshot of whatever the UI layer needs to display.
    fn ui_state_json(&self) -> String {
        String::from("{}")
    }
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub transforms: TransformGraph,
    pub camera: Camera3D,
    pub lights: LightState,
    pub stars: StarField,
    pub events: Vec<GameEvent>,
    /// Background clear color (linear RGB).
    pub clear_color: [f32; 3],
    /// Seconds handed to the current update (raw frame time, or the fixed step).
    pub dt: f32,
    /// Current viewport size in CSS pixels.
    pub viewport_width: f32,
    pub viewport_height: f32,
    next_id: u32,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::from_config(&GameConfig::default())
    }

    /// Create a context sized and seeded from a GameConfig.
    pub fn from_config(config: &GameConfig) -> Self {
        let mut camera = Camera3D::default();
        camera.resize(config.viewport_width, config.viewport_height);
        Self {
            scene: Scene::with_capacity(config.max_instances),
            transforms: TransformGraph::new(),
            camera,
            lights: LightState::with_capacity(config.max_lights),
            stars: StarField::generate(config.star_count, config.star_extent, config.seed),
            events: Vec::with_capacity(config.max_events),
            clear_color: [0.0, 0.0, 0.0],
            dt: 0.0,
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
            next_id: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawn a node into the scene and register it in the transform hierarchy.
    /// The node's world transform is derived from `local` (and `parent`, if any)
    /// on the next propagation.
    pub fn spawn(&mut self, entity: Entity, local: LocalTransform, parent: Option<EntityId>) -> EntityId {
        let id = entity.id;
        self.scene.spawn(entity);
        self.transforms.register_with(id, local);
        if parent.is_some() {
            self.transforms.set_parent(id, parent);
        }
        id
    }

    /// Track a new viewport size. Zero or negative sizes are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport_width = width;
            self.viewport_height = height;
            self.camera.resize(width, height);
        }
    }

    /// Emit a game event to be forwarded to the UI layer.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }

    /// Recompute world transforms from the hierarchy.
    /// Called automatically by the game runner after `Game::update()`.
    pub fn propagate_transforms(&mut self) {
        self.transforms.propagate(&mut self.scene);
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}
