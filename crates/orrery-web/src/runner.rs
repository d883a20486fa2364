use orrery_engine::{
    Game, GameConfig, EngineContext,
    InputEvent, InputQueue, RenderBuffer,
    FramePacing, ProtocolLayout, CameraUniform,
};
use orrery_engine::bridge::protocol::{
    HEADER_FLOATS, HEADER_FRAME_COUNTER, HEADER_INSTANCE_COUNT, HEADER_OPAQUE_SPLIT,
    HEADER_LIGHT_COUNT, HEADER_EVENT_COUNT, HEADER_VIEWPORT_WIDTH, HEADER_VIEWPORT_HEIGHT,
    HEADER_CLEAR_R, HEADER_CLEAR_G, HEADER_CLEAR_B,
    HEADER_AMBIENT_R, HEADER_AMBIENT_G, HEADER_AMBIENT_B, HEADER_AMBIENT_INTENSITY,
};
use orrery_engine::systems::render::build_render_buffer;

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    render_buffer: RenderBuffer,
    pacing: FramePacing,
    config: GameConfig,
    layout: ProtocolLayout,
    header: [f32; HEADER_FLOATS],
    camera: CameraUniform,
    frame_counter: u32,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let layout = ProtocolLayout::from_config(&config);

        Self {
            ctx: EngineContext::from_config(&config),
            input: InputQueue::new(),
            render_buffer: RenderBuffer::with_capacity(config.max_instances),
            pacing: FramePacing::from_fixed_dt(config.fixed_dt),
            header: layout.initial_header(),
            camera: CameraUniform {
                view_proj: [[0.0; 4]; 4],
                position: [0.0; 4],
            },
            frame_counter: 0,
            layout,
            config,
            game,
            initialized: false,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        self.ctx.propagate_transforms();
        self.publish();
        self.initialized = true;
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Hand a JSON configuration document to the game.
    pub fn load_config(&mut self, json: &str) {
        self.game.load_config(json);
    }

    /// Run one host frame: update the game, propagate transforms, publish buffers.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        self.ctx.clear_frame_data();

        let steps = self.pacing.steps(dt);
        self.ctx.dt = self.pacing.step_dt(dt);
        for _ in 0..steps {
            self.game.update(&mut self.ctx, &self.input);
            // Input is consumed by the first update of the frame only.
            self.input.drain();
        }

        self.ctx.propagate_transforms();
        self.publish();
    }

    /// Rebuild the render buffer and header from the current engine state.
    fn publish(&mut self) {
        build_render_buffer(self.ctx.scene.iter(), &mut self.render_buffer);
        self.render_buffer.instances.truncate(self.layout.max_instances);
        self.ctx.events.truncate(self.layout.max_events);
        self.camera = self.ctx.camera.uniform();

        self.frame_counter = self.frame_counter.wrapping_add(1);
        let ambient = self.ctx.lights.ambient();
        let h = &mut self.header;
        h[HEADER_FRAME_COUNTER] = self.frame_counter as f32;
        h[HEADER_INSTANCE_COUNT] = self.render_buffer.instance_count() as f32;
        h[HEADER_OPAQUE_SPLIT] = self.render_buffer.opaque_split.min(self.render_buffer.instance_count()) as f32;
        h[HEADER_LIGHT_COUNT] = self.ctx.lights.count().min(self.layout.max_lights) as f32;
        h[HEADER_EVENT_COUNT] = self.ctx.events.len() as f32;
        h[HEADER_VIEWPORT_WIDTH] = self.ctx.viewport_width;
        h[HEADER_VIEWPORT_HEIGHT] = self.ctx.viewport_height;
        h[HEADER_CLEAR_R] = self.ctx.clear_color[0];
        h[HEADER_CLEAR_G] = self.ctx.clear_color[1];
        h[HEADER_CLEAR_B] = self.ctx.clear_color[2];
        h[HEADER_AMBIENT_R] = ambient[0];
        h[HEADER_AMBIENT_G] = ambient[1];
        h[HEADER_AMBIENT_B] = ambient[2];
        h[HEADER_AMBIENT_INTENSITY] = self.ctx.lights.ambient_intensity();
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn ui_state_json(&self) -> String {
        self.game.ui_state_json()
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn opaque_split(&self) -> u32 {
        self.render_buffer.opaque_split
    }

    pub fn lights_ptr(&self) -> *const f32 {
        self.ctx.lights.buffer_ptr()
    }

    pub fn light_count(&self) -> u32 {
        self.ctx.lights.count().min(self.layout.max_lights) as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    pub fn camera_ptr(&self) -> *const f32 {
        &self.camera as *const CameraUniform as *const f32
    }

    pub fn stars_ptr(&self) -> *const f32 {
        self.ctx.stars.ptr()
    }

    pub fn star_count(&self) -> u32 {
        self.ctx.stars.len() as u32
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_instances(&self) -> u32 {
        self.layout.max_instances as u32
    }

    pub fn max_lights(&self) -> u32 {
        self.layout.max_lights as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
