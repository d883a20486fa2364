/// Solar System: eight bodies on inclined circular orbits around a star.
///
/// Orbit camera: drag to rotate, wheel to zoom. Hover and click to pick bodies.
/// Space pauses, D flips the background, R resets every speed slider.

use glam::{Quat, Vec2, Vec3};
use orrery_engine::*;
use serde::Serialize;

use crate::bodies::{self, BodyRegistry};
use crate::config::ControlConfig;
use crate::controls::CameraControlState;
use crate::picking::{self, PickId, Pickable, Selection};
use crate::simulation::{self, SolarState};
use crate::state::{BodyState, DisplayMode};

// ── Custom event kinds from the UI ───────────────────────────────────

/// a = body index (table order, 0-based), b = multiplier.
const CUSTOM_SET_SPEED: u32 = 1;
const CUSTOM_TOGGLE_PAUSE: u32 = 2;
const CUSTOM_TOGGLE_DISPLAY: u32 = 3;
const CUSTOM_RESET_SPEEDS: u32 = 4;
/// Viewport resize (sent by the host as kind=99, a = width, b = height).
const CUSTOM_RESIZE: u32 = 99;

// ── Game event kinds to the UI ───────────────────────────────────────

const EVENT_PLAYBACK: f32 = 1.0;
const EVENT_HOVER: f32 = 2.0;
const EVENT_SELECTION: f32 = 3.0;

// ── Keys ─────────────────────────────────────────────────────────────

const KEY_SPACE: u32 = 32;
const KEY_D: u32 = 68;
const KEY_R: u32 = 82;

// ── Scene ────────────────────────────────────────────────────────────

const SEED: u64 = 0x5EED_501A;
/// Start angles draw from their own stream; the star field keeps `SEED`.
const ANGLE_SEED: u64 = SEED ^ 0x9E37_79B9_7F4A_7C15;
const STAR_COUNT: usize = 2000;
const STAR_EXTENT: f32 = 1000.0;

const AMBIENT_COLOR: u32 = 0x404040;
const AMBIENT_INTENSITY: f32 = 0.3;
const SUN_LIGHT_INTENSITY: f32 = 1.0;
const SUN_LIGHT_RANGE: f32 = 100.0;

const GUIDE_HALF_WIDTH: f32 = 0.1;
const GUIDE_COLOR: u32 = 0x444444;
const GUIDE_OPACITY: f32 = 0.3;

const RING_INNER: f32 = 1.2;
const RING_OUTER: f32 = 2.0;
const RING_OPACITY: f32 = 0.8;

pub struct SolarSystem {
    registry: BodyRegistry,
    config: ControlConfig,
    state: SolarState,
    selection: Selection,
    sun_id: Option<EntityId>,
    /// Body node per registry entry.
    body_ids: Vec<EntityId>,
    pickables: Vec<Pickable>,
}

impl SolarSystem {
    pub fn new() -> Self {
        Self::with_seed(ANGLE_SEED)
    }

    /// Build with a specific seed for the starting angles.
    pub fn with_seed(seed: u64) -> Self {
        let registry = BodyRegistry::solar_system();
        let config = ControlConfig::default();
        let bodies = BodyState::for_registry(&registry, &mut Rng::new(seed));
        let state = SolarState::new(bodies, CameraControlState::new(&config));
        Self {
            registry,
            config,
            state,
            selection: Selection::default(),
            sun_id: None,
            body_ids: Vec::new(),
            pickables: Vec::new(),
        }
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn state(&self) -> &SolarState {
        &self.state
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn control_config(&self) -> &ControlConfig {
        &self.config
    }

    // ── Controls ───────────────────────────────────────────────────

    /// Set one body's multiplier by table index. Out-of-range indices are ignored.
    pub fn set_speed(&mut self, index: usize, multiplier: f64) {
        match self.state.bodies.get_mut(index) {
            Some(body) => body.set_speed_multiplier(multiplier),
            None => log::warn!("solar-system: no body at index {index}"),
        }
    }

    pub fn toggle_pause(&mut self) {
        let paused = self.state.playback.toggle_pause();
        log::info!("solar-system: {}", if paused { "paused" } else { "resumed" });
    }

    pub fn toggle_display(&mut self) {
        let mode = self.state.playback.toggle_display();
        log::info!("solar-system: display mode {mode:?}");
    }

    pub fn reset_speeds(&mut self) {
        simulation::reset_speeds(&mut self.state.bodies);
        log::info!("solar-system: speeds reset");
    }

    /// Install a validated control config: camera limits and initial multipliers.
    pub fn apply_config(&mut self, config: ControlConfig) {
        self.state.camera.apply_config(&config);
        for (key, &multiplier) in &config.speed_multipliers {
            if let Ok(index) = self.registry.index_of(key) {
                self.set_speed(index, multiplier);
            }
        }
        self.config = config;
    }

    // ── Helpers ────────────────────────────────────────────────────

    fn sync_camera(&self, ctx: &mut EngineContext) {
        let camera = &mut ctx.camera;
        camera.fov_y = self.config.fov_y_degrees.to_radians();
        camera.near = self.config.near;
        camera.far = self.config.far;
        camera.look_at(self.state.camera.current_position(), self.state.camera.target());
        camera.up = self.state.camera.up_vector();
    }

    fn pick_at(&self, ctx: &EngineContext, x: f32, y: f32) -> Option<PickId> {
        let ndc = Camera3D::screen_to_ndc(Vec2::new(x, y), ctx.viewport_width, ctx.viewport_height);
        picking::pick(ndc, &ctx.camera, &self.pickables, &ctx.scene).map(|p| p.id)
    }

    fn log_selection(&self) {
        match self.selection.selected() {
            Some(id) => log::debug!("solar-system: selected {}", self.label_of(id)),
            None => log::debug!("solar-system: selection cleared"),
        }
    }

    fn label_of(&self, id: PickId) -> &str {
        match id {
            PickId::Star => bodies::SUN_LABEL,
            PickId::Body(i) => self.registry.get(i).map(|b| b.label.as_str()).unwrap_or(""),
        }
    }

    fn description_of(&self, id: PickId) -> &str {
        match id {
            PickId::Star => bodies::SUN_DESCRIPTION,
            PickId::Body(i) => self.registry.get(i).map(|b| b.description.as_str()).unwrap_or(""),
        }
    }

    fn handle_input(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for event in input.iter() {
            match *event {
                InputEvent::PointerDown { x, y } => {
                    self.state.camera.begin_drag(Vec2::new(x, y));
                }
                InputEvent::PointerMove { x, y } => {
                    if self.state.camera.drag_to(Vec2::new(x, y)) {
                        self.sync_camera(ctx);
                    } else {
                        let hit = self.pick_at(ctx, x, y);
                        if self.selection.hover(hit) {
                            self.log_selection();
                        }
                    }
                }
                InputEvent::PointerUp { x, y } => {
                    if let Some(travel) = self.state.camera.end_drag(Vec2::new(x, y)) {
                        if travel < self.config.click_threshold_px {
                            let hit = self.pick_at(ctx, x, y);
                            if self.selection.click(hit) {
                                self.log_selection();
                            }
                        }
                    }
                }
                InputEvent::Wheel { delta_y } => {
                    self.state.camera.apply_zoom(delta_y as f64);
                    self.sync_camera(ctx);
                }
                InputEvent::KeyDown { key_code } => match key_code {
                    KEY_SPACE => self.toggle_pause(),
                    KEY_D => self.toggle_display(),
                    KEY_R => self.reset_speeds(),
                    _ => {}
                },
                InputEvent::KeyUp { .. } => {}
                InputEvent::Custom { kind, a, b, .. } => match kind {
                    CUSTOM_SET_SPEED => {
                        if a >= 0.0 {
                            self.set_speed(a as usize, b as f64);
                        }
                    }
                    CUSTOM_TOGGLE_PAUSE => self.toggle_pause(),
                    CUSTOM_TOGGLE_DISPLAY => self.toggle_display(),
                    CUSTOM_RESET_SPEEDS => self.reset_speeds(),
                    CUSTOM_RESIZE => {
                        ctx.resize(a, b);
                        log::debug!("solar-system: viewport {a}x{b}");
                    }
                    _ => {}
                },
            }
        }
    }

    /// Copy the latest simulation results into the scene's local transforms.
    fn write_transforms(&self, ctx: &mut EngineContext) {
        if let Some(local) = self.sun_id.and_then(|id| ctx.transforms.get_local_mut(id)) {
            local.rotation = Quat::from_rotation_y(self.state.sun_spin as f32);
        }
        for (body, &id) in self.state.bodies.iter().zip(&self.body_ids) {
            let Some(local) = ctx.transforms.get_local_mut(id) else { continue };
            if let Some(&pos) = self.state.positions.get(&body.name) {
                local.offset = pos;
            }
            let (spin_y, spin_z) = body.spin;
            local.rotation = Quat::from_rotation_y(spin_y as f32) * Quat::from_rotation_z(spin_z as f32);
        }
    }
}

impl Default for SolarSystem {
    fn default() -> Self {
        Self::new()
    }
}

// ── UI snapshot ──────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UiBody<'a> {
    key: &'a str,
    label: &'a str,
    speed_multiplier: f64,
}

#[derive(Serialize)]
struct UiSelection<'a> {
    label: &'a str,
    description: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UiSnapshot<'a> {
    bodies: Vec<UiBody<'a>>,
    paused: bool,
    display_mode: DisplayMode,
    hovered: Option<&'a str>,
    selected: Option<UiSelection<'a>>,
}

impl Game for SolarSystem {
    fn config(&self) -> GameConfig {
        GameConfig {
            max_instances: 1 + 3 * bodies::BODY_COUNT,
            max_lights: 1,
            star_count: STAR_COUNT,
            star_extent: STAR_EXTENT,
            seed: SEED,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        ctx.lights.set_ambient(MeshColor::from_hex(AMBIENT_COLOR).to_array(), AMBIENT_INTENSITY);
        ctx.lights.add(PointLight::new(Vec3::ZERO, [1.0, 1.0, 1.0], SUN_LIGHT_INTENSITY, SUN_LIGHT_RANGE));

        // ── Star ─────────────────────────────────────────────────────
        let sun = ctx.next_id();
        ctx.spawn(
            Entity::new(sun).with_tag("sun").with_mesh(
                MeshComponent::sphere(bodies::SUN_RADIUS, MeshColor::from_hex(bodies::SUN_COLOR))
                    .with_emissive(1.0)
                    .unlit(),
            ),
            LocalTransform::new(),
            None,
        );
        self.sun_id = Some(sun);
        self.pickables.push(Pickable { id: PickId::Star, node: sun });

        // ── Bodies, each inside its inclined orbit group ─────────────
        for (index, desc) in self.registry.iter().enumerate() {
            let group = ctx.next_id();
            ctx.spawn(
                Entity::new(group).with_tag(format!("{}-orbit", desc.name)),
                LocalTransform::new().with_rotation(desc.orbit_rotation()),
                None,
            );

            let radius = desc.orbital_distance as f32;
            let guide = ctx.next_id();
            ctx.spawn(
                Entity::new(guide).with_tag(format!("{}-guide", desc.name)).with_mesh(
                    MeshComponent::ring(
                        radius - GUIDE_HALF_WIDTH,
                        radius + GUIDE_HALF_WIDTH,
                        MeshColor::from_hex(GUIDE_COLOR),
                    )
                    .with_opacity(GUIDE_OPACITY)
                    .unlit(),
                ),
                LocalTransform::new(),
                Some(group),
            );

            let angle = self.state.bodies.get(index).map(|b| b.current_angle()).unwrap_or(0.0);
            let body = ctx.next_id();
            ctx.spawn(
                Entity::new(body)
                    .with_tag(desc.name.clone())
                    .with_mesh(MeshComponent::sphere(desc.visual_radius, MeshColor::from_hex(desc.color))),
                LocalTransform::new().with_offset(desc.plane_position(angle)),
                Some(group),
            );

            if desc.ringed {
                let ring = ctx.next_id();
                ctx.spawn(
                    Entity::new(ring).with_tag(format!("{}-rings", desc.name)).with_mesh(
                        MeshComponent::ring(
                            desc.visual_radius * RING_INNER,
                            desc.visual_radius * RING_OUTER,
                            MeshColor::from_hex(desc.color),
                        )
                        .with_opacity(RING_OPACITY)
                        .unlit(),
                    ),
                    LocalTransform::new(),
                    Some(body),
                );
            }

            self.body_ids.push(body);
            self.pickables.push(Pickable { id: PickId::Body(index), node: body });
        }

        ctx.clear_color = MeshColor::from_hex(self.state.playback.display_mode().clear_color_hex()).to_array();
        self.state.camera_position = self.state.camera.current_position();
        self.sync_camera(ctx);

        log::info!("solar-system: {} bodies, {} stars", self.registry.len(), ctx.stars.len());
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        self.handle_input(ctx, input);

        match simulation::tick(&self.state, ctx.dt, &self.registry) {
            Ok(next) => self.state = next,
            Err(e) => log::error!("solar-system: step skipped: {e}"),
        }

        self.write_transforms(ctx);
        self.sync_camera(ctx);
        ctx.clear_color = MeshColor::from_hex(self.state.playback.display_mode().clear_color_hex()).to_array();

        // ── Emit game events ─────────────────────────────────────────
        let playback = self.state.playback;
        ctx.emit_event(GameEvent {
            kind: EVENT_PLAYBACK,
            a: if playback.is_paused() { 1.0 } else { 0.0 },
            b: playback.display_mode().as_f32(),
            c: 0.0,
        });
        ctx.emit_event(GameEvent {
            kind: EVENT_HOVER,
            a: picking::wire_index(self.selection.hovered()),
            b: 0.0,
            c: 0.0,
        });
        ctx.emit_event(GameEvent {
            kind: EVENT_SELECTION,
            a: picking::wire_index(self.selection.selected()),
            b: 0.0,
            c: 0.0,
        });
    }

    fn load_config(&mut self, json: &str) {
        match ControlConfig::from_json(json, &self.registry) {
            Ok(config) => {
                self.apply_config(config);
                log::info!("solar-system: configuration applied");
            }
            Err(e) => log::warn!("solar-system: configuration rejected: {e}"),
        }
    }

    fn ui_state_json(&self) -> String {
        let snapshot = UiSnapshot {
            bodies: self
                .registry
                .iter()
                .zip(&self.state.bodies)
                .map(|(desc, state)| UiBody {
                    key: &desc.name,
                    label: &desc.label,
                    speed_multiplier: state.speed_multiplier(),
                })
                .collect(),
            paused: self.state.playback.is_paused(),
            display_mode: self.state.playback.display_mode(),
            hovered: self.selection.hovered().map(|id| self.label_of(id)),
            selected: self.selection.selected().map(|id| UiSelection {
                label: self.label_of(id),
                description: self.description_of(id),
            }),
        };
        serde_json::to_string(&snapshot).unwrap_or_else(|e| {
            log::warn!("solar-system: UI snapshot failed: {e}");
            String::from("{}")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> (SolarSystem, EngineContext) {
        let mut game = SolarSystem::new();
        let mut ctx = EngineContext::from_config(&game.config());
        game.init(&mut ctx);
        ctx.propagate_transforms();
        (game, ctx)
    }

    fn frame(game: &mut SolarSystem, ctx: &mut EngineContext, events: &[InputEvent]) {
        let mut input = InputQueue::new();
        for &e in events {
            input.push(e);
        }
        ctx.clear_frame_data();
        ctx.dt = 1.0 / 60.0;
        game.update(ctx, &input);
        ctx.propagate_transforms();
    }

    #[test]
    fn init_builds_the_scene() {
        let (game, ctx) = started();
        // star + (group, guide, body) per body + Saturn's rings
        assert_eq!(ctx.scene.len(), 1 + 3 * bodies::BODY_COUNT + 1);
        assert_eq!(ctx.stars.len(), STAR_COUNT);
        assert_eq!(ctx.lights.count(), 1);
        assert_eq!(game.pickables.len(), 1 + bodies::BODY_COUNT);
        assert!(ctx.scene.find_by_tag("saturn-rings").is_some());
        assert!((ctx.camera.position - Vec3::new(0.0, 30.0, 60.0)).length() < 1e-3);
    }

    #[test]
    fn body_world_position_includes_inclination() {
        let (mut game, mut ctx) = started();
        frame(&mut game, &mut ctx, &[]);
        let index = game.registry.index_of("mercury").unwrap();
        let desc = game.registry.describe("mercury").unwrap();
        let expected = desc.world_position(game.state.bodies[index].current_angle());
        let node = ctx.scene.get(game.body_ids[index]).unwrap();
        assert!((node.pos - expected).length() < 1e-3, "{:?} vs {expected:?}", node.pos);
    }

    #[test]
    fn keys_toggle_playback() {
        let (mut game, mut ctx) = started();
        frame(&mut game, &mut ctx, &[InputEvent::KeyDown { key_code: KEY_SPACE }]);
        assert!(game.state.playback.is_paused());
        assert_eq!(ctx.events[0], GameEvent { kind: EVENT_PLAYBACK, a: 1.0, b: 0.0, c: 0.0 });

        frame(&mut game, &mut ctx, &[InputEvent::KeyDown { key_code: KEY_D }]);
        assert_eq!(game.state.playback.display_mode(), DisplayMode::Light);
        assert_eq!(ctx.clear_color, MeshColor::from_hex(0x001122).to_array());
    }

    #[test]
    fn custom_speed_and_reset() {
        let (mut game, mut ctx) = started();
        frame(&mut game, &mut ctx, &[InputEvent::Custom { kind: CUSTOM_SET_SPEED, a: 2.0, b: 0.0, c: 0.0 }]);
        assert_eq!(game.state.bodies[2].speed_multiplier(), 0.0);
        let frozen = game.state.bodies[2].current_angle();
        frame(&mut game, &mut ctx, &[]);
        assert_eq!(game.state.bodies[2].current_angle(), frozen);

        frame(&mut game, &mut ctx, &[InputEvent::KeyDown { key_code: KEY_R }]);
        assert!(game.state.bodies.iter().all(|b| b.speed_multiplier() == 1.0));

        // Out of range is ignored.
        frame(&mut game, &mut ctx, &[InputEvent::Custom { kind: CUSTOM_SET_SPEED, a: 42.0, b: 5.0, c: 0.0 }]);
        assert!(game.state.bodies.iter().all(|b| b.speed_multiplier() == 1.0));
    }

    #[test]
    fn click_on_the_star_selects_it() {
        let (mut game, mut ctx) = started();
        // Screen center looks straight at the origin.
        let (cx, cy) = (ctx.viewport_width / 2.0, ctx.viewport_height / 2.0);
        frame(
            &mut game,
            &mut ctx,
            &[InputEvent::PointerDown { x: cx, y: cy }, InputEvent::PointerUp { x: cx, y: cy }],
        );
        assert_eq!(game.selection.selected(), Some(PickId::Star));
        assert_eq!(ctx.events[2], GameEvent { kind: EVENT_SELECTION, a: 0.0, b: 0.0, c: 0.0 });

        let json: serde_json::Value = serde_json::from_str(&game.ui_state_json()).unwrap();
        assert_eq!(json["selected"]["label"], "Sun");
        assert_eq!(json["displayMode"], "dark");
        assert_eq!(json["bodies"].as_array().unwrap().len(), bodies::BODY_COUNT);
    }

    #[test]
    fn hover_feeds_picking() {
        let (mut game, mut ctx) = started();
        let (cx, cy) = (ctx.viewport_width / 2.0, ctx.viewport_height / 2.0);
        frame(&mut game, &mut ctx, &[InputEvent::PointerMove { x: cx, y: cy }]);
        assert_eq!(game.selection.hovered(), Some(PickId::Star));
        assert_eq!(ctx.events[1], GameEvent { kind: EVENT_HOVER, a: 0.0, b: 0.0, c: 0.0 });
        assert_eq!(ctx.events[2], GameEvent { kind: EVENT_SELECTION, a: -1.0, b: 0.0, c: 0.0 });

        frame(
            &mut game,
            &mut ctx,
            &[InputEvent::PointerDown { x: cx, y: cy }, InputEvent::PointerUp { x: cx, y: cy }],
        );
        assert_eq!(ctx.events[2], GameEvent { kind: EVENT_SELECTION, a: 0.0, b: 0.0, c: 0.0 });

        // Top-left corner looks into empty sky above the orbits.
        frame(&mut game, &mut ctx, &[InputEvent::PointerMove { x: 1.0, y: 1.0 }]);
        assert_eq!(game.selection.hovered(), None);
        assert_eq!(game.selection.selected(), None);
        assert_eq!(ctx.events[1], GameEvent { kind: EVENT_HOVER, a: -1.0, b: 0.0, c: 0.0 });
        assert_eq!(ctx.events[2], GameEvent { kind: EVENT_SELECTION, a: -1.0, b: 0.0, c: 0.0 });

        let json: serde_json::Value = serde_json::from_str(&game.ui_state_json()).unwrap();
        assert!(json["selected"].is_null());
    }

    #[test]
    fn start_angles_and_stars_use_separate_streams() {
        let game = SolarSystem::new();
        let shared = Rng::new(game.config().seed).next_f64() * std::f64::consts::TAU;
        assert_ne!(game.state.bodies[0].current_angle(), shared);
    }

    #[test]
    fn drag_rotates_instead_of_clicking() {
        let (mut game, mut ctx) = started();
        let yaw = game.state.camera.yaw();
        frame(
            &mut game,
            &mut ctx,
            &[
                InputEvent::PointerDown { x: 640.0, y: 360.0 },
                InputEvent::PointerMove { x: 700.0, y: 360.0 },
                InputEvent::PointerUp { x: 700.0, y: 360.0 },
            ],
        );
        assert!((game.state.camera.yaw() - (yaw + 0.6)).abs() < 1e-6);
        assert_eq!(game.selection.selected(), None);
    }

    #[test]
    fn wheel_zooms_out() {
        let (mut game, mut ctx) = started();
        let before = game.state.camera.distance();
        frame(&mut game, &mut ctx, &[InputEvent::Wheel { delta_y: 100.0 }]);
        assert!((game.state.camera.distance() - (before + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn rejected_config_keeps_previous() {
        let (mut game, _ctx) = started();
        game.load_config(r#"{ "max_distance": 80 }"#);
        assert_eq!(game.config.max_distance, 80.0);
        assert!(game.state.camera.distance() <= 80.0);

        game.load_config(r#"{ "speed_multipliers": { "pluto": 2 } }"#);
        assert_eq!(game.config.max_distance, 80.0);
        game.load_config("not json");
        assert_eq!(game.config.max_distance, 80.0);
    }

    #[test]
    fn resize_updates_viewport() {
        let (mut game, mut ctx) = started();
        frame(&mut game, &mut ctx, &[InputEvent::Custom { kind: CUSTOM_RESIZE, a: 800.0, b: 800.0, c: 0.0 }]);
        assert_eq!(ctx.viewport_width, 800.0);
        assert_eq!(ctx.camera.aspect, 1.0);
    }
}
