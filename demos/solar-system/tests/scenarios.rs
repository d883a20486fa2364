use std::f64::consts::{FRAC_PI_2, TAU};

use glam::{Vec2, Vec3};
use orrery_engine::{Camera3D, EngineContext, Entity, EntityId, Game, InputEvent, InputQueue, MeshColor, MeshComponent, Scene};
use solar_system::bodies::{BodyRegistry, OrbitalBodyDescriptor};
use solar_system::config::ControlConfig;
use solar_system::controls::CameraControlState;
use solar_system::picking::{pick, PickId, Pickable};
use solar_system::simulation::{advance, tick, SolarState};
use solar_system::state::{BodyState, PlaybackState};
use solar_system::SolarSystem;

fn angle_delta(after: f64, before: f64) -> f64 {
    (after - before).rem_euclid(TAU)
}

fn planets() -> (BodyRegistry, Vec<BodyState>) {
    let registry = BodyRegistry::solar_system();
    let bodies = registry
        .iter()
        .enumerate()
        .map(|(i, b)| BodyState::new(b.name.clone(), i as f64 * 0.7))
        .collect();
    (registry, bodies)
}

#[test]
fn unpaused_step_adds_speed_times_multiplier() {
    let (registry, mut bodies) = planets();
    bodies[1].set_speed_multiplier(2.0);
    bodies[4].set_speed_multiplier(0.5);
    bodies[6].set_speed_multiplier(-1.0);

    for _ in 0..500 {
        let before = bodies.clone();
        advance(1.0 / 60.0, &PlaybackState::default(), &mut bodies, &registry).unwrap();
        for (b, a) in before.iter().zip(&bodies) {
            let desc = registry.describe(&a.name).unwrap();
            let expected = (desc.base_angular_speed * a.speed_multiplier()).rem_euclid(TAU);
            let got = angle_delta(a.current_angle(), b.current_angle());
            // Compare on the circle.
            let diff = (got - expected).abs();
            assert!(diff.min(TAU - diff) < 1e-9, "{}: {got} vs {expected}", a.name);
        }
    }
}

#[test]
fn pause_freezes_and_resume_does_not_catch_up() {
    let (registry, bodies) = planets();
    let mut state = SolarState::new(bodies, CameraControlState::default());
    state = tick(&state, 0.016, &registry).unwrap();

    state.playback.toggle_pause();
    let frozen: Vec<f64> = state.bodies.iter().map(|b| b.current_angle()).collect();
    for _ in 0..1000 {
        state = tick(&state, 0.016, &registry).unwrap();
    }
    let still: Vec<f64> = state.bodies.iter().map(|b| b.current_angle()).collect();
    assert_eq!(frozen, still);

    state.playback.toggle_pause();
    state = tick(&state, 0.016, &registry).unwrap();
    for (body, before) in state.bodies.iter().zip(&frozen) {
        let speed = registry.describe(&body.name).unwrap().base_angular_speed;
        assert!((angle_delta(body.current_angle(), *before) - speed).abs() < 1e-9);
    }
}

#[test]
fn zero_multiplier_position_is_bit_identical() {
    let (registry, mut bodies) = planets();
    bodies[3].set_speed_multiplier(0.0);
    let first = advance(0.0, &PlaybackState::default(), &mut bodies, &registry).unwrap();
    let second = advance(0.0, &PlaybackState::default(), &mut bodies, &registry).unwrap();
    let key = &bodies[3].name;
    assert_eq!(first[key].to_array(), second[key].to_array());
    assert_ne!(first["mercury"], second["mercury"]);
}

#[test]
fn pitch_survives_ten_thousand_extreme_drags() {
    let mut camera = CameraControlState::default();
    for _ in 0..10_000 {
        camera.apply_drag(0.0, 1000.0);
        assert!((-FRAC_PI_2..=FRAC_PI_2).contains(&camera.pitch()));
    }
    for _ in 0..10_000 {
        camera.apply_drag(-37.0, -1000.0);
        assert!((-FRAC_PI_2..=FRAC_PI_2).contains(&camera.pitch()));
    }
}

#[test]
fn distance_stays_in_range_for_any_zoom_sequence() {
    let mut camera = CameraControlState::default();
    let deltas = [1.0e9, -3.0, 250.0, -1.0e12, 0.5, 7000.0, -7000.0];
    for d in deltas.iter().cycle().take(1000) {
        camera.apply_zoom(*d);
        assert!((10.0..=200.0).contains(&camera.distance()));
    }
}

#[test]
fn zero_angles_round_trip_to_z_axis() {
    for d in [10.0, 33.3, 200.0] {
        let camera = CameraControlState::with_orbit(&ControlConfig::default(), 0.0, 0.0, d);
        let p = camera.current_position();
        assert!((p - Vec3::new(0.0, 0.0, d as f32)).length() < 1e-4);
    }
}

#[test]
fn earth_like_first_step() {
    let registry = BodyRegistry::new(vec![OrbitalBodyDescriptor::new("earth", 16.0, 0.01, 0.0)]).unwrap();
    let mut bodies = vec![BodyState::new("earth", 0.0)];
    let positions = advance(0.016, &PlaybackState::default(), &mut bodies, &registry).unwrap();
    let p = positions["earth"];
    let expected = Vec3::new((16.0 * 0.01f64.cos()) as f32, 0.0, (16.0 * 0.01f64.sin()) as f32);
    assert!((p - expected).length() < 1e-5);
    assert!((p.x - 15.9992).abs() < 1e-3 && (p.z - 0.16).abs() < 1e-3);
}

#[test]
fn empty_pickable_set_never_hits() {
    let mut scene = Scene::new();
    scene.spawn(Entity::new(EntityId(1)).with_mesh(MeshComponent::sphere(50.0, MeshColor::default())));
    let camera = Camera3D::default();
    for ndc in [Vec2::ZERO, Vec2::new(0.5, -0.5), Vec2::new(-1.0, 1.0)] {
        assert_eq!(pick(ndc, &camera, &[], &scene).map(|p| p.id), None);
    }
}

#[test]
fn overlapping_pickables_resolve_to_first_listed() {
    let mut scene = Scene::new();
    // Two identical spheres in the same spot: equal hit distance.
    for id in [1, 2] {
        scene.spawn(Entity::new(EntityId(id)).with_mesh(MeshComponent::sphere(3.0, MeshColor::default())));
    }
    let mut camera = Camera3D::default();
    camera.look_at(Vec3::new(0.0, 0.0, 40.0), Vec3::ZERO);

    let forward = [
        Pickable { id: PickId::Body(0), node: EntityId(1) },
        Pickable { id: PickId::Body(1), node: EntityId(2) },
    ];
    let reversed = [forward[1], forward[0]];
    assert_eq!(pick(Vec2::ZERO, &camera, &forward, &scene).map(|p| p.id), Some(PickId::Body(0)));
    assert_eq!(pick(Vec2::ZERO, &camera, &reversed, &scene).map(|p| p.id), Some(PickId::Body(1)));
}

#[test]
fn full_game_runs_frames_and_reports_ui_state() {
    let mut game = SolarSystem::new();
    let mut ctx = EngineContext::from_config(&game.config());
    game.init(&mut ctx);

    let start: Vec<f64> = game.state().bodies.iter().map(|b| b.current_angle()).collect();
    for _ in 0..120 {
        ctx.clear_frame_data();
        game.update(&mut ctx, &InputQueue::new());
        ctx.propagate_transforms();
    }
    for ((body, before), desc) in game.state().bodies.iter().zip(&start).zip(game.registry().iter()) {
        let expected = (desc.base_angular_speed * 120.0).rem_euclid(TAU);
        assert!((angle_delta(body.current_angle(), *before) - expected).abs() < 1e-9);
    }

    let mut input = InputQueue::new();
    input.push(InputEvent::Custom { kind: 1, a: 0.0, b: 1.5, c: 0.0 });
    input.push(InputEvent::Custom { kind: 2, a: 0.0, b: 0.0, c: 0.0 });
    ctx.clear_frame_data();
    game.update(&mut ctx, &input);

    let json: serde_json::Value = serde_json::from_str(&game.ui_state_json()).unwrap();
    assert_eq!(json["paused"], true);
    assert_eq!(json["bodies"][0]["key"], "mercury");
    assert_eq!(json["bodies"][0]["speedMultiplier"], 1.5);
    assert!(json["selected"].is_null());
}
