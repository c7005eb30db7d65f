//! Integration tests for the character controller with Avian2D backend.
//!
//! These tests verify the complete system behavior with actual physics simulation.
//! Each test produces PROOF through explicit state checks.

#![cfg(feature = "avian2d")]

use std::time::Duration;

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use cling_controller::prelude::*;

const FIXED_UPDATE_HZ: f64 = 60.0;
const PIXELS_PER_METER: f32 = 10.0;
const RADIUS: f32 = 4.0;

/// Create a minimal test app with physics and character controller.
fn create_test_app() -> App {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins);
    app.add_plugins(TransformPlugin);
    // Insert SceneSpawner resource to satisfy Avian's ColliderHierarchyPlugin
    app.insert_resource(bevy::scene::SceneSpawner::default());
    // Character controller runs in FixedUpdate, physics runs in FixedPostUpdate
    app.add_plugins(PhysicsPlugins::default().with_length_unit(PIXELS_PER_METER));
    app.add_plugins(CharacterControllerPlugin::<Avian2dBackend>::default());
    app.insert_resource(Time::<Fixed>::from_hz(FIXED_UPDATE_HZ));
    // One fixed step per update
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / FIXED_UPDATE_HZ,
    )));

    app.finish();
    app.cleanup();
    app.update();
    app
}

/// Spawn a static box collider.
fn spawn_block(app: &mut App, position: Vec2, half_size: Vec2) -> Entity {
    let transform = Transform::from_translation(position.extend(0.0));
    app.world_mut()
        .spawn((
            transform,
            GlobalTransform::from(transform),
            RigidBody::Static,
            Collider::rectangle(half_size.x * 2.0, half_size.y * 2.0),
        ))
        .id()
}

/// Spawn a character controller with the given config.
fn spawn_character(app: &mut App, position: Vec2, config: ControllerConfig) -> Entity {
    let transform = Transform::from_translation(position.extend(0.0));
    app.world_mut()
        .spawn((
            transform,
            GlobalTransform::from(transform),
            RigidBody::Dynamic,
            CharacterController::new(),
            config,
            Collider::circle(RADIUS),
        ))
        .id()
}

/// Fast-falling tuning so tests settle quickly.
fn test_config() -> ControllerConfig {
    ControllerConfig::default()
        .with_gravity(200.0)
        .with_jump_speed(100.0)
}

fn tick(app: &mut App) {
    app.update();
}

fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        tick(app);
    }
}

fn run_for_duration(app: &mut App, duration_secs: f32) {
    let frames = (duration_secs * FIXED_UPDATE_HZ as f32).ceil() as usize;
    run_frames(app, frames);
}

fn now(app: &App) -> f32 {
    app.world().resource::<Time<Fixed>>().elapsed_secs()
}

fn snapshot(app: &App, entity: Entity) -> ControllerSnapshot {
    let controller = app.world().get::<CharacterController>(entity).unwrap();
    let config = app.world().get::<ControllerConfig>(entity).unwrap();
    controller.snapshot(now(app), config)
}

fn set_jump_pressed(app: &mut App, entity: Entity, pressed: bool) {
    if let Some(mut intent) = app.world_mut().get_mut::<MovementIntent>(entity) {
        intent.set_jump_pressed(pressed);
    }
}

// ==================== Landing ====================

mod landing {
    use super::*;

    #[test]
    fn falling_character_lands_on_floor() {
        let mut app = create_test_app();

        // Floor top at y=5
        let ground = spawn_block(&mut app, Vec2::ZERO, Vec2::new(100.0, 5.0));
        let character = spawn_character(&mut app, Vec2::new(0.0, 20.0), test_config());

        run_for_duration(&mut app, 1.5);

        let snapshot = snapshot(&app, character);
        let position = app.world().get::<Position>(character).unwrap().0;
        println!(
            "PROOF: on_ground={}, axis={:?}, surface={:?}, position={:?}",
            snapshot.on_ground,
            snapshot.adhesion_axis,
            snapshot.last_surface,
            position
        );

        assert!(snapshot.on_ground, "Character should rest on the floor");
        assert_eq!(snapshot.last_surface.map(|s| s.entity), Some(ground));
        assert!(
            (snapshot.adhesion_axis - Vec2::NEG_Y).length() < 0.05,
            "Adhesion axis should point into the floor: {:?}",
            snapshot.adhesion_axis
        );
        assert!(
            (position.y - (5.0 + RADIUS)).abs() < 1.0,
            "Character should rest on the floor surface: {position:?}"
        );
    }

    #[test]
    fn character_high_above_ground_not_grounded() {
        let mut app = create_test_app();

        spawn_block(&mut app, Vec2::ZERO, Vec2::new(100.0, 5.0));
        let character = spawn_character(&mut app, Vec2::new(0.0, 20000.0), test_config());

        run_for_duration(&mut app, 0.5);

        let snapshot = snapshot(&app, character);
        println!("PROOF: on_ground={}", snapshot.on_ground);

        assert!(!snapshot.on_ground);
        assert!(snapshot.last_surface.is_none());
        assert!(app.world().get::<LinearVelocity>(character).unwrap().y < 0.0);
    }

    #[test]
    fn controller_force_is_removed_each_step() {
        let mut app = create_test_app();

        let character = spawn_character(&mut app, Vec2::new(0.0, 20000.0), test_config());
        run_frames(&mut app, 10);

        let mass = app.world().get::<ComputedMass>(character).unwrap().value();
        let force = app.world().get::<ConstantForce>(character).unwrap().0;
        println!("PROOF: ConstantForce={force:?}, mass={mass}");

        // Only this step's gravity, not ten steps of it
        assert!((force - Vec2::new(0.0, -200.0 * mass)).length() < 1e-2 * mass);
    }
}

// ==================== Walls ====================

mod walls {
    use super::*;

    #[test]
    fn touching_wall_becomes_local_down() {
        let mut app = create_test_app();

        // Wall face at x=8
        let wall = spawn_block(&mut app, Vec2::new(10.0, 0.0), Vec2::new(2.0, 100.0));
        let character = spawn_character(&mut app, Vec2::new(8.0 - RADIUS + 0.1, 0.0), test_config());

        run_frames(&mut app, 10);

        let snapshot = snapshot(&app, character);
        println!(
            "PROOF: axis={:?}, surface={:?}",
            snapshot.adhesion_axis, snapshot.last_surface
        );

        assert_eq!(snapshot.last_surface.map(|s| s.entity), Some(wall));
        assert!(
            (snapshot.adhesion_axis - Vec2::X).length() < 0.05,
            "Adhesion axis should point into the wall: {:?}",
            snapshot.adhesion_axis
        );
    }

    #[test]
    fn surface_layers_select_material() {
        const SLIMY: u32 = 1 << 3;
        let mut app = create_test_app();

        let transform = Transform::from_xyz(10.0, 0.0, 0.0);
        app.world_mut().spawn((
            transform,
            GlobalTransform::from(transform),
            RigidBody::Static,
            Collider::rectangle(4.0, 200.0),
            CollisionLayers::new(SLIMY, LayerMask::ALL),
        ));
        let config = test_config().with_material_layers(0, SLIMY);
        let character = spawn_character(&mut app, Vec2::new(8.0 - RADIUS + 0.1, 0.0), config);

        run_frames(&mut app, 5);

        let snapshot = snapshot(&app, character);
        println!("PROOF: material={:?}", snapshot.material);

        assert_eq!(snapshot.last_surface.map(|s| s.layers), Some(SLIMY));
        assert_eq!(snapshot.material, Some(SurfaceMaterial::Slimy));
    }
}

// ==================== Jumping ====================

mod jumping {
    use super::*;

    #[test]
    fn jump_launches_off_floor() {
        let mut app = create_test_app();

        spawn_block(&mut app, Vec2::ZERO, Vec2::new(100.0, 5.0));
        let character = spawn_character(&mut app, Vec2::new(0.0, 20.0), test_config());
        run_for_duration(&mut app, 1.5);
        assert!(snapshot(&app, character).on_ground);

        set_jump_pressed(&mut app, character, true);
        tick(&mut app);

        let velocity = app.world().get::<LinearVelocity>(character).unwrap().0;
        let controller = app.world().get::<CharacterController>(character).unwrap();
        println!("PROOF: velocity after jump={velocity:?}");

        assert!(controller.jumped());
        assert!(velocity.y > 50.0, "Jump should launch upward: {velocity:?}");

        // Character leaves the floor
        set_jump_pressed(&mut app, character, false);
        run_frames(&mut app, 5);
        let position = app.world().get::<Position>(character).unwrap().0;
        assert!(position.y > 5.0 + RADIUS + 2.0);
    }
}
