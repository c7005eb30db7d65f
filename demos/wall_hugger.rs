//! Wall Hugger Example
//!
//! A playable room whose walls and ceiling can be walked on.
//!
//! ## Features
//! - Sticky side walls and floor: the character walks up and around them
//! - A slimy ceiling: the character hangs on but slides off slopes easily
//! - A tilted platform in the middle of the room
//! - Gizmos show the adhesion axis, gravity axis and active contact
//!
//! ## Controls
//! - **WASD** or **Arrow keys**: Move
//! - **Space**: Jump (away from the current surface)
//! - **G**: Toggle blending toward gravity while airborne
//!
//! ## Running
//! ```bash
//! cargo run --example wall_hugger
//! ```

use avian2d::prelude::*;
use bevy::prelude::*;
use cling_controller::prelude::*;

// ==================== Constants ====================

const PLAYER_RADIUS: f32 = 8.0;

const ROOM_WIDTH: f32 = 800.0;
const ROOM_HEIGHT: f32 = 500.0;
const WALL_THICKNESS: f32 = 20.0;

const PX_PER_M: f32 = 10.0;

/// Collision layer of sticky surfaces.
const STICKY: u32 = 1 << 1;
/// Collision layer of slimy surfaces.
const SLIMY: u32 = 1 << 2;

#[derive(Component)]
struct Player;

// ==================== Main ====================

fn default_config() -> ControllerConfig {
    ControllerConfig::player()
        .with_speed(160.0)
        .with_jump_speed(220.0)
        .with_gravity(9.81 * PX_PER_M)
        .with_adhesion(4000.0, 600.0)
        .with_material_layers(STICKY, SLIMY)
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Wall Hugger - Surface Adhesion Example".into(),
                resolution: (1280, 720).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(PhysicsPlugins::default().with_length_unit(PX_PER_M))
        .add_plugins(PhysicsDebugPlugin::default())
        .add_plugins(CharacterControllerPlugin::<Avian2dBackend>::default())
        .add_systems(Startup, setup)
        .add_systems(Update, (read_input, toggle_gravity_blend, draw_axes, log_jumps))
        .run();
}

// ==================== Setup ====================

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    commands.spawn(Camera2d);

    let half_width = ROOM_WIDTH / 2.0;
    let half_height = ROOM_HEIGHT / 2.0;
    let half_wall = WALL_THICKNESS / 2.0;
    let grey = Color::srgb(0.3, 0.3, 0.3);
    let green = Color::srgb(0.3, 0.6, 0.3);

    // Floor and walls are sticky
    for (position, half_size) in [
        (Vec2::new(0.0, -half_height), Vec2::new(half_width, half_wall)),
        (Vec2::new(-half_width, 0.0), Vec2::new(half_wall, half_height)),
        (Vec2::new(half_width, 0.0), Vec2::new(half_wall, half_height)),
    ] {
        spawn_block(
            &mut commands,
            &mut meshes,
            &mut materials,
            Transform::from_translation(position.extend(0.0)),
            half_size,
            grey,
            STICKY,
        );
    }

    // Slimy ceiling
    spawn_block(
        &mut commands,
        &mut meshes,
        &mut materials,
        Transform::from_xyz(0.0, half_height, 0.0),
        Vec2::new(half_width, half_wall),
        green,
        SLIMY,
    );

    // Tilted platform
    spawn_block(
        &mut commands,
        &mut meshes,
        &mut materials,
        Transform::from_xyz(0.0, -40.0, 0.0).with_rotation(Quat::from_rotation_z(0.4)),
        Vec2::new(120.0, 10.0),
        grey,
        STICKY,
    );

    // Player, spawned upright on the floor
    commands.spawn((
        Player,
        Transform::from_xyz(-200.0, -half_height + half_wall + PLAYER_RADIUS + 2.0, 0.0),
        CharacterController::new(),
        default_config(),
        Collider::circle(PLAYER_RADIUS),
        Friction::ZERO,
        Mesh2d(meshes.add(Circle::new(PLAYER_RADIUS))),
        MeshMaterial2d(materials.add(ColorMaterial::from_color(Color::srgb(0.9, 0.6, 0.2)))),
    ));

    commands.spawn((
        Text::new("WASD/Arrows: Move | Space: Jump | G: Toggle gravity blend\nGrey surfaces are sticky, the green ceiling is slimy."),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
    ));
}

fn spawn_block(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<ColorMaterial>>,
    transform: Transform,
    half_size: Vec2,
    color: Color,
    layer: u32,
) {
    commands.spawn((
        transform,
        RigidBody::Static,
        Collider::rectangle(half_size.x * 2.0, half_size.y * 2.0),
        CollisionLayers::new(layer, LayerMask::ALL),
        Mesh2d(meshes.add(Rectangle::new(half_size.x * 2.0, half_size.y * 2.0))),
        MeshMaterial2d(materials.add(ColorMaterial::from_color(color))),
    ));
}

// ==================== Input ====================

fn read_input(keys: Res<ButtonInput<KeyCode>>, mut q: Query<&mut MovementIntent, With<Player>>) {
    let pressed = |a: KeyCode, b: KeyCode| keys.pressed(a) || keys.pressed(b);

    let mut direction = Vec2::ZERO;
    if pressed(KeyCode::KeyA, KeyCode::ArrowLeft) {
        direction.x -= 1.0;
    }
    if pressed(KeyCode::KeyD, KeyCode::ArrowRight) {
        direction.x += 1.0;
    }
    if pressed(KeyCode::KeyS, KeyCode::ArrowDown) {
        direction.y -= 1.0;
    }
    if pressed(KeyCode::KeyW, KeyCode::ArrowUp) {
        direction.y += 1.0;
    }

    for mut intent in &mut q {
        intent.set_direction(direction.normalize_or_zero());
        intent.set_jump_pressed(keys.pressed(KeyCode::Space));
    }
}

fn toggle_gravity_blend(
    keys: Res<ButtonInput<KeyCode>>,
    mut q: Query<&mut ControllerConfig, With<Player>>,
) {
    if !keys.just_pressed(KeyCode::KeyG) {
        return;
    }
    for mut config in &mut q {
        config.adhesion.blend_toward_gravity = !config.adhesion.blend_toward_gravity;
        info!("gravity blend: {}", config.adhesion.blend_toward_gravity);
    }
}

// ==================== Debug drawing ====================

fn draw_axes(
    mut gizmos: Gizmos,
    time: Res<Time<Fixed>>,
    q: Query<(&Transform, &CharacterController, &ControllerConfig), With<Player>>,
) {
    let now = time.elapsed_secs();
    for (transform, controller, config) in &q {
        let snapshot = controller.snapshot(now, config);
        let origin = transform.translation.truncate();

        let axis_color = if snapshot.on_ground {
            Color::srgb(0.2, 0.9, 0.2)
        } else {
            Color::srgb(0.9, 0.2, 0.2)
        };
        gizmos.arrow_2d(origin, origin + snapshot.effective_axis * 30.0, axis_color);
        gizmos.arrow_2d(
            origin,
            origin + snapshot.gravity_axis * 20.0,
            Color::srgb(0.4, 0.4, 0.9),
        );
        gizmos.arrow_2d(
            origin,
            origin + snapshot.movement_direction * 25.0,
            Color::WHITE,
        );

        if let Some(contact) = snapshot.active_contact {
            gizmos.circle_2d(contact.point, 3.0, Color::srgb(1.0, 1.0, 0.0));
            gizmos.line_2d(
                contact.point,
                contact.point + contact.normal * 15.0,
                Color::srgb(1.0, 1.0, 0.0),
            );
        }
    }
}

fn log_jumps(mut frames: MessageReader<TelemetryFrame>) {
    for frame in frames.read().filter(|f| f.jumped) {
        info!(
            "jump at t={:.2}: velocity {:?} along axis {:?}",
            frame.time, frame.velocity, frame.axis
        );
    }
}
