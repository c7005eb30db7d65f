//! Backend-agnostic controller systems.
//!
//! The heavy systems are exclusive and generic over the physics backend:
//! they copy the controller state out of the world, run the step, and write
//! the result back through the backend. Entity lists are kept in a `Local`
//! buffer so a steady-state step does not allocate.

use bevy::prelude::*;

use crate::backend::CharacterPhysicsBackend;
use crate::compose::BodyState;
use crate::config::ControllerConfig;
use crate::contact::ContactSet;
use crate::controller::CharacterController;
use crate::intent::MovementIntent;
use crate::report::TelemetryFrame;

/// Point freshly spawned controllers along their facing.
///
/// The adhesion axis starts as the entity's local down (`-Transform::up()`).
pub fn orient_new_controllers(
    mut q: Query<(Entity, &mut CharacterController, Option<&Transform>), Added<CharacterController>>,
) {
    for (entity, mut controller, transform) in &mut q {
        if !controller.orient_from_facing {
            continue;
        }
        controller.orient_from_facing = false;

        let Some(transform) = transform else {
            continue;
        };
        let down = -transform.up().as_vec3().truncate();
        controller.set_adhesion_axis(down);
        debug!("{entity}: initial adhesion axis {:?}", controller.adhesion_axis());
    }
}

/// Report invalid tuning whenever a config is added or changed.
pub fn validate_configs(q: Query<(Entity, &ControllerConfig), Changed<ControllerConfig>>) {
    for (entity, config) in &q {
        if let Err(err) = config.validate() {
            warn!("{entity}: invalid controller config: {err}");
        }
    }
}

/// Move jump presses latched on the intent into each controller's buffer.
pub fn process_jump_input<B: CharacterPhysicsBackend>(
    world: &mut World,
    query: &mut QueryState<(&mut CharacterController, &mut MovementIntent)>,
) {
    let now = B::get_elapsed_time(world);
    for (mut controller, mut intent) in query.iter_mut(world) {
        // Avoid touching either component when nothing was pressed
        if !intent.jump_requested {
            continue;
        }
        if controller.take_jump_input(&mut intent, now) {
            trace!("jump pressed at t={now:.3}");
        }
    }
}

/// Resolve contacts and update the adhesion axis.
pub fn resolve_contacts<B: CharacterPhysicsBackend>(
    world: &mut World,
    query: &mut QueryState<(
        Entity,
        &CharacterController,
        &ControllerConfig,
        &MovementIntent,
        &ContactSet,
    )>,
    mut entities: Local<Vec<Entity>>,
) {
    let now = B::get_elapsed_time(world);
    entities.clear();
    entities.extend(query.iter(world).map(|(entity, ..)| entity));

    for &entity in entities.iter() {
        let position = B::get_position(world, entity);
        let world_ref: &World = world;
        let Ok((_, controller, config, intent, contacts)) = query.get(world_ref, entity) else {
            continue;
        };

        let mut controller = *controller;
        controller.resolve_step(config, intent, contacts, position, now, |surface| {
            B::closest_point_on_surface(world_ref, surface, position)
        });

        if let Some(mut c) = world.get_mut::<CharacterController>(entity) {
            *c = controller;
        }
    }
}

/// Decide jumps, compose velocity and force, and hand them to the backend.
pub fn compose_motion<B: CharacterPhysicsBackend>(
    world: &mut World,
    query: &mut QueryState<(Entity, &CharacterController, &ControllerConfig, &ContactSet)>,
    mut entities: Local<Vec<Entity>>,
) {
    let now = B::get_elapsed_time(world);
    entities.clear();
    entities.extend(query.iter(world).map(|(entity, ..)| entity));

    for &entity in entities.iter() {
        let body = BodyState {
            velocity: B::get_velocity(world, entity),
            position: B::get_position(world, entity),
            mass: B::get_mass(world, entity),
        };
        let Ok((_, controller, config, contacts)) = query.get(world, entity) else {
            continue;
        };
        let mut controller = *controller;
        let config = *config;
        let contact_count = contacts.len();

        let axis = controller.effective_axis(now, &config);
        let composition = controller.compose_step(&config, body, now);

        let frame = {
            let (axial_speed, tangential_speed) =
                TelemetryFrame::split_speed(composition.velocity, axis);
            TelemetryFrame {
                entity,
                time: now,
                position: body.position,
                velocity: composition.velocity,
                axial_speed,
                tangential_speed,
                axis,
                force: composition.force,
                contact_count,
                on_ground: controller.is_grounded(),
                jumped: controller.jumped(),
            }
        };

        // Write the controller back first; backends may accumulate forces on it
        if let Some(mut c) = world.get_mut::<CharacterController>(entity) {
            *c = controller;
        }
        B::set_velocity(world, entity, composition.velocity);
        B::apply_force(world, entity, composition.force);
        world.write_message(frame);
    }
}

/// Empty every contact set once the step has consumed it.
pub fn clear_contacts(mut q: Query<&mut ContactSet>) {
    for mut contacts in &mut q {
        if !contacts.is_empty() {
            contacts.clear();
        }
    }
}
