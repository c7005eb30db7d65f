//! Avian2D physics backend implementation.
//!
//! This module provides the physics backend for Avian2D.
//! Enable with the `avian2d` feature.
//!
//! Contacts come from Avian's narrow phase ([`Collisions`]). The character's
//! collider must live on the controller entity itself. Controller forces go
//! through [`ConstantForce`] so they are integrated by Avian's solver; the
//! share the controller added last step is removed before the next one, so
//! user forces on the same component are preserved.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::CharacterControllerSet;
use crate::backend::CharacterPhysicsBackend;
use crate::contact::{Contact, ContactSet, SurfaceHandle};
use crate::controller::CharacterController;

/// Avian2D physics backend for the character controller.
pub struct Avian2dBackend;

impl CharacterPhysicsBackend for Avian2dBackend {
    type VelocityComponent = LinearVelocity;

    fn plugin() -> impl Plugin {
        Avian2dBackendPlugin
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec2 {
        world
            .get::<LinearVelocity>(entity)
            .map(|v| v.0)
            .unwrap_or(Vec2::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2) {
        if let Some(mut vel) = world.get_mut::<LinearVelocity>(entity) {
            vel.0 = velocity;
        }
    }

    fn apply_force(world: &mut World, entity: Entity, force: Vec2) {
        // Accumulate into CharacterController instead of directly modifying forces.
        // Forces will be applied at the end of the step by apply_controller_forces.
        if let Some(mut controller) = world.get_mut::<CharacterController>(entity) {
            controller.add_force(force);
        }
    }

    fn get_position(world: &World, entity: Entity) -> Vec2 {
        // Try Avian's Position component first, then fall back to Transform
        world
            .get::<Position>(entity)
            .map(|p| p.0)
            .or_else(|| world.get::<Transform>(entity).map(|t| t.translation.xy()))
            .or_else(|| {
                world
                    .get::<GlobalTransform>(entity)
                    .map(|t| t.translation().xy())
            })
            .unwrap_or(Vec2::ZERO)
    }

    fn get_mass(world: &World, entity: Entity) -> f32 {
        let Some(computed_mass) = world.get::<ComputedMass>(entity) else {
            return 0.0;
        };
        let mass = computed_mass.value();
        if mass <= 0.0 || !mass.is_finite() {
            return 0.0;
        }
        mass
    }

    fn closest_point_on_surface(world: &World, surface: Entity, point: Vec2) -> Option<Vec2> {
        let collider = world.get::<Collider>(surface)?;
        let position = world.get::<Position>(surface)?;
        let rotation = world.get::<Rotation>(surface).copied().unwrap_or_default();

        let (closest, _inside) = collider.project_point(*position, rotation, point, true);
        Some(closest)
    }
}

/// Plugin that sets up Avian2D-specific systems for the character controller.
pub struct Avian2dBackendPlugin;

impl Plugin for Avian2dBackendPlugin {
    fn build(&self, app: &mut App) {
        // Phase 1: Preparation - Clear forces from previous step
        app.add_systems(
            FixedUpdate,
            clear_controller_forces.in_set(CharacterControllerSet::Preparation),
        );

        // Phase 2: Sensors - Read contacts from the narrow phase
        app.add_systems(
            FixedUpdate,
            collect_avian_contacts.in_set(CharacterControllerSet::Sensors),
        );

        // Phase 5: Final Application - Apply accumulated forces to physics
        app.add_systems(
            FixedUpdate,
            apply_controller_forces.in_set(CharacterControllerSet::FinalApplication),
        );
    }
}

/// Collision layer memberships of a collider, Avian's default layer if unset.
fn memberships(layers: Option<&CollisionLayers>) -> u32 {
    layers.map_or(LayerMask::DEFAULT.0, |layers| layers.memberships.0)
}

/// Collect this step's touching contacts into each controller's [`ContactSet`].
///
/// One contact per manifold. The normal is flipped when needed so it always
/// points from the surface toward the character. The contact point is the
/// closest point on the surface to the character's position. Sensors and
/// speculative (non-touching) pairs are skipped.
pub fn collect_avian_contacts(
    collisions: Collisions,
    mut q_controllers: Query<
        (Entity, &Position, &LinearVelocity, &mut ContactSet),
        With<CharacterController>,
    >,
    q_surfaces: Query<(&Position, Option<&Rotation>, &Collider, Option<&CollisionLayers>)>,
) {
    for (entity, position, velocity, mut contact_set) in &mut q_controllers {
        let found = collisions
            .collisions_with(entity)
            .filter(|pair| pair.is_touching() && !pair.is_sensor())
            .filter_map(|pair| {
                let (surface, flip) = if pair.collider1 == entity {
                    (pair.collider2, true)
                } else {
                    (pair.collider1, false)
                };
                let (surface_position, rotation, collider, layers) = q_surfaces.get(surface).ok()?;
                let rotation = rotation.copied().unwrap_or_default();
                let (point, _inside) =
                    collider.project_point(*surface_position, rotation, position.0, true);
                let handle = SurfaceHandle::new(surface, memberships(layers));
                Some((pair, point, handle, flip))
            })
            .flat_map(|(pair, point, handle, flip)| {
                pair.manifolds.iter().map(move |manifold| {
                    let normal = if flip { -manifold.normal } else { manifold.normal };
                    Contact::new(point, normal, handle)
                })
            });

        contact_set.record(found, velocity.0);
    }
}

/// Clear controller forces at the start of each step.
///
/// This system runs BEFORE any controller force systems. It:
/// 1. Subtracts the force we applied last step from ConstantForce
/// 2. Clears the accumulator for the new step
///
/// This ensures that external user forces are preserved while our forces
/// are "isolated" between steps.
pub fn clear_controller_forces(
    mut q: Query<(&mut CharacterController, Option<&mut ConstantForce>)>,
) {
    const EPSILON: f32 = 1e-6;

    for (mut controller, constant_force) in &mut q {
        let force_to_subtract = controller.prepare_new_frame();

        if let Some(mut force) = constant_force {
            force.0 -= force_to_subtract;

            // Clean up near-zero values to avoid floating point drift
            if force.0.x.abs() < EPSILON {
                force.0.x = 0.0;
            }
            if force.0.y.abs() < EPSILON {
                force.0.y = 0.0;
            }
        }
    }
}

/// Apply controller forces at the end of each step.
///
/// Adds the accumulated force to ConstantForce and remembers it for the next
/// step's subtraction, so Avian's physics step integrates it exactly once.
pub fn apply_controller_forces(
    mut q: Query<(&mut CharacterController, Option<&mut ConstantForce>)>,
) {
    for (mut controller, constant_force) in &mut q {
        let force_to_apply = controller.finalize_frame();

        if let Some(mut force) = constant_force {
            force.0 += force_to_apply;
        }
    }
}
