//! Physics backend abstraction.
//!
//! The controller never talks to a physics engine directly. Everything it
//! needs from the body and the world goes through [`CharacterPhysicsBackend`],
//! so the same pipeline runs on Avian2D or on a scripted test double.

use bevy::prelude::*;

/// Trait for physics backend implementations.
///
/// Implement this trait to integrate a physics engine with the character
/// controller. The backend reads and writes body state, applies the
/// composed force and answers closest-point queries against remembered
/// surfaces. Filling the [`ContactSet`](crate::contact::ContactSet) each step
/// is the job of the systems registered by [`plugin`](Self::plugin).
///
/// See `Avian2dBackend` (feature `avian2d`) for the reference implementation.
pub trait CharacterPhysicsBackend: 'static + Send + Sync {
    /// The velocity component type used by this backend.
    type VelocityComponent: Component;

    /// Returns the plugin that sets up this backend.
    ///
    /// The plugin must feed contacts into `CharacterControllerSet::Sensors`.
    fn plugin() -> impl Plugin;

    /// Get the current velocity of an entity.
    fn get_velocity(world: &World, entity: Entity) -> Vec2;

    /// Set the velocity of an entity.
    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2);

    /// Apply a force to an entity for the current step.
    fn apply_force(world: &mut World, entity: Entity, force: Vec2);

    /// Get the current position of an entity.
    fn get_position(world: &World, entity: Entity) -> Vec2;

    /// Get the mass of an entity. Zero when unknown.
    fn get_mass(world: &World, entity: Entity) -> f32;

    /// Closest point on the surface collider `surface` to `point`.
    ///
    /// Returns `None` when the surface no longer exists or has no shape.
    fn closest_point_on_surface(world: &World, surface: Entity, point: Vec2) -> Option<Vec2>;

    /// Current simulation time in seconds.
    ///
    /// Defaults to the elapsed fixed time, which is what the controller
    /// systems run on.
    fn get_elapsed_time(world: &World) -> f32 {
        world
            .get_resource::<Time<Fixed>>()
            .map(|t| t.elapsed_secs())
            .unwrap_or(0.0)
    }
}
