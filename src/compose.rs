//! Velocity and force composition.
//!
//! The component of velocity along the adhesion axis is kept (or replaced by
//! a jump launch); the tangential component is set straight from input.
//! Gravity and adhesion are returned as a continuous force for the physics
//! engine to integrate.

use bevy::prelude::*;

use crate::config::{ControllerConfig, SurfaceMaterial};

/// Body quantities the composer reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    /// Current linear velocity.
    pub velocity: Vec2,
    /// Current position.
    pub position: Vec2,
    /// Body mass. Zero or negative disables gravity force.
    pub mass: f32,
}

/// Per-step inputs the composer needs besides the body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComposeInput {
    /// Unit adhesion axis (local down).
    pub adhesion_axis: Vec2,
    /// Unit world gravity axis.
    pub gravity_axis: Vec2,
    /// Movement direction, already tangent to `adhesion_axis`.
    pub movement_direction: Vec2,
    /// Input magnitude in `[0, 1]`.
    pub movement_scale: f32,
    /// Whether a jump launches this step.
    pub jump_honored: bool,
    /// Material to adhere to, `None` when there is nothing to adhere to.
    pub material: Option<SurfaceMaterial>,
}

/// What the composer produced for one step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Composition {
    /// Velocity to set on the body.
    pub velocity: Vec2,
    /// Continuous force to apply this step.
    pub force: Vec2,
    /// Adhesion part of `force`.
    pub adhesion_force: Vec2,
    /// Gravity part of `force`.
    pub gravity_force: Vec2,
}

/// Compose the body's new velocity and this step's force.
pub fn compose(body: BodyState, input: ComposeInput, config: &ControllerConfig) -> Composition {
    let axis = input.adhesion_axis;

    let along = if input.jump_honored {
        -config.jumping.speed * axis
    } else {
        body.velocity.dot(axis) * axis
    };
    let tangential =
        config.walking.speed * input.movement_scale.clamp(0.0, 1.0) * input.movement_direction;

    let adhesion_force = input
        .material
        .and_then(|material| config.adhesion.magnitude(material))
        .map_or(Vec2::ZERO, |magnitude| magnitude * axis);
    let gravity_force = config.gravity.acceleration * body.mass.max(0.0) * input.gravity_axis;

    Composition {
        velocity: along + tangential,
        force: adhesion_force + gravity_force,
        adhesion_force,
        gravity_force,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(velocity: Vec2) -> BodyState {
        BodyState {
            velocity,
            position: Vec2::ZERO,
            mass: 2.0,
        }
    }

    fn on_floor() -> ComposeInput {
        ComposeInput {
            adhesion_axis: Vec2::NEG_Y,
            gravity_axis: Vec2::NEG_Y,
            movement_direction: Vec2::X,
            movement_scale: 1.0,
            jump_honored: false,
            material: Some(SurfaceMaterial::Sticky),
        }
    }

    #[test]
    fn keeps_axial_velocity_and_sets_tangential() {
        let config = ControllerConfig::default();
        let result = compose(body(Vec2::new(-3.0, -2.0)), on_floor(), &config);

        assert!((result.velocity - Vec2::new(5.0, -2.0)).length() < 1e-5);
    }

    #[test]
    fn movement_scale_scales_speed() {
        let config = ControllerConfig::default();
        let input = ComposeInput {
            movement_scale: 0.5,
            ..on_floor()
        };
        let result = compose(body(Vec2::ZERO), input, &config);
        assert!((result.velocity - Vec2::new(2.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn jump_replaces_axial_velocity() {
        let config = ControllerConfig::default().with_jump_speed(4.0);
        let input = ComposeInput {
            jump_honored: true,
            movement_direction: Vec2::ZERO,
            ..on_floor()
        };
        let result = compose(body(Vec2::new(0.0, -10.0)), input, &config);
        assert!((result.velocity - Vec2::new(0.0, 4.0)).length() < 1e-5);
    }

    #[test]
    fn jump_launches_away_from_wall() {
        let config = ControllerConfig::default().with_jump_speed(4.0);
        let input = ComposeInput {
            adhesion_axis: Vec2::X,
            movement_direction: Vec2::Y,
            jump_honored: true,
            ..on_floor()
        };
        let result = compose(body(Vec2::new(1.0, 0.0)), input, &config);
        assert!((result.velocity - Vec2::new(-4.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn sticky_surface_applies_sticky_adhesion() {
        let config = ControllerConfig::default();
        let result = compose(body(Vec2::ZERO), on_floor(), &config);

        assert!((result.adhesion_force.length() - config.adhesion.sticky_adhere).abs() < 1e-4);
        // Toward the surface
        assert!(result.adhesion_force.dot(Vec2::NEG_Y) > 0.0);
    }

    #[test]
    fn slimy_surface_applies_slimy_adhesion() {
        let config = ControllerConfig::default();
        let input = ComposeInput {
            adhesion_axis: Vec2::X,
            material: Some(SurfaceMaterial::Slimy),
            ..on_floor()
        };
        let result = compose(body(Vec2::ZERO), input, &config);

        assert!((result.adhesion_force - Vec2::new(config.adhesion.slimy_adhere, 0.0)).length() < 1e-5);
        assert!((result.adhesion_force.length() - config.adhesion.sticky_adhere).abs() > 1.0);
    }

    #[test]
    fn no_material_means_no_adhesion_but_gravity() {
        let config = ControllerConfig::default();
        let input = ComposeInput {
            material: None,
            ..on_floor()
        };
        let result = compose(body(Vec2::ZERO), input, &config);

        assert_eq!(result.adhesion_force, Vec2::ZERO);
        assert!((result.force - Vec2::new(0.0, -20.0)).length() < 1e-5);
    }

    #[test]
    fn gravity_always_applies_along_world_axis() {
        let config = ControllerConfig::default();
        let input = ComposeInput {
            adhesion_axis: Vec2::Y,
            material: Some(SurfaceMaterial::Sticky),
            ..on_floor()
        };
        let result = compose(body(Vec2::ZERO), input, &config);

        // Gravity is mass-scaled and independent of the adhesion axis
        assert!((result.gravity_force - Vec2::new(0.0, -20.0)).length() < 1e-5);
        assert!((result.force - Vec2::new(0.0, 80.0)).length() < 1e-4);
    }
}
