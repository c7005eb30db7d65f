//! Read-only views of controller state for UIs, debug drawing and tests.

use bevy::prelude::*;

use crate::config::{ControllerConfig, SurfaceMaterial};
use crate::contact::{Contact, SurfaceHandle};
use crate::controller::CharacterController;
use crate::jump::JumpState;

/// A copy of everything the controller knows at one instant.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct ControllerSnapshot {
    /// On the ground, coyote time included.
    pub on_ground: bool,
    /// Release factor toward gravity (0 = adhered, 1 = released).
    pub grounded_blend_factor: f32,
    /// The stored adhesion axis.
    pub adhesion_axis: Vec2,
    /// The axis movement is computed against (differs from
    /// `adhesion_axis` only in gravity-blend mode).
    pub effective_axis: Vec2,
    /// World gravity axis.
    pub gravity_axis: Vec2,
    /// Movement direction chosen in the last step.
    pub movement_direction: Vec2,
    /// Contact chosen in the last step.
    pub active_contact: Option<Contact>,
    /// Remembered surface.
    pub last_surface: Option<SurfaceHandle>,
    /// Material of the remembered surface.
    pub material: Option<SurfaceMaterial>,
    /// Jump input lifecycle.
    pub jump_state: JumpState,
    /// Time of the last active contact.
    pub last_contact_time: f32,
    /// Time of the last buffered jump press.
    pub last_jump_input_time: f32,
}

impl CharacterController {
    /// Capture the controller state at `now`.
    pub fn snapshot(&self, now: f32, config: &ControllerConfig) -> ControllerSnapshot {
        ControllerSnapshot {
            on_ground: self.on_ground(now, config),
            grounded_blend_factor: self.grounded_blend_factor(now, config),
            adhesion_axis: self.adhesion_axis(),
            effective_axis: self.effective_axis(now, config),
            gravity_axis: self.gravity_axis(),
            movement_direction: self.movement_direction(),
            active_contact: self.active_contact().copied(),
            last_surface: self.last_surface(),
            material: self.surface_material(config),
            jump_state: self.jump_state(now, config),
            last_contact_time: self.last_contact_time(),
            last_jump_input_time: self.last_jump_input_time(),
        }
    }
}

/// Per-step motion summary, written after the controller composes velocity.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct TelemetryFrame {
    /// Controller entity.
    pub entity: Entity,
    /// Simulation time of the step.
    pub time: f32,
    /// Body position.
    pub position: Vec2,
    /// Velocity written to the body.
    pub velocity: Vec2,
    /// Velocity component along the adhesion axis (positive = toward the surface).
    pub axial_speed: f32,
    /// Velocity magnitude across the adhesion axis.
    pub tangential_speed: f32,
    /// Axis the step was computed against.
    pub axis: Vec2,
    /// Force applied this step.
    pub force: Vec2,
    /// Contacts seen this step.
    pub contact_count: usize,
    /// On the ground after the step.
    pub on_ground: bool,
    /// A jump launched this step.
    pub jumped: bool,
}

impl TelemetryFrame {
    /// Split `velocity` into axial and tangential speed around `axis`.
    pub fn split_speed(velocity: Vec2, axis: Vec2) -> (f32, f32) {
        let axial = velocity.dot(axis);
        let tangential = (velocity - axial * axis).length();
        (axial, tangential)
    }
}
