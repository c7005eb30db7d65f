//! The character controller component and its per-step pipeline.
//!
//! One physics step runs, in order:
//!
//! 1. [`resolve`](crate::resolve::resolve) the step's contacts against the
//!    movement intent,
//! 2. update the [`AdhesionAxis`] from the active contact (or the remembered
//!    surface),
//! 3. make the movement direction tangent to the adhesion axis,
//! 4. let the [`JumpBuffer`] decide whether a jump launches,
//! 5. [`compose`](crate::compose::compose) the new velocity and force.
//!
//! Steps 1–3 are [`CharacterController::resolve_step`], steps 4–5 are
//! [`CharacterController::compose_step`]. The plugin runs them as separate
//! systems; [`CharacterController::step`] runs both for hosts that drive the
//! controller by hand.

use bevy::prelude::*;

use crate::adhesion::AdhesionAxis;
use crate::compose::{BodyState, ComposeInput, Composition, compose};
use crate::config::{ControllerConfig, SurfaceMaterial};
use crate::contact::{Contact, ContactSet, SurfaceHandle};
use crate::intent::MovementIntent;
use crate::jump::{JumpBuffer, JumpState};
use crate::resolve::{Resolution, resolve};

#[cfg(feature = "avian2d")]
use avian2d::prelude::{ConstantForce, GravityScale, LockedAxes, RigidBody};

/// Core character controller component.
///
/// Holds everything the controller remembers between steps: the adhesion
/// and gravity axes, the last touched surface, contact and jump timing, and
/// the movement direction chosen this step.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
#[cfg_attr(
    feature = "avian2d",
    require(
        ContactSet,
        MovementIntent,
        ControllerConfig,
        RigidBody,
        ConstantForce,
        LockedAxes = LockedAxes::ROTATION_LOCKED,
        GravityScale = GravityScale(0.0)
    )
)]
#[cfg_attr(
    not(feature = "avian2d"),
    require(ContactSet, MovementIntent, ControllerConfig)
)]
pub struct CharacterController {
    adhesion: AdhesionAxis,
    jump: JumpBuffer,
    movement_direction: Vec2,
    movement_scale: f32,
    active_contact: Option<Contact>,
    grounded: bool,
    jumped: bool,
    /// Whether the adhesion axis should be taken from the spawn facing.
    pub(crate) orient_from_facing: bool,

    // Forces accumulated this step and applied last step.
    accumulated_force: Vec2,
    applied_force: Vec2,
}

impl Default for CharacterController {
    fn default() -> Self {
        Self::with_gravity_direction(Vec2::NEG_Y)
    }
}

impl CharacterController {
    /// Create a controller with world gravity pointing down (-Y).
    ///
    /// The adhesion axis is taken from the entity's facing when it spawns
    /// (`-Transform::up()`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a controller with a custom world gravity direction.
    ///
    /// A zero direction falls back to -Y.
    pub fn with_gravity_direction(direction: Vec2) -> Self {
        Self {
            adhesion: AdhesionAxis::new(direction),
            jump: JumpBuffer::new(),
            movement_direction: Vec2::ZERO,
            movement_scale: 0.0,
            active_contact: None,
            grounded: false,
            jumped: false,
            orient_from_facing: true,
            accumulated_force: Vec2::ZERO,
            applied_force: Vec2::ZERO,
        }
    }

    /// Builder: start adhered along `axis` instead of the spawn facing.
    pub fn with_adhesion_axis(mut self, axis: Vec2) -> Self {
        self.adhesion.set_axis(axis);
        self.orient_from_facing = false;
        self
    }

    /// The current adhesion axis (local down).
    #[inline]
    pub fn adhesion_axis(&self) -> Vec2 {
        self.adhesion.axis()
    }

    /// The world gravity axis.
    #[inline]
    pub fn gravity_axis(&self) -> Vec2 {
        self.adhesion.gravity_axis()
    }

    /// Change the world gravity direction. Zero-length input is ignored.
    pub fn set_gravity_direction(&mut self, direction: Vec2) {
        self.adhesion.set_gravity_axis(direction);
    }

    /// Override the adhesion axis. Zero-length input is ignored.
    pub fn set_adhesion_axis(&mut self, axis: Vec2) {
        self.adhesion.set_axis(axis);
    }

    /// Adhesion state (axes and contact memory).
    pub fn adhesion(&self) -> &AdhesionAxis {
        &self.adhesion
    }

    /// The surface last adhered to, if any.
    pub fn last_surface(&self) -> Option<SurfaceHandle> {
        self.adhesion.last_surface()
    }

    /// Time of the last active contact (negative infinity if never).
    pub fn last_contact_time(&self) -> f32 {
        self.adhesion.last_contact_time()
    }

    /// Time of the last buffered jump press (negative infinity if none).
    pub fn last_jump_input_time(&self) -> f32 {
        self.jump.last_input_time()
    }

    /// Movement direction chosen this step (unit or zero, tangent to the axis).
    #[inline]
    pub fn movement_direction(&self) -> Vec2 {
        self.movement_direction
    }

    /// Speed fraction used this step: input magnitude times the share of the
    /// desired direction left after clipping and projection.
    #[inline]
    pub fn movement_scale(&self) -> f32 {
        self.movement_scale
    }

    /// Contact chosen as the adhesion surface this step.
    #[inline]
    pub fn active_contact(&self) -> Option<&Contact> {
        self.active_contact.as_ref()
    }

    /// Whether the character counted as on the ground after the last step.
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Whether the last step launched a jump.
    #[inline]
    pub fn jumped(&self) -> bool {
        self.jumped
    }

    /// Whether the character is on the ground at `now` (coyote time included).
    ///
    /// The contact step itself always counts, even with zero coyote time.
    pub fn on_ground(&self, now: f32, config: &ControllerConfig) -> bool {
        self.adhesion.on_ground(now, config.jumping.coyote_time)
    }

    /// Release factor toward world gravity (0 = adhered, 1 = released).
    pub fn grounded_blend_factor(&self, now: f32, config: &ControllerConfig) -> f32 {
        self.adhesion
            .grounded_blend_factor(now, config.jumping.coyote_time)
    }

    /// Jump input lifecycle at `now`.
    pub fn jump_state(&self, now: f32, config: &ControllerConfig) -> JumpState {
        self.jump.state(now, config.jumping.buffer_time)
    }

    /// Register a jump press made at `time`.
    pub fn press_jump(&mut self, time: f32) {
        self.jump.press(time);
    }

    /// Move a press latched on `intent` into the jump buffer.
    ///
    /// Returns `true` if a press was taken.
    pub fn take_jump_input(&mut self, intent: &mut MovementIntent, now: f32) -> bool {
        match intent.take_jump_request(now) {
            Some(time) => {
                self.press_jump(time);
                true
            }
            None => false,
        }
    }

    /// The axis movement and forces are computed against.
    ///
    /// This is the adhesion axis, or the gravity-blended axis when
    /// [`AdhesionConfig::blend_toward_gravity`](crate::config::AdhesionConfig::blend_toward_gravity)
    /// is enabled.
    pub fn effective_axis(&self, now: f32, config: &ControllerConfig) -> Vec2 {
        if config.adhesion.blend_toward_gravity {
            self.adhesion
                .blended_axis(now, config.jumping.coyote_time)
        } else {
            self.adhesion.axis()
        }
    }

    /// Material of the remembered surface, if any.
    pub fn surface_material(&self, config: &ControllerConfig) -> Option<SurfaceMaterial> {
        self.adhesion
            .last_surface()
            .map(|surface| config.adhesion.material_for(surface.layers))
    }

    /// Resolve contacts, update the adhesion axis and choose the movement
    /// direction.
    ///
    /// `closest_point` is asked for the closest point on the remembered
    /// surface (from `position`) only when no contact is active; return
    /// `None` if the surface no longer exists.
    pub fn resolve_step(
        &mut self,
        config: &ControllerConfig,
        intent: &MovementIntent,
        contacts: &ContactSet,
        position: Vec2,
        now: f32,
        closest_point: impl FnOnce(Entity) -> Option<Vec2>,
    ) -> Resolution {
        let resolution = resolve(intent.unit_direction(), contacts);

        let remembered_point = match (resolution.active, self.adhesion.last_surface()) {
            (None, Some(surface)) => closest_point(surface.entity),
            _ => None,
        };
        self.adhesion
            .update(resolution.active.as_ref(), remembered_point, position, now);

        let axis = self.effective_axis(now, config);
        let (direction, surviving) = resolution.tangent_to(axis);
        self.movement_direction = direction;
        self.movement_scale = intent.movement_scale() * surviving;
        self.active_contact = resolution.active;

        trace!(
            "resolved {} contacts: active={:?} axis={:?} movement={:?}",
            contacts.len(),
            self.active_contact.map(|c| c.surface.entity),
            axis,
            self.movement_direction
        );

        resolution
    }

    /// Decide the jump and compose this step's velocity and force.
    ///
    /// Must run after [`resolve_step`](Self::resolve_step) for the same step.
    pub fn compose_step(
        &mut self,
        config: &ControllerConfig,
        body: BodyState,
        now: f32,
    ) -> Composition {
        let on_ground = self.on_ground(now, config);
        // Capture the launch axis before the jump releases the contact
        let axis = self.effective_axis(now, config);

        let jump_honored = self
            .jump
            .try_consume(on_ground, now, config.jumping.buffer_time);
        if jump_honored {
            self.adhesion.release();
            debug!("jump honoured at t={now:.3}, launching along {:?}", -axis);
        }

        self.jumped = jump_honored;
        self.grounded = self.on_ground(now, config);

        // Adhesion only holds while grounded; the remembered surface orients
        // the axis but does not pull.
        let material = if self.grounded {
            self.surface_material(config)
        } else {
            None
        };

        compose(
            body,
            ComposeInput {
                adhesion_axis: axis,
                gravity_axis: self.adhesion.gravity_axis(),
                movement_direction: self.movement_direction,
                movement_scale: self.movement_scale,
                jump_honored,
                material,
            },
            config,
        )
    }

    /// Run a full step: jump input, resolve, compose.
    ///
    /// Takes any jump press latched on `intent`. Does not clear `contacts`;
    /// the owner clears them once the step is done.
    pub fn step(
        &mut self,
        config: &ControllerConfig,
        intent: &mut MovementIntent,
        contacts: &ContactSet,
        body: BodyState,
        now: f32,
        closest_point: impl FnOnce(Entity) -> Option<Vec2>,
    ) -> Composition {
        self.take_jump_input(intent, now);
        self.resolve_step(config, intent, contacts, body.position, now, closest_point);
        self.compose_step(config, body, now)
    }

    // === Force accumulation ===

    /// Add a force to apply at the end of this step.
    pub fn add_force(&mut self, force: Vec2) {
        self.accumulated_force += force;
    }

    /// Force accumulated so far this step.
    pub fn accumulated_force(&self) -> Vec2 {
        self.accumulated_force
    }

    /// Clear this step's accumulator and return what was applied last step,
    /// so the backend can remove it from its persistent force.
    pub(crate) fn prepare_new_frame(&mut self) -> Vec2 {
        let applied = self.applied_force;
        self.applied_force = Vec2::ZERO;
        self.accumulated_force = Vec2::ZERO;
        applied
    }

    /// Take this step's accumulated force and remember it as applied.
    pub(crate) fn finalize_frame(&mut self) -> Vec2 {
        let force = self.accumulated_force;
        self.applied_force = force;
        self.accumulated_force = Vec2::ZERO;
        force
    }
}
