//! Movement intent components.
//!
//! Intents represent the desired movement from player input or AI. The input
//! layer writes them once per frame; the controller reads them during the
//! fixed physics step.

use bevy::prelude::*;

/// Movement intent for one character.
///
/// `direction` is a 2D vector in world space with magnitude in `[0, 1]`.
/// Its length is the movement scale; the controller clips it against
/// obstacles and makes it tangent to the surface it is adhering to.
///
/// `jump` is the *held* state of the jump button. A rising edge latches a
/// jump request that stays pending until the next fixed step reads it, so a
/// tap is never lost on a frame that runs no fixed step. Hosts that only have
/// a one-frame "pressed" flag can call [`request_jump`](Self::request_jump)
/// instead.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use cling_controller::prelude::*;
///
/// let mut intent = MovementIntent::new();
/// intent.set_direction(Vec2::new(2.0, 0.0));
/// assert!(intent.is_moving());
/// assert_eq!(intent.movement_scale(), 1.0);
///
/// intent.set_jump_pressed(true);
/// assert!(intent.jump_pressed());
/// assert!(intent.jump_requested);
///
/// intent.clear();
/// assert!(!intent.is_moving());
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct MovementIntent {
    /// Desired movement direction (magnitude at most 1).
    pub direction: Vec2,
    /// Speed multiplier (0.0 to 1.0).
    pub speed: f32,
    /// Whether the jump button is held.
    pub jump: bool,
    /// A press latched since the controller last read this intent.
    pub jump_requested: bool,
    /// When the latched press happened, if the input layer knows.
    pub jump_request_time: Option<f32>,
}

impl Default for MovementIntent {
    fn default() -> Self {
        Self {
            direction: Vec2::ZERO,
            speed: 1.0,
            jump: false,
            jump_requested: false,
            jump_request_time: None,
        }
    }
}

impl MovementIntent {
    /// Create a new empty movement intent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the movement direction. Vectors longer than 1 are shortened to 1.
    pub fn set_direction(&mut self, direction: Vec2) {
        self.direction = if direction.is_finite() {
            direction.clamp_length_max(1.0)
        } else {
            Vec2::ZERO
        };
    }

    /// Set the speed multiplier (0.0 to 1.0).
    pub fn set_speed(&mut self, multiplier: f32) {
        self.speed = multiplier.clamp(0.0, 1.0);
    }

    /// Set whether the jump button is held. Latches a request on the
    /// rising edge.
    pub fn set_jump_pressed(&mut self, pressed: bool) {
        if pressed && !self.jump && !self.jump_requested {
            self.jump_requested = true;
            self.jump_request_time = None;
        }
        self.jump = pressed;
    }

    /// Latch a one-shot jump press made at `time`.
    ///
    /// A press already pending keeps its original time.
    pub fn request_jump(&mut self, time: f32) {
        if !self.jump_requested {
            self.jump_requested = true;
            self.jump_request_time = Some(time);
        }
    }

    /// Take the pending press, if any.
    ///
    /// Returns the press time, or `now` when it is unknown. Times later than
    /// `now` are clamped to it.
    pub fn take_jump_request(&mut self, now: f32) -> Option<f32> {
        if !self.jump_requested {
            return None;
        }
        self.jump_requested = false;
        let time = self.jump_request_time.take().unwrap_or(now);
        Some(time.min(now))
    }

    /// Whether the jump button is held.
    pub fn jump_pressed(&self) -> bool {
        self.jump
    }

    /// Clear movement, release jump and drop any pending press.
    pub fn clear(&mut self) {
        self.direction = Vec2::ZERO;
        self.jump = false;
        self.jump_requested = false;
        self.jump_request_time = None;
    }

    /// Check if there is active movement input.
    pub fn is_moving(&self) -> bool {
        self.movement_scale() > 0.001
    }

    /// Unit direction of the intent, or zero.
    pub fn unit_direction(&self) -> Vec2 {
        self.direction.normalize_or_zero()
    }

    /// Input magnitude with the speed multiplier applied, in `[0, 1]`.
    pub fn movement_scale(&self) -> f32 {
        (self.direction.length() * self.speed).clamp(0.0, 1.0)
    }
}
