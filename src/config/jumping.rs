//! Configuration for jump mechanics.

use bevy::prelude::*;

/// Configuration for jump mechanics.
#[derive(Reflect, Debug, Clone, Copy)]
pub struct JumpingConfig {
    /// Launch speed away from the surface (units/second).
    pub speed: f32,

    /// Seconds after losing contact during which the character still counts
    /// as grounded.
    pub coyote_time: f32,

    /// Seconds a jump press is remembered while waiting for ground.
    pub buffer_time: f32,
}

impl Default for JumpingConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            coyote_time: 0.5,
            buffer_time: 0.1,
        }
    }
}
