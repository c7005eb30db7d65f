//! Configuration for world gravity.

use bevy::prelude::*;

/// Configuration for world gravity.
///
/// The direction lives on the controller (it is part of the character's
/// frame); only the strength is tuning.
#[derive(Reflect, Debug, Clone, Copy)]
pub struct GravityConfig {
    /// Gravity acceleration (units/second^2). Scaled by body mass.
    pub acceleration: f32,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self { acceleration: 10.0 }
    }
}
