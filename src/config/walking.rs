//! Configuration for surface movement.

use bevy::prelude::*;

/// Configuration for surface movement.
#[derive(Reflect, Debug, Clone, Copy)]
pub struct WalkingConfig {
    /// Movement speed along the surface at full input (units/second).
    pub speed: f32,
}

impl Default for WalkingConfig {
    fn default() -> Self {
        Self { speed: 5.0 }
    }
}
