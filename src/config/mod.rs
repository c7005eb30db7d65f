//! Controller configuration.
//!
//! [`ControllerConfig`] groups the tuning for each concern into its own
//! sub-config. All values are plain numbers; invalid ones are reported by
//! [`ControllerConfig::validate`] but never make the controller fail.

use bevy::prelude::*;
use thiserror::Error;

mod adhesion;
mod gravity;
mod jumping;
mod walking;

pub use adhesion::{AdhesionConfig, SurfaceMaterial};
pub use gravity::GravityConfig;
pub use jumping::JumpingConfig;
pub use walking::WalkingConfig;

/// A tuning value the controller cannot use as given.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The value is NaN or infinite.
    #[error("`{field}` must be finite, got {value}")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// The value is below zero.
    #[error("`{field}` must not be negative, got {value}")]
    Negative {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// Layers listed as both sticky and slimy.
    #[error("layers {0:#b} are both sticky and slimy; sticky takes precedence")]
    OverlappingLayers(u32),
}

/// Configuration parameters for the character controller.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct ControllerConfig {
    /// Surface movement.
    pub walking: WalkingConfig,
    /// Jumping, coyote time and input buffering.
    pub jumping: JumpingConfig,
    /// Adhesion strength and materials.
    pub adhesion: AdhesionConfig,
    /// World gravity strength.
    pub gravity: GravityConfig,
}

impl ControllerConfig {
    /// Create a config optimized for responsive player control.
    pub fn player() -> Self {
        Self {
            walking: WalkingConfig { speed: 8.0 },
            jumping: JumpingConfig {
                speed: 6.0,
                coyote_time: 0.15,
                buffer_time: 0.1,
            },
            ..default()
        }
    }

    /// Builder: set movement speed.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.walking.speed = speed;
        self
    }

    /// Builder: set jump launch speed.
    pub fn with_jump_speed(mut self, speed: f32) -> Self {
        self.jumping.speed = speed;
        self
    }

    /// Builder: set coyote time.
    pub fn with_coyote_time(mut self, time: f32) -> Self {
        self.jumping.coyote_time = time;
        self
    }

    /// Builder: set jump buffer time.
    pub fn with_jump_buffer_time(mut self, time: f32) -> Self {
        self.jumping.buffer_time = time;
        self
    }

    /// Builder: set sticky and slimy adhesion strengths.
    pub fn with_adhesion(mut self, sticky: f32, slimy: f32) -> Self {
        self.adhesion.sticky_adhere = sticky;
        self.adhesion.slimy_adhere = slimy;
        self
    }

    /// Builder: set the layer masks for sticky and slimy surfaces.
    pub fn with_material_layers(mut self, sticky: u32, slimy: u32) -> Self {
        self.adhesion.sticky_layers = sticky;
        self.adhesion.slimy_layers = slimy;
        self
    }

    /// Builder: set the material of surfaces on neither layer mask.
    pub fn with_unlisted_material(mut self, material: SurfaceMaterial) -> Self {
        self.adhesion.unlisted_material = material;
        self
    }

    /// Builder: blend the adhesion axis toward gravity while airborne.
    pub fn with_gravity_blend(mut self, enabled: bool) -> Self {
        self.adhesion.blend_toward_gravity = enabled;
        self
    }

    /// Builder: set gravity acceleration.
    pub fn with_gravity(mut self, acceleration: f32) -> Self {
        self.gravity.acceleration = acceleration;
        self
    }

    /// Check every value and report the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            ("walking.speed", self.walking.speed),
            ("jumping.speed", self.jumping.speed),
            ("jumping.coyote_time", self.jumping.coyote_time),
            ("jumping.buffer_time", self.jumping.buffer_time),
            ("adhesion.sticky_adhere", self.adhesion.sticky_adhere),
            ("adhesion.slimy_adhere", self.adhesion.slimy_adhere),
            ("gravity.acceleration", self.gravity.acceleration),
        ];

        for (field, value) in values {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        let overlap = self.adhesion.sticky_layers & self.adhesion.slimy_layers;
        if overlap != 0 {
            return Err(ConfigError::OverlappingLayers(overlap));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(ControllerConfig::default().validate(), Ok(()));
        assert_eq!(ControllerConfig::player().validate(), Ok(()));
    }

    #[test]
    fn defaults_match_documented_tuning() {
        let config = ControllerConfig::default();
        assert_eq!(config.walking.speed, 5.0);
        assert_eq!(config.jumping.coyote_time, 0.5);
        assert_eq!(config.jumping.buffer_time, 0.1);
        assert_eq!(config.jumping.speed, 1.0);
        assert_eq!(config.adhesion.sticky_adhere, 100.0);
        assert_eq!(config.adhesion.slimy_adhere, 5.0);
        assert_eq!(config.gravity.acceleration, 10.0);
    }

    #[test]
    fn builders_set_fields() {
        let config = ControllerConfig::default()
            .with_speed(3.0)
            .with_jump_speed(7.0)
            .with_coyote_time(0.2)
            .with_jump_buffer_time(0.3)
            .with_adhesion(50.0, 2.0)
            .with_material_layers(0b10, 0b100)
            .with_unlisted_material(SurfaceMaterial::None)
            .with_gravity_blend(true)
            .with_gravity(20.0);

        assert_eq!(config.walking.speed, 3.0);
        assert_eq!(config.jumping.speed, 7.0);
        assert_eq!(config.jumping.coyote_time, 0.2);
        assert_eq!(config.jumping.buffer_time, 0.3);
        assert_eq!(config.adhesion.sticky_adhere, 50.0);
        assert_eq!(config.adhesion.slimy_adhere, 2.0);
        assert_eq!(config.adhesion.sticky_layers, 0b10);
        assert_eq!(config.adhesion.slimy_layers, 0b100);
        assert_eq!(config.adhesion.unlisted_material, SurfaceMaterial::None);
        assert!(config.adhesion.blend_toward_gravity);
        assert_eq!(config.gravity.acceleration, 20.0);
    }

    #[test]
    fn negative_values_are_reported() {
        let config = ControllerConfig::default().with_coyote_time(-0.1);
        assert_eq!(
            config.validate(),
            Err(ConfigError::Negative {
                field: "jumping.coyote_time",
                value: -0.1
            })
        );
    }

    #[test]
    fn non_finite_values_are_reported() {
        let config = ControllerConfig::default().with_speed(f32::INFINITY);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite { field: "walking.speed", .. })
        ));
    }

    #[test]
    fn overlapping_layers_are_reported() {
        let config = ControllerConfig::default().with_material_layers(0b110, 0b011);
        assert_eq!(config.validate(), Err(ConfigError::OverlappingLayers(0b010)));
    }

    #[test]
    fn error_messages_name_the_field() {
        let err = ConfigError::Negative {
            field: "walking.speed",
            value: -1.0,
        };
        assert_eq!(err.to_string(), "`walking.speed` must not be negative, got -1");
    }
}
