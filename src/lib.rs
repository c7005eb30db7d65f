//! # Cling Controller
//!
//! A 2D character controller for Bevy that sticks to whatever surface it
//! touches. Floors, walls, ceilings and slopes are all walkable: the
//! character's local "down" (the *adhesion axis*) follows the surface it is
//! touching instead of world gravity.
//!
//! Each fixed step the controller
//!
//! - clips the desired movement against the obstacles it is pressing into,
//! - picks the contact it rests on the most and adheres to it,
//! - reaches back toward the last touched surface when contact is lost for a
//!   moment (coyote time),
//! - honours buffered jump presses by launching away from the surface,
//! - sets the tangential velocity straight from input while gravity and a
//!   per-material adhesion force are left to the physics engine.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use avian2d::prelude::*;
//! use bevy::prelude::*;
//! use cling_controller::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(PhysicsPlugins::default())
//!         .add_plugins(CharacterControllerPlugin::<Avian2dBackend>::default())
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands) {
//!     commands.spawn((
//!         Transform::from_xyz(0.0, 10.0, 0.0),
//!         CharacterController::new(),
//!         ControllerConfig::player(),
//!         Collider::circle(4.0),
//!     ));
//! }
//! ```
//!
//! Drive the character by writing its [`MovementIntent`](intent::MovementIntent).

use std::marker::PhantomData;

use bevy::prelude::*;

pub mod adhesion;
pub mod backend;
pub mod compose;
pub mod config;
pub mod contact;
pub mod controller;
pub mod intent;
pub mod jump;
pub mod report;
pub mod resolve;
pub mod systems;

#[cfg(feature = "avian2d")]
pub mod avian;

/// Commonly used types.
pub mod prelude {
    pub use crate::CharacterControllerPlugin;
    pub use crate::CharacterControllerSet;
    pub use crate::adhesion::AdhesionAxis;
    pub use crate::backend::CharacterPhysicsBackend;
    pub use crate::compose::{BodyState, Composition};
    pub use crate::config::{
        AdhesionConfig, ConfigError, ControllerConfig, GravityConfig, JumpingConfig,
        SurfaceMaterial, WalkingConfig,
    };
    pub use crate::contact::{Contact, ContactSet, SurfaceHandle};
    pub use crate::controller::CharacterController;
    pub use crate::intent::MovementIntent;
    pub use crate::jump::{JumpBuffer, JumpState};
    pub use crate::report::{ControllerSnapshot, TelemetryFrame};

    #[cfg(feature = "avian2d")]
    pub use crate::avian::Avian2dBackend;
}

/// Phases of one controller step, chained in this order in `FixedUpdate`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CharacterControllerSet {
    /// Clear last step's forces; orient new controllers; validate configs.
    Preparation,
    /// Fill each [`ContactSet`](contact::ContactSet) from the physics backend.
    Sensors,
    /// Move latched jump presses into the jump buffer.
    IntentEvaluation,
    /// Resolve contacts and update the adhesion axis.
    Resolution,
    /// Decide jumps and compose velocity and force.
    IntentApplication,
    /// Hand forces to the physics engine and clear contacts.
    FinalApplication,
}

/// Main plugin, generic over the physics backend.
pub struct CharacterControllerPlugin<B: backend::CharacterPhysicsBackend> {
    _marker: PhantomData<B>,
}

impl<B: backend::CharacterPhysicsBackend> Default for CharacterControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<B: backend::CharacterPhysicsBackend> Plugin for CharacterControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        app.register_type::<controller::CharacterController>()
            .register_type::<config::ControllerConfig>()
            .register_type::<contact::ContactSet>()
            .register_type::<intent::MovementIntent>();

        app.add_message::<report::TelemetryFrame>();

        app.configure_sets(
            FixedUpdate,
            (
                CharacterControllerSet::Preparation,
                CharacterControllerSet::Sensors,
                CharacterControllerSet::IntentEvaluation,
                CharacterControllerSet::Resolution,
                CharacterControllerSet::IntentApplication,
                CharacterControllerSet::FinalApplication,
            )
                .chain(),
        );

        app.add_plugins(B::plugin());

        app.add_systems(
            FixedUpdate,
            (systems::orient_new_controllers, systems::validate_configs)
                .in_set(CharacterControllerSet::Preparation),
        );
        app.add_systems(
            FixedUpdate,
            systems::process_jump_input::<B>.in_set(CharacterControllerSet::IntentEvaluation),
        );
        app.add_systems(
            FixedUpdate,
            systems::resolve_contacts::<B>.in_set(CharacterControllerSet::Resolution),
        );
        app.add_systems(
            FixedUpdate,
            systems::compose_motion::<B>.in_set(CharacterControllerSet::IntentApplication),
        );
        app.add_systems(
            FixedUpdate,
            systems::clear_contacts.in_set(CharacterControllerSet::FinalApplication),
        );
    }
}
