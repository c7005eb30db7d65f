//! Physics backends.

mod noop;
mod traits;

pub use noop::NoOpBackendPlugin;
pub use traits::CharacterPhysicsBackend;
