use bevy::prelude::*;

/// Empty plugin for backends that don't need additional setup.
///
/// Useful for backends whose contacts are supplied by the host app, such as
/// scripted test worlds.
pub struct NoOpBackendPlugin;

impl Plugin for NoOpBackendPlugin {
    fn build(&self, _app: &mut App) {}
}
