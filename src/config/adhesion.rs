//! Configuration for surface adhesion.

use bevy::prelude::*;

/// How strongly a surface holds on to the character.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceMaterial {
    /// Strong adhesion: walls and ceilings can be walked on.
    #[default]
    Sticky,
    /// Weak adhesion: the character slides off steep surfaces.
    Slimy,
    /// No adhesion force at all.
    None,
}

/// Configuration for surface adhesion.
///
/// Materials are looked up from the collision layer memberships of the
/// surface: sticky layers first, then slimy layers, then `unlisted_material`.
#[derive(Reflect, Debug, Clone, Copy)]
pub struct AdhesionConfig {
    /// Adhesion force on sticky surfaces.
    pub sticky_adhere: f32,

    /// Adhesion force on slimy surfaces.
    pub slimy_adhere: f32,

    /// Layer mask of sticky surfaces.
    pub sticky_layers: u32,

    /// Layer mask of slimy surfaces.
    pub slimy_layers: u32,

    /// Material for surfaces on neither mask.
    pub unlisted_material: SurfaceMaterial,

    /// Blend the adhesion axis toward world gravity over the coyote window
    /// instead of switching hard when contact is lost.
    pub blend_toward_gravity: bool,
}

impl Default for AdhesionConfig {
    fn default() -> Self {
        Self {
            sticky_adhere: 100.0,
            slimy_adhere: 5.0,
            sticky_layers: 0,
            slimy_layers: 0,
            unlisted_material: SurfaceMaterial::Sticky,
            blend_toward_gravity: false,
        }
    }
}

impl AdhesionConfig {
    /// Material of a surface with the given layer memberships.
    pub fn material_for(&self, layers: u32) -> SurfaceMaterial {
        if layers & self.sticky_layers != 0 {
            SurfaceMaterial::Sticky
        } else if layers & self.slimy_layers != 0 {
            SurfaceMaterial::Slimy
        } else {
            self.unlisted_material
        }
    }

    /// Adhesion force magnitude for a material, `None` for no adhesion.
    pub fn magnitude(&self, material: SurfaceMaterial) -> Option<f32> {
        match material {
            SurfaceMaterial::Sticky => Some(self.sticky_adhere),
            SurfaceMaterial::Slimy => Some(self.slimy_adhere),
            SurfaceMaterial::None => None,
        }
    }
}
