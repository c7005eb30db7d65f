//! Contact resolution.
//!
//! Turns the desired movement direction and the step's contacts into an
//! obstacle-clipped direction and the active adhesion surface.

use bevy::prelude::*;

use crate::contact::{Contact, ContactSet};

/// Directions shorter than this are treated as "no movement".
pub const MIN_DIRECTION_LENGTH: f32 = 1e-4;

/// Result of resolving a step's contacts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Desired direction with every obstacle the character presses into
    /// clipped away. Not yet tangent to the adhesion axis.
    pub clipped: Vec2,
    /// Contact the character is resting on the most, if any.
    pub active: Option<Contact>,
}

impl Resolution {
    /// Project the clipped direction onto the tangent of `axis`.
    ///
    /// Returns the unit (or zero) direction and the fraction of the desired
    /// direction that survived clipping and projection, in `[0, 1]`. Scale
    /// speed by that fraction so a sliver left over by a near-corner does not
    /// become a full-speed push. `axis` must be unit length.
    pub fn tangent_to(&self, axis: Vec2) -> (Vec2, f32) {
        let tangent = tangent_projection(self.clipped, axis);
        let length = tangent.length();
        if length < MIN_DIRECTION_LENGTH {
            (Vec2::ZERO, 0.0)
        } else {
            (tangent / length, length.min(1.0))
        }
    }
}

/// Resolve `desired` against `contacts`.
///
/// Clipping runs in contact order against the running direction; it is not a
/// global re-orthogonalization. The active contact is the one whose normal
/// has the smallest dot product with the clipped direction, first one wins on
/// ties.
pub fn resolve(desired: Vec2, contacts: &ContactSet) -> Resolution {
    let clipped = clip_direction(desired, contacts);
    let active = select_active(clipped, contacts);
    Resolution { clipped, active }
}

/// Remove the component of `direction` pointing into each contact.
pub fn clip_direction(direction: Vec2, contacts: &ContactSet) -> Vec2 {
    contacts.iter().fold(direction, |dir, contact| {
        let into = dir.dot(contact.normal);
        if into < 0.0 {
            dir - into * contact.normal
        } else {
            dir
        }
    })
}

/// Pick the contact most "underneath" `direction`.
pub fn select_active(direction: Vec2, contacts: &ContactSet) -> Option<Contact> {
    let mut min_dot = f32::INFINITY;
    let mut active = None;

    for contact in contacts {
        let dot = direction.dot(contact.normal);
        if dot < min_dot {
            min_dot = dot;
            active = Some(*contact);
        }
    }

    active
}

/// Remove the `axis` component from `direction`, keeping its length.
pub fn tangent_projection(direction: Vec2, axis: Vec2) -> Vec2 {
    direction - direction.dot(axis) * axis
}

/// Remove the `axis` component from `direction` and normalize.
///
/// Returns zero when nothing is left to move along.
pub fn tangent_direction(direction: Vec2, axis: Vec2) -> Vec2 {
    let tangent = tangent_projection(direction, axis);
    if tangent.length_squared() < MIN_DIRECTION_LENGTH * MIN_DIRECTION_LENGTH {
        Vec2::ZERO
    } else {
        tangent.normalize()
    }
}
