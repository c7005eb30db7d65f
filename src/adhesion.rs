//! Adhesion axis tracking.
//!
//! The adhesion axis is the character's local "down": the direction it sticks
//! to. It follows the active contact, reaches back toward the last touched
//! surface when contact is briefly lost, and otherwise keeps its last value.

use bevy::prelude::*;

use crate::contact::{Contact, SurfaceHandle};

/// Normalize `v`, or return `None` if it has no usable direction.
#[inline]
pub(crate) fn unit_or_none(v: Vec2) -> Option<Vec2> {
    let n = v.normalize_or_zero();
    (n != Vec2::ZERO).then_some(n)
}

/// How far into the release window the character is (0 = adhered, 1 = released).
///
/// A non-positive `window` means there is no window: anything but the exact
/// contact instant is fully released.
pub fn blend_factor(elapsed: f32, window: f32) -> f32 {
    if window <= 0.0 {
        return if elapsed <= 0.0 { 0.0 } else { 1.0 };
    }
    (elapsed / window).clamp(0.0, 1.0)
}

/// Whether `elapsed` seconds still lies inside a forgiveness window.
///
/// The instant of the event itself always counts, so a zero window degrades
/// to "only the step that touched".
pub fn within_window(elapsed: f32, window: f32) -> bool {
    elapsed <= 0.0 || elapsed < window
}

/// Direction from `position` toward `closest_point`, if it has one.
pub fn reach_back_axis(position: Vec2, closest_point: Vec2) -> Option<Vec2> {
    unit_or_none(closest_point - position)
}

/// Adhesion and gravity axes plus the contact memory that drives them.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct AdhesionAxis {
    axis: Vec2,
    gravity_axis: Vec2,
    last_surface: Option<SurfaceHandle>,
    last_contact_time: f32,
}

impl Default for AdhesionAxis {
    fn default() -> Self {
        Self::new(Vec2::NEG_Y)
    }
}

impl AdhesionAxis {
    /// Start adhered along the world gravity direction.
    ///
    /// A zero `gravity_direction` falls back to world down.
    pub fn new(gravity_direction: Vec2) -> Self {
        let gravity_axis = unit_or_none(gravity_direction).unwrap_or(Vec2::NEG_Y);
        Self {
            axis: gravity_axis,
            gravity_axis,
            last_surface: None,
            last_contact_time: f32::NEG_INFINITY,
        }
    }

    /// The current adhesion axis (local down).
    #[inline]
    pub fn axis(&self) -> Vec2 {
        self.axis
    }

    /// The constant world gravity axis.
    #[inline]
    pub fn gravity_axis(&self) -> Vec2 {
        self.gravity_axis
    }

    /// The surface that was last active, if any.
    #[inline]
    pub fn last_surface(&self) -> Option<SurfaceHandle> {
        self.last_surface
    }

    /// Time of the last active contact, or negative infinity.
    #[inline]
    pub fn last_contact_time(&self) -> f32 {
        self.last_contact_time
    }

    /// Override the adhesion axis. Zero-length input is ignored.
    pub fn set_axis(&mut self, axis: Vec2) {
        if let Some(axis) = unit_or_none(axis) {
            self.axis = axis;
        }
    }

    /// Change the world gravity direction. Zero-length input is ignored.
    pub fn set_gravity_axis(&mut self, gravity_direction: Vec2) {
        if let Some(axis) = unit_or_none(gravity_direction) {
            self.gravity_axis = axis;
        }
    }

    /// Forget the last contact time (used when a jump launches).
    pub fn release(&mut self) {
        self.last_contact_time = f32::NEG_INFINITY;
    }

    /// Update the axis for this step.
    ///
    /// `remembered_point` is the closest point on [`last_surface`](Self::last_surface)
    /// from `position`, queried by the caller only when there is no active
    /// contact. Returns the new axis.
    pub fn update(
        &mut self,
        active: Option<&Contact>,
        remembered_point: Option<Vec2>,
        position: Vec2,
        now: f32,
    ) -> Vec2 {
        if let Some(contact) = active {
            if let Some(axis) = unit_or_none(-contact.normal) {
                self.axis = axis;
            }
            if self.last_surface != Some(contact.surface) {
                debug!(
                    "adhering to {:?}, axis {:?}",
                    contact.surface.entity, self.axis
                );
            }
            self.last_surface = Some(contact.surface);
            self.last_contact_time = self.last_contact_time.max(now);
        } else if self.last_surface.is_some() {
            if let Some(axis) = remembered_point.and_then(|p| reach_back_axis(position, p)) {
                self.axis = axis;
            }
        }
        self.axis
    }

    /// Seconds since the last active contact (infinite if never).
    pub fn time_since_contact(&self, now: f32) -> f32 {
        now - self.last_contact_time
    }

    /// Blend factor toward world gravity (0 = adhered, 1 = released).
    pub fn grounded_blend_factor(&self, now: f32, coyote_time: f32) -> f32 {
        blend_factor(self.time_since_contact(now), coyote_time)
    }

    /// Whether the character counts as on the ground.
    ///
    /// True while `now - last_contact_time < coyote_time`, and also at the
    /// contact instant itself. So a `coyote_time` of zero still counts the
    /// step that touched, where a strict `now < t0 + coyote_time` would not.
    pub fn on_ground(&self, now: f32, coyote_time: f32) -> bool {
        within_window(self.time_since_contact(now), coyote_time)
    }

    /// Adhesion axis blended toward gravity by the release factor.
    ///
    /// Falls back to the gravity axis when the two cancel out.
    pub fn blended_axis(&self, now: f32, coyote_time: f32) -> Vec2 {
        let t = self.grounded_blend_factor(now, coyote_time);
        unit_or_none(self.axis.lerp(self.gravity_axis, t)).unwrap_or(self.gravity_axis)
    }
}
