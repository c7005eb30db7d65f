//! Contact accumulation.
//!
//! Physics backends deliver contacts once per colliding pair. They are
//! filtered into a [`ContactSet`] that lives on the character and is consumed
//! by the resolver exactly once per physics step.

use bevy::prelude::*;

/// Identity of a surface the character touched.
///
/// This is a handle into the physics world, not an owning reference. The
/// collider may despawn at any time; queries through the handle then simply
/// return nothing.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceHandle {
    /// Collider entity of the surface.
    pub entity: Entity,
    /// Collision layer memberships of the surface (bitmask).
    pub layers: u32,
}

impl SurfaceHandle {
    /// Create a new surface handle.
    pub fn new(entity: Entity, layers: u32) -> Self {
        Self { entity, layers }
    }
}

/// A single contact between the character and a surface.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// World position of the contact.
    pub point: Vec2,
    /// Surface normal, pointing away from the obstacle into free space.
    pub normal: Vec2,
    /// The surface that produced this contact.
    pub surface: SurfaceHandle,
}

impl Contact {
    /// Create a contact.
    pub fn new(point: Vec2, normal: Vec2, surface: SurfaceHandle) -> Self {
        Self {
            point,
            normal,
            surface,
        }
    }

    /// Whether the body is separating from this surface given its velocity.
    ///
    /// A contact counts as separating once `velocity · normal` exceeds
    /// `epsilon`. Degenerate normals give a zero dot product and are
    /// therefore never separating.
    #[inline]
    pub fn is_separating(&self, velocity: Vec2, epsilon: f32) -> bool {
        velocity.dot(self.normal) > epsilon
    }
}

/// Default tolerance for the separating-motion filter.
pub const DEFAULT_SEPARATION_EPSILON: f32 = 0.01;

/// Contacts collected for the current physics step.
///
/// Insertion order is detection order and is preserved; the resolver relies
/// on it for tie breaking. Duplicates are allowed.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct ContactSet {
    contacts: Vec<Contact>,
    separation_epsilon: Option<f32>,
}

impl ContactSet {
    /// Create an empty contact set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty contact set with a custom separation tolerance.
    pub fn with_separation_epsilon(epsilon: f32) -> Self {
        Self {
            contacts: Vec::new(),
            separation_epsilon: Some(epsilon),
        }
    }

    /// The tolerance used by [`record`](Self::record).
    pub fn separation_epsilon(&self) -> f32 {
        self.separation_epsilon.unwrap_or(DEFAULT_SEPARATION_EPSILON)
    }

    /// Record raw contacts from one colliding pair.
    ///
    /// Contacts the body is already moving away from are dropped; everything
    /// else (including contacts with zero-length normals) is kept.
    /// Returns the number of contacts that were appended.
    pub fn record(
        &mut self,
        contacts: impl IntoIterator<Item = Contact>,
        current_velocity: Vec2,
    ) -> usize {
        let epsilon = self.separation_epsilon();
        let before = self.contacts.len();
        for contact in contacts {
            if contact.is_separating(current_velocity, epsilon) {
                trace!(
                    "ignoring separating contact with {:?}: v·n = {}",
                    contact.surface.entity,
                    current_velocity.dot(contact.normal)
                );
                continue;
            }
            self.contacts.push(contact);
        }
        self.contacts.len() - before
    }

    /// Append a contact without filtering.
    pub fn push(&mut self, contact: Contact) {
        self.contacts.push(contact);
    }

    /// Remove all contacts. Keeps the allocation for the next step.
    pub fn clear(&mut self) {
        self.contacts.clear();
    }

    /// Number of contacts recorded this step.
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Whether no contacts were recorded this step.
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Iterate contacts in detection order.
    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.iter()
    }
}

impl<'a> IntoIterator for &'a ContactSet {
    type Item = &'a Contact;
    type IntoIter = std::slice::Iter<'a, Contact>;

    fn into_iter(self) -> Self::IntoIter {
        self.contacts.iter()
    }
}

impl FromIterator<Contact> for ContactSet {
    fn from_iter<T: IntoIterator<Item = Contact>>(iter: T) -> Self {
        Self {
            contacts: iter.into_iter().collect(),
            separation_epsilon: None,
        }
    }
}
