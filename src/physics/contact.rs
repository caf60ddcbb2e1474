//! Contact data structures for collision response.

use std::collections::HashMap;

use crate::common::BodyId;
use crate::geometry::Vertex;

use super::body::Body;
use super::narrowphase::{Collision, Side};

/// Canonical identity of a colliding part pair (lower id first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairId(BodyId, BodyId);

impl PairId {
    pub fn new(a: BodyId, b: BodyId) -> Self {
        if a < b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn bodies(&self) -> (BodyId, BodyId) {
        (self.0, self.1)
    }
}

/// Stable identity of a contact vertex: owning part and vertex index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContactId {
    pub body: BodyId,
    pub index: usize,
}

impl ContactId {
    pub fn of(vertex: &Vertex) -> Self {
        Self {
            body: vertex.body,
            index: vertex.index,
        }
    }
}

/// A single contact point with accumulated impulse data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub id: ContactId,
    /// Vertex as reported by the latest collision.
    pub vertex: Vertex,
    pub side: Side,
    /// Accumulated normal impulse; never positive.
    pub normal_impulse: f64,
    /// Accumulated friction impulse.
    pub tangent_impulse: f64,
}

/// Persistent contact state for two colliding parts.
#[derive(Debug, Clone)]
pub struct Pair {
    pub id: PairId,
    pub collision: Collision,
    pub separation: f64,
    pub is_active: bool,
    /// Set when the detector reported this pair during the current step.
    pub confirmed_active: bool,
    pub is_sensor: bool,
    pub time_created: f64,
    pub time_updated: f64,
    /// Sum of both parents' inverse masses.
    pub inverse_mass: f64,
    pub friction: f64,
    pub friction_static: f64,
    pub restitution: f64,
    pub slop: f64,
    contacts: Vec<Contact>,
    contact_index: HashMap<ContactId, usize>,
    active_contacts: Vec<usize>,
    /// World slots of the two parents, refreshed when the world changes.
    pub(crate) slot_a: usize,
    pub(crate) slot_b: usize,
}

impl Pair {
    pub(crate) fn new(
        collision: Collision,
        parent_a: &Body,
        parent_b: &Body,
        slots: (usize, usize),
        timestamp: f64,
    ) -> Self {
        let is_sensor = parent_a.is_sensor
            || parent_b.is_sensor
            || part_is_sensor(parent_a, collision.part_index_a)
            || part_is_sensor(parent_b, collision.part_index_b);
        let mut pair = Self {
            id: collision.pair_id(),
            collision,
            separation: 0.0,
            is_active: true,
            confirmed_active: true,
            is_sensor,
            time_created: timestamp,
            time_updated: timestamp,
            inverse_mass: 0.0,
            friction: 0.0,
            friction_static: 0.0,
            restitution: 0.0,
            slop: 0.0,
            contacts: Vec::with_capacity(2),
            contact_index: HashMap::new(),
            active_contacts: Vec::with_capacity(2),
            slot_a: slots.0,
            slot_b: slots.1,
        };
        pair.update(collision, parent_a, parent_b, timestamp);
        pair
    }

    /// Overwrite the collision in place, recombine materials and refresh the active contacts.
    ///
    /// Contacts seen before keep their accumulated impulses.
    pub(crate) fn update(
        &mut self,
        collision: Collision,
        parent_a: &Body,
        parent_b: &Body,
        timestamp: f64,
    ) {
        self.collision = collision;
        self.separation = collision.depth;
        self.inverse_mass = parent_a.inverse_mass + parent_b.inverse_mass;
        self.friction = parent_a.friction.min(parent_b.friction);
        self.friction_static = parent_a.friction_static.max(parent_b.friction_static);
        self.restitution = parent_a.restitution.max(parent_b.restitution);
        self.slop = parent_a.slop.max(parent_b.slop);

        self.active_contacts.clear();
        for support in collision.supports() {
            let id = ContactId::of(&support.vertex);
            let slot = match self.contact_index.get(&id) {
                Some(&slot) => {
                    let contact = &mut self.contacts[slot];
                    contact.vertex = support.vertex;
                    contact.side = support.side;
                    slot
                }
                None => {
                    self.contacts.push(Contact {
                        id,
                        vertex: support.vertex,
                        side: support.side,
                        normal_impulse: 0.0,
                        tangent_impulse: 0.0,
                    });
                    let slot = self.contacts.len() - 1;
                    self.contact_index.insert(id, slot);
                    slot
                }
            };
            self.active_contacts.push(slot);
        }

        self.set_active(true, timestamp);
    }

    pub(crate) fn set_active(&mut self, is_active: bool, timestamp: f64) {
        self.is_active = is_active;
        self.time_updated = timestamp;
        if !is_active {
            self.active_contacts.clear();
        }
    }

    /// Contacts touched by the latest update.
    pub fn active_contacts(&self) -> impl Iterator<Item = &Contact> + '_ {
        self.active_contacts.iter().map(|&slot| &self.contacts[slot])
    }

    pub fn active_contact_count(&self) -> usize {
        self.active_contacts.len()
    }

    /// Every contact this pair has ever seen, with its cached impulses.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn contact(&self, id: ContactId) -> Option<&Contact> {
        self.contact_index.get(&id).map(|&slot| &self.contacts[slot])
    }

    pub(crate) fn active_contact_mut(&mut self, n: usize) -> &mut Contact {
        &mut self.contacts[self.active_contacts[n]]
    }
}

fn part_is_sensor(parent: &Body, index: usize) -> bool {
    parent.part(index).is_some_and(|part| part.is_sensor)
}
