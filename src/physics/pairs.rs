//! Table of persistent pairs with start/active/end bookkeeping.

use std::collections::HashMap;

use tracing::debug;

use super::body::Body;
use super::contact::{Pair, PairId};
use super::narrowphase::Collision;
use super::world::World;

#[derive(Debug, Default)]
pub struct Pairs {
    list: Vec<Pair>,
    table: HashMap<PairId, usize>,
    collision_start: Vec<PairId>,
    collision_active: Vec<PairId>,
    collision_end: Vec<PairId>,
}

impl Pairs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn list(&self) -> &[Pair] {
        &self.list
    }

    pub(crate) fn list_mut(&mut self) -> &mut [Pair] {
        &mut self.list
    }

    pub fn get(&self, id: PairId) -> Option<&Pair> {
        self.table.get(&id).map(|&slot| &self.list[slot])
    }

    /// Pairs that started touching during the last update.
    pub fn collision_start(&self) -> &[PairId] {
        &self.collision_start
    }

    /// Pairs that kept touching during the last update.
    pub fn collision_active(&self) -> &[PairId] {
        &self.collision_active
    }

    /// Pairs that stopped touching during the last update.
    pub fn collision_end(&self) -> &[PairId] {
        &self.collision_end
    }

    /// Fold this step's collisions into the table.
    ///
    /// Pairs not reported this step become inactive and are dropped unless one of their bodies
    /// sleeps; a retained pair keeps its cached impulses for when the body wakes.
    pub fn update(&mut self, collisions: &[Collision], world: &World, timestamp: f64) {
        self.collision_start.clear();
        self.collision_active.clear();
        self.collision_end.clear();

        for pair in &mut self.list {
            pair.confirmed_active = false;
        }

        let bodies = world.bodies();
        for collision in collisions {
            let (Some(slot_a), Some(slot_b)) =
                (world.slot(collision.parent_a), world.slot(collision.parent_b))
            else {
                continue;
            };
            let (parent_a, parent_b) = (&bodies[slot_a], &bodies[slot_b]);
            let id = collision.pair_id();

            match self.table.get(&id).copied() {
                Some(slot) => {
                    let pair = &mut self.list[slot];
                    if pair.is_active {
                        self.collision_active.push(id);
                    } else {
                        self.collision_start.push(id);
                    }
                    pair.update(*collision, parent_a, parent_b, timestamp);
                    pair.slot_a = slot_a;
                    pair.slot_b = slot_b;
                    pair.confirmed_active = true;
                }
                None => {
                    let pair =
                        Pair::new(*collision, parent_a, parent_b, (slot_a, slot_b), timestamp);
                    self.table.insert(id, self.list.len());
                    self.list.push(pair);
                    self.collision_start.push(id);
                }
            }
        }

        let mut removed = false;
        for pair in &mut self.list {
            if pair.confirmed_active {
                continue;
            }
            if pair.is_active {
                pair.set_active(false, timestamp);
                self.collision_end.push(pair.id);
            }
            if !sleeping(bodies, pair) {
                removed = true;
            }
        }
        if removed {
            self.list
                .retain(|pair| pair.confirmed_active || sleeping(bodies, pair));
            self.rebuild_table();
        }

        if !self.collision_start.is_empty() || !self.collision_end.is_empty() {
            debug!(
                start = self.collision_start.len(),
                end = self.collision_end.len(),
                pairs = self.list.len(),
                "pair changes"
            );
        }
    }

    /// Re-resolve parent slots after the world changed, dropping pairs whose bodies are gone.
    pub fn refresh_slots(&mut self, world: &World) {
        self.list.retain_mut(|pair| {
            match (
                world.slot(pair.collision.parent_a),
                world.slot(pair.collision.parent_b),
            ) {
                (Some(slot_a), Some(slot_b)) => {
                    pair.slot_a = slot_a;
                    pair.slot_b = slot_b;
                    true
                }
                _ => false,
            }
        });
        self.rebuild_table();
    }

    pub fn clear(&mut self) {
        self.list.clear();
        self.table.clear();
        self.collision_start.clear();
        self.collision_active.clear();
        self.collision_end.clear();
    }

    fn rebuild_table(&mut self) {
        self.table.clear();
        for (slot, pair) in self.list.iter().enumerate() {
            self.table.insert(pair.id, slot);
        }
    }
}

fn sleeping(bodies: &[Body], pair: &Pair) -> bool {
    bodies[pair.slot_a].is_sleeping || bodies[pair.slot_b].is_sleeping
}
