//! Broadphase collision detection using sweep-and-prune on the x axis.

use super::body::Body;
use super::narrowphase::{collides, Collision, PartHandle};

/// Sweep-and-prune broadphase feeding surviving pairs to the narrowphase.
///
/// Holds world slot indices sorted by `bounds.min.x`. The order persists between steps, so
/// re-sorting an almost sorted list stays cheap.
#[derive(Debug, Default)]
pub struct Detector {
    order: Vec<usize>,
    collisions: Vec<Collision>,
}

impl Detector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `count` bodies (world slots `0..count`).
    pub fn set_bodies(&mut self, count: usize) {
        self.order.clear();
        self.order.extend(0..count);
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.collisions.clear();
    }

    /// Collisions found by the last [`Detector::collisions`] call.
    pub fn last_collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Find every colliding part pair among `bodies`.
    ///
    /// The returned slice is reused by the next call.
    pub fn collisions(&mut self, bodies: &[Body]) -> &[Collision] {
        if self.order.len() != bodies.len() {
            self.set_bodies(bodies.len());
        }
        self.collisions.clear();
        self.order
            .sort_by(|&a, &b| bodies[a].bounds.min.x.total_cmp(&bodies[b].bounds.min.x));

        for (i, &slot_a) in self.order.iter().enumerate() {
            let body_a = &bodies[slot_a];
            let bounds_a = body_a.bounds;
            let a_inert = body_a.is_static() || body_a.is_sleeping;

            for &slot_b in &self.order[i + 1..] {
                let body_b = &bodies[slot_b];
                let bounds_b = body_b.bounds;

                if bounds_b.min.x > bounds_a.max.x {
                    break;
                }
                if bounds_a.max.y < bounds_b.min.y || bounds_a.min.y > bounds_b.max.y {
                    continue;
                }
                if a_inert && (body_b.is_static() || body_b.is_sleeping) {
                    continue;
                }
                if !body_a.collision_filter.can_collide(&body_b.collision_filter) {
                    continue;
                }

                if !body_a.is_composite() && !body_b.is_composite() {
                    if let Some(collision) =
                        collides(PartHandle::whole(body_a), PartHandle::whole(body_b))
                    {
                        self.collisions.push(collision);
                    }
                    continue;
                }

                for index_a in body_a.first_collision_part()..body_a.part_count() {
                    let Some(part_a) = body_a.part(index_a) else {
                        continue;
                    };
                    for index_b in body_b.first_collision_part()..body_b.part_count() {
                        let Some(part_b) = body_b.part(index_b) else {
                            continue;
                        };
                        if !part_a.bounds.overlaps(&part_b.bounds) {
                            continue;
                        }
                        let handle_a = PartHandle {
                            part: part_a,
                            parent: body_a,
                            index: index_a,
                        };
                        let handle_b = PartHandle {
                            part: part_b,
                            parent: body_b,
                            index: index_b,
                        };
                        if let Some(collision) = collides(handle_a, handle_b) {
                            self.collisions.push(collision);
                        }
                    }
                }
            }
        }

        &self.collisions
    }
}
