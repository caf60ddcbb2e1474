//! Bounding boxes and collision filtering.

use crate::common;
use crate::geometry::{Vector, Vertex};

/// Axis-aligned bounding box for broadphase collision detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vector,
    pub max: Vector,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: Vector::ZERO,
            max: Vector::ZERO,
        }
    }
}

impl Bounds {
    /// Bounds of a vertex loop, swept along `velocity`.
    pub fn from_vertices(vertices: &[Vertex], velocity: Vector) -> Self {
        let mut bounds = Self::default();
        bounds.update(vertices, velocity);
        bounds
    }

    /// Recompute from `vertices`, then extend the side facing `velocity` to cover the next step.
    pub fn update(&mut self, vertices: &[Vertex], velocity: Vector) {
        self.min = Vector::splat(f64::INFINITY);
        self.max = Vector::splat(f64::NEG_INFINITY);

        for vertex in vertices {
            self.min = self.min.min(vertex.point);
            self.max = self.max.max(vertex.point);
        }

        if velocity.x > 0.0 {
            self.max.x += velocity.x;
        } else {
            self.min.x += velocity.x;
        }
        if velocity.y > 0.0 {
            self.max.y += velocity.y;
        } else {
            self.min.y += velocity.y;
        }
    }

    /// Test whether `point` lies inside (boundary inclusive).
    #[inline]
    pub fn contains(&self, point: Vector) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Test whether two boxes overlap (touching counts).
    #[inline]
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.max.y >= other.min.y
            && self.min.y <= other.max.y
    }

    /// Move both corners by `offset`.
    pub fn translate(&mut self, offset: Vector) {
        self.min += offset;
        self.max += offset;
    }

    /// Move the box so its minimum corner sits at `position`.
    pub fn shift(&mut self, position: Vector) {
        let size = self.max - self.min;
        self.min = position;
        self.max = position + size;
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Category/mask/group triple deciding which bodies may touch.
///
/// Two filters in the same non-zero group always collide when the group is positive and never
/// collide when it is negative. Otherwise each category must be accepted by the other's mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionFilter {
    pub category: u32,
    pub mask: u32,
    pub group: i32,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            category: 0x0001,
            mask: 0xFFFF_FFFF,
            group: 0,
        }
    }
}

impl CollisionFilter {
    /// Filter in a freshly allocated group.
    pub fn in_new_group(non_colliding: bool) -> Self {
        Self {
            group: common::next_group(non_colliding),
            ..Self::default()
        }
    }

    /// Filter with a freshly allocated category bit.
    pub fn in_new_category() -> Self {
        Self {
            category: common::next_category(),
            ..Self::default()
        }
    }

    pub fn can_collide(&self, other: &CollisionFilter) -> bool {
        if self.group == other.group && self.group != 0 {
            return self.group > 0;
        }
        (self.mask & other.category) != 0 && (other.mask & self.category) != 0
    }
}
