//! Narrowphase collision detection: separating axis test and support points.

use crate::common::BodyId;
use crate::geometry::{vertices, Vector, Vertex};

use super::body::Body;
use super::contact::PairId;

/// Which side of a collision a vertex or body belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

/// A contact vertex and the side of the collision that owns it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Support {
    pub vertex: Vertex,
    pub side: Side,
}

/// Result of projecting two polygons onto a set of axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    /// Smallest overlap found; zero or negative proves separation.
    pub overlap: f64,
    /// Axis that produced `overlap`.
    pub axis: Vector,
}

/// A part taking part in a narrowphase test, with the composite root that owns it.
#[derive(Debug, Clone, Copy)]
pub struct PartHandle<'a> {
    pub part: &'a Body,
    pub parent: &'a Body,
    /// Index of `part` within `parent` (0 when the part is the parent itself).
    pub index: usize,
}

impl<'a> PartHandle<'a> {
    /// Handle for a body tested as a whole.
    pub fn whole(body: &'a Body) -> Self {
        Self {
            part: body,
            parent: body,
            index: 0,
        }
    }
}

/// Overlap between two convex parts.
///
/// Bodies are stored in canonical order (`part_a` has the lower id). The normal points from
/// part B toward part A, so pushing A along it separates the pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub part_a: BodyId,
    pub part_b: BodyId,
    pub parent_a: BodyId,
    pub parent_b: BodyId,
    pub part_index_a: usize,
    pub part_index_b: usize,
    pub depth: f64,
    pub normal: Vector,
    pub tangent: Vector,
    /// `normal * depth`.
    pub penetration: Vector,
    supports: [Support; 2],
    support_count: usize,
}

impl Collision {
    /// Test two simple bodies.
    pub fn between(a: &Body, b: &Body) -> Option<Collision> {
        collides(PartHandle::whole(a), PartHandle::whole(b))
    }

    pub fn pair_id(&self) -> PairId {
        PairId::new(self.part_a, self.part_b)
    }

    /// One or two contact vertices.
    pub fn supports(&self) -> &[Support] {
        &self.supports[..self.support_count]
    }

    pub fn parent(&self, side: Side) -> BodyId {
        match side {
            Side::A => self.parent_a,
            Side::B => self.parent_b,
        }
    }

    pub fn part_index(&self, side: Side) -> usize {
        match side {
            Side::A => self.part_index_a,
            Side::B => self.part_index_b,
        }
    }
}

/// Separating axis test between two convex parts.
pub fn collides(a: PartHandle<'_>, b: PartHandle<'_>) -> Option<Collision> {
    let overlap_ab = overlap_axes(&a.part.vertices, &b.part.vertices, &a.part.axes);
    if overlap_ab.overlap <= 0.0 {
        return None;
    }
    let overlap_ba = overlap_axes(&b.part.vertices, &a.part.vertices, &b.part.axes);
    if overlap_ba.overlap <= 0.0 {
        return None;
    }

    let (a, b) = if a.part.id < b.part.id { (a, b) } else { (b, a) };
    let min_overlap = if overlap_ab.overlap < overlap_ba.overlap {
        overlap_ab
    } else {
        overlap_ba
    };

    let axis = min_overlap.axis;
    let normal = if axis.dot(b.part.position - a.part.position) < 0.0 {
        axis
    } else {
        -axis
    };

    let candidates_b = find_supports(a.part, b.part, normal, 1.0);
    let mut found: [Option<Support>; 2] = [None, None];
    let mut count = 0;
    for vertex in candidates_b {
        if count < 2 && !vertex.is_internal && vertices::contains(&a.part.vertices, vertex.point) {
            found[count] = Some(Support {
                vertex,
                side: Side::B,
            });
            count += 1;
        }
    }

    if count < 2 {
        let candidates_a = find_supports(b.part, a.part, normal, -1.0);
        for vertex in candidates_a {
            if count < 2
                && !vertex.is_internal
                && vertices::contains(&b.part.vertices, vertex.point)
            {
                found[count] = Some(Support {
                    vertex,
                    side: Side::A,
                });
                count += 1;
            }
        }
    }

    // Overlapping without any contained vertex: fall back to the deepest vertex of B.
    let deepest = Support {
        vertex: candidates_b[0],
        side: Side::B,
    };
    let first = found[0].unwrap_or(deepest);
    let supports = [first, found[1].unwrap_or(first)];

    Some(Collision {
        part_a: a.part.id,
        part_b: b.part.id,
        parent_a: a.parent.id,
        parent_b: b.parent.id,
        part_index_a: a.index,
        part_index_b: b.index,
        depth: min_overlap.overlap,
        normal,
        tangent: Vector::new(-normal.y, normal.x),
        penetration: normal * min_overlap.overlap,
        supports,
        support_count: count.max(1),
    })
}

/// Project both loops onto every axis and keep the smallest overlap.
///
/// Stops at the first separating axis. Zero axes from degenerate edges are skipped.
pub fn overlap_axes(vertices_a: &[Vertex], vertices_b: &[Vertex], axes: &[Vector]) -> Overlap {
    let mut result = Overlap {
        overlap: f64::MAX,
        axis: Vector::ZERO,
    };

    for &axis in axes {
        if axis == Vector::ZERO {
            continue;
        }
        let (min_a, max_a) = project(vertices_a, axis);
        let (min_b, max_b) = project(vertices_b, axis);
        let overlap = (max_a - min_b).min(max_b - min_a);

        if overlap < result.overlap {
            result.overlap = overlap;
            result.axis = axis;
            if overlap <= 0.0 {
                break;
            }
        }
    }

    result
}

fn project(vertices: &[Vertex], axis: Vector) -> (f64, f64) {
    vertices
        .iter()
        .map(|v| v.point.dot(axis))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), d| {
            (min.min(d), max.max(d))
        })
}

/// Deepest vertex of `body_b` along `normal * direction` relative to `body_a`, paired with
/// whichever neighbour is deeper.
pub fn find_supports(body_a: &Body, body_b: &Body, normal: Vector, direction: f64) -> [Vertex; 2] {
    let verts = &body_b.vertices;
    let n = verts.len();
    let normal = normal * direction;
    let origin = body_a.position;
    let distance = |v: &Vertex| normal.dot(origin - v.point);

    let mut deepest = &verts[0];
    let mut nearest = distance(deepest);
    for vertex in &verts[1..] {
        let d = distance(vertex);
        if d < nearest {
            nearest = d;
            deepest = vertex;
        }
    }

    let previous = &verts[(n + deepest.index - 1) % n];
    let next = &verts[(deepest.index + 1) % n];
    if distance(next) < distance(previous) {
        [*deepest, *next]
    } else {
        [*deepest, *previous]
    }
}
