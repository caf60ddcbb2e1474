//! Edge-normal axis sets used by the separating axis test.

use super::vector::{self, Vector};
use super::vertices::Vertex;

/// One unit normal per polygon edge `(v[i], v[i + 1])`.
///
/// Degenerate (zero-length) edges produce a zero axis, which the narrowphase skips.
pub fn from_vertices(vertices: &[Vertex]) -> Vec<Vector> {
    let n = vertices.len();
    (0..n)
        .map(|i| {
            let a = vertices[i].point;
            let b = vertices[(i + 1) % n].point;
            Vector::new(b.y - a.y, a.x - b.x).normalize_or_zero()
        })
        .collect()
}

/// Rotate every axis in place by `angle` radians.
pub fn rotate(axes: &mut [Vector], angle: f64) {
    if angle == 0.0 {
        return;
    }
    for axis in axes {
        *axis = vector::rotate(*axis, angle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::BodyId;
    use crate::geometry::vertices;
    use std::f64::consts::FRAC_PI_2;

    fn unit_square() -> Vec<Vertex> {
        let points = [
            Vector::new(0.0, 0.0),
            Vector::new(1.0, 0.0),
            Vector::new(1.0, 1.0),
            Vector::new(0.0, 1.0),
        ];
        vertices::create(&points, BodyId(1))
    }

    #[test]
    fn test_axes_are_unit_edge_normals() {
        let axes = from_vertices(&unit_square());
        assert_eq!(axes.len(), 4);
        assert_eq!(axes[0], Vector::new(0.0, -1.0));
        assert_eq!(axes[1], Vector::new(1.0, 0.0));
        assert_eq!(axes[2], Vector::new(0.0, 1.0));
        assert_eq!(axes[3], Vector::new(-1.0, 0.0));
    }

    #[test]
    fn test_degenerate_edge_gives_zero_axis() {
        let points = [Vector::ZERO, Vector::ZERO, Vector::new(1.0, 1.0)];
        let axes = from_vertices(&vertices::create(&points, BodyId(1)));
        assert_eq!(axes[0], Vector::ZERO);
    }

    #[test]
    fn test_rotate_axes() {
        let mut axes = from_vertices(&unit_square());
        rotate(&mut axes, FRAC_PI_2);
        assert!((axes[1] - Vector::new(0.0, 1.0)).length() < 1e-12);
    }
}
