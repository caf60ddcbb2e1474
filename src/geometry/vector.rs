//! Vector helpers on top of [`glam::DVec2`].
//!
//! `DVec2` is `Copy`, so every helper returns a fresh value; hot loops never allocate.

use glam::DVec2;

/// Two-component vector used for positions, velocities and directions.
pub type Vector = DVec2;

/// Scalar cross product `a.x * b.y - a.y * b.x`.
#[inline]
pub fn cross(a: Vector, b: Vector) -> f64 {
    a.perp_dot(b)
}

/// Cross product of `(b - a)` and `(c - a)`; positive when `a, b, c` turn counter-clockwise.
#[inline]
pub fn cross3(a: Vector, b: Vector, c: Vector) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Rotate `v` by `angle` radians about the origin.
#[inline]
pub fn rotate(v: Vector, angle: f64) -> Vector {
    let (sin, cos) = angle.sin_cos();
    Vector::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Rotate `v` by `angle` radians about `point`.
#[inline]
pub fn rotate_about(v: Vector, angle: f64, point: Vector) -> Vector {
    point + rotate(v - point, angle)
}

/// Angle of the direction from `a` to `b`, in radians.
#[inline]
pub fn angle(a: Vector, b: Vector) -> f64 {
    (b.y - a.y).atan2(b.x - a.x)
}
