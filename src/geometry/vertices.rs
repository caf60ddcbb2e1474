//! Polygon vertex loops: construction, mass integrals, transforms, containment and hulls.
//!
//! Loops are expected counter-clockwise in a y-up frame (clockwise on a y-down screen), which
//! is the orientation [`contains`] tests against. [`crate::Body::set_vertices`] normalises
//! caller input to this orientation.

use crate::common::BodyId;
use crate::error::{Error, Result};

use super::vector::{self, Vector};

/// A polygon corner tagged with its position in the loop and its owning body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub point: Vector,
    /// Position of this vertex within its owning loop.
    pub index: usize,
    /// Owning body (identity only).
    pub body: BodyId,
    /// Interior vertex of a composite hull; excluded from contact generation.
    pub is_internal: bool,
}

/// Build an indexed vertex loop owned by `body`.
pub fn create(points: &[Vector], body: BodyId) -> Vec<Vertex> {
    points
        .iter()
        .enumerate()
        .map(|(index, &point)| Vertex {
            point,
            index,
            body,
            is_internal: false,
        })
        .collect()
}

/// Parse an SVG-like path such as `"L 0 0 L 40 0 L 40 40"` into points.
///
/// `L` markers are optional and coordinates may be separated by spaces or commas.
pub fn from_path(path: &str) -> Result<Vec<Vector>> {
    let mut coords = Vec::new();
    let tokens = path.split(|c: char| c.is_whitespace() || c == ',');
    for (position, token) in tokens.filter(|t| !t.is_empty()).enumerate() {
        if token.eq_ignore_ascii_case("l") {
            continue;
        }
        let value = token
            .trim_start_matches(['L', 'l'])
            .parse::<f64>()
            .map_err(|_| Error::InvalidPath {
                token: token.to_string(),
                position,
            })?;
        coords.push(value);
    }

    if coords.len() % 2 != 0 {
        return Err(Error::InvalidPath {
            token: path.to_string(),
            position: coords.len(),
        });
    }

    Ok(coords
        .chunks_exact(2)
        .map(|xy| Vector::new(xy[0], xy[1]))
        .collect())
}

/// Arithmetic mean of the vertex positions.
pub fn mean(vertices: &[Vertex]) -> Vector {
    if vertices.is_empty() {
        return Vector::ZERO;
    }
    vertices.iter().map(|v| v.point).sum::<Vector>() / vertices.len() as f64
}

/// Polygon area; `signed` keeps the orientation sign (positive for counter-clockwise loops).
pub fn area(vertices: &[Vertex], signed: bool) -> f64 {
    let n = vertices.len();
    if n == 0 {
        return 0.0;
    }
    let mut area = 0.0;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (vertices[j].point, vertices[i].point);
        area += (a.x - b.x) * (a.y + b.y);
        j = i;
    }
    if signed {
        area / 2.0
    } else {
        area.abs() / 2.0
    }
}

/// Area centroid. Callers guarantee a non-zero area.
pub fn centroid(vertices: &[Vertex]) -> Vector {
    let n = vertices.len();
    let signed_area = area(vertices, true);
    let mut centre = Vector::ZERO;
    for i in 0..n {
        let a = vertices[i].point;
        let b = vertices[(i + 1) % n].point;
        centre += (a + b) * vector::cross(a, b);
    }
    centre / (6.0 * signed_area)
}

/// Second moment of area about the origin, scaled by `mass`.
///
/// The loop must already be centred on its centroid.
pub fn inertia(vertices: &[Vertex], mass: f64) -> f64 {
    let n = vertices.len();
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for i in 0..n {
        let a = vertices[i].point;
        let b = vertices[(i + 1) % n].point;
        let cross = vector::cross(b, a).abs();
        numerator += cross * (b.dot(b) + b.dot(a) + a.dot(a));
        denominator += cross;
    }
    if denominator == 0.0 {
        return 0.0;
    }
    (mass / 6.0) * (numerator / denominator)
}

/// Translate every vertex by `offset * scalar`.
pub fn translate(vertices: &mut [Vertex], offset: Vector, scalar: f64) {
    let delta = offset * scalar;
    for vertex in vertices {
        vertex.point += delta;
    }
}

/// Rotate every vertex by `angle` radians about `point`.
pub fn rotate(vertices: &mut [Vertex], angle: f64, point: Vector) {
    if angle == 0.0 {
        return;
    }
    let (sin, cos) = angle.sin_cos();
    for vertex in vertices {
        let d = vertex.point - point;
        vertex.point = Vector::new(point.x + d.x * cos - d.y * sin, point.y + d.x * sin + d.y * cos);
    }
}

/// Scale every vertex about `point` (the centroid when `None`).
pub fn scale(vertices: &mut [Vertex], scale_x: f64, scale_y: f64, point: Option<Vector>) {
    if scale_x == 1.0 && scale_y == 1.0 {
        return;
    }
    let point = point.unwrap_or_else(|| centroid(vertices));
    for vertex in vertices {
        let d = vertex.point - point;
        vertex.point = point + Vector::new(d.x * scale_x, d.y * scale_y);
    }
}

/// Whether `point` lies inside (or on the boundary of) the convex loop.
pub fn contains(vertices: &[Vertex], point: Vector) -> bool {
    let Some(last) = vertices.last() else {
        return false;
    };
    let mut current = last.point;
    for next in vertices.iter().map(|v| v.point) {
        if (point.x - current.x) * (next.y - current.y) + (point.y - current.y) * (current.x - next.x)
            > 0.0
        {
            return false;
        }
        current = next;
    }
    true
}

/// Sort vertices by angle around their mean.
pub fn clockwise_sort(vertices: &mut [Vertex]) {
    let centre = mean(vertices);
    vertices.sort_by(|a, b| {
        vector::angle(centre, a.point).total_cmp(&vector::angle(centre, b.point))
    });
}

/// Convex hull by Andrew's monotone chain.
///
/// Collinear points are dropped. The result keeps the input vertices' tags; callers re-index.
pub fn hull(vertices: &[Vertex]) -> Vec<Vertex> {
    let mut sorted = vertices.to_vec();
    sorted.sort_by(|a, b| {
        a.point
            .x
            .total_cmp(&b.point.x)
            .then(a.point.y.total_cmp(&b.point.y))
    });

    let mut lower: Vec<Vertex> = Vec::with_capacity(sorted.len());
    for &vertex in &sorted {
        while lower.len() >= 2
            && vector::cross3(
                lower[lower.len() - 2].point,
                lower[lower.len() - 1].point,
                vertex.point,
            ) <= 0.0
        {
            lower.pop();
        }
        lower.push(vertex);
    }

    let mut upper: Vec<Vertex> = Vec::with_capacity(sorted.len());
    for &vertex in sorted.iter().rev() {
        while upper.len() >= 2
            && vector::cross3(
                upper[upper.len() - 2].point,
                upper[upper.len() - 1].point,
                vertex.point,
            ) <= 0.0
        {
            upper.pop();
        }
        upper.push(vertex);
    }

    // The last point of each chain is the first point of the other.
    upper.pop();
    lower.pop();
    upper.extend(lower);
    upper
}
