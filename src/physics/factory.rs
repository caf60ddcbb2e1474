//! Builders for common body shapes.

use std::f64::consts::PI;

use tracing::warn;

use crate::common::round;
use crate::error::{self, Result};
use crate::geometry::Vector;

use super::body::{Body, BodyOptions};

/// Side count cap for circles when none is given.
pub const DEFAULT_MAX_SIDES: u32 = 25;
/// Fewest sides a circle approximation uses.
const MIN_CIRCLE_SIDES: u32 = 10;

/// Shape builders. Each takes the centre position, the shape dimensions and the remaining
/// body options; the `position` and `vertices` fields of `options` are overwritten.
pub struct Bodies;

impl Bodies {
    pub fn rectangle(
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        options: BodyOptions,
    ) -> Result<Body> {
        let width = error::positive("width", width)?;
        let height = error::positive("height", height)?;
        Body::new(BodyOptions {
            position: Vector::new(x, y),
            vertices: Some(vec![
                Vector::new(0.0, 0.0),
                Vector::new(width, 0.0),
                Vector::new(width, height),
                Vector::new(0.0, height),
            ]),
            ..options
        })
    }

    /// A trapezoid whose top edge is narrowed by `slope` (0 gives a rectangle, 1 a triangle).
    pub fn trapezoid(
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        slope: f64,
        options: BodyOptions,
    ) -> Result<Body> {
        let width = error::positive("width", width)?;
        let height = error::positive("height", height)?;
        let slope = error::in_range("slope", slope, 0.0, 1.0)? * 0.5;

        let roof = (1.0 - slope * 2.0) * width;
        let x1 = width * slope;
        let x2 = x1 + roof;
        let x3 = x2 + x1;

        let points = if slope < 0.5 {
            vec![
                Vector::new(0.0, 0.0),
                Vector::new(x1, -height),
                Vector::new(x2, -height),
                Vector::new(x3, 0.0),
            ]
        } else {
            vec![
                Vector::new(0.0, 0.0),
                Vector::new(x2, -height),
                Vector::new(x3, 0.0),
            ]
        };

        Body::new(BodyOptions {
            position: Vector::new(x, y),
            vertices: Some(points),
            ..options
        })
    }

    /// An even-sided regular polygon approximating a circle.
    ///
    /// The side count is `radius` clamped to `[10, max_sides]`, rounded up to an even number.
    pub fn circle(
        x: f64,
        y: f64,
        radius: f64,
        options: BodyOptions,
        max_sides: Option<u32>,
    ) -> Result<Body> {
        let radius = error::positive("radius", radius)?;
        let max_sides = max_sides.unwrap_or(DEFAULT_MAX_SIDES);
        if max_sides < MIN_CIRCLE_SIDES {
            warn!(max_sides, "circle side cap below minimum, using {MIN_CIRCLE_SIDES}");
        }

        let mut sides = radius
            .min(f64::from(max_sides))
            .max(f64::from(MIN_CIRCLE_SIDES))
            .ceil() as u32;
        if sides % 2 == 1 {
            sides += 1;
        }

        let mut body = regular(x, y, sides, radius, options)?;
        body.circle_radius = Some(radius);
        Ok(body)
    }

    /// A regular polygon with `sides` sides inscribed in a circle of `radius`.
    ///
    /// Fewer than three sides builds a circle instead.
    pub fn polygon(
        x: f64,
        y: f64,
        sides: u32,
        radius: f64,
        options: BodyOptions,
    ) -> Result<Body> {
        if sides < 3 {
            warn!(sides, "polygon needs three sides, building a circle");
            return Self::circle(x, y, radius, options, None);
        }
        let radius = error::positive("radius", radius)?;
        regular(x, y, sides, radius, options)
    }
}

fn regular(x: f64, y: f64, sides: u32, radius: f64, options: BodyOptions) -> Result<Body> {
    let theta = 2.0 * PI / f64::from(sides);
    let offset = theta * 0.5;

    let points = (0..sides)
        .map(|i| {
            let angle = offset + f64::from(i) * theta;
            Vector::new(
                round(angle.cos() * radius, 3),
                round(angle.sin() * radius, 3),
            )
        })
        .collect();

    Body::new(BodyOptions {
        position: Vector::new(x, y),
        vertices: Some(points),
        ..options
    })
}
