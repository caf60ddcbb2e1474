//! Rigid bodies: geometry, mass properties and composite assembly.
//!
//! A body owns its vertex loop, edge axes and bounds. A composite body additionally owns its
//! constituent parts; `part(0)` is always the body itself and every other part refers back to
//! it by id. Parts are never stored in the world on their own.

use tracing::debug;

use crate::common::BodyId;
use crate::error::{self, Error, Result};
use crate::geometry::{axes, vector, vertices, Vector, Vertex};

use super::collider::{Bounds, CollisionFilter};

/// Scale applied to the polygon second moment when deriving inertia.
pub const INERTIA_SCALE: f64 = 4.0;

/// Vertex path used when a body is created without explicit vertices.
pub const DEFAULT_PATH: &str = "L 0 0 L 40 0 L 40 40 L 0 40";

/// Positional and angular displacement waiting to be applied to a body.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Impulse {
    pub offset: Vector,
    pub angle: f64,
}

impl Impulse {
    pub fn is_zero(&self) -> bool {
        self.offset == Vector::ZERO && self.angle == 0.0
    }
}

/// Material and mass values saved while a body is static, restored when it becomes dynamic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicProperties {
    pub restitution: f64,
    pub friction: f64,
    pub mass: f64,
    pub inertia: f64,
    pub density: f64,
    pub inverse_mass: f64,
    pub inverse_inertia: f64,
}

/// Construction parameters for [`Body::new`].
#[derive(Debug, Clone)]
pub struct BodyOptions {
    pub label: String,
    pub position: Vector,
    pub angle: f64,
    /// Vertex loop in any frame; it is re-centred on its centroid. Default: a 40x40 square.
    pub vertices: Option<Vec<Vector>>,
    /// Constituent parts of a composite. The outer hull is generated from them.
    pub parts: Vec<Body>,
    pub is_static: bool,
    pub is_sleeping: bool,
    /// Sensors report collisions but receive no response.
    pub is_sensor: bool,
    /// Overrides the mass derived from density and area.
    pub mass: Option<f64>,
    /// Overrides the inertia derived from the vertex loop.
    pub inertia: Option<f64>,
    /// Default: 0.001.
    pub density: f64,
    pub velocity: Vector,
    pub angular_velocity: f64,
    /// Default: 0.
    pub restitution: f64,
    /// Default: 0.1.
    pub friction: f64,
    /// Default: 0.5.
    pub friction_static: f64,
    /// Default: 0.01.
    pub friction_air: f64,
    /// Tolerated penetration depth. Default: 0.05.
    pub slop: f64,
    /// Default: 1.
    pub time_scale: f64,
    /// Consecutive quiet steps before the body may sleep. Default: 60.
    pub sleep_threshold: u32,
    pub collision_filter: CollisionFilter,
}

impl Default for BodyOptions {
    fn default() -> Self {
        Self {
            label: "Body".to_string(),
            position: Vector::ZERO,
            angle: 0.0,
            vertices: None,
            parts: Vec::new(),
            is_static: false,
            is_sleeping: false,
            is_sensor: false,
            mass: None,
            inertia: None,
            density: 0.001,
            velocity: Vector::ZERO,
            angular_velocity: 0.0,
            restitution: 0.0,
            friction: 0.1,
            friction_static: 0.5,
            friction_air: 0.01,
            slop: 0.05,
            time_scale: 1.0,
            sleep_threshold: 60,
            collision_filter: CollisionFilter::default(),
        }
    }
}

/// A convex rigid body, or the root of a composite of convex parts.
#[derive(Debug, Clone)]
pub struct Body {
    pub label: String,
    pub restitution: f64,
    pub friction: f64,
    pub friction_static: f64,
    pub friction_air: f64,
    pub slop: f64,
    pub time_scale: f64,
    pub collision_filter: CollisionFilter,
    pub is_sensor: bool,
    pub sleep_threshold: u32,
    /// Force accumulated for the next step, cleared after every step.
    pub force: Vector,
    /// Torque accumulated for the next step, cleared after every step.
    pub torque: f64,

    pub(crate) id: BodyId,
    pub(crate) parent: BodyId,
    /// Non-root parts of a composite; empty for a simple body.
    pub(crate) parts: Vec<Body>,
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) axes: Vec<Vector>,
    pub(crate) bounds: Bounds,

    pub(crate) position: Vector,
    pub(crate) position_prev: Vector,
    pub(crate) angle: f64,
    pub(crate) angle_prev: f64,
    pub(crate) velocity: Vector,
    pub(crate) angular_velocity: f64,
    pub(crate) speed: f64,
    pub(crate) angular_speed: f64,

    pub(crate) position_impulse: Vector,
    pub(crate) constraint_impulse: Impulse,
    pub(crate) total_contacts: usize,

    pub(crate) area: f64,
    pub(crate) mass: f64,
    pub(crate) inverse_mass: f64,
    pub(crate) inertia: f64,
    pub(crate) inverse_inertia: f64,
    pub(crate) density: f64,

    pub(crate) is_sleeping: bool,
    pub(crate) sleep_counter: u32,
    pub(crate) motion: f64,

    pub(crate) circle_radius: Option<f64>,
    /// Saved dynamic values; `Some` exactly while the body is static.
    pub(crate) dynamic: Option<DynamicProperties>,
}

impl Body {
    /// Build a body from `options`.
    ///
    /// Fails when the vertex loop is degenerate or a mass property is not positive.
    pub fn new(options: BodyOptions) -> Result<Self> {
        let density = error::positive("density", options.density)?;
        let points = match options.vertices {
            Some(points) => points,
            None => vertices::from_path(DEFAULT_PATH)?,
        };

        let id = BodyId::next();
        let mut body = Self {
            label: options.label,
            restitution: options.restitution,
            friction: options.friction,
            friction_static: options.friction_static,
            friction_air: options.friction_air,
            slop: options.slop,
            time_scale: options.time_scale,
            collision_filter: options.collision_filter,
            is_sensor: options.is_sensor,
            sleep_threshold: options.sleep_threshold,
            force: Vector::ZERO,
            torque: 0.0,
            id,
            parent: id,
            parts: Vec::new(),
            vertices: Vec::new(),
            axes: Vec::new(),
            bounds: Bounds::default(),
            position: options.position,
            position_prev: options.position,
            angle: 0.0,
            angle_prev: 0.0,
            velocity: Vector::ZERO,
            angular_velocity: 0.0,
            speed: 0.0,
            angular_speed: 0.0,
            position_impulse: Vector::ZERO,
            constraint_impulse: Impulse::default(),
            total_contacts: 0,
            area: 0.0,
            mass: 0.0,
            inverse_mass: 0.0,
            inertia: 0.0,
            inverse_inertia: 0.0,
            density,
            is_sleeping: false,
            sleep_counter: 0,
            motion: 0.0,
            circle_radius: None,
            dynamic: None,
        };

        body.set_vertices(&points)?;
        if !options.parts.is_empty() {
            body.set_parts(options.parts, true)?;
        }
        body.set_angle(options.angle);

        if let Some(mass) = options.mass {
            body.set_mass(mass)?;
        }
        if let Some(inertia) = options.inertia {
            body.set_inertia(inertia)?;
        }

        body.set_velocity(options.velocity);
        body.set_angular_velocity(options.angular_velocity);

        if options.is_static {
            body.set_static(true);
        }
        if options.is_sleeping {
            body.set_sleeping(true);
        }

        body.update_bounds();
        Ok(body)
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    /// Id of the composite root owning this part (the body's own id for a root).
    pub fn parent(&self) -> BodyId {
        self.parent
    }

    pub fn position(&self) -> Vector {
        self.position
    }

    pub fn position_prev(&self) -> Vector {
        self.position_prev
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn angle_prev(&self) -> f64 {
        self.angle_prev
    }

    /// Velocity measured during the last integration, in units per step.
    pub fn velocity(&self) -> Vector {
        self.velocity
    }

    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn angular_speed(&self) -> f64 {
        self.angular_speed
    }

    /// Displacement since the previous step, including solver corrections.
    pub fn implicit_velocity(&self) -> Vector {
        self.position - self.position_prev
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn inverse_mass(&self) -> f64 {
        self.inverse_mass
    }

    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    pub fn inverse_inertia(&self) -> f64 {
        self.inverse_inertia
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn axes(&self) -> &[Vector] {
        &self.axes
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn is_static(&self) -> bool {
        self.dynamic.is_some()
    }

    pub fn is_sleeping(&self) -> bool {
        self.is_sleeping
    }

    pub fn sleep_counter(&self) -> u32 {
        self.sleep_counter
    }

    /// Smoothed motion estimate used by the sleep state machine.
    pub fn motion(&self) -> f64 {
        self.motion
    }

    pub fn position_impulse(&self) -> Vector {
        self.position_impulse
    }

    pub fn constraint_impulse(&self) -> Impulse {
        self.constraint_impulse
    }

    /// Radius of the circle this body approximates, when built as one.
    pub fn circle_radius(&self) -> Option<f64> {
        self.circle_radius
    }

    /// Values restored when the body stops being static.
    pub fn dynamic_properties(&self) -> Option<&DynamicProperties> {
        self.dynamic.as_ref()
    }

    pub fn is_composite(&self) -> bool {
        !self.parts.is_empty()
    }

    /// Number of parts including the body itself.
    pub fn part_count(&self) -> usize {
        1 + self.parts.len()
    }

    /// Part `index`, where index 0 is the body itself.
    pub fn part(&self, index: usize) -> Option<&Body> {
        match index {
            0 => Some(self),
            _ => self.parts.get(index - 1),
        }
    }

    /// All parts, starting with the body itself.
    pub fn parts(&self) -> impl Iterator<Item = &Body> + '_ {
        std::iter::once(self).chain(self.parts.iter())
    }

    /// Index of the first part that takes part in narrowphase tests.
    pub(crate) fn first_collision_part(&self) -> usize {
        usize::from(self.is_composite())
    }

    /// Vertex loops to draw: every part of a composite, or the body itself.
    pub fn outlines(&self) -> impl Iterator<Item = &[Vertex]> + '_ {
        self.parts()
            .skip(self.first_collision_part())
            .map(|part| part.vertices.as_slice())
    }

    /// Replace the vertex loop, recomputing axes, area, mass and inertia.
    ///
    /// The loop is re-centred on its centroid and placed at the current position. Clockwise
    /// (y-up) input is reversed so containment tests see a consistent orientation.
    pub fn set_vertices(&mut self, points: &[Vector]) -> Result<()> {
        if points.len() < 3 {
            return Err(Error::TooFewVertices {
                got: points.len(),
                min: 3,
            });
        }

        let mut verts = vertices::create(points, self.id);
        let signed_area = vertices::area(&verts, true);
        if signed_area == 0.0 || !signed_area.is_finite() {
            return Err(Error::DegenerateArea { area: signed_area });
        }
        if signed_area < 0.0 {
            let reversed: Vec<Vector> = points.iter().rev().copied().collect();
            verts = vertices::create(&reversed, self.id);
        }

        self.axes = axes::from_vertices(&verts);
        self.area = signed_area.abs();
        self.apply_mass(self.current_density() * self.area);

        let centre = vertices::centroid(&verts);
        vertices::translate(&mut verts, centre, -1.0);
        let mass = self.dynamic.map_or(self.mass, |d| d.mass);
        self.apply_inertia(INERTIA_SCALE * vertices::inertia(&verts, mass));

        vertices::translate(&mut verts, self.position, 1.0);
        self.vertices = verts;
        self.bounds.update(&self.vertices, self.velocity);
        Ok(())
    }

    /// Turn this body into a composite of `parts`.
    ///
    /// With `auto_hull` the body's own loop becomes the convex hull of all part vertices. Mass,
    /// area, inertia and position become the totals over the parts. An empty list turns the
    /// body back into a simple body.
    pub fn set_parts(&mut self, parts: Vec<Body>, auto_hull: bool) -> Result<()> {
        self.parts.clear();
        for mut part in parts {
            if part.id == self.id {
                continue;
            }
            if part.is_composite() {
                self.parts.append(&mut part.parts);
                continue;
            }
            self.parts.push(part);
        }
        for part in &mut self.parts {
            part.parent = self.id;
        }

        if self.parts.is_empty() {
            return Ok(());
        }

        if auto_hull {
            let mut all: Vec<Vertex> = self
                .parts
                .iter()
                .flat_map(|part| part.vertices.iter().copied())
                .collect();
            vertices::clockwise_sort(&mut all);
            let hull = vertices::hull(&all);
            let hull_centre = vertices::centroid(&hull);
            let points: Vec<Vector> = hull.iter().map(|v| v.point).collect();
            self.set_vertices(&points)?;
            vertices::translate(&mut self.vertices, hull_centre - self.position, 1.0);
        }

        let mut mass = 0.0;
        let mut area = 0.0;
        let mut inertia = 0.0;
        let mut centre = Vector::ZERO;
        for part in &self.parts {
            let part_mass = if part.mass.is_finite() { part.mass } else { 1.0 };
            mass += part_mass;
            area += part.area;
            inertia += if part.inertia.is_finite() {
                part.inertia
            } else {
                1.0
            };
            centre += part.position * part_mass;
        }
        centre /= mass;

        self.area = area;
        self.position = centre;
        self.position_prev = centre;
        self.apply_mass(mass);
        self.apply_inertia(inertia);
        self.update_bounds();

        debug!(body = %self.id, parts = self.parts.len(), "assembled composite body");
        Ok(())
    }

    /// Set the mass, rescaling inertia so density, mass and inertia stay consistent.
    pub fn set_mass(&mut self, mass: f64) -> Result<()> {
        self.apply_mass(error::positive("mass", mass)?);
        Ok(())
    }

    /// Set the density, deriving mass from the current area.
    pub fn set_density(&mut self, density: f64) -> Result<()> {
        let density = error::positive("density", density)?;
        self.apply_mass(density * self.area);
        Ok(())
    }

    pub fn set_inertia(&mut self, inertia: f64) -> Result<()> {
        self.apply_inertia(error::positive("inertia", inertia)?);
        Ok(())
    }

    fn current_density(&self) -> f64 {
        self.dynamic.map_or(self.density, |d| d.density)
    }

    pub(crate) fn apply_mass(&mut self, mass: f64) {
        let area = self.area;
        if let Some(saved) = self.dynamic.as_mut() {
            if let Some(moment) = moment(saved.mass, saved.inertia) {
                saved.inertia = moment * (mass / 6.0);
                saved.inverse_inertia = 1.0 / saved.inertia;
            }
            saved.mass = mass;
            saved.inverse_mass = 1.0 / mass;
            saved.density = mass / area;
            return;
        }

        if let Some(moment) = moment(self.mass, self.inertia) {
            self.inertia = moment * (mass / 6.0);
            self.inverse_inertia = 1.0 / self.inertia;
        }
        self.mass = mass;
        self.inverse_mass = 1.0 / mass;
        self.density = mass / area;
    }

    pub(crate) fn apply_inertia(&mut self, inertia: f64) {
        if let Some(saved) = self.dynamic.as_mut() {
            saved.inertia = inertia;
            saved.inverse_inertia = 1.0 / inertia;
            return;
        }
        self.inertia = inertia;
        self.inverse_inertia = 1.0 / inertia;
    }

    /// Make every part static (immovable) or restore its saved dynamic values.
    pub fn set_static(&mut self, is_static: bool) {
        if self.is_static() == is_static {
            return;
        }
        make_static(self, is_static);
        for part in &mut self.parts {
            make_static(part, is_static);
        }
        debug!(body = %self.id, is_static, "static state changed");
    }

    /// Move to `position`, carrying the previous position along so velocity is unchanged.
    pub fn set_position(&mut self, position: Vector) {
        let delta = position - self.position;
        self.position_prev += delta;
        self.position = position;
        let velocity = self.velocity;
        for part in &mut self.parts {
            part.position += delta;
            vertices::translate(&mut part.vertices, delta, 1.0);
            part.bounds.update(&part.vertices, velocity);
        }
        vertices::translate(&mut self.vertices, delta, 1.0);
        self.bounds.update(&self.vertices, velocity);
    }

    /// Rotate to `angle`, carrying the previous angle along so angular velocity is unchanged.
    pub fn set_angle(&mut self, angle: f64) {
        let delta = angle - self.angle;
        if delta == 0.0 {
            return;
        }
        self.angle_prev += delta;
        self.angle = angle;
        let (pivot, velocity) = (self.position, self.velocity);
        for part in &mut self.parts {
            part.angle += delta;
            part.position = vector::rotate_about(part.position, delta, pivot);
            vertices::rotate(&mut part.vertices, delta, pivot);
            axes::rotate(&mut part.axes, delta);
            part.bounds.update(&part.vertices, velocity);
        }
        vertices::rotate(&mut self.vertices, delta, pivot);
        axes::rotate(&mut self.axes, delta);
        self.bounds.update(&self.vertices, velocity);
    }

    /// Set the per-step velocity by moving the previous position.
    pub fn set_velocity(&mut self, velocity: Vector) {
        self.position_prev = self.position - velocity;
        self.velocity = velocity;
        self.speed = velocity.length();
    }

    pub fn set_angular_velocity(&mut self, angular_velocity: f64) {
        self.angle_prev = self.angle - angular_velocity;
        self.angular_velocity = angular_velocity;
        self.angular_speed = angular_velocity.abs();
    }

    pub fn translate(&mut self, translation: Vector) {
        self.set_position(self.position + translation);
    }

    /// Rotate by `rotation`, about `point` when given, otherwise about the body's position.
    pub fn rotate(&mut self, rotation: f64, point: Option<Vector>) {
        match point {
            None => self.set_angle(self.angle + rotation),
            Some(point) => {
                let position = vector::rotate_about(self.position, rotation, point);
                self.set_position(position);
                self.set_angle(self.angle + rotation);
            }
        }
    }

    /// Accumulate `force` applied at world-space `position`, adding the resulting torque.
    pub fn apply_force(&mut self, position: Vector, force: Vector) {
        self.force += force;
        self.torque += vector::cross(position - self.position, force);
    }

    /// Translate and rotate the geometry of every part.
    ///
    /// The root position is left to the caller; non-root part positions follow. Parts are owned
    /// by this body alone, so moving them here cannot touch any other world slot.
    pub(crate) fn move_parts(&mut self, translation: Vector, rotation: f64) {
        let (pivot, velocity) = (self.position, self.velocity);
        for part in &mut self.parts {
            vertices::translate(&mut part.vertices, translation, 1.0);
            part.position += translation;
            if rotation != 0.0 {
                part.angle += rotation;
                vertices::rotate(&mut part.vertices, rotation, pivot);
                axes::rotate(&mut part.axes, rotation);
                part.position = vector::rotate_about(part.position, rotation, pivot);
            }
            part.bounds.update(&part.vertices, velocity);
        }

        vertices::translate(&mut self.vertices, translation, 1.0);
        if rotation != 0.0 {
            vertices::rotate(&mut self.vertices, rotation, pivot);
            axes::rotate(&mut self.axes, rotation);
        }
        self.bounds.update(&self.vertices, velocity);
    }

    pub(crate) fn update_bounds(&mut self) {
        let velocity = self.velocity;
        self.bounds.update(&self.vertices, velocity);
        for part in &mut self.parts {
            part.bounds.update(&part.vertices, velocity);
        }
    }
}

/// `inertia / (mass / 6)` when both are usable for rescaling.
fn moment(mass: f64, inertia: f64) -> Option<f64> {
    let usable = |v: f64| v > 0.0 && v.is_finite();
    (usable(mass) && usable(inertia)).then(|| inertia / (mass / 6.0))
}

fn make_static(part: &mut Body, is_static: bool) {
    if is_static {
        part.dynamic = Some(DynamicProperties {
            restitution: part.restitution,
            friction: part.friction,
            mass: part.mass,
            inertia: part.inertia,
            density: part.density,
            inverse_mass: part.inverse_mass,
            inverse_inertia: part.inverse_inertia,
        });
        part.restitution = 0.0;
        part.friction = 1.0;
        part.mass = f64::INFINITY;
        part.inertia = f64::INFINITY;
        part.density = f64::INFINITY;
        part.inverse_mass = 0.0;
        part.inverse_inertia = 0.0;
        part.position_prev = part.position;
        part.angle_prev = part.angle;
        part.velocity = Vector::ZERO;
        part.angular_velocity = 0.0;
        part.speed = 0.0;
        part.angular_speed = 0.0;
        part.motion = 0.0;
    } else if let Some(saved) = part.dynamic.take() {
        part.restitution = saved.restitution;
        part.friction = saved.friction;
        part.mass = saved.mass;
        part.inertia = saved.inertia;
        part.density = saved.density;
        part.inverse_mass = saved.inverse_mass;
        part.inverse_inertia = saved.inverse_inertia;
    }
}

/// Borrow two distinct bodies mutably.
///
/// Slots index world roots only. Parts live inside their root's `parts`, never in the world
/// list, so a part can never alias another root's slot.
pub(crate) fn two_mut(bodies: &mut [Body], a: usize, b: usize) -> (&mut Body, &mut Body) {
    debug_assert_ne!(a, b, "a pair never joins a body with itself");
    if a < b {
        let (low, high) = bodies.split_at_mut(b);
        (&mut low[a], &mut high[0])
    } else {
        let (low, high) = bodies.split_at_mut(a);
        (&mut high[0], &mut low[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Body {
        let points = vec![
            Vector::new(0.0, 0.0),
            Vector::new(w, 0.0),
            Vector::new(w, h),
            Vector::new(0.0, h),
        ];
        Body::new(BodyOptions {
            position: Vector::new(x, y),
            vertices: Some(points),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_default_body() {
        let body = Body::new(BodyOptions::default()).unwrap();
        assert_eq!(body.vertices().len(), 4);
        assert!((body.area() - 1600.0).abs() < EPS);
        assert!((body.mass() - 1.6).abs() < EPS, "mass = density * area");
        assert!((body.inverse_mass() - 1.0 / 1.6).abs() < EPS);
        assert!(!body.is_static());
        assert_eq!(body.parent(), body.id());
        assert_eq!(body.part_count(), 1);
        assert_eq!(body.bounds().min, Vector::new(-20.0, -20.0));
        assert_eq!(body.bounds().max, Vector::new(20.0, 20.0));
    }

    #[test]
    fn test_vertices_centred_on_position() {
        let body = rect(100.0, 50.0, 4.0, 2.0);
        let centre = vertices::centroid(body.vertices());
        assert!((centre - Vector::new(100.0, 50.0)).length() < EPS);
        for (i, v) in body.vertices().iter().enumerate() {
            assert_eq!(v.index, i);
            assert_eq!(v.body, body.id());
        }
    }

    #[test]
    fn test_rectangle_inertia() {
        // Scaled polygon inertia of a w x h rectangle: 4 * m * (w^2 + h^2) / 12.
        let body = rect(0.0, 0.0, 4.0, 2.0);
        let expected = INERTIA_SCALE * body.mass() * (16.0 + 4.0) / 12.0;
        assert!(
            (body.inertia() - expected).abs() < 1e-9 * expected,
            "inertia {} vs {expected}",
            body.inertia()
        );
    }

    #[test]
    fn test_rejects_degenerate_geometry() {
        let two = Body::new(BodyOptions {
            vertices: Some(vec![Vector::ZERO, Vector::X]),
            ..Default::default()
        });
        assert_eq!(two.unwrap_err(), Error::TooFewVertices { got: 2, min: 3 });

        let flat = Body::new(BodyOptions {
            vertices: Some(vec![Vector::ZERO, Vector::X, Vector::new(2.0, 0.0)]),
            ..Default::default()
        });
        assert!(matches!(flat, Err(Error::DegenerateArea { .. })));

        let bad_density = Body::new(BodyOptions {
            density: 0.0,
            ..Default::default()
        });
        assert!(bad_density.is_err());
    }

    #[test]
    fn test_clockwise_input_is_reoriented() {
        let points = vec![
            Vector::new(0.0, 2.0),
            Vector::new(2.0, 2.0),
            Vector::new(2.0, 0.0),
            Vector::new(0.0, 0.0),
        ];
        let body = Body::new(BodyOptions {
            vertices: Some(points),
            ..Default::default()
        })
        .unwrap();
        assert!(vertices::area(body.vertices(), true) > 0.0);
        assert!(vertices::contains(body.vertices(), body.position()));
    }

    #[test]
    fn test_set_mass_keeps_density_and_inertia_consistent() {
        let mut body = rect(0.0, 0.0, 10.0, 10.0);
        let ratio = body.inertia() / body.mass();
        body.set_mass(5.0).unwrap();
        assert_eq!(body.mass(), 5.0);
        assert!((body.density() - 5.0 / body.area()).abs() < EPS);
        assert!((body.inertia() / body.mass() - ratio).abs() < EPS);
        assert!((body.inverse_mass() - 0.2).abs() < EPS);
        assert!(body.set_mass(-1.0).is_err());

        body.set_density(0.002).unwrap();
        assert!((body.mass() - 0.2).abs() < EPS);
        assert!((body.density() - 0.002).abs() < EPS);
    }

    #[test]
    fn test_options_override_mass_and_inertia() {
        let body = Body::new(BodyOptions {
            mass: Some(1.0),
            inertia: Some(f64::MAX),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(body.mass(), 1.0);
        assert_eq!(body.inertia(), f64::MAX);
        assert!(body.inverse_inertia() < 1e-300);
    }

    #[test]
    fn test_static_round_trip_restores_properties() {
        let mut body = rect(0.0, 0.0, 10.0, 10.0);
        body.restitution = 0.4;
        body.friction = 0.3;
        let before = (
            body.mass(),
            body.inertia(),
            body.density(),
            body.restitution,
            body.friction,
        );

        body.set_static(true);
        assert!(body.is_static());
        assert_eq!(body.mass(), f64::INFINITY);
        assert_eq!(body.inverse_mass(), 0.0);
        assert_eq!(body.inverse_inertia(), 0.0);
        assert_eq!(body.restitution, 0.0);
        assert_eq!(body.friction, 1.0);

        body.set_static(true);
        body.set_static(false);
        let after = (
            body.mass(),
            body.inertia(),
            body.density(),
            body.restitution,
            body.friction,
        );
        assert_eq!(before, after, "a repeated set_static(true) must not clobber the snapshot");
        assert!(!body.is_static());
    }

    #[test]
    fn test_set_mass_while_static_updates_snapshot() {
        let mut body = rect(0.0, 0.0, 10.0, 10.0);
        body.set_static(true);
        body.set_mass(3.0).unwrap();
        assert_eq!(body.mass(), f64::INFINITY);
        body.set_static(false);
        assert_eq!(body.mass(), 3.0);
    }

    #[test]
    fn test_set_position_and_velocity() {
        let mut body = rect(0.0, 0.0, 2.0, 2.0);
        body.set_velocity(Vector::new(1.0, 0.0));
        body.set_position(Vector::new(10.0, 0.0));
        assert_eq!(body.position(), Vector::new(10.0, 0.0));
        assert_eq!(body.implicit_velocity(), Vector::new(1.0, 0.0));
        assert!((vertices::centroid(body.vertices()) - body.position()).length() < EPS);

        body.translate(Vector::new(0.0, 5.0));
        assert_eq!(body.position(), Vector::new(10.0, 5.0));
    }

    #[test]
    fn test_set_angle_rotates_geometry() {
        let mut body = rect(0.0, 0.0, 4.0, 2.0);
        body.set_angular_velocity(0.1);
        body.set_angle(FRAC_PI_2);
        assert!((body.bounds().width() - 2.0).abs() < EPS);
        assert!((body.bounds().height() - 4.0).abs() < EPS);
        assert!((body.angle() - body.angle_prev() - 0.1).abs() < EPS);
        assert!((body.axes()[0] - Vector::new(1.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_rotate_about_point() {
        let mut body = rect(10.0, 0.0, 2.0, 2.0);
        body.rotate(FRAC_PI_2, Some(Vector::ZERO));
        assert!((body.position() - Vector::new(0.0, 10.0)).length() < EPS);
        assert!((body.angle() - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_apply_force_adds_torque() {
        let mut body = rect(0.0, 0.0, 2.0, 2.0);
        body.apply_force(Vector::new(1.0, 0.0), Vector::new(0.0, 2.0));
        assert_eq!(body.force, Vector::new(0.0, 2.0));
        assert_eq!(body.torque, 2.0);
        body.apply_force(Vector::ZERO, Vector::new(1.0, 0.0));
        assert_eq!(body.torque, 2.0, "a force through the centre adds no torque");
    }

    #[test]
    fn test_composite_aggregation() {
        let left = rect(0.0, 0.0, 2.0, 2.0);
        let right = rect(4.0, 0.0, 2.0, 4.0);
        let (mass_l, mass_r) = (left.mass(), right.mass());
        let (inertia_sum, area_sum) = (
            left.inertia() + right.inertia(),
            left.area() + right.area(),
        );
        let expected_centre =
            (left.position() * mass_l + right.position() * mass_r) / (mass_l + mass_r);

        let body = Body::new(BodyOptions {
            parts: vec![left, right],
            ..Default::default()
        })
        .unwrap();

        assert_eq!(body.part_count(), 3);
        assert!(body.is_composite());
        assert!((body.mass() - (mass_l + mass_r)).abs() < 1e-9 * body.mass());
        assert!((body.area() - area_sum).abs() < 1e-9 * area_sum);
        assert!((body.inertia() - inertia_sum).abs() < 1e-9 * inertia_sum);
        assert!((body.position() - expected_centre).length() < 1e-9);
        for part in body.parts().skip(1) {
            assert_eq!(part.parent(), body.id(), "parts refer back to the root");
        }
        assert_eq!(body.part(0).map(Body::id), Some(body.id()));
        assert_eq!(body.outlines().count(), 2, "outlines skip the hull");

        // The hull encloses both parts.
        assert!((body.bounds().min - Vector::new(-1.0, -2.0)).length() < EPS);
        assert!((body.bounds().max - Vector::new(5.0, 2.0)).length() < EPS);
    }

    #[test]
    fn test_composite_moves_parts_together() {
        let mut body = Body::new(BodyOptions {
            parts: vec![rect(0.0, 0.0, 2.0, 2.0), rect(4.0, 0.0, 2.0, 2.0)],
            ..Default::default()
        })
        .unwrap();
        let centre = body.position();
        body.set_angle(FRAC_PI_2);
        let first = body.part(1).unwrap().position();
        assert!((first - (centre + Vector::new(0.0, -2.0))).length() < EPS);

        body.translate(Vector::new(1.0, 1.0));
        let first_moved = body.part(1).unwrap().position();
        assert!((first_moved - first - Vector::new(1.0, 1.0)).length() < EPS);
    }

    #[test]
    fn test_static_composite_parts() {
        let mut body = Body::new(BodyOptions {
            parts: vec![rect(0.0, 0.0, 2.0, 2.0), rect(4.0, 0.0, 2.0, 2.0)],
            is_static: true,
            ..Default::default()
        })
        .unwrap();
        assert!(body.parts().all(Body::is_static));
        body.set_static(false);
        assert!(body.parts().all(|p| !p.is_static()));
    }

    #[test]
    fn test_static_part_counts_as_unit_mass() {
        let mut anchor = rect(0.0, 0.0, 2.0, 2.0);
        anchor.set_static(true);
        let free = rect(4.0, 0.0, 2.0, 4.0);
        let (mass, inertia, area) = (free.mass(), free.inertia(), free.area());
        let expected_centre = (anchor.position() + free.position() * mass) / (1.0 + mass);
        let expected_area = anchor.area() + area;

        let body = Body::new(BodyOptions {
            parts: vec![anchor, free],
            ..Default::default()
        })
        .unwrap();

        assert!(body.part(1).unwrap().is_static());
        assert!(body.mass().is_finite(), "a static part must not make the total infinite");
        assert!(
            (body.mass() - (mass + 1.0)).abs() < 1e-9 * body.mass(),
            "the static part adds unit mass: {}",
            body.mass()
        );
        assert!(
            (body.inertia() - (inertia + 1.0)).abs() < 1e-9 * body.inertia(),
            "the static part adds unit inertia: {}",
            body.inertia()
        );
        assert!((body.area() - expected_area).abs() < 1e-9 * expected_area);
        assert!(
            (body.position() - expected_centre).length() < 1e-9,
            "centre is weighted with unit mass for the static part: {:?}",
            body.position()
        );
    }

    #[test]
    fn test_two_mut() {
        let mut bodies = vec![rect(0.0, 0.0, 1.0, 1.0), rect(5.0, 0.0, 1.0, 1.0)];
        let (b, a) = two_mut(&mut bodies, 1, 0);
        assert_eq!(a.position().x, 0.0);
        assert_eq!(b.position().x, 5.0);
    }
}
