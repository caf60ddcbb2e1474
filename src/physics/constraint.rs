//! Distance constraints (springs and rigid links) between bodies or fixed world points.

use crate::common::{BodyId, ConstraintId};
use crate::error::{self, Error, Result};
use crate::geometry::{vector, Vector};

use super::body::{two_mut, Body, Impulse};

/// Fraction of the constraint impulse carried into the next pass.
const WARMING: f64 = 0.4;
const TORQUE_DAMPEN: f64 = 1.0;
/// Floor on the current length to avoid dividing by zero.
const MIN_LENGTH: f64 = 1e-6;

/// Construction parameters for [`Constraint::new`].
#[derive(Debug, Clone)]
pub struct ConstraintOptions {
    pub label: String,
    /// Anchor offset from body A's position, or a world point when there is no body A.
    pub point_a: Vector,
    /// Anchor offset from body B's position, or a world point when there is no body B.
    pub point_b: Vector,
    /// Rest length. Default: the distance between the anchors at construction.
    pub length: Option<f64>,
    /// Default: 1 for a positive rest length, 0.7 otherwise.
    pub stiffness: Option<f64>,
    /// Default: 0.
    pub damping: f64,
    /// Default: 0.
    pub angular_stiffness: f64,
}

impl Default for ConstraintOptions {
    fn default() -> Self {
        Self {
            label: "Constraint".to_string(),
            point_a: Vector::ZERO,
            point_b: Vector::ZERO,
            length: None,
            stiffness: None,
            damping: 0.0,
            angular_stiffness: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Constraint {
    pub label: String,
    pub point_a: Vector,
    pub point_b: Vector,
    pub length: f64,
    pub stiffness: f64,
    pub damping: f64,
    pub angular_stiffness: f64,
    pub(crate) id: ConstraintId,
    pub(crate) body_a: Option<BodyId>,
    pub(crate) body_b: Option<BodyId>,
    /// Body angles the anchors were last rotated to.
    pub(crate) angle_a: f64,
    pub(crate) angle_b: f64,
    pub(crate) slot_a: Option<usize>,
    pub(crate) slot_b: Option<usize>,
}

impl Constraint {
    /// Connect `body_a` and `body_b`; a missing body makes that end a fixed world point.
    pub fn new(
        body_a: Option<&Body>,
        body_b: Option<&Body>,
        options: ConstraintOptions,
    ) -> Result<Self> {
        if body_a.is_none() && body_b.is_none() {
            return Err(Error::UnanchoredConstraint);
        }

        let world_a = body_a.map_or(options.point_a, |b| b.position + options.point_a);
        let world_b = body_b.map_or(options.point_b, |b| b.position + options.point_b);
        let length = match options.length {
            Some(length) => error::in_range("length", length, 0.0, f64::MAX)?,
            None => world_a.distance(world_b),
        };
        let stiffness = match options.stiffness {
            Some(stiffness) => error::in_range("stiffness", stiffness, f64::MIN_POSITIVE, 1.0)?,
            None if length > 0.0 => 1.0,
            None => 0.7,
        };

        Ok(Self {
            label: options.label,
            point_a: options.point_a,
            point_b: options.point_b,
            length,
            stiffness,
            damping: error::in_range("damping", options.damping, 0.0, 1.0)?,
            angular_stiffness: error::in_range(
                "angular_stiffness",
                options.angular_stiffness,
                0.0,
                1.0,
            )?,
            id: ConstraintId::next(),
            body_a: body_a.map(Body::id),
            body_b: body_b.map(Body::id),
            angle_a: body_a.map_or(0.0, Body::angle),
            angle_b: body_b.map_or(0.0, Body::angle),
            slot_a: None,
            slot_b: None,
        })
    }

    pub fn id(&self) -> ConstraintId {
        self.id
    }

    pub fn body_a(&self) -> Option<BodyId> {
        self.body_a
    }

    pub fn body_b(&self) -> Option<BodyId> {
        self.body_b
    }

    /// World positions of both anchors.
    pub fn world_points(&self, bodies: &[Body]) -> (Vector, Vector) {
        let anchor = |slot: Option<usize>, point: Vector| {
            slot.and_then(|s| bodies.get(s))
                .map_or(point, |body| body.position + point)
        };
        (
            anchor(self.slot_a, self.point_a),
            anchor(self.slot_b, self.point_b),
        )
    }

    /// An end is fixed when it has no body or a static one.
    fn is_fixed(&self, bodies: &[Body]) -> bool {
        let fixed = |slot: Option<usize>| slot.map_or(true, |s| bodies[s].is_static());
        fixed(self.slot_a) || fixed(self.slot_b)
    }

    /// One Gauss-Seidel projection towards the rest length.
    fn solve(&mut self, bodies: &mut [Body], time_scale: f64) {
        let (mut body_a, mut body_b) = match (self.slot_a, self.slot_b) {
            (None, None) => return,
            (Some(a), Some(b)) if a == b => return,
            (Some(a), Some(b)) => {
                let (a, b) = two_mut(bodies, a, b);
                (Some(a), Some(b))
            }
            (Some(a), None) => (bodies.get_mut(a), None),
            (None, Some(b)) => (None, bodies.get_mut(b)),
        };

        if let Some(body) = body_a.as_deref().filter(|b| !b.is_static()) {
            self.point_a = vector::rotate(self.point_a, body.angle - self.angle_a);
            self.angle_a = body.angle;
        }
        if let Some(body) = body_b.as_deref().filter(|b| !b.is_static()) {
            self.point_b = vector::rotate(self.point_b, body.angle - self.angle_b);
            self.angle_b = body.angle;
        }

        let world_a = body_a.as_deref().map_or(self.point_a, |b| b.position + self.point_a);
        let world_b = body_b.as_deref().map_or(self.point_b, |b| b.position + self.point_b);
        let delta = world_a - world_b;
        let current_length = delta.length().max(MIN_LENGTH);

        let difference = (current_length - self.length) / current_length;
        let stiffness = if self.stiffness < 1.0 {
            self.stiffness * time_scale
        } else {
            self.stiffness
        };
        let force = delta * (difference * stiffness);

        let inverse_mass = |b: &Option<&mut Body>| b.as_deref().map_or(0.0, |b| b.inverse_mass);
        let inverse_inertia =
            |b: &Option<&mut Body>| b.as_deref().map_or(0.0, |b| b.inverse_inertia);
        let mass_total = inverse_mass(&body_a) + inverse_mass(&body_b);
        if mass_total == 0.0 {
            return;
        }
        let resistance_total = mass_total + inverse_inertia(&body_a) + inverse_inertia(&body_b);

        let damping = (self.damping > 0.0).then(|| {
            let normal = delta / current_length;
            let velocity =
                |b: &Option<&mut Body>| b.as_deref().map_or(Vector::ZERO, Body::implicit_velocity);
            (normal, normal.dot(velocity(&body_b) - velocity(&body_a)))
        });

        if let Some(body) = body_a.as_deref_mut().filter(|b| !b.is_static()) {
            let share = body.inverse_mass / mass_total;
            body.constraint_impulse.offset -= force * share;
            body.position -= force * share;
            if let Some((normal, normal_velocity)) = damping {
                body.position_prev -= normal * (self.damping * normal_velocity * share);
            }
            let torque = vector::cross(self.point_a, force) / resistance_total
                * TORQUE_DAMPEN
                * body.inverse_inertia
                * (1.0 - self.angular_stiffness);
            body.constraint_impulse.angle -= torque;
            body.angle -= torque;
        }

        if let Some(body) = body_b.as_deref_mut().filter(|b| !b.is_static()) {
            let share = body.inverse_mass / mass_total;
            body.constraint_impulse.offset += force * share;
            body.position += force * share;
            if let Some((normal, normal_velocity)) = damping {
                body.position_prev += normal * (self.damping * normal_velocity * share);
            }
            let torque = vector::cross(self.point_b, force) / resistance_total
                * TORQUE_DAMPEN
                * body.inverse_inertia
                * (1.0 - self.angular_stiffness);
            body.constraint_impulse.angle += torque;
            body.angle += torque;
        }
    }
}

/// Re-apply the impulses carried over from the previous pass to positions and angles.
pub fn pre_solve_all(bodies: &mut [Body]) {
    for body in bodies {
        let impulse = body.constraint_impulse;
        if body.is_static() || impulse.is_zero() {
            continue;
        }
        body.position += impulse.offset;
        body.angle += impulse.angle;
    }
}

/// One iteration over every constraint; constraints with a fixed end go first.
pub fn solve_all(constraints: &mut [Constraint], bodies: &mut [Body], time_scale: f64) {
    for constraint in constraints.iter_mut() {
        if constraint.is_fixed(bodies) {
            constraint.solve(bodies, time_scale);
        }
    }
    for constraint in constraints.iter_mut() {
        if !constraint.is_fixed(bodies) {
            constraint.solve(bodies, time_scale);
        }
    }
}

/// Move geometry by the accumulated impulses, wake the bodies and damp the impulses.
pub fn post_solve_all(bodies: &mut [Body]) {
    for body in bodies {
        let impulse = body.constraint_impulse;
        if body.is_static() || impulse.is_zero() {
            continue;
        }
        body.set_sleeping(false);
        body.move_parts(impulse.offset, impulse.angle);
        body.constraint_impulse = Impulse {
            offset: impulse.offset * WARMING,
            angle: impulse.angle * WARMING,
        };
    }
}
