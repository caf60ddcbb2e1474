//! Rigid body integration functions.

use crate::geometry::Vector;

use super::body::Body;
use super::Gravity;

impl Body {
    /// Advance one step with position Verlet integration.
    ///
    /// Velocity is the damped displacement since the previous step plus the accumulated force
    /// over `delta²`. `correction` compensates for a delta that changed since the last step.
    pub fn update(&mut self, delta: f64, time_scale: f64, correction: f64) {
        let delta_scaled = delta * time_scale * self.time_scale;
        let delta_squared = delta_scaled * delta_scaled;
        let friction_air = 1.0 - self.friction_air * time_scale * self.time_scale;

        let velocity_prev = self.position - self.position_prev;
        self.velocity =
            velocity_prev * friction_air * correction + self.force * self.inverse_mass * delta_squared;
        self.position_prev = self.position;
        self.position += self.velocity;

        self.angular_velocity = (self.angle - self.angle_prev) * friction_air * correction
            + self.torque * self.inverse_inertia * delta_squared;
        self.angle_prev = self.angle;
        self.angle += self.angular_velocity;

        self.speed = self.velocity.length();
        self.angular_speed = self.angular_velocity.abs();

        self.move_parts(self.velocity, self.angular_velocity);
    }
}

/// Accumulate gravity on every awake dynamic body.
pub fn apply_gravity(bodies: &mut [Body], gravity: &Gravity) {
    if gravity.scale == 0.0 || gravity.direction == Vector::ZERO {
        return;
    }
    for body in bodies {
        if body.is_static() || body.is_sleeping {
            continue;
        }
        body.force += gravity.direction * (body.mass * gravity.scale);
    }
}

/// Integrate every awake dynamic body.
pub fn update_bodies(bodies: &mut [Body], delta: f64, time_scale: f64, correction: f64) {
    for body in bodies {
        if body.is_static() || body.is_sleeping {
            continue;
        }
        body.update(delta, time_scale, correction);
    }
}

/// Clear force and torque accumulators on all bodies.
pub fn clear_forces(bodies: &mut [Body]) {
    for body in bodies {
        body.force = Vector::ZERO;
        body.torque = 0.0;
    }
}
