//! Sleep state machine: bodies that stay still long enough stop being simulated.

use tracing::debug;

use crate::geometry::Vector;

use super::body::{two_mut, Body};
use super::contact::Pair;

/// Motion a touching body needs to wake a sleeper.
const MOTION_WAKE_THRESHOLD: f64 = 0.18;
/// Motion below which a body counts towards sleeping.
const MOTION_SLEEP_THRESHOLD: f64 = 0.08;
/// Weight of the smaller sample in the motion average.
const MIN_BIAS: f64 = 0.9;

impl Body {
    /// Put the body to sleep (freezing it in place) or wake it.
    pub fn set_sleeping(&mut self, is_sleeping: bool) {
        let was_sleeping = self.is_sleeping;
        if is_sleeping {
            self.is_sleeping = true;
            self.sleep_counter = self.sleep_threshold;
            self.position_impulse = Vector::ZERO;
            self.position_prev = self.position;
            self.angle_prev = self.angle;
            self.velocity = Vector::ZERO;
            self.angular_velocity = 0.0;
            self.speed = 0.0;
            self.angular_speed = 0.0;
            self.motion = 0.0;
            if !was_sleeping {
                debug!(body = %self.id, "sleep start");
            }
        } else {
            self.is_sleeping = false;
            self.sleep_counter = 0;
            if was_sleeping {
                debug!(body = %self.id, "sleep end");
            }
        }
    }
}

/// Advance every body's sleep counter from its smoothed motion.
///
/// Any accumulated force wakes a body immediately.
pub fn update(bodies: &mut [Body], time_scale: f64) {
    let time_factor = time_scale * time_scale * time_scale;

    for body in bodies {
        if body.is_static() {
            continue;
        }

        if body.force != Vector::ZERO {
            body.set_sleeping(false);
            continue;
        }

        let motion = body.speed * body.speed + body.angular_speed * body.angular_speed;
        let min_motion = body.motion.min(motion);
        let max_motion = body.motion.max(motion);
        body.motion = MIN_BIAS * min_motion + (1.0 - MIN_BIAS) * max_motion;

        if body.sleep_threshold > 0 && body.motion < MOTION_SLEEP_THRESHOLD * time_factor {
            body.sleep_counter += 1;
            if body.sleep_counter >= body.sleep_threshold {
                body.set_sleeping(true);
            }
        } else if body.sleep_counter > 0 {
            body.sleep_counter -= 1;
        }
    }
}

/// Wake sleeping bodies touched by a sufficiently fast body.
///
/// Two sleepers never wake each other, and static bodies never wake anything.
pub fn after_collisions(pairs: &[Pair], bodies: &mut [Body], time_scale: f64) {
    let time_factor = time_scale * time_scale * time_scale;

    for pair in pairs {
        if !pair.is_active {
            continue;
        }
        let (a, b) = two_mut(bodies, pair.slot_a, pair.slot_b);
        if (a.is_sleeping && b.is_sleeping) || a.is_static() || b.is_static() {
            continue;
        }
        if !(a.is_sleeping || b.is_sleeping) {
            continue;
        }

        let (sleeping, moving) = if a.is_sleeping { (a, b) } else { (b, a) };
        if moving.motion > MOTION_WAKE_THRESHOLD * time_factor {
            sleeping.set_sleeping(false);
        }
    }
}
