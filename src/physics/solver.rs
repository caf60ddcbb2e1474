//! Iterative contact resolver: position correction and sequential impulses.
//!
//! Both passes work on Verlet state. Position corrections accumulate in each body's
//! `position_impulse` and are applied once per step; velocity corrections are written into
//! `position_prev`/`angle_prev`, which changes the velocity the next integration derives.

use crate::geometry::{vector, Vector};

use super::body::{two_mut, Body};
use super::contact::{Contact, Pair};
use super::narrowphase::{Collision, Side};

/// Normal speed squared above which a contact is treated as an impact rather than resting.
const RESTING_THRESH: f64 = 4.0;
/// Tangent speed squared above which cached friction is discarded.
const RESTING_THRESH_TANGENT: f64 = 8.0;
/// Fraction of the remaining penetration corrected per iteration.
const POSITION_DAMPEN: f64 = 0.9;
/// Fraction of the position impulse carried into the next step.
const POSITION_WARMING: f64 = 0.8;
const FRICTION_NORMAL_MULTIPLIER: f64 = 100.0;

/// Count active contacts on both parents of every active pair.
pub fn pre_solve_position(pairs: &[Pair], bodies: &mut [Body]) {
    for pair in pairs {
        if !pair.is_active {
            continue;
        }
        let count = pair.active_contact_count();
        bodies[pair.slot_a].total_contacts += count;
        bodies[pair.slot_b].total_contacts += count;
    }
}

/// One position iteration: push overlapping parents apart along the contact normal.
///
/// The correction is shared between a body's contacts and doubled against static bodies.
pub fn solve_position(pairs: &mut [Pair], bodies: &mut [Body], time_scale: f64) {
    for pair in pairs.iter_mut() {
        if !pair.is_active || pair.is_sensor {
            continue;
        }
        let (a, b) = (&bodies[pair.slot_a], &bodies[pair.slot_b]);
        let collision = &pair.collision;
        pair.separation = collision
            .normal
            .dot(b.position_impulse + collision.penetration - a.position_impulse);
    }

    for pair in pairs.iter() {
        if !pair.is_active || pair.is_sensor {
            continue;
        }
        let normal = pair.collision.normal;
        let (a, b) = two_mut(bodies, pair.slot_a, pair.slot_b);

        let mut impulse = (pair.separation - pair.slop) * time_scale;
        if a.is_static() || b.is_static() {
            impulse *= 2.0;
        }

        if !(a.is_static() || a.is_sleeping) {
            let share = POSITION_DAMPEN / a.total_contacts.max(1) as f64;
            a.position_impulse += normal * (impulse * share);
        }
        if !(b.is_static() || b.is_sleeping) {
            let share = POSITION_DAMPEN / b.total_contacts.max(1) as f64;
            b.position_impulse -= normal * (impulse * share);
        }
    }
}

/// Apply accumulated position impulses to geometry and keep a damped share for warm starting.
pub fn post_solve_position(bodies: &mut [Body]) {
    for body in bodies {
        body.total_contacts = 0;
        let impulse = body.position_impulse;
        if impulse == Vector::ZERO {
            continue;
        }

        body.position += impulse;
        body.move_parts(impulse, 0.0);
        body.position_prev += impulse;

        if impulse.dot(body.velocity) < 0.0 {
            body.position_impulse = Vector::ZERO;
        } else {
            body.position_impulse *= POSITION_WARMING;
        }
    }
}

/// Warm start: re-apply last step's cached contact impulses.
pub fn pre_solve_velocity(pairs: &[Pair], bodies: &mut [Body]) {
    for pair in pairs {
        if !pair.is_active || pair.is_sensor {
            continue;
        }
        let collision = pair.collision;
        let (a, b) = two_mut(bodies, pair.slot_a, pair.slot_b);

        for contact in pair.active_contacts() {
            if contact.normal_impulse == 0.0 && contact.tangent_impulse == 0.0 {
                continue;
            }
            let point = contact_point(a, b, &collision, contact);
            let impulse =
                collision.normal * contact.normal_impulse + collision.tangent * contact.tangent_impulse;
            apply_impulse(a, b, point, impulse);
        }
    }
}

/// One velocity iteration of sequential impulses with Coulomb friction.
pub fn solve_velocity(pairs: &mut [Pair], bodies: &mut [Body], time_scale: f64) {
    let time_scale_squared = time_scale * time_scale;
    let resting_thresh = RESTING_THRESH * time_scale_squared;
    let resting_thresh_tangent = RESTING_THRESH_TANGENT * time_scale_squared;

    for pair in pairs.iter_mut() {
        if !pair.is_active || pair.is_sensor {
            continue;
        }
        let collision = pair.collision;
        let (normal, tangent) = (collision.normal, collision.tangent);
        let (a, b) = two_mut(bodies, pair.slot_a, pair.slot_b);

        let contact_count = pair.active_contact_count();
        let contact_share = 1.0 / contact_count as f64;
        let inverse_mass_total = a.inverse_mass + b.inverse_mass;
        let friction =
            pair.friction * pair.friction_static * FRICTION_NORMAL_MULTIPLIER * time_scale_squared;

        a.velocity = a.position - a.position_prev;
        b.velocity = b.position - b.position_prev;
        a.angular_velocity = a.angle - a.angle_prev;
        b.angular_velocity = b.angle - b.angle_prev;

        for n in 0..contact_count {
            let point = contact_point(a, b, &collision, pair.active_contact_mut(n));
            let offset_a = point - a.position;
            let offset_b = point - b.position;

            let velocity_a =
                a.velocity + Vector::new(-offset_a.y, offset_a.x) * a.angular_velocity;
            let velocity_b =
                b.velocity + Vector::new(-offset_b.y, offset_b.x) * b.angular_velocity;
            let relative = velocity_a - velocity_b;
            let normal_velocity = normal.dot(relative);
            let tangent_velocity = tangent.dot(relative);

            let normal_overlap = pair.separation + normal_velocity;
            let normal_force = if normal_overlap < 0.0 {
                0.0
            } else {
                normal_overlap.min(1.0)
            };
            let friction_limit = normal_force * friction;

            let (mut tangent_impulse, max_friction) = if tangent_velocity.abs() > friction_limit {
                let max_friction = tangent_velocity.abs();
                let impulse = pair.friction * tangent_velocity.signum() * time_scale_squared;
                (impulse.clamp(-max_friction, max_friction), max_friction)
            } else {
                (tangent_velocity, f64::INFINITY)
            };

            let offset_a_cross_n = vector::cross(offset_a, normal);
            let offset_b_cross_n = vector::cross(offset_b, normal);
            let share = contact_share
                / (inverse_mass_total
                    + a.inverse_inertia * offset_a_cross_n * offset_a_cross_n
                    + b.inverse_inertia * offset_b_cross_n * offset_b_cross_n);

            let mut normal_impulse = (1.0 + pair.restitution) * normal_velocity * share;
            tangent_impulse *= share;

            let contact = pair.active_contact_mut(n);
            if normal_velocity * normal_velocity > resting_thresh && normal_velocity < 0.0 {
                // Impact: drop the cached impulse instead of clamping against it.
                contact.normal_impulse = 0.0;
            } else {
                let cached = contact.normal_impulse;
                contact.normal_impulse = (cached + normal_impulse).min(0.0);
                normal_impulse = contact.normal_impulse - cached;
            }

            if tangent_velocity * tangent_velocity > resting_thresh_tangent {
                contact.tangent_impulse = 0.0;
            } else {
                let cached = contact.tangent_impulse;
                contact.tangent_impulse = (cached + tangent_impulse).clamp(-max_friction, max_friction);
                tangent_impulse = contact.tangent_impulse - cached;
            }

            let impulse = normal * normal_impulse + tangent * tangent_impulse;
            apply_impulse(a, b, point, impulse);
        }
    }
}

/// Current world position of a contact vertex.
fn contact_point(a: &Body, b: &Body, collision: &Collision, contact: &Contact) -> Vector {
    let part = match contact.side {
        Side::A => a.part(collision.part_index_a),
        Side::B => b.part(collision.part_index_b),
    };
    part.and_then(|part| part.vertices.get(contact.vertex.index))
        .map_or(contact.vertex.point, |vertex| vertex.point)
}

/// Apply `impulse` at `point` to A and its opposite to B, in Verlet form.
fn apply_impulse(a: &mut Body, b: &mut Body, point: Vector, impulse: Vector) {
    if !(a.is_static() || a.is_sleeping) {
        a.position_prev += impulse * a.inverse_mass;
        a.angle_prev += a.inverse_inertia * vector::cross(point - a.position, impulse);
    }
    if !(b.is_static() || b.is_sleeping) {
        b.position_prev -= impulse * b.inverse_mass;
        b.angle_prev -= b.inverse_inertia * vector::cross(point - b.position, impulse);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::body::BodyOptions;

    fn square(x: f64, y: f64, is_static: bool) -> Body {
        Body::new(BodyOptions {
            position: Vector::new(x, y),
            is_static,
            ..Default::default()
        })
        .unwrap()
    }

    /// A dynamic box resting 2 units deep in a static one, in canonical order.
    fn scene() -> (Vec<Body>, Vec<Pair>) {
        let ground = square(0.0, 0.0, true);
        let block = square(0.0, -38.0, false);
        let collision = Collision::between(&ground, &block).unwrap();
        let pair = Pair::new(collision, &ground, &block, (0, 1), 0.0);
        (vec![ground, block], vec![pair])
    }

    #[test]
    fn test_position_pass_separates_bodies() {
        let (mut bodies, mut pairs) = scene();
        let before = bodies[1].position();

        pre_solve_position(&pairs, &mut bodies);
        assert_eq!(bodies[1].total_contacts, 2);
        for _ in 0..6 {
            solve_position(&mut pairs, &mut bodies, 1.0);
        }
        post_solve_position(&mut bodies);

        assert_eq!(bodies[0].position(), Vector::ZERO, "static bodies never move");
        let moved = bodies[1].position() - before;
        assert!(moved.y < 0.0, "block is pushed out of the ground, moved = {moved:?}");
        assert!(moved.y > -2.0, "correction never overshoots the penetration");
        assert_eq!(bodies[1].total_contacts, 0, "contact counts reset after the pass");
        assert_eq!(
            bodies[1].implicit_velocity(),
            Vector::ZERO,
            "position correction does not add velocity"
        );
    }

    #[test]
    fn test_position_impulse_dropped_when_opposing_velocity() {
        let (mut bodies, mut pairs) = scene();
        bodies[1].velocity = Vector::new(0.0, 1.0);
        pre_solve_position(&pairs, &mut bodies);
        solve_position(&mut pairs, &mut bodies, 1.0);
        post_solve_position(&mut bodies);
        assert_eq!(bodies[1].position_impulse(), Vector::ZERO);
    }

    #[test]
    fn test_velocity_pass_stops_approach() {
        let (mut bodies, mut pairs) = scene();
        // Block falls into the ground at 1 unit per step.
        bodies[1].set_velocity(Vector::new(0.0, 1.0));

        pre_solve_velocity(&pairs, &mut bodies);
        for _ in 0..4 {
            solve_velocity(&mut pairs, &mut bodies, 1.0);
        }

        let velocity = bodies[1].implicit_velocity();
        assert!(velocity.y < 0.01, "resting contact removes approach speed: {velocity:?}");
        assert!(velocity.y > -1e-9, "no bounce without restitution: {velocity:?}");
        assert!(bodies[1].angle_prev().abs() < 1e-9, "symmetric contacts add no spin");
        for contact in pairs[0].active_contacts() {
            assert!(contact.normal_impulse <= 0.0, "accumulated normal impulse stays non-positive");
        }
    }

    #[test]
    fn test_impact_discards_cached_impulse() {
        let (mut bodies, mut pairs) = scene();
        pairs[0].active_contact_mut(0).normal_impulse = -3.0;
        bodies[1].set_velocity(Vector::new(0.0, 5.0));
        solve_velocity(&mut pairs, &mut bodies, 1.0);
        assert_eq!(pairs[0].active_contacts().next().map(|c| c.normal_impulse), Some(0.0));
        assert!(bodies[1].implicit_velocity().y < 5.0);
    }

    /// The block skims the ground sideways with no normal load, so any slide beats static
    /// friction.
    fn sliding_scene(speed: f64) -> (Vec<Body>, Vec<Pair>, f64) {
        let (mut bodies, mut pairs) = scene();
        pairs[0].separation = 0.0;
        let slide = Vector::new(speed, 0.0);
        bodies[1].set_velocity(slide);
        let tangent_velocity = pairs[0].collision.tangent.dot(-slide);
        (bodies, pairs, tangent_velocity)
    }

    #[test]
    fn test_sliding_friction_clamped_to_tangent_speed() {
        let (mut bodies, mut pairs, tangent_velocity) = sliding_scene(1.5);
        assert!((tangent_velocity.abs() - 1.5).abs() < 1e-12);
        assert_eq!(pairs[0].active_contact_count(), 2);
        pairs[0].active_contact_mut(0).tangent_impulse = 10.0 * tangent_velocity.signum();

        solve_velocity(&mut pairs, &mut bodies, 1.0);

        let impulses: Vec<f64> = pairs[0].active_contacts().map(|c| c.tangent_impulse).collect();
        assert!(
            (impulses[0] - tangent_velocity).abs() < 1e-12,
            "an oversized cached impulse is clamped to the tangent speed: {}",
            impulses[0]
        );
        assert!(impulses[1] != 0.0, "sliding accumulates friction: {}", impulses[1]);
        assert!(
            impulses[1].abs() <= tangent_velocity.abs(),
            "friction never exceeds the tangent speed: {}",
            impulses[1]
        );
        assert_eq!(
            impulses[1].signum(),
            tangent_velocity.signum(),
            "friction accumulates along the slide"
        );
        for contact in pairs[0].active_contacts() {
            assert_eq!(contact.normal_impulse, 0.0, "no normal load, no normal impulse");
        }
    }

    #[test]
    fn test_fast_slide_discards_cached_friction() {
        let (mut bodies, mut pairs, tangent_velocity) = sliding_scene(3.0);
        assert!(tangent_velocity * tangent_velocity > RESTING_THRESH_TANGENT);
        pairs[0].active_contact_mut(0).tangent_impulse = 0.5;

        solve_velocity(&mut pairs, &mut bodies, 1.0);

        for contact in pairs[0].active_contacts() {
            assert_eq!(contact.tangent_impulse, 0.0, "fast slides keep no friction history");
        }
    }

    #[test]
    fn test_sensor_pairs_are_skipped() {
        let (mut bodies, mut pairs) = scene();
        pairs[0].is_sensor = true;
        bodies[1].set_velocity(Vector::new(0.0, 1.0));
        pre_solve_position(&pairs, &mut bodies);
        solve_position(&mut pairs, &mut bodies, 1.0);
        post_solve_position(&mut bodies);
        solve_velocity(&mut pairs, &mut bodies, 1.0);
        assert_eq!(bodies[1].implicit_velocity(), Vector::new(0.0, 1.0));
    }
}
