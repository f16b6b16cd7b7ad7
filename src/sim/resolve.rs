//! Impulse-based collision response
//!
//! Velocity and position are corrected separately: impulses only act on
//! approaching bodies, while overlap is always removed by moving positions.

use super::body::Body;
use super::collision::Contact;

/// Resolve a ball-ball contact (`contact.normal` points from `a` to `b`)
pub fn resolve_ball_ball(a: &mut Body, b: &mut Body, contact: &Contact, restitution: f32) {
    if !contact.hit {
        return;
    }
    let n = contact.normal;
    let inv_a = a.inv_mass();
    let inv_b = b.inv_mass();
    let inv_sum = inv_a + inv_b;

    // Positional correction, split so the heavier body moves less
    let share_a = inv_a / inv_sum;
    let share_b = inv_b / inv_sum;
    a.position -= n * (contact.penetration * share_a);
    b.position += n * (contact.penetration * share_b);

    let rel_normal = (b.velocity - a.velocity).dot(n);
    if rel_normal >= 0.0 {
        // Already separating
        return;
    }

    let j = -(1.0 + restitution) * rel_normal / inv_sum;
    a.velocity -= n * (j * inv_a);
    b.velocity += n * (j * inv_b);
}

/// Resolve a ball-wall contact; the wall has infinite mass
pub fn resolve_ball_boundary(body: &mut Body, contact: &Contact, restitution: f32) {
    if !contact.hit {
        return;
    }
    let n = contact.normal;
    body.position += n * contact.penetration;

    let vn = body.velocity.dot(n);
    if vn < 0.0 {
        body.velocity -= n * ((1.0 + restitution) * vn);
    }
}
