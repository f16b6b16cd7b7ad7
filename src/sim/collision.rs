//! Narrow-phase collision detection
//!
//! Pure functions from geometry to contacts. Ball-ball is a circle overlap
//! test; ball-boundary walks the four rotated edges, skipping the opening.

use glam::Vec2;

use super::body::Body;
use super::boundary::Boundary;
use crate::consts::EPSILON;

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Whether the shapes overlap
    pub hit: bool,
    /// Unit normal. Ball-ball: from `a` toward `b`. Boundary: away from the
    /// wall, on the side the ball is being kept on.
    pub normal: Vec2,
    /// Overlap depth (>= 0)
    pub penetration: f32,
}

impl Contact {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }

    fn hit(normal: Vec2, penetration: f32) -> Self {
        Self {
            hit: true,
            normal,
            penetration,
        }
    }
}

/// Circle-circle overlap
///
/// Centres closer than `sqrt(EPSILON)` give no contact: there is no usable
/// normal for coincident bodies.
pub fn detect_ball_ball(a: &Body, b: &Body) -> Contact {
    let delta = b.position - a.position;
    let dist_sq = delta.length_squared();
    let reach = a.radius() + b.radius();

    if dist_sq >= reach * reach || dist_sq <= EPSILON {
        return Contact::miss();
    }

    let dist = dist_sq.sqrt();
    Contact::hit(delta / dist, reach - dist)
}

/// Ball against the enclosure walls
///
/// For each edge the closest point on the finite segment is found. Points
/// inside the opening are ignored. The deepest contact over all edges wins.
///
/// Which way a wall pushes depends on where the centre is now and where it
/// was at the start of the tick:
/// - inside, and was inside: pushed inward while closer than its radius;
/// - inside, but came in across a solid wall this tick while moving inward:
///   pushed back out past the outer face;
/// - outside, but was inside (crossed the wall this tick): pulled back in,
///   only while still within one radius of the wall;
/// - outside, and was outside: pushed away from the outer face.
///
/// Anything further out is left to the off-screen cull.
pub fn detect_ball_boundary(body: &Body, boundary: &Boundary) -> Contact {
    let center = body.position;
    let prev = body.prev_position;
    let radius = body.radius();
    let inside = boundary.contains_point(center);
    let was_inside = boundary.contains_point(prev);

    let mut best = Contact::miss();
    for edge in boundary.world_edges() {
        if edge.length() < EPSILON {
            continue;
        }

        let closest = edge.closest_point(center);
        if edge.has_gap && boundary.gap_span_contains(closest) {
            continue;
        }

        let dist = center.distance(closest);
        if dist >= radius {
            continue;
        }

        let outward = edge.outward_normal(boundary.center);
        let beyond = (center - edge.start).dot(outward) > 0.0;
        let came_from_beyond = (prev - edge.start).dot(outward) > 0.0;

        let (normal, penetration) = match (inside, was_inside) {
            (true, false) if came_from_beyond && body.velocity.dot(outward) < 0.0 => {
                // Fell onto the outer face and crossed it this tick
                (outward, radius + dist)
            }
            (true, _) => (-outward, radius - dist),
            // Pull the centre back across and out to touching distance
            (false, true) if beyond => (-outward, radius + dist),
            (false, false) if beyond => (outward, radius - dist),
            (false, _) => continue,
        };

        if !best.hit || penetration > best.penetration {
            best = Contact::hit(normal, penetration);
        }
    }

    best
}
