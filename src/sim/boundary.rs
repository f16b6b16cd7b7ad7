//! Rotating square enclosure with a gap
//!
//! Local space has the square centred on the origin with corners
//! (h,-h), (h,h), (-h,h), (-h,-h). Edge `i` runs from corner `i` to corner
//! `i+1`, so side 0 is the local right side. World geometry is derived from
//! `(center, side_length, rotation)` on every query; nothing is cached.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::EPSILON;
use crate::{rotate, wrap_angle};

/// Slack for on-edge tests (gap span, containment)
pub const EDGE_TOLERANCE: f32 = 0.01;

/// One side of the enclosure in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub start: Vec2,
    pub end: Vec2,
    /// 0=right, 1=top, 2=left, 3=bottom (local space)
    pub side: usize,
    pub has_gap: bool,
}

impl Edge {
    #[inline]
    pub fn vector(&self) -> Vec2 {
        self.end - self.start
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.vector().length()
    }

    /// Unit normal pointing away from `interior`
    ///
    /// Degenerate edges fall back to the direction from `interior` to the
    /// edge midpoint.
    pub fn outward_normal(&self, interior: Vec2) -> Vec2 {
        let v = self.vector();
        let len = v.length();
        let mid = (self.start + self.end) * 0.5;
        if len < EPSILON {
            return (mid - interior).normalize_or(Vec2::X);
        }
        let n = Vec2::new(v.y, -v.x) / len;
        if n.dot(mid - interior) < 0.0 { -n } else { n }
    }

    /// Closest point on the finite segment to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        let v = self.vector();
        let len = v.length();
        if len < EPSILON {
            return self.start;
        }
        let dir = v / len;
        let t = (p - self.start).dot(dir).clamp(0.0, len);
        self.start + dir * t
    }
}

/// The rotating enclosure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boundary {
    pub center: Vec2,
    side_length: f32,
    gap_fraction: f32,
    gap_edge: usize,
    /// Current rotation (radians, [0, 2π))
    rotation: f32,
    /// Radians per second
    pub angular_speed: f32,
}

impl Boundary {
    pub fn new(
        center: Vec2,
        side_length: f32,
        gap_fraction: f32,
        gap_edge: usize,
        angular_speed: f32,
    ) -> Self {
        Self {
            center,
            side_length,
            gap_fraction,
            gap_edge: gap_edge % 4,
            rotation: 0.0,
            angular_speed,
        }
    }

    #[inline]
    pub fn side_length(&self) -> f32 {
        self.side_length
    }

    pub fn set_side_length(&mut self, side_length: f32) {
        self.side_length = side_length;
    }

    #[inline]
    pub fn gap_fraction(&self) -> f32 {
        self.gap_fraction
    }

    pub fn set_gap_fraction(&mut self, fraction: f32) {
        self.gap_fraction = fraction;
    }

    #[inline]
    pub fn gap_edge(&self) -> usize {
        self.gap_edge
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, angle: f32) {
        self.rotation = wrap_angle(angle);
    }

    /// Advance rotation by `angular_speed * dt`
    pub fn advance(&mut self, dt: f32) {
        self.rotation = wrap_angle(self.rotation + self.angular_speed * dt);
    }

    /// World position of a local-space point
    #[inline]
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        self.center + rotate(local, self.rotation)
    }

    /// Local-space position of a world point
    #[inline]
    pub fn to_local(&self, world: Vec2) -> Vec2 {
        rotate(world - self.center, -self.rotation)
    }

    /// Corners: bottom-right, top-right, top-left, bottom-left (local naming)
    pub fn world_corners(&self) -> [Vec2; 4] {
        let h = self.side_length / 2.0;
        [
            Vec2::new(h, -h),
            Vec2::new(h, h),
            Vec2::new(-h, h),
            Vec2::new(-h, -h),
        ]
        .map(|c| self.to_world(c))
    }

    pub fn world_edges(&self) -> [Edge; 4] {
        let corners = self.world_corners();
        std::array::from_fn(|i| Edge {
            start: corners[i],
            end: corners[(i + 1) % 4],
            side: i,
            has_gap: i == self.gap_edge,
        })
    }

    /// Length of the opening
    #[inline]
    pub fn gap_length(&self) -> f32 {
        self.side_length * self.gap_fraction
    }

    /// Endpoints of the opening, centred on the gap edge
    pub fn gap_endpoints(&self) -> (Vec2, Vec2) {
        let edge = self.world_edges()[self.gap_edge];
        let edge_len = edge.length();
        if edge_len < EPSILON {
            return (edge.start, edge.start);
        }
        let dir = edge.vector() / edge_len;
        let gap_len = edge_len * self.gap_fraction;
        let start_dist = (edge_len - gap_len) / 2.0;
        (
            edge.start + dir * start_dist,
            edge.start + dir * (start_dist + gap_len),
        )
    }

    /// Whether a point lying on the gap edge falls inside the opening
    pub fn gap_span_contains(&self, point_on_edge: Vec2) -> bool {
        let (gap_start, gap_end) = self.gap_endpoints();
        let gap_len = gap_start.distance(gap_end);
        point_on_edge.distance(gap_start) + point_on_edge.distance(gap_end)
            <= gap_len + EDGE_TOLERANCE
    }

    /// Whether `point` projects onto the gap edge inside the opening
    pub fn is_point_in_gap(&self, point: Vec2) -> bool {
        let edge = self.world_edges()[self.gap_edge];
        self.gap_span_contains(edge.closest_point(point))
    }

    /// Whether `point` lies inside (or on) the square
    pub fn contains_point(&self, point: Vec2) -> bool {
        let local = self.to_local(point);
        let h = self.side_length / 2.0 + EDGE_TOLERANCE;
        local.x.abs() <= h && local.y.abs() <= h
    }

    /// Wall pieces with the opening removed, for drawing
    pub fn solid_segments(&self) -> Vec<(Vec2, Vec2)> {
        let (gap_start, gap_end) = self.gap_endpoints();
        let mut segments = Vec::with_capacity(5);
        for edge in self.world_edges() {
            if edge.has_gap {
                segments.push((edge.start, gap_start));
                segments.push((gap_end, edge.end));
            } else {
                segments.push((edge.start, edge.end));
            }
        }
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{PI, TAU};

    fn square() -> Boundary {
        Boundary::new(Vec2::new(400.0, 400.0), 600.0, 0.25, 0, 0.0)
    }

    #[test]
    fn test_corners_at_zero_rotation() {
        let b = square();
        let c = b.world_corners();
        assert_eq!(c[0], Vec2::new(700.0, 100.0));
        assert_eq!(c[1], Vec2::new(700.0, 700.0));
        assert_eq!(c[2], Vec2::new(100.0, 700.0));
        assert_eq!(c[3], Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_edges_and_outward_normals() {
        let b = square();
        let edges = b.world_edges();
        assert!(edges[0].has_gap);
        assert!(edges[1..].iter().all(|e| !e.has_gap));

        let n0 = edges[0].outward_normal(b.center);
        assert!((n0 - Vec2::X).length() < 1e-5);
        let n2 = edges[2].outward_normal(b.center);
        assert!((n2 + Vec2::X).length() < 1e-5);
    }

    #[test]
    fn test_gap_endpoints_centred() {
        let b = square();
        let (s, e) = b.gap_endpoints();
        assert!((s - Vec2::new(700.0, 325.0)).length() < 1e-3);
        assert!((e - Vec2::new(700.0, 475.0)).length() < 1e-3);
        assert!((s.distance(e) - b.gap_length()).abs() < 1e-3);
    }

    #[test]
    fn test_gap_follows_rotation() {
        let mut b = square();
        assert!(b.is_point_in_gap(Vec2::new(700.0, 400.0)));

        b.set_rotation(PI / 2.0);
        assert!(!b.is_point_in_gap(Vec2::new(700.0, 400.0)));
        assert!(b.is_point_in_gap(Vec2::new(400.0, 700.0)));

        b.set_rotation(PI);
        assert!(b.is_point_in_gap(Vec2::new(100.0, 400.0)));
    }

    #[test]
    fn test_contains_point_rotated() {
        let mut b = square();
        b.set_rotation(PI / 4.0);
        // Corner 0 now points along +x
        assert!(b.contains_point(Vec2::new(400.0, 400.0)));
        assert!(b.contains_point(Vec2::new(400.0 + 420.0, 400.0)));
        assert!(!b.contains_point(Vec2::new(400.0 + 430.0, 400.0)));
        assert!(!b.contains_point(Vec2::new(400.0 + 290.0, 400.0 + 290.0)));
    }

    #[test]
    fn test_advance_wraps() {
        let mut b = Boundary::new(Vec2::ZERO, 100.0, 0.2, 0, TAU / 10.0);
        for _ in 0..11 {
            b.advance(1.0);
        }
        assert!((b.rotation() - TAU / 10.0).abs() < 1e-4);
        assert!(b.rotation() >= 0.0 && b.rotation() < TAU);
    }

    #[test]
    fn test_geometry_tracks_retuning() {
        let mut b = square();
        b.set_side_length(400.0);
        b.set_gap_fraction(0.5);
        assert_eq!(b.world_corners()[1], Vec2::new(600.0, 600.0));
        let (s, e) = b.gap_endpoints();
        assert!((s.distance(e) - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_solid_segments_skip_gap() {
        let b = square();
        let segments = b.solid_segments();
        assert_eq!(segments.len(), 5);
        let total: f32 = segments.iter().map(|(a, c)| a.distance(*c)).sum();
        assert!((total - (4.0 * 600.0 - 150.0)).abs() < 1e-2);
    }

    #[test]
    fn test_zero_length_edge_falls_back() {
        let edge = Edge {
            start: Vec2::new(10.0, 0.0),
            end: Vec2::new(10.0, 0.0),
            side: 0,
            has_gap: false,
        };
        assert_eq!(edge.closest_point(Vec2::new(50.0, -20.0)), edge.start);

        // Away from the interior point
        let n = edge.outward_normal(Vec2::ZERO);
        assert!(n.is_finite());
        assert!((n.length() - 1.0).abs() < 1e-5);
        assert!((n - Vec2::X).length() < 1e-5);

        // Interior on top of the edge: no direction to derive
        let n = edge.outward_normal(Vec2::new(10.0, 0.0));
        assert_eq!(n, Vec2::X);
    }

    #[test]
    fn test_closest_point_clamps_to_segment() {
        let edge = Edge {
            start: Vec2::ZERO,
            end: Vec2::new(10.0, 0.0),
            side: 0,
            has_gap: false,
        };
        assert_eq!(edge.closest_point(Vec2::new(5.0, 3.0)), Vec2::new(5.0, 0.0));
        assert_eq!(edge.closest_point(Vec2::new(-4.0, 3.0)), Vec2::ZERO);
        assert_eq!(edge.closest_point(Vec2::new(14.0, -3.0)), Vec2::new(10.0, 0.0));
    }
}
