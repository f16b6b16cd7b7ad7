//! Ball lifecycle: culling escaped balls and spawning replacements
//!
//! Every culled ball queues `respawn_count` replacements. At most one ball
//! is spawned per update, and only while the spawn point is clear, so a
//! burst of escapes drains over several ticks instead of stacking balls.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::{Body, Color};
use crate::consts::{BALL_MAX_SPEED, BALL_MIN_SPEED, CULL_MULTIPLIER, SPAWN_CLEARANCE};

/// What one lifecycle update did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleReport {
    pub culled: usize,
    pub spawned: usize,
}

/// Owns spawn parameters, the pending queue and the spawn RNG
#[derive(Debug, Clone)]
pub struct Spawner {
    pub spawn_point: Vec2,
    /// Radius for newly spawned balls
    pub body_radius: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Cull balls outside ±k·extent
    pub cull_multiplier: f32,
    /// Required spawn clearance as a multiple of the combined radius
    pub clearance: f32,
    pending: u64,
    rng: Pcg32,
    next_id: u32,
}

impl Spawner {
    pub fn new(spawn_point: Vec2, body_radius: f32, seed: u64) -> Self {
        Self {
            spawn_point,
            body_radius,
            min_speed: BALL_MIN_SPEED,
            max_speed: BALL_MAX_SPEED,
            cull_multiplier: CULL_MULTIPLIER,
            clearance: SPAWN_CLEARANCE,
            pending: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Balls waiting for a clear spawn point
    #[inline]
    pub fn pending(&self) -> u64 {
        self.pending
    }

    /// Queue balls to spawn once the spawn point is clear
    pub fn enqueue(&mut self, count: u64) {
        self.pending = self.pending.saturating_add(count);
    }

    /// Spawn one ball at the spawn point unconditionally
    pub fn spawn_one(&mut self, bodies: &mut Vec<Body>) {
        let body = self.create_random_body();
        log::debug!(
            "Spawned ball {} at ({:.1}, {:.1}) vel ({:.1}, {:.1})",
            body.id,
            body.position.x,
            body.position.y,
            body.velocity.x,
            body.velocity.y
        );
        bodies.push(body);
    }

    /// Cull out-of-bounds balls, queue replacements, spawn at most one
    pub fn update(
        &mut self,
        bodies: &mut Vec<Body>,
        bounds_width: f32,
        bounds_height: f32,
        respawn_count: u32,
    ) -> LifecycleReport {
        let before = bodies.len();
        let k = self.cull_multiplier;
        bodies.retain(|b| {
            let gone = b.is_out_of_bounds(bounds_width, bounds_height, k);
            if gone {
                log::debug!("Ball {} left the playfield", b.id);
            }
            !gone
        });
        let culled = before - bodies.len();
        self.enqueue(culled as u64 * u64::from(respawn_count));

        let mut spawned = 0;
        if self.pending > 0 && self.spawn_point_clear(bodies) {
            self.spawn_one(bodies);
            self.pending -= 1;
            spawned = 1;
        }

        LifecycleReport { culled, spawned }
    }

    /// True when no ball is within the clearance distance of the spawn point
    pub fn spawn_point_clear(&self, bodies: &[Body]) -> bool {
        bodies.iter().all(|b| {
            let safe = (self.body_radius + b.radius()) * self.clearance;
            self.spawn_point.distance_squared(b.position) >= safe * safe
        })
    }

    fn create_random_body(&mut self) -> Body {
        let id = self.next_id;
        self.next_id += 1;
        let velocity = self.random_velocity();
        let color = self.random_color();
        Body::new(id, self.spawn_point, velocity, self.body_radius, color)
    }

    fn random_velocity(&mut self) -> Vec2 {
        let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
        let speed = if self.max_speed > self.min_speed {
            self.rng.random_range(self.min_speed..=self.max_speed)
        } else {
            self.min_speed
        };
        Vec2::from_angle(angle) * speed
    }

    /// Bright colours: every channel in [100, 255]
    fn random_color(&mut self) -> Color {
        Color {
            r: self.rng.random_range(100..=255),
            g: self.rng.random_range(100..=255),
            b: self.rng.random_range(100..=255),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const W: f32 = 800.0;
    const H: f32 = 800.0;

    fn spawner() -> Spawner {
        Spawner::new(Vec2::new(400.0, 400.0), 10.0, 7)
    }

    fn far_ball(id: u32) -> Body {
        Body::new(id, Vec2::new(5000.0, 400.0), Vec2::ZERO, 10.0, Color::WHITE)
    }

    #[test]
    fn test_spawned_ball_is_randomised_within_limits() {
        let mut s = spawner();
        let mut bodies = Vec::new();
        for _ in 0..50 {
            s.spawn_one(&mut bodies);
        }
        for b in &bodies {
            assert_eq!(b.position, Vec2::new(400.0, 400.0));
            assert_eq!(b.radius(), 10.0);
            let speed = b.velocity.length();
            assert!(speed >= BALL_MIN_SPEED - 1e-2 && speed <= BALL_MAX_SPEED + 1e-2);
            assert!(b.color.r >= 100 && b.color.g >= 100 && b.color.b >= 100);
        }
        let mut ids: Vec<_> = bodies.iter().map(|b| b.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let (mut a, mut b) = (spawner(), spawner());
        let (mut va, mut vb) = (Vec::new(), Vec::new());
        for _ in 0..5 {
            a.spawn_one(&mut va);
            b.spawn_one(&mut vb);
        }
        for (x, y) in va.iter().zip(&vb) {
            assert_eq!(x.velocity, y.velocity);
            assert_eq!(x.color, y.color);
        }
    }

    #[test]
    fn test_escape_queues_and_spawns_one_per_update() {
        let mut s = spawner();
        let mut bodies = vec![far_ball(100), far_ball(101), far_ball(102)];

        let report = s.update(&mut bodies, W, H, 2);
        assert_eq!(report, LifecycleReport { culled: 3, spawned: 1 });
        assert_eq!(bodies.len(), 1);
        assert_eq!(s.pending(), 5);

        // Fresh ball still sits on the spawn point
        let report = s.update(&mut bodies, W, H, 2);
        assert_eq!(report.spawned, 0);
        assert_eq!(s.pending(), 5);

        bodies[0].position = Vec2::new(600.0, 400.0);
        let report = s.update(&mut bodies, W, H, 2);
        assert_eq!(report.spawned, 1);
        assert_eq!(s.pending(), 4);
    }

    #[test]
    fn test_clearance_uses_combined_radius() {
        let s = spawner();
        // (10 + 10) * 2 = 40
        let near = Body::new(1, Vec2::new(439.0, 400.0), Vec2::ZERO, 10.0, Color::WHITE);
        assert!(!s.spawn_point_clear(&[near]));
        let clear = Body::new(1, Vec2::new(441.0, 400.0), Vec2::ZERO, 10.0, Color::WHITE);
        assert!(s.spawn_point_clear(&[clear]));
    }

    #[test]
    fn test_zero_respawn_count_only_removes() {
        let mut s = spawner();
        let mut bodies = vec![far_ball(1)];
        let report = s.update(&mut bodies, W, H, 0);
        assert_eq!(report, LifecycleReport { culled: 1, spawned: 0 });
        assert!(bodies.is_empty());
        assert_eq!(s.pending(), 0);
    }

    proptest! {
        #[test]
        fn prop_pending_accounts_for_every_escape(
            escapes in prop::collection::vec(0usize..4, 1..30),
            respawn in 0u32..4,
        ) {
            let mut s = spawner();
            let mut bodies = Vec::new();
            let mut total_escaped = 0u64;
            let mut total_spawned = 0u64;
            let mut next_id = 1000;

            for n in escapes {
                for _ in 0..n {
                    bodies.push(far_ball(next_id));
                    next_id += 1;
                }
                // Keep the spawn point clear so draining is observable
                for b in bodies.iter_mut().filter(|b| b.id < 1000) {
                    b.position = Vec2::new(100.0 + b.id as f32, 100.0);
                }
                let report = s.update(&mut bodies, W, H, respawn);
                total_escaped += report.culled as u64;
                total_spawned += report.spawned as u64;

                prop_assert_eq!(report.culled, n);
                prop_assert!(report.spawned <= 1);
                prop_assert_eq!(
                    s.pending(),
                    total_escaped * u64::from(respawn) - total_spawned
                );
                prop_assert_eq!(bodies.len() as u64, total_spawned);
            }
        }
    }
}
