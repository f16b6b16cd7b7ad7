//! Fixed timestep simulation tick
//!
//! Per tick: integrate, rotate the enclosure, rebuild the broad phase,
//! resolve ball-ball contacts, resolve ball-wall contacts, then run the
//! lifecycle update. Contacts are resolved one at a time in a stable order
//! (pairs sorted by index), so crowded piles may jitter slightly.

use glam::Vec2;

use super::body::Body;
use super::boundary::Boundary;
use super::collision::{detect_ball_ball, detect_ball_boundary};
use super::grid::{SpatialGrid, cell_size_for};
use super::resolve::{resolve_ball_ball, resolve_ball_boundary};
use super::spawner::LifecycleReport;
use super::state::SimState;

/// Counters from one physics step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    pub candidate_pairs: usize,
    pub ball_contacts: usize,
    pub wall_contacts: usize,
}

/// What a full tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub step: StepStats,
    pub lifecycle: LifecycleReport,
}

/// Mutable references to two distinct bodies
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    debug_assert!(i < j);
    let (head, tail) = bodies.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

/// Advance bodies and enclosure by one step
pub fn physics_step(
    bodies: &mut [Body],
    boundary: &mut Boundary,
    grid: &mut SpatialGrid,
    gravity: Vec2,
    restitution: f32,
    dt: f32,
) -> StepStats {
    let mut stats = StepStats::default();

    for body in bodies.iter_mut() {
        body.integrate(gravity, dt);
    }

    boundary.advance(dt);

    grid.build(bodies, cell_size_for(bodies));
    let pairs = grid.candidate_pairs();
    stats.candidate_pairs = pairs.len();

    for (i, j) in pairs {
        let (a, b) = pair_mut(bodies, i, j);
        let contact = detect_ball_ball(a, b);
        if contact.hit {
            resolve_ball_ball(a, b, &contact, restitution);
            stats.ball_contacts += 1;
        }
    }

    for body in bodies.iter_mut() {
        let contact = detect_ball_boundary(body, boundary);
        if contact.hit {
            resolve_ball_boundary(body, &contact, restitution);
            stats.wall_contacts += 1;
        }
    }

    log::trace!(
        "step: {} bodies, {} candidates, {} ball hits, {} wall hits",
        bodies.len(),
        stats.candidate_pairs,
        stats.ball_contacts,
        stats.wall_contacts
    );
    stats
}

/// Advance the simulation by one fixed timestep using its current settings
pub fn tick(state: &mut SimState, dt: f32) -> TickReport {
    state.apply_settings();
    let settings = &state.settings;
    let gravity = Vec2::new(0.0, settings.gravity);

    let step = physics_step(
        &mut state.bodies,
        &mut state.boundary,
        &mut state.grid,
        gravity,
        settings.restitution,
        dt,
    );

    let lifecycle = state.spawner.update(
        &mut state.bodies,
        settings.bounds_width,
        settings.bounds_height,
        settings.respawn_count,
    );
    if lifecycle.culled > 0 {
        log::debug!(
            "tick {}: {} escaped, {} pending",
            state.time_ticks,
            lifecycle.culled,
            state.spawner.pending()
        );
    }

    state.time_ticks += 1;
    TickReport { step, lifecycle }
}
