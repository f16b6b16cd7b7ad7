//! Simulation state
//!
//! Everything a tick mutates lives here. Renderers read it between ticks.

use glam::Vec2;

use super::body::Body;
use super::boundary::Boundary;
use super::grid::SpatialGrid;
use super::spawner::Spawner;
use super::tick::{TickReport, tick};
use crate::Settings;
use crate::consts::{CONTAINER_CENTER_X, CONTAINER_CENTER_Y};

/// Side of the square that carries the opening (local right side)
pub const GAP_EDGE: usize = 0;

/// Complete simulation state
#[derive(Debug)]
pub struct SimState {
    /// Runtime-tunable parameters, read at the start of every tick
    pub settings: Settings,
    pub boundary: Boundary,
    /// Active balls
    pub bodies: Vec<Body>,
    pub spawner: Spawner,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Broad-phase scratch, rebuilt every tick
    pub(crate) grid: SpatialGrid,
}

impl SimState {
    /// Build the enclosure and spawn the first ball
    ///
    /// `settings` are assumed validated.
    pub fn new(settings: Settings) -> Self {
        let center = Vec2::new(CONTAINER_CENTER_X, CONTAINER_CENTER_Y);
        let boundary = Boundary::new(
            center,
            settings.side_length,
            settings.gap_fraction,
            GAP_EDGE,
            settings.angular_speed,
        );
        let spawner = Spawner::new(center, settings.ball_radius, settings.seed);

        let mut state = Self {
            settings,
            boundary,
            bodies: Vec::new(),
            spawner,
            time_ticks: 0,
            grid: SpatialGrid::new(),
        };
        state.apply_settings();
        // One ball now, the rest drain through the clear-spawn-point queue
        if state.settings.initial_balls > 0 {
            state.spawner.spawn_one(&mut state.bodies);
            state
                .spawner
                .enqueue(u64::from(state.settings.initial_balls - 1));
        }

        log::info!(
            "Simulation ready: side={}, gap={:.0}%, balls={}, seed={:#x}",
            state.settings.side_length,
            state.settings.gap_fraction * 100.0,
            state.bodies.len(),
            state.settings.seed
        );
        state
    }

    /// Push current settings into the boundary and spawner
    pub fn apply_settings(&mut self) {
        let s = &self.settings;
        self.boundary.set_side_length(s.side_length);
        self.boundary.set_gap_fraction(s.gap_fraction);
        self.boundary.angular_speed = s.angular_speed;

        self.spawner.body_radius = s.ball_radius;
        self.spawner.min_speed = s.min_speed;
        self.spawner.max_speed = s.max_speed;
        self.spawner.cull_multiplier = s.cull_multiplier;
        self.spawner.clearance = s.spawn_clearance;
    }

    /// Advance one step with the given restitution and respawn count
    pub fn update(&mut self, dt: f32, restitution: f32, respawn_count: u32) -> TickReport {
        self.settings.restitution = restitution;
        self.settings.respawn_count = respawn_count;
        tick(self, dt)
    }

    #[inline]
    pub fn ball_count(&self) -> usize {
        self.bodies.len()
    }

    #[inline]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    #[inline]
    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// Balls queued for spawning
    #[inline]
    pub fn pending_spawns(&self) -> u64 {
        self.spawner.pending()
    }
}
