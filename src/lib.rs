//! Gapbox - balls under gravity inside a rotating, gapped square
//!
//! Core modules:
//! - `sim`: Fixed-step physics (broad phase, narrow phase, resolution, lifecycle)
//! - `settings`: Runtime-tunable parameters and their validation

pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield (window) dimensions in pixels
    pub const WINDOW_WIDTH: f32 = 800.0;
    pub const WINDOW_HEIGHT: f32 = 800.0;

    /// Container defaults, centred in the window
    pub const CONTAINER_CENTER_X: f32 = WINDOW_WIDTH / 2.0;
    pub const CONTAINER_CENTER_Y: f32 = WINDOW_HEIGHT / 2.0;
    pub const CONTAINER_SIDE: f32 = 600.0;
    pub const GAP_FRACTION: f32 = 0.25;
    /// One full turn every 10 seconds (36°/s)
    pub const CONTAINER_ANGULAR_SPEED: f32 = std::f32::consts::TAU / 10.0;

    /// Gravity (pixels/s², +y is down on screen)
    pub const GRAVITY: f32 = 500.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const MIN_BALL_RADIUS: f32 = 2.0;
    pub const MAX_BALL_RADIUS: f32 = 40.0;
    pub const BALL_MIN_SPEED: f32 = 100.0;
    pub const BALL_MAX_SPEED: f32 = 300.0;

    /// Coefficient of restitution
    pub const RESTITUTION: f32 = 0.9;
    /// New balls queued per escaped ball
    pub const RESPAWN_COUNT: u32 = 2;

    /// Balls beyond this multiple of the window extent are culled
    pub const CULL_MULTIPLIER: f32 = 1.0;
    /// Spawn point must be clear by this multiple of the combined radius
    pub const SPAWN_CLEARANCE: f32 = 2.0;

    /// Magnitudes below this are treated as zero when normalizing
    pub const EPSILON: f32 = 1e-4;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Inclusive range check
#[inline]
pub fn in_range(value: f32, lo: f32, hi: f32) -> bool {
    value >= lo && value <= hi
}

/// Rotate a vector counter-clockwise by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}
