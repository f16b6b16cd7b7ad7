//! Simulation settings
//!
//! Every parameter an external UI may tune at runtime. Values are validated
//! once when loaded; the physics core trusts them afterwards.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::in_range;

/// Runtime-tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Physics ===
    /// Coefficient of restitution (0 = inelastic, 1 = perfectly elastic)
    pub restitution: f32,
    /// Gravity magnitude (pixels/s², applied along +y)
    pub gravity: f32,

    // === Balls ===
    /// Radius applied to newly spawned balls
    pub ball_radius: f32,
    /// Balls spawned at startup
    pub initial_balls: u32,
    /// Spawn speed range (pixels/s)
    pub min_speed: f32,
    pub max_speed: f32,
    /// Balls queued for spawning per escaped ball
    pub respawn_count: u32,
    /// Spawn point must be clear by this multiple of the combined radius
    pub spawn_clearance: f32,

    // === Container ===
    /// Side length of the square enclosure
    pub side_length: f32,
    /// Fraction of the gap edge that is open
    pub gap_fraction: f32,
    /// Rotation speed (radians/s)
    pub angular_speed: f32,

    // === Playfield ===
    pub bounds_width: f32,
    pub bounds_height: f32,
    /// Balls outside ±k·extent are removed
    pub cull_multiplier: f32,

    /// Seed for spawn randomness
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            restitution: RESTITUTION,
            gravity: GRAVITY,

            ball_radius: BALL_RADIUS,
            initial_balls: 1,
            min_speed: BALL_MIN_SPEED,
            max_speed: BALL_MAX_SPEED,
            respawn_count: RESPAWN_COUNT,
            spawn_clearance: SPAWN_CLEARANCE,

            side_length: CONTAINER_SIDE,
            gap_fraction: GAP_FRACTION,
            angular_speed: CONTAINER_ANGULAR_SPEED,

            bounds_width: WINDOW_WIDTH,
            bounds_height: WINDOW_HEIGHT,
            cull_multiplier: CULL_MULTIPLIER,

            seed: 0x5eed,
        }
    }
}

impl Settings {
    /// Reject configurations the physics core cannot handle
    pub fn validate(&self) -> Result<()> {
        // NaN slips through every ordered comparison below
        for (name, value) in self.float_fields() {
            if !value.is_finite() {
                bail!("{name} must be finite, got {value}");
            }
        }
        if !in_range(self.restitution, 0.0, 1.0) {
            bail!("restitution {} must be within [0, 1]", self.restitution);
        }
        if !in_range(self.ball_radius, MIN_BALL_RADIUS, MAX_BALL_RADIUS) {
            bail!(
                "ball_radius {} must be within [{MIN_BALL_RADIUS}, {MAX_BALL_RADIUS}]",
                self.ball_radius
            );
        }
        if !(self.gap_fraction > 0.0 && self.gap_fraction < 1.0) {
            bail!("gap_fraction {} must be within (0, 1)", self.gap_fraction);
        }
        if self.side_length <= 4.0 * MAX_BALL_RADIUS {
            bail!(
                "side_length {} too small; must exceed {}",
                self.side_length,
                4.0 * MAX_BALL_RADIUS
            );
        }
        if self.min_speed < 0.0 || self.min_speed > self.max_speed {
            bail!(
                "speed range [{}, {}] is invalid",
                self.min_speed,
                self.max_speed
            );
        }
        if self.bounds_width <= 0.0 || self.bounds_height <= 0.0 {
            bail!(
                "playfield {}x{} must be positive",
                self.bounds_width,
                self.bounds_height
            );
        }
        if self.cull_multiplier <= 0.0 {
            bail!("cull_multiplier must be positive");
        }
        if self.spawn_clearance < 1.0 {
            bail!("spawn_clearance {} must be at least 1", self.spawn_clearance);
        }
        Ok(())
    }

    fn float_fields(&self) -> [(&'static str, f32); 12] {
        [
            ("restitution", self.restitution),
            ("gravity", self.gravity),
            ("ball_radius", self.ball_radius),
            ("min_speed", self.min_speed),
            ("max_speed", self.max_speed),
            ("spawn_clearance", self.spawn_clearance),
            ("side_length", self.side_length),
            ("gap_fraction", self.gap_fraction),
            ("angular_speed", self.angular_speed),
            ("bounds_width", self.bounds_width),
            ("bounds_height", self.bounds_height),
            ("cull_multiplier", self.cull_multiplier),
        ]
    }

    /// Parse and validate settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json).context("parse settings JSON")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("read settings {}", path.display()))?;
        let settings = Self::from_json(&data)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `path`, falling back to defaults with a warning
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings: {e:#}");
                Self::default()
            }
        }
    }
}
