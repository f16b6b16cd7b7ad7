//! Circular rigid bodies

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_BALL_RADIUS, MIN_BALL_RADIUS};

/// Opaque colour tag, only read by renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };
}

/// A ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Centre at the start of the current tick (tunneling detection)
    pub prev_position: Vec2,
    radius: f32,
    mass: f32,
    pub color: Color,
}

impl Body {
    /// Create a body; radius is clamped to the configured limits
    pub fn new(id: u32, position: Vec2, velocity: Vec2, radius: f32, color: Color) -> Self {
        let radius = radius.clamp(MIN_BALL_RADIUS, MAX_BALL_RADIUS);
        Self {
            id,
            position,
            velocity,
            prev_position: position,
            radius,
            mass: mass_for_radius(radius),
            color,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Mass, always π·r²
    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn inv_mass(&self) -> f32 {
        1.0 / self.mass
    }

    /// Change radius and recompute mass
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.clamp(MIN_BALL_RADIUS, MAX_BALL_RADIUS);
        self.mass = mass_for_radius(self.radius);
    }

    /// Semi-implicit Euler: velocity first, then position
    pub fn integrate(&mut self, gravity: Vec2, dt: f32) {
        self.prev_position = self.position;
        self.velocity += gravity * dt;
        self.position += self.velocity * dt;
    }

    #[inline]
    pub fn momentum(&self) -> Vec2 {
        self.velocity * self.mass
    }

    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity.length_squared()
    }

    /// True when the centre lies outside `[-k·w, k·w] × [-k·h, k·h]`
    pub fn is_out_of_bounds(&self, width: f32, height: f32, multiplier: f32) -> bool {
        let max_x = multiplier * width;
        let max_y = multiplier * height;
        self.position.x < -max_x
            || self.position.x > max_x
            || self.position.y < -max_y
            || self.position.y > max_y
    }
}

#[inline]
fn mass_for_radius(radius: f32) -> f32 {
    std::f32::consts::PI * radius * radius
}
