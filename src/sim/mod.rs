//! Deterministic physics module
//!
//! All simulation logic lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (body index / sorted candidate pairs)
//! - No rendering or platform dependencies

pub mod body;
pub mod boundary;
pub mod collision;
pub mod grid;
pub mod resolve;
pub mod spawner;
pub mod state;
pub mod tick;

pub use body::{Body, Color};
pub use boundary::{Boundary, EDGE_TOLERANCE, Edge};
pub use collision::{Contact, detect_ball_ball, detect_ball_boundary};
pub use grid::{SpatialGrid, cell_size_for};
pub use resolve::{resolve_ball_ball, resolve_ball_boundary};
pub use spawner::{LifecycleReport, Spawner};
pub use state::{GAP_EDGE, SimState};
pub use tick::{StepStats, TickReport, physics_step, tick};
