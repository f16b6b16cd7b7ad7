//! Uniform grid broad phase
//!
//! Rebuilt from scratch every tick. With a cell size of at least twice the
//! largest radius, any two overlapping circles have centres in the same or
//! adjacent cells, so scanning the 3x3 neighbourhood never misses a pair.

use std::collections::HashMap;

use super::body::Body;

const HASH_P1: i64 = 73_856_093;
const HASH_P2: i64 = 19_349_663;

/// Smallest cell size accepted (guards an empty or degenerate body set)
pub const MIN_CELL_SIZE: f32 = 1.0;

/// Cell size that guarantees soundness for the given bodies
pub fn cell_size_for(bodies: &[Body]) -> f32 {
    let max_radius = bodies.iter().map(Body::radius).fold(0.0_f32, f32::max);
    (2.0 * max_radius).max(MIN_CELL_SIZE)
}

#[inline]
fn cell_hash(cx: i32, cy: i32) -> i64 {
    (cx as i64).wrapping_mul(HASH_P1) ^ (cy as i64).wrapping_mul(HASH_P2)
}

/// Spatial hash grid over body indices
#[derive(Debug, Default)]
pub struct SpatialGrid {
    cell_size: f32,
    /// Hashed cell -> body indices (distinct cells may share a bucket)
    buckets: HashMap<i64, Vec<usize>>,
    /// Cell of each body, by index
    cells: Vec<(i32, i32)>,
}

impl SpatialGrid {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Integer cell containing `(x, y)`
    #[inline]
    pub fn cell_of(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (x / self.cell_size).floor() as i32,
            (y / self.cell_size).floor() as i32,
        )
    }

    /// Clear and repopulate from the current body positions
    pub fn build(&mut self, bodies: &[Body], cell_size: f32) {
        self.cell_size = cell_size.max(MIN_CELL_SIZE);
        for bucket in self.buckets.values_mut() {
            bucket.clear();
        }
        self.cells.clear();

        for (i, body) in bodies.iter().enumerate() {
            let cell = self.cell_of(body.position.x, body.position.y);
            self.cells.push(cell);
            self.buckets
                .entry(cell_hash(cell.0, cell.1))
                .or_default()
                .push(i);
        }
        // Drop buckets left empty by bodies that moved away
        self.buckets.retain(|_, bucket| !bucket.is_empty());
    }

    /// Unordered index pairs `(i, j)` with `i < j` whose cells are equal or
    /// adjacent. Sorted and free of duplicates.
    pub fn candidate_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, &(cx, cy)) in self.cells.iter().enumerate() {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let key = cell_hash(cx.wrapping_add(dx), cy.wrapping_add(dy));
                    let Some(bucket) = self.buckets.get(&key) else {
                        continue;
                    };
                    pairs.extend(bucket.iter().filter(|&&j| j > i).map(|&j| (i, j)));
                }
            }
        }
        pairs.sort_unstable();
        pairs.dedup();
        pairs
    }

    /// Number of occupied buckets
    pub fn occupied_cells(&self) -> usize {
        self.buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::Color;
    use glam::Vec2;
    use proptest::prelude::*;

    fn body_at(id: u32, x: f32, y: f32, r: f32) -> Body {
        Body::new(id, Vec2::new(x, y), Vec2::ZERO, r, Color::WHITE)
    }

    #[test]
    fn test_cell_size_from_max_radius() {
        let bodies = vec![body_at(1, 0.0, 0.0, 5.0), body_at(2, 0.0, 0.0, 12.0)];
        assert_eq!(cell_size_for(&bodies), 24.0);
        assert_eq!(cell_size_for(&[]), MIN_CELL_SIZE);
    }

    #[test]
    fn test_neighbouring_cells_pair_up() {
        let bodies = vec![
            body_at(1, 5.0, 5.0, 10.0),
            body_at(2, 25.0, 5.0, 10.0),
            body_at(3, 500.0, 500.0, 10.0),
        ];
        let mut grid = SpatialGrid::new();
        grid.build(&bodies, cell_size_for(&bodies));
        assert_eq!(grid.candidate_pairs(), vec![(0, 1)]);
    }

    #[test]
    fn test_negative_coordinates() {
        let bodies = vec![body_at(1, -1.0, -1.0, 10.0), body_at(2, 1.0, 1.0, 10.0)];
        let mut grid = SpatialGrid::new();
        grid.build(&bodies, cell_size_for(&bodies));
        assert_eq!(grid.cell_of(-1.0, -1.0), (-1, -1));
        assert_eq!(grid.candidate_pairs(), vec![(0, 1)]);
    }

    #[test]
    fn test_rebuild_forgets_old_positions() {
        let mut bodies = vec![body_at(1, 0.0, 0.0, 10.0), body_at(2, 5.0, 0.0, 10.0)];
        let mut grid = SpatialGrid::new();
        grid.build(&bodies, 20.0);
        assert_eq!(grid.candidate_pairs().len(), 1);

        bodies[1].position = Vec2::new(1000.0, 1000.0);
        grid.build(&bodies, 20.0);
        assert!(grid.candidate_pairs().is_empty());
        assert_eq!(grid.occupied_cells(), 2);
    }

    #[test]
    fn test_same_cell_pairs_once() {
        let bodies: Vec<_> = (0..4).map(|i| body_at(i, 1.0 + i as f32, 1.0, 10.0)).collect();
        let mut grid = SpatialGrid::new();
        grid.build(&bodies, 20.0);
        assert_eq!(grid.candidate_pairs().len(), 6);
    }

    proptest! {
        #[test]
        fn prop_overlapping_pairs_are_candidates(
            specs in prop::collection::vec(
                (-500.0f32..500.0, -500.0f32..500.0, 2.0f32..40.0),
                2..40,
            )
        ) {
            let bodies: Vec<Body> = specs
                .iter()
                .enumerate()
                .map(|(i, &(x, y, r))| body_at(i as u32, x, y, r))
                .collect();
            let mut grid = SpatialGrid::new();
            grid.build(&bodies, cell_size_for(&bodies));
            let pairs = grid.candidate_pairs();

            for i in 0..bodies.len() {
                for j in (i + 1)..bodies.len() {
                    let reach = bodies[i].radius() + bodies[j].radius();
                    if bodies[i].position.distance(bodies[j].position) <= reach {
                        prop_assert!(pairs.binary_search(&(i, j)).is_ok());
                    }
                }
            }
        }
    }
}
