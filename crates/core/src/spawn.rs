//! Tile spawner - places one weighted random tile in a random empty cell
//!
//! Two independent draws: first the position, uniform over the row-major list of
//! empty cells; then the value, 2 with probability `SPAWN_TWO_PROBABILITY`, else 4.

use crate::board::Grid;
use crate::rng::RandomSource;
use crate::types::{SpawnedTile, SPAWN_HIGH_VALUE, SPAWN_LOW_VALUE, SPAWN_TWO_PROBABILITY};

/// Spawn a tile and report where it landed.
///
/// Returns `None` (and consumes no randomness) when the grid is full.
pub fn spawn_tile<R: RandomSource + ?Sized>(
    grid: &Grid,
    rng: &mut R,
) -> Option<(Grid, SpawnedTile)> {
    let empty = grid.empty_cells();
    if empty.is_empty() {
        return None;
    }

    let (row, col) = empty[rng.next_below(empty.len())];
    let value = if rng.next_unit() < SPAWN_TWO_PROBABILITY {
        SPAWN_LOW_VALUE
    } else {
        SPAWN_HIGH_VALUE
    };

    Some((grid.with_cell(row, col, Some(value)), SpawnedTile { row, col, value }))
}

/// Spawn a tile into a copy of `grid`.
///
/// A full grid comes back unchanged; that is a no-op, not an error.
pub fn add_random_tile<R: RandomSource + ?Sized>(grid: &Grid, rng: &mut R) -> Grid {
    spawn_tile(grid, rng).map(|(next, _)| next).unwrap_or(*grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{SequenceRng, SimpleRng};
    use crate::types::CELL_COUNT;

    #[test]
    fn test_spawn_uses_row_major_index() {
        let grid = Grid::from_values([[2, 0, 4, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
        // Empty cells: (0,1), (0,3), (1,0), ... index 2 is (1,0).
        let mut rng = SequenceRng::new(vec![2], vec![0.5]);
        let (next, spawned) = spawn_tile(&grid, &mut rng).unwrap();
        assert_eq!(
            spawned,
            SpawnedTile {
                row: 1,
                col: 0,
                value: 2
            }
        );
        assert_eq!(next.get(1, 0), Some(Some(2)));
        assert_eq!(next.tile_count(), grid.tile_count() + 1);
    }

    #[test]
    fn test_value_threshold() {
        let grid = Grid::empty();
        let mut rng = SequenceRng::new(vec![0], vec![0.0, 0.8999, 0.9]);
        assert_eq!(spawn_tile(&grid, &mut rng).unwrap().1.value, 2);
        assert_eq!(spawn_tile(&grid, &mut rng).unwrap().1.value, 2);
        assert_eq!(spawn_tile(&grid, &mut rng).unwrap().1.value, 4);
    }

    #[test]
    fn test_full_grid_is_noop() {
        let grid = Grid::from_values([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]])
            .unwrap();
        let mut rng = SequenceRng::new(vec![3, 1], vec![0.7]);
        assert!(spawn_tile(&grid, &mut rng).is_none());
        assert_eq!(add_random_tile(&grid, &mut rng), grid);
        // No draws were taken.
        assert_eq!(rng.next_below(CELL_COUNT), 3);
    }

    #[test]
    fn test_seeded_spawns_are_reproducible() {
        let mut a = SimpleRng::new(2048);
        let mut b = SimpleRng::new(2048);
        let mut ga = Grid::empty();
        let mut gb = Grid::empty();
        for _ in 0..CELL_COUNT {
            ga = add_random_tile(&ga, &mut a);
            gb = add_random_tile(&gb, &mut b);
            assert_eq!(ga, gb);
        }
        assert_eq!(ga.tile_count(), CELL_COUNT);
        assert!(ga.cells().iter().flatten().flatten().all(|&v| v == 2 || v == 4));
    }
}
