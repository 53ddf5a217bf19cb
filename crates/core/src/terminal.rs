//! Terminal detector - game-over and win checks

use crate::board::Grid;
use crate::types::{GRID_SIZE, WINNING_TILE};

/// True iff the grid is full and no two orthogonal neighbours are equal.
///
/// Returns early on the first empty cell or matching pair.
pub fn is_game_over(grid: &Grid) -> bool {
    if grid.has_empty_cell() {
        return false;
    }

    let cells = grid.cells();
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            let here = cells[row][col];
            if col + 1 < GRID_SIZE && here == cells[row][col + 1] {
                return false;
            }
            if row + 1 < GRID_SIZE && here == cells[row + 1][col] {
                return false;
            }
        }
    }
    true
}

/// True iff any tile equals the winning value.
pub fn has_won(grid: &Grid) -> bool {
    grid.cells()
        .iter()
        .flatten()
        .any(|&cell| cell == Some(WINNING_TILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKERBOARD: [[u32; GRID_SIZE]; GRID_SIZE] =
        [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]];

    #[test]
    fn test_checkerboard_is_game_over() {
        assert!(is_game_over(&Grid::from_values(CHECKERBOARD).unwrap()));
    }

    #[test]
    fn test_single_empty_cell_is_not_game_over() {
        let mut values = CHECKERBOARD;
        values[3][3] = 0;
        assert!(!is_game_over(&Grid::from_values(values).unwrap()));
    }

    #[test]
    fn test_horizontal_pair_is_not_game_over() {
        let mut values = CHECKERBOARD;
        values[3][2] = 2;
        assert!(!is_game_over(&Grid::from_values(values).unwrap()));
    }

    #[test]
    fn test_vertical_pair_is_not_game_over() {
        let mut values = CHECKERBOARD;
        // Column 3, rows 2 and 3 become equal.
        values[2][3] = 2;
        values[2][2] = 8;
        assert!(!is_game_over(&Grid::from_values(values).unwrap()));
    }

    #[test]
    fn test_has_won() {
        assert!(!has_won(&Grid::empty()));
        assert!(!has_won(&Grid::from_values(CHECKERBOARD).unwrap()));

        let g = Grid::empty().with_cell(2, 1, Some(WINNING_TILE));
        assert!(has_won(&g));

        // Bigger tiles alone do not count as the winning tile.
        let g = Grid::empty().with_cell(0, 0, Some(4096));
        assert!(!has_won(&g));
    }
}
