//! Grid transform - applies the line engine across a whole grid
//!
//! Rows feed left/right moves, columns feed up/down moves. Right and down reuse
//! the same toward-index-0 line engine by reversing each line before and after.

use crate::board::Grid;
use crate::line::{process_line, process_line_reversed, LineResult};
use crate::types::{Direction, GRID_SIZE};

/// Outcome of sliding a grid in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    pub grid: Grid,
    /// True iff any line changed.
    pub moved: bool,
    /// Sum of merge scores across every line.
    pub score_gained: u32,
}

/// Slide every tile of `grid` toward `direction`.
///
/// Every line is processed on every call; there is no early exit.
pub fn move_grid(grid: &Grid, direction: Direction) -> MoveResult {
    let mut next = *grid;
    let mut moved = false;
    let mut score_gained: u32 = 0;

    for i in 0..GRID_SIZE {
        let input = if direction.is_vertical() {
            grid.column(i)
        } else {
            grid.row(i)
        };

        let LineResult {
            line,
            changed,
            score_gained: gained,
        } = if direction.is_reversed() {
            process_line_reversed(input)
        } else {
            process_line(input)
        };

        if direction.is_vertical() {
            next.set_column(i, line);
        } else {
            next.set_row(i, line);
        }
        moved |= changed;
        score_gained = score_gained.saturating_add(gained);
    }

    MoveResult {
        grid: next,
        moved,
        score_gained,
    }
}

/// Check whether sliding toward `direction` would change the grid.
pub fn can_move(grid: &Grid, direction: Direction) -> bool {
    move_grid(grid, direction).moved
}

/// Legality of each direction, indexed like [`Direction::ALL`].
pub fn legal_moves(grid: &Grid) -> [bool; 4] {
    Direction::ALL.map(|d| can_move(grid, d))
}
