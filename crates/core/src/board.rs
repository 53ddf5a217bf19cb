//! Board module - the 4x4 grid value type
//!
//! The grid is a fixed-size square of cells, each empty or holding a power-of-two
//! tile. `Grid` is `Copy`: every operation that "changes" a grid returns a new
//! value and leaves the input untouched.
//! Coordinates: (row, col), row 0 at the top, col 0 at the left.

use std::fmt;

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::types::{Cell, CELL_COUNT, GRID_SIZE, MAX_TILE};

/// One row or column pulled out of the grid for the line engine.
pub type Line = [Cell; GRID_SIZE];

/// Empty-cell coordinates in row-major order. Never allocates.
pub type EmptyCells = ArrayVec<(usize, usize), CELL_COUNT>;

/// Rejected grid input at a construction boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("expected {expected} rows, got {actual}")]
    WrongRowCount { expected: usize, actual: usize },
    #[error("row {row} has {actual} cells, expected {expected}")]
    WrongRowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("cell ({row}, {col}) holds {value}, not a power of two in 2..={max}", max = MAX_TILE)]
    InvalidTile { row: usize, col: usize, value: u32 },
}

/// The game grid - `GRID_SIZE` rows of `GRID_SIZE` cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: [[Cell; GRID_SIZE]; GRID_SIZE],
}

/// True when `value` may appear on a board: a power of two in `2..=MAX_TILE`.
pub fn is_valid_tile(value: u32) -> bool {
    (2..=MAX_TILE).contains(&value) && value.is_power_of_two()
}

impl Grid {
    /// Create a grid with every cell empty
    pub fn empty() -> Self {
        Self {
            cells: [[None; GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Build a grid from fixed-size rows, validating every tile value.
    pub fn from_cells(cells: [[Cell; GRID_SIZE]; GRID_SIZE]) -> Result<Self, GridError> {
        for (row, line) in cells.iter().enumerate() {
            for (col, cell) in line.iter().enumerate() {
                if let Some(value) = *cell {
                    if !is_valid_tile(value) {
                        return Err(GridError::InvalidTile { row, col, value });
                    }
                }
            }
        }
        Ok(Self { cells })
    }

    /// Build a grid from dynamically sized rows (e.g. parsed input).
    ///
    /// Fails fast on wrong dimensions or on an invalid tile value (see [`is_valid_tile`]).
    pub fn from_rows(rows: &[Vec<Cell>]) -> Result<Self, GridError> {
        if rows.len() != GRID_SIZE {
            return Err(GridError::WrongRowCount {
                expected: GRID_SIZE,
                actual: rows.len(),
            });
        }

        let mut cells = [[None; GRID_SIZE]; GRID_SIZE];
        for (row, line) in rows.iter().enumerate() {
            if line.len() != GRID_SIZE {
                return Err(GridError::WrongRowLength {
                    row,
                    expected: GRID_SIZE,
                    actual: line.len(),
                });
            }
            cells[row].copy_from_slice(line);
        }
        Self::from_cells(cells)
    }

    /// Build a grid from raw values where 0 means empty.
    ///
    /// ```
    /// use tui_2048_core::Grid;
    ///
    /// let grid = Grid::from_values([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
    /// assert_eq!(grid.get(0, 1), Some(Some(2)));
    /// assert_eq!(grid.get(0, 2), Some(None));
    /// ```
    pub fn from_values(values: [[u32; GRID_SIZE]; GRID_SIZE]) -> Result<Self, GridError> {
        let cells = values.map(|row| row.map(|v| if v == 0 { None } else { Some(v) }));
        Self::from_cells(cells)
    }

    /// Get cell at (row, col). Returns None if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Copy of this grid with one cell replaced.
    ///
    /// Out-of-bounds positions leave the copy unchanged.
    pub fn with_cell(&self, row: usize, col: usize, cell: Cell) -> Self {
        let mut next = *self;
        if row < GRID_SIZE && col < GRID_SIZE {
            next.cells[row][col] = cell;
        }
        next
    }

    pub fn row(&self, row: usize) -> Line {
        self.cells[row]
    }

    pub fn column(&self, col: usize) -> Line {
        std::array::from_fn(|row| self.cells[row][col])
    }

    pub(crate) fn set_row(&mut self, row: usize, line: Line) {
        self.cells[row] = line;
    }

    pub(crate) fn set_column(&mut self, col: usize, line: Line) {
        for (row, cell) in line.into_iter().enumerate() {
            self.cells[row][col] = cell;
        }
    }

    /// Positions of empty cells, scanned row by row, ascending.
    ///
    /// The order is part of the contract: the spawner indexes into it.
    pub fn empty_cells(&self) -> EmptyCells {
        let mut out = EmptyCells::new();
        for (row, line) in self.cells.iter().enumerate() {
            for (col, cell) in line.iter().enumerate() {
                if cell.is_none() {
                    out.push((row, col));
                }
            }
        }
        out
    }

    pub fn has_empty_cell(&self) -> bool {
        self.cells.iter().flatten().any(|c| c.is_none())
    }

    pub fn tile_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Largest tile on the board, 0 when empty.
    pub fn max_tile(&self) -> u32 {
        self.cells.iter().flatten().flatten().copied().max().unwrap_or(0)
    }

    /// Get a reference to the rows
    pub fn cells(&self) -> &[[Cell; GRID_SIZE]; GRID_SIZE] {
        &self.cells
    }

    /// Write the grid as raw values (0 = empty) without allocating.
    pub fn write_u32_grid(&self, out: &mut [[u32; GRID_SIZE]; GRID_SIZE]) {
        for (dst, src) in out.iter_mut().zip(self.cells.iter()) {
            for (d, s) in dst.iter_mut().zip(src.iter()) {
                *d = s.unwrap_or(0);
            }
        }
    }

    pub fn to_values(&self) -> [[u32; GRID_SIZE]; GRID_SIZE] {
        let mut out = [[0; GRID_SIZE]; GRID_SIZE];
        self.write_u32_grid(&mut out);
        out
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.cells {
            for cell in line {
                match cell {
                    Some(v) => write!(f, "{:>6}", v)?,
                    None => write!(f, "{:>6}", '.')?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_grid_has_every_cell_empty() {
        let grid = Grid::empty();
        assert_eq!(grid.empty_cells().len(), CELL_COUNT);
        assert_eq!(grid.tile_count(), 0);
        assert_eq!(grid.max_tile(), 0);
    }

    #[test]
    fn test_empty_cells_row_major_order() {
        let grid = Grid::from_values([[2, 0, 4, 0], [0, 2, 2, 2], [4, 4, 4, 4], [8, 8, 0, 8]])
            .unwrap();
        let empty: Vec<_> = grid.empty_cells().into_iter().collect();
        assert_eq!(empty, vec![(0, 1), (0, 3), (1, 0), (3, 2)]);
    }

    #[test]
    fn test_with_cell_leaves_original_untouched() {
        let grid = Grid::empty();
        let next = grid.with_cell(1, 2, Some(4));
        assert_eq!(grid.get(1, 2), Some(None));
        assert_eq!(next.get(1, 2), Some(Some(4)));
        assert_eq!(next.with_cell(9, 9, Some(2)), next);
    }

    #[test]
    fn test_rows_and_columns() {
        let grid = Grid::from_values([[2, 4, 8, 16], [0; 4], [0; 4], [32, 0, 0, 0]]).unwrap();
        assert_eq!(grid.row(0), [Some(2), Some(4), Some(8), Some(16)]);
        assert_eq!(grid.column(0), [Some(2), None, None, Some(32)]);
    }

    #[test]
    fn test_from_rows_rejects_bad_dimensions() {
        let short = vec![vec![None; GRID_SIZE]; 3];
        assert_eq!(
            Grid::from_rows(&short),
            Err(GridError::WrongRowCount {
                expected: 4,
                actual: 3
            })
        );

        let mut ragged = vec![vec![None; GRID_SIZE]; GRID_SIZE];
        ragged[2].push(None);
        assert_eq!(
            Grid::from_rows(&ragged),
            Err(GridError::WrongRowLength {
                row: 2,
                expected: 4,
                actual: 5
            })
        );
    }

    #[test]
    fn test_from_values_rejects_non_power_of_two() {
        let err = Grid::from_values([[0; 4], [0, 3, 0, 0], [0; 4], [0; 4]]).unwrap_err();
        assert_eq!(
            err,
            GridError::InvalidTile {
                row: 1,
                col: 1,
                value: 3
            }
        );
        assert!(Grid::from_values([[1, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).is_err());
    }

    #[test]
    fn test_from_values_rejects_oversized_tiles() {
        assert!(is_valid_tile(MAX_TILE));
        assert!(!is_valid_tile(MAX_TILE * 2));
        assert!(!is_valid_tile(1 << 31));

        let err = Grid::from_values([[1 << 31, 1 << 31, 0, 0], [0; 4], [0; 4], [0; 4]])
            .unwrap_err();
        assert_eq!(
            err,
            GridError::InvalidTile {
                row: 0,
                col: 0,
                value: 1 << 31
            }
        );
        assert!(Grid::from_values([[MAX_TILE, MAX_TILE, 0, 0], [0; 4], [0; 4], [0; 4]]).is_ok());
    }

    #[test]
    fn test_values_roundtrip() {
        let values = [[2, 0, 0, 4], [0; 4], [0, 2048, 0, 0], [0, 0, 0, 65536]];
        let grid = Grid::from_values(values).unwrap();
        assert_eq!(grid.to_values(), values);
        assert_eq!(grid.max_tile(), 65536);
    }
}
