use crate::types::GRID_SIZE;

/// Read-only view of the game handed to rendering and the control adapter.
///
/// Cells are raw values with 0 for empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub cells: [[u32; GRID_SIZE]; GRID_SIZE],
    pub score: u32,
    pub game_over: bool,
    pub won: bool,
    pub episode_id: u32,
    pub move_count: u32,
    pub max_tile: u32,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        !self.game_over
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            cells: [[0; GRID_SIZE]; GRID_SIZE],
            score: 0,
            game_over: false,
            won: false,
            episode_id: 0,
            move_count: 0,
            max_tile: 0,
        }
    }
}
