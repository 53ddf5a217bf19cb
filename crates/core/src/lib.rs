//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and turn logic.
//! It has **zero dependencies** on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games (for replays and tests)
//! - **Testable**: Randomness is injected, so every spawn can be scripted
//! - **Portable**: Can run in any environment (terminal, headless, remote control)
//! - **Value-based**: Grids and states are `Copy`; nothing is mutated in place
//!
//! # Module Structure
//!
//! - [`board`]: 4x4 grid value type and empty-cell discovery
//! - [`line`]: single-line compaction and one-pass merge
//! - [`transform`]: whole-grid moves for all four directions
//! - [`rng`]: the injectable [`RandomSource`] and its implementations
//! - [`spawn`]: weighted random tile insertion
//! - [`terminal`]: game-over and win detection
//! - [`game_state`]: the pure turn transition and the owning controller
//! - [`snapshot`]: read-only state handed to rendering and remote control
//!
//! # Game Rules
//!
//! - **Move**: every tile slides toward the chosen edge, gaps close first
//! - **Merge**: two equal neighbours combine once per move into their sum,
//!   which is added to the score; `[2, 2, 2, 2]` becomes `[4, 4, _, _]`
//! - **Spawn**: after a move that changed the board, a 2 (90%) or 4 (10%)
//!   appears in a uniformly chosen empty cell
//! - **Game over**: the board is full and no neighbours are equal
//! - **Win**: a 2048 tile appears; the flag stays set and play continues
//!
//! # Example
//!
//! ```
//! use tui_2048_core::{Game, Phase};
//! use tui_2048_types::{Direction, GameAction};
//!
//! // Create a game (two tiles already placed)
//! let mut game = Game::new(12345);
//! assert_eq!(game.grid().tile_count(), 2);
//!
//! // Apply moves; rejected moves return false and change nothing
//! for dir in Direction::ALL {
//!     game.move_in(dir);
//! }
//! game.apply_action(GameAction::MoveLeft);
//!
//! // Restart is always available
//! game.apply_action(GameAction::Restart);
//! assert_eq!(game.phase(), Phase::Playing);
//! assert_eq!(game.score(), 0);
//! ```

pub mod board;
pub mod game_state;
pub mod line;
pub mod rng;
pub mod snapshot;
pub mod spawn;
pub mod terminal;
pub mod transform;

pub use tui_2048_types as types;

// Re-export commonly used types for convenience
pub use board::{is_valid_tile, EmptyCells, Grid, GridError, Line};
pub use game_state::{Game, GameState, Phase};
pub use line::{process_line, process_line_reversed, LineResult};
pub use rng::{RandomSource, SequenceRng, SimpleRng};
pub use snapshot::GameSnapshot;
pub use spawn::{add_random_tile, spawn_tile};
pub use terminal::{has_won, is_game_over};
pub use transform::{can_move, legal_moves, move_grid, MoveResult};
