//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, external control protocol).
//!
//! # Board Dimensions
//!
//! The board is a fixed `GRID_SIZE` x `GRID_SIZE` square (4x4). Coordinates are
//! `(row, col)` with `(0, 0)` at the top-left corner.
//!
//! # Game Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `GRID_SIZE` | 4 | Rows and columns on the board |
//! | `WINNING_TILE` | 2048 | Tile value that sets the won flag |
//! | `MAX_TILE` | 131072 | Largest tile a 4x4 board can hold |
//! | `INITIAL_TILES` | 2 | Tiles spawned into a fresh board |
//! | `SPAWN_TWO_PROBABILITY` | 0.9 | Chance that a spawned tile is a 2 (else 4) |
//! | `TICK_MS` | 16 | Frame loop interval (~60 FPS) |
//! | `TOAST_MS` | 2500 | How long a win/game-over toast stays visible |
//!
//! # Examples
//!
//! ```
//! use tui_2048_types::{Direction, GameAction, GRID_SIZE};
//!
//! // Parse a direction (case-insensitive)
//! let dir = Direction::from_str("Left").unwrap();
//! assert_eq!(dir, Direction::Left);
//! assert_eq!(dir.opposite(), Direction::Right);
//!
//! // Actions carry an optional direction
//! let action = GameAction::from_str("moveUp").unwrap();
//! assert_eq!(action.direction(), Some(Direction::Up));
//! assert_eq!(GameAction::Restart.direction(), None);
//!
//! assert_eq!(GRID_SIZE, 4);
//! ```

/// Rows and columns on the board.
pub const GRID_SIZE: usize = 4;

/// Number of cells on the board.
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Tile value that wins the game.
pub const WINNING_TILE: u32 = 2048;

/// Largest tile reachable on a 4x4 board (2^17, with 4s spawning).
///
/// Grids built from outside input are rejected above this value.
pub const MAX_TILE: u32 = 1 << 17;

/// Tiles seeded into a freshly initialized board.
pub const INITIAL_TILES: usize = 2;

/// Probability that a spawned tile is a 2. The remainder spawns a 4.
pub const SPAWN_TWO_PROBABILITY: f64 = 0.9;

/// Value of the common spawned tile.
pub const SPAWN_LOW_VALUE: u32 = 2;

/// Value of the rare spawned tile.
pub const SPAWN_HIGH_VALUE: u32 = 4;

/// Fixed frame loop interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Visible lifetime of a toast notification.
pub const TOAST_MS: u32 = 2500;

/// The four move directions.
///
/// A move slides every tile as far as possible toward the named edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in the order used by legal-move arrays.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Parse direction from string (case-insensitive)
    ///
    /// Accepts full names or single letters: "up" | "u", "down" | "d",
    /// "left" | "l", "right" | "r".
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_2048_types::Direction;
    ///
    /// assert_eq!(Direction::from_str("UP"), Some(Direction::Up));
    /// assert_eq!(Direction::from_str("r"), Some(Direction::Right));
    /// assert_eq!(Direction::from_str("north"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Position of this direction inside [`Direction::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// True for directions that operate on columns.
    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// True for directions that compact toward the high-index end of a line.
    pub fn is_reversed(&self) -> bool {
        matches!(self, Direction::Down | Direction::Right)
    }
}

/// Game actions that can be applied to modify game state
///
/// These actions are used by both keyboard input and external control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Slide all tiles up
    MoveUp,
    /// Slide all tiles down
    MoveDown,
    /// Slide all tiles left
    MoveLeft,
    /// Slide all tiles right
    MoveRight,
    /// Start a fresh game (available at any time)
    Restart,
}

impl GameAction {
    /// Parse action from string (for the control protocol)
    ///
    /// Accepts the camelCase action names as well as bare direction names.
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_2048_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("down"), Some(GameAction::MoveDown));
    /// assert_eq!(GameAction::from_str("restart"), Some(GameAction::Restart));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveup" | "up" => Some(GameAction::MoveUp),
            "movedown" | "down" => Some(GameAction::MoveDown),
            "moveleft" | "left" => Some(GameAction::MoveLeft),
            "moveright" | "right" => Some(GameAction::MoveRight),
            "restart" | "reset" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string for the control protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveUp => "moveUp",
            GameAction::MoveDown => "moveDown",
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::Restart => "restart",
        }
    }

    /// The move direction, if this action is a move.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            GameAction::MoveUp => Some(Direction::Up),
            GameAction::MoveDown => Some(Direction::Down),
            GameAction::MoveLeft => Some(Direction::Left),
            GameAction::MoveRight => Some(Direction::Right),
            GameAction::Restart => None,
        }
    }
}

impl From<Direction> for GameAction {
    fn from(value: Direction) -> Self {
        match value {
            Direction::Up => GameAction::MoveUp,
            Direction::Down => GameAction::MoveDown,
            Direction::Left => GameAction::MoveLeft,
            Direction::Right => GameAction::MoveRight,
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(value)`: Tile holding a power of two >= 2
pub type Cell = Option<u32>;

/// A tile placed by the spawner after an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpawnedTile {
    pub row: usize,
    pub col: usize,
    pub value: u32,
}

/// Core-side event emitted after an accepted move.
///
/// `won_now` and `game_over_now` are edge flags: they are set only on the move
/// that first turns the corresponding state flag on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnEvent {
    pub direction: Direction,
    pub score_gained: u32,
    pub spawned: Option<SpawnedTile>,
    pub won_now: bool,
    pub game_over_now: bool,
}
