//! Game state module - the turn controller
//!
//! [`GameState`] is a plain value: grid, score and the two terminal flags.
//! [`GameState::advance`] is the pure transition for one move. [`Game`] is the
//! single owner that holds the current value, the random source and some episode
//! bookkeeping, and swaps in the next value wholesale after every accepted move.

use log::{debug, info};

use crate::board::Grid;
use crate::rng::{RandomSource, SimpleRng};
use crate::snapshot::GameSnapshot;
use crate::spawn::spawn_tile;
use crate::terminal::{has_won, is_game_over};
use crate::transform::{legal_moves, move_grid};
use crate::types::{Direction, GameAction, TurnEvent, INITIAL_TILES};

/// Complete game state as seen by rendering and control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameState {
    pub grid: Grid,
    pub score: u32,
    pub game_over: bool,
    /// Monotonic within an episode: once set it is never cleared.
    pub won: bool,
}

impl GameState {
    /// Fresh game: empty grid plus `INITIAL_TILES` spawned tiles.
    pub fn initial<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let mut grid = Grid::empty();
        for _ in 0..INITIAL_TILES {
            if let Some((next, _)) = spawn_tile(&grid, rng) {
                grid = next;
            }
        }

        Self {
            grid,
            score: 0,
            game_over: false,
            won: false,
        }
    }

    /// State for an arbitrary board, with flags derived from it.
    pub fn from_grid(grid: Grid) -> Self {
        Self {
            grid,
            score: 0,
            game_over: is_game_over(&grid),
            won: has_won(&grid),
        }
    }

    /// Compute the state after moving toward `direction`.
    ///
    /// Returns `None` when the move is rejected: the game is over, or the grid
    /// would not change. No randomness is consumed in that case.
    pub fn advance<R: RandomSource + ?Sized>(
        &self,
        direction: Direction,
        rng: &mut R,
    ) -> Option<(GameState, TurnEvent)> {
        if self.game_over {
            return None;
        }

        let moved = move_grid(&self.grid, direction);
        if !moved.moved {
            return None;
        }

        let (grid, spawned) = match spawn_tile(&moved.grid, rng) {
            Some((grid, tile)) => (grid, Some(tile)),
            None => (moved.grid, None),
        };

        let game_over = is_game_over(&grid);
        let won = self.won || has_won(&grid);
        let next = GameState {
            grid,
            score: self.score.saturating_add(moved.score_gained),
            game_over,
            won,
        };
        let event = TurnEvent {
            direction,
            score_gained: moved.score_gained,
            spawned,
            won_now: won && !self.won,
            game_over_now: game_over,
        };
        Some((next, event))
    }
}

/// Controller phase. `Over` accepts only a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Playing,
    Over,
}

/// Turn controller owning the current [`GameState`].
#[derive(Debug, Clone)]
pub struct Game<R: RandomSource = SimpleRng> {
    state: GameState,
    rng: R,
    /// Monotonic episode id (increments on reset).
    episode_id: u32,
    /// Accepted moves in the current episode.
    move_count: u32,
    /// Last accepted turn (consumed by observers).
    last_event: Option<TurnEvent>,
}

impl Game<SimpleRng> {
    /// Create a new game driven by the deterministic LCG
    pub fn new(seed: u32) -> Self {
        Self::with_rng(SimpleRng::new(seed))
    }
}

impl<R: RandomSource> Game<R> {
    /// Create a new game with an injected random source.
    pub fn with_rng(mut rng: R) -> Self {
        let state = GameState::initial(&mut rng);
        Self::from_state(state, rng)
    }

    /// Resume from a prepared state (e.g. a fixed board in tests).
    pub fn from_state(state: GameState, rng: R) -> Self {
        Self {
            state,
            rng,
            episode_id: 0,
            move_count: 0,
            last_event: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.state.grid
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn game_over(&self) -> bool {
        self.state.game_over
    }

    pub fn won(&self) -> bool {
        self.state.won
    }

    pub fn phase(&self) -> Phase {
        if self.state.game_over {
            Phase::Over
        } else {
            Phase::Playing
        }
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Legality of each direction on the current grid, indexed like [`Direction::ALL`].
    pub fn legal_moves(&self) -> [bool; 4] {
        if self.state.game_over {
            return [false; 4];
        }
        legal_moves(&self.state.grid)
    }

    /// Apply one move. Returns true if it was accepted.
    ///
    /// A rejected move (game over, or nothing would slide) leaves every field
    /// untouched.
    pub fn move_in(&mut self, direction: Direction) -> bool {
        let Some((next, event)) = self.state.advance(direction, &mut self.rng) else {
            return false;
        };

        self.state = next;
        self.move_count = self.move_count.wrapping_add(1);
        self.last_event = Some(event);

        debug!(
            "episode {} move {}: {} +{} (score {})",
            self.episode_id,
            self.move_count,
            direction.as_str(),
            event.score_gained,
            self.state.score
        );
        if event.won_now {
            info!(
                "episode {} reached {} after {} moves",
                self.episode_id,
                crate::types::WINNING_TILE,
                self.move_count
            );
        }
        if event.game_over_now {
            info!(
                "episode {} over: score {}, best tile {}",
                self.episode_id,
                self.state.score,
                self.state.grid.max_tile()
            );
        }
        true
    }

    /// Start a fresh episode regardless of the current phase.
    pub fn reset(&mut self) {
        self.state = GameState::initial(&mut self.rng);
        self.episode_id = self.episode_id.wrapping_add(1);
        self.move_count = 0;
        self.last_event = None;
        debug!("episode {} started", self.episode_id);
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action.direction() {
            Some(direction) => self.move_in(direction),
            None => {
                self.reset();
                true
            }
        }
    }

    /// Take and clear the last accepted turn.
    pub fn take_last_event(&mut self) -> Option<TurnEvent> {
        self.last_event.take()
    }

    pub fn last_event(&self) -> Option<&TurnEvent> {
        self.last_event.as_ref()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.state.grid.write_u32_grid(&mut out.cells);
        out.score = self.state.score;
        out.game_over = self.state.game_over;
        out.won = self.state.won;
        out.episode_id = self.episode_id;
        out.move_count = self.move_count;
        out.max_tile = self.state.grid.max_tile();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for Game<SimpleRng> {
    fn default() -> Self {
        Self::new(1)
    }
}
