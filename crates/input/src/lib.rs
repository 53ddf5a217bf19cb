//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. A 2048 move
//! is a discrete step, so there is no repeat handling beyond dropping the
//! terminal's own auto-repeat events.

pub mod map;

pub use tui_2048_types as types;

pub use map::{action_for, handle_key_event, handle_key_press, should_quit};
