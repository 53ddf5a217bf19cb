//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It avoids widget
//! toolkits and renders into a plain framebuffer that is flushed to the
//! terminal with crossterm.
//!
//! - [`GameView`] is pure: snapshot in, framebuffer out
//! - [`TerminalRenderer`] owns the terminal and writes only what changed
//! - [`ToastQueue`] turns win / game-over edges into short messages

pub mod fb;
pub mod game_view;
pub mod renderer;
pub mod toast;

pub use tui_2048_core as core;
pub use tui_2048_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{tile_style, AdapterStatusView, AnchorY, BoardLayout, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use toast::{Toast, ToastKind, ToastQueue};
