//! TUI 2048 (workspace facade crate).
//!
//! Re-exports the member crates under one roof so the binary, the integration
//! tests and the benches can write `tui_2048::{core, types, input, term, adapter}`.

pub use tui_2048_adapter as adapter;
pub use tui_2048_core as core;
pub use tui_2048_input as input;
pub use tui_2048_term as term;
pub use tui_2048_types as types;
