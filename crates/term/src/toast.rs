//! Toast notifications for turn edges.
//!
//! The queue watches the turn events coming out of the controller and turns the
//! won / game-over edges into short-lived messages. It is advanced by the frame
//! loop, never by wall-clock time, so tests can drive it directly.

use std::collections::VecDeque;

use crate::types::{TurnEvent, TOAST_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastKind {
    Won,
    GameOver,
}

impl ToastKind {
    pub fn text(&self) -> &'static str {
        match self {
            ToastKind::Won => "YOU WIN!",
            ToastKind::GameOver => "GAME OVER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub remaining_ms: u32,
}

impl Toast {
    pub fn text(&self) -> &'static str {
        self.kind.text()
    }
}

/// FIFO of pending toasts. Only the front one is visible and ticking.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    pending: VecDeque<Toast>,
    duration_ms: u32,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(TOAST_MS)
    }
}

impl ToastQueue {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            pending: VecDeque::with_capacity(2),
            duration_ms,
        }
    }

    pub fn push(&mut self, kind: ToastKind) {
        self.pending.push_back(Toast {
            kind,
            remaining_ms: self.duration_ms,
        });
    }

    /// Queue toasts for the edges carried by `event`.
    ///
    /// A move that both wins and ends the game shows the win first.
    pub fn observe(&mut self, event: &TurnEvent) {
        if event.won_now {
            self.push(ToastKind::Won);
        }
        if event.game_over_now {
            self.push(ToastKind::GameOver);
        }
    }

    /// Advance the visible toast by `elapsed_ms`.
    pub fn tick(&mut self, elapsed_ms: u32) {
        let Some(front) = self.pending.front_mut() else {
            return;
        };
        front.remaining_ms = front.remaining_ms.saturating_sub(elapsed_ms);
        if front.remaining_ms == 0 {
            self.pending.pop_front();
        }
    }

    pub fn current(&self) -> Option<&Toast> {
        self.pending.front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop everything (used on restart).
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
