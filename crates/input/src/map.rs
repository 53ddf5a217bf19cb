//! Key mapping from terminal events to game actions.

use crate::types::GameAction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map keyboard input to game actions.
///
/// Letters are matched case-insensitively. Ctrl-modified keys never map to an
/// action, so Ctrl-C cannot be read as anything but quit.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    match key.code {
        KeyCode::Up => Some(GameAction::MoveUp),
        KeyCode::Down => Some(GameAction::MoveDown),
        KeyCode::Left => Some(GameAction::MoveLeft),
        KeyCode::Right => Some(GameAction::MoveRight),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'k' | 'w' => Some(GameAction::MoveUp),
            'j' | 's' => Some(GameAction::MoveDown),
            'h' | 'a' => Some(GameAction::MoveLeft),
            'l' | 'd' => Some(GameAction::MoveRight),
            'r' => Some(GameAction::Restart),
            _ => None,
        },
        _ => None,
    }
}

/// Map a key event, dropping auto-repeat and release events.
///
/// One physical press is one move.
pub fn handle_key_press(key: KeyEvent) -> Option<GameAction> {
    match key.kind {
        KeyEventKind::Press => handle_key_event(key),
        KeyEventKind::Repeat | KeyEventKind::Release => None,
    }
}

/// Decide what to do with a key given whether the game is still playable.
///
/// Moves are suppressed once the game is over; restart always passes.
pub fn action_for(key: KeyEvent, playable: bool) -> Option<GameAction> {
    let action = handle_key_press(key)?;
    if action.direction().is_some() && !playable {
        return None;
    }
    Some(action)
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn with_kind(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(handle_key_event(key(KeyCode::Up)), Some(GameAction::MoveUp));
        assert_eq!(handle_key_event(key(KeyCode::Down)), Some(GameAction::MoveDown));
        assert_eq!(handle_key_event(key(KeyCode::Left)), Some(GameAction::MoveLeft));
        assert_eq!(handle_key_event(key(KeyCode::Right)), Some(GameAction::MoveRight));
    }

    #[test]
    fn test_vim_and_wasd_keys() {
        for (ch, action) in [
            ('k', GameAction::MoveUp),
            ('j', GameAction::MoveDown),
            ('h', GameAction::MoveLeft),
            ('l', GameAction::MoveRight),
            ('w', GameAction::MoveUp),
            ('s', GameAction::MoveDown),
            ('a', GameAction::MoveLeft),
            ('d', GameAction::MoveRight),
        ] {
            assert_eq!(handle_key_event(key(KeyCode::Char(ch))), Some(action));
            assert_eq!(
                handle_key_event(key(KeyCode::Char(ch.to_ascii_uppercase()))),
                Some(action)
            );
        }
    }

    #[test]
    fn test_restart_and_unmapped() {
        assert_eq!(handle_key_event(key(KeyCode::Char('r'))), Some(GameAction::Restart));
        assert_eq!(handle_key_event(key(KeyCode::Char('R'))), Some(GameAction::Restart));
        assert_eq!(handle_key_event(key(KeyCode::Char(' '))), None);
        assert_eq!(handle_key_event(key(KeyCode::Enter)), None);
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn test_repeat_and_release_are_ignored() {
        assert_eq!(
            handle_key_press(with_kind(KeyCode::Left, KeyEventKind::Repeat)),
            None
        );
        assert_eq!(
            handle_key_press(with_kind(KeyCode::Left, KeyEventKind::Release)),
            None
        );
        assert_eq!(
            handle_key_press(with_kind(KeyCode::Left, KeyEventKind::Press)),
            Some(GameAction::MoveLeft)
        );
    }

    #[test]
    fn test_moves_suppressed_when_not_playable() {
        assert_eq!(action_for(key(KeyCode::Up), false), None);
        assert_eq!(action_for(key(KeyCode::Up), true), Some(GameAction::MoveUp));
        assert_eq!(
            action_for(key(KeyCode::Char('r')), false),
            Some(GameAction::Restart)
        );
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(key(KeyCode::Char('q'))));
        assert!(!should_quit(key(KeyCode::Esc)));
        assert!(should_quit(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!should_quit(key(KeyCode::Char('c'))));
        assert!(!should_quit(with_kind(KeyCode::Char('q'), KeyEventKind::Release)));
    }
}
