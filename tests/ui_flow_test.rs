//! Keyboard -> game -> toasts -> framebuffer, without a real terminal.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

use tui_2048::core::{Game, GameState, Grid, SequenceRng};
use tui_2048::input::{action_for, should_quit};
use tui_2048::term::{
    AdapterStatusView, FrameBuffer, GameView, TerminalRenderer, ToastKind, ToastQueue, Viewport,
};
use tui_2048::types::GameAction;

const VIEWPORT: Viewport = Viewport {
    width: 80,
    height: 24,
};

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn scripted(values: [[u32; 4]; 4]) -> Game<SequenceRng> {
    let grid = Grid::from_values(values).unwrap();
    Game::from_state(GameState::from_grid(grid), SequenceRng::first_cell_twos())
}

/// Feed one key through the same path the binary uses.
fn play_key(game: &mut Game<SequenceRng>, toasts: &mut ToastQueue, key: KeyEvent) -> bool {
    let Some(action) = action_for(key, !game.game_over()) else {
        return false;
    };
    if !game.apply_action(action) {
        return false;
    }
    match game.take_last_event() {
        Some(ev) => toasts.observe(&ev),
        None => toasts.clear(),
    }
    true
}

fn screen_contains(fb: &FrameBuffer, needle: &str) -> bool {
    (0..fb.height()).any(|y| fb.row_text(y).contains(needle))
}

#[test]
fn winning_move_shows_toast_and_banner() {
    let mut game = scripted([[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]]);
    let mut toasts = ToastQueue::default();

    assert!(play_key(&mut game, &mut toasts, press(KeyCode::Char('h'))));
    assert_eq!(toasts.current().map(|t| t.kind), Some(ToastKind::Won));

    let mut fb = FrameBuffer::new(0, 0);
    GameView::default().render_into_with(
        &game.snapshot(),
        toasts.current(),
        None,
        VIEWPORT,
        &mut fb,
    );
    assert!(screen_contains(&fb, "YOU WIN!"));
    assert!(screen_contains(&fb, "2048 REACHED"));
    assert!(screen_contains(&fb, "2048"));
    assert!(screen_contains(&fb, "OFF"));

    // The toast expires on frame ticks alone.
    for _ in 0..200 {
        toasts.tick(16);
    }
    assert!(toasts.is_empty());
}

#[test]
fn game_over_blocks_moves_until_restart() {
    let mut game = scripted([
        [2, 4, 2, 4],
        [4, 2, 4, 2],
        [2, 4, 2, 4],
        [0, 8, 16, 32],
    ]);
    let mut toasts = ToastQueue::default();

    assert!(play_key(&mut game, &mut toasts, press(KeyCode::Left)));
    assert!(game.game_over());
    assert_eq!(toasts.current().map(|t| t.kind), Some(ToastKind::GameOver));

    let fb = GameView::default().render(&game.snapshot(), VIEWPORT);
    assert!(screen_contains(&fb, "GAME OVER"));

    for code in [KeyCode::Up, KeyCode::Char('d'), KeyCode::Char('S')] {
        assert!(!play_key(&mut game, &mut toasts, press(code)));
    }
    assert_eq!(game.move_count(), 1);

    assert!(play_key(&mut game, &mut toasts, press(KeyCode::Char('r'))));
    assert!(!game.game_over());
    assert!(toasts.is_empty());
    assert_eq!(game.episode_id(), 1);
}

#[test]
fn quit_keys_do_not_map_to_actions() {
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert!(should_quit(ctrl_c));
    assert_eq!(action_for(ctrl_c, true), None);
    assert!(should_quit(press(KeyCode::Char('q'))));
    assert!(!should_quit(press(KeyCode::Esc)));

    let release = KeyEvent {
        code: KeyCode::Char('q'),
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Release,
        state: KeyEventState::NONE,
    };
    assert!(!should_quit(release));
    assert_eq!(action_for(press(KeyCode::Char('R')), false), Some(GameAction::Restart));
}

#[test]
fn side_panel_shows_adapter_status() {
    let game = Game::new(3);
    let status = AdapterStatusView {
        client_count: 2,
        controller_id: Some(5),
    };
    let mut fb = FrameBuffer::new(0, 0);
    GameView::default().render_into_with(&game.snapshot(), None, Some(&status), VIEWPORT, &mut fb);

    assert!(screen_contains(&fb, "SCORE"));
    assert!(screen_contains(&fb, "ON"));
    assert!(screen_contains(&fb, "C 2"));
    assert!(screen_contains(&fb, "CTRL 5"));
}

#[test]
fn unchanged_frame_writes_nothing() {
    let mut game = Game::new(11);
    let view = GameView::default();
    let mut renderer = TerminalRenderer::with_writer(Vec::<u8>::new());
    let mut fb = FrameBuffer::new(0, 0);

    view.render_into(&game.snapshot(), VIEWPORT, &mut fb);
    renderer.draw_swap(&mut fb).unwrap();
    let full = renderer.writer().len();
    assert!(full > 0);

    view.render_into(&game.snapshot(), VIEWPORT, &mut fb);
    renderer.draw_swap(&mut fb).unwrap();
    assert_eq!(renderer.writer().len(), full);

    // A move redraws only part of the screen.
    let moved = tui_2048::types::Direction::ALL
        .iter()
        .any(|&d| game.move_in(d));
    assert!(moved);
    view.render_into(&game.snapshot(), VIEWPORT, &mut fb);
    renderer.draw_swap(&mut fb).unwrap();
    let diff = renderer.writer().len() - full;
    assert!(diff > 0);
    assert!(diff < full);
}
