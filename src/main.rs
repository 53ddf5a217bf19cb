//! Terminal 2048 runner (default binary).
//!
//! Keyboard play through crossterm and a framebuffer renderer. Unless disabled,
//! the control adapter runs alongside so external agents can drive the same game.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};
use log::{error, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use tui_2048::adapter::{Adapter, GameBridge, OutboundMessage};
use tui_2048::core::{Game, RandomSource};
use tui_2048::input::{action_for, should_quit};
use tui_2048::term::{
    AdapterStatusView, FrameBuffer, GameView, TerminalRenderer, ToastQueue, Viewport,
};
use tui_2048::types::{TurnEvent, TICK_MS};

#[derive(Debug, Parser)]
#[command(name = "tui-2048", version, about = "Play 2048 in the terminal")]
struct Args {
    /// Seed for tile spawns; omit for a random game
    #[arg(long, env = "TUI2048_SEED")]
    seed: Option<u32>,

    /// Do not start the TCP control adapter
    #[arg(long)]
    no_ai: bool,

    /// Directory for the log file (defaults to the system temp directory)
    #[arg(long, env = "TUI2048_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Log level spec, e.g. "debug" or "info,tui_2048_adapter=debug"
    #[arg(long, env = "TUI2048_LOG", default_value = "info")]
    log: String,
}

fn init_logging(args: &Args) -> Result<LoggerHandle> {
    let dir = args.log_dir.clone().unwrap_or_else(std::env::temp_dir);
    let handle = Logger::try_with_str(&args.log)?
        .log_to_file(FileSpec::default().directory(dir).basename("tui-2048"))
        .format(flexi_logger::detailed_format)
        .rotate(
            Criterion::Size(5 * 1024 * 1024),
            Naming::Numbers,
            Cleanup::KeepLogFiles(3),
        )
        .start()?;
    Ok(handle)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _logger = init_logging(&args)?;

    let adapter = if args.no_ai {
        None
    } else {
        match Adapter::start_from_env() {
            Ok(adapter) => adapter,
            Err(e) => {
                warn!("control adapter unavailable: {:#}", e);
                None
            }
        }
    };
    if let Some(a) = adapter.as_ref() {
        info!("control adapter on {}", a.local_addr());
    }

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = match args.seed {
        Some(seed) => {
            info!("starting with seed {}", seed);
            App::new(Game::new(seed), adapter).run(&mut term)
        }
        None => App::new(Game::with_rng(SmallRng::from_entropy()), adapter).run(&mut term),
    };

    // Always try to restore terminal state.
    if let Err(e) = term.exit() {
        error!("failed to restore terminal: {:#}", e);
    }
    if let Err(e) = result.as_ref() {
        error!("exiting with error: {:#}", e);
    }
    result
}

struct App<R: RandomSource> {
    game: Game<R>,
    adapter: Option<Adapter>,
    bridge: GameBridge,
    toasts: ToastQueue,
    view: GameView,
    fb: FrameBuffer,
}

impl<R: RandomSource> App<R> {
    fn new(game: Game<R>, adapter: Option<Adapter>) -> Self {
        Self {
            game,
            adapter,
            bridge: GameBridge::new(),
            toasts: ToastQueue::default(),
            view: GameView::default(),
            fb: FrameBuffer::new(0, 0),
        }
    }

    fn run(mut self, term: &mut TerminalRenderer) -> Result<()> {
        let tick = Duration::from_millis(TICK_MS as u64);
        let mut last_tick = Instant::now();

        loop {
            self.drain_adapter();
            self.render(term)?;

            let timeout = tick.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) => {
                        if should_quit(key) {
                            info!("quit requested");
                            return Ok(());
                        }
                        let playable = !self.game.game_over();
                        if let Some(action) = action_for(key, playable) {
                            if self.game.apply_action(action) {
                                let event = self.game.take_last_event();
                                self.on_state_change(event);
                            }
                        }
                    }
                    Event::Resize(..) => term.invalidate(),
                    _ => {}
                }
            }

            let elapsed = last_tick.elapsed();
            if elapsed >= tick {
                self.toasts.tick(elapsed.as_millis() as u32);
                last_tick = Instant::now();
            }
        }
    }

    /// Apply everything the adapter has queued, one command at a time.
    fn drain_adapter(&mut self) {
        let Some(adapter) = self.adapter.as_mut() else {
            return;
        };
        while let Some(cmd) = adapter.try_recv() {
            let outcome = self.bridge.apply(&mut self.game, cmd, |m| adapter.send(m));
            if outcome.restarted {
                self.toasts.clear();
            }
            for ev in &outcome.events {
                self.toasts.observe(ev);
            }
        }
    }

    /// Local input changed the game: update toasts and tell observers.
    fn on_state_change(&mut self, event: Option<TurnEvent>) {
        match event.as_ref() {
            Some(ev) => self.toasts.observe(ev),
            None => self.toasts.clear(),
        }
        if let Some(adapter) = self.adapter.as_ref() {
            let obs = self.bridge.observe(&self.game, event.as_ref());
            adapter.send(OutboundMessage::BroadcastObservation { obs });
        }
    }

    fn render(&mut self, term: &mut TerminalRenderer) -> Result<()> {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let snap = self.game.snapshot();
        let status = self.adapter.as_ref().map(|a| {
            let st = a.status();
            AdapterStatusView {
                client_count: u16::try_from(st.client_count).unwrap_or(u16::MAX),
                controller_id: st.controller_id,
            }
        });
        self.view.render_into_with(
            &snap,
            self.toasts.current(),
            status.as_ref(),
            Viewport::new(w, h),
            &mut self.fb,
        );
        term.draw_swap(&mut self.fb)
    }
}
