//! Studio application
//!
//! Owns the terminal and the only mutable handle to `AppState`. Events from
//! the keyboard, the tick clock and finished tasks are fed through the
//! reducer one at a time.

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use super::events::{SideEffect, StudioEvent};
use super::executor::Executor;
use super::reducer::{reduce, startup};
use super::render::render;
use super::state::AppState;
use crate::config::Config;
use crate::git::{GitRepo, RetryPolicy, SnapshotLoader};
use crate::log_info;

/// How long to wait for input before checking task results again
const POLL_INTERVAL: Duration = Duration::from_millis(50);

// ═══════════════════════════════════════════════════════════════════════════════
// Studio App
// ═══════════════════════════════════════════════════════════════════════════════

pub struct StudioApp {
    state: AppState,
    executor: Executor,
    result_rx: mpsc::UnboundedReceiver<StudioEvent>,
    tick_interval: Duration,
    dirty: bool,
}

impl StudioApp {
    pub fn new(repo: &GitRepo, config: &Config) -> Self {
        let (tx, result_rx) = mpsc::unbounded_channel();
        let loader = SnapshotLoader::new(repo.runner(RetryPolicy::from(&config.retry)));

        Self {
            state: AppState::new(config),
            executor: Executor::new(loader, tx),
            result_rx,
            tick_interval: Duration::from_millis(config.ui.tick_ms.max(1)),
            dirty: true,
        }
    }

    /// Replace the state with the reducer's output and launch its effects
    fn dispatch(&mut self, event: StudioEvent) {
        let state = std::mem::take(&mut self.state);
        let (next, effects) = reduce(state, event);
        self.apply(next, effects);
    }

    fn apply(&mut self, next: AppState, effects: Vec<SideEffect>) {
        self.state = next;
        self.dirty = true;
        for effect in effects {
            self.executor.spawn(effect);
        }
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let state = std::mem::take(&mut self.state);
        let (next, effects) = startup(state);
        self.apply(next, effects);

        let mut last_tick = Instant::now();

        while !self.state.should_quit {
            self.drain_results();

            if self.dirty {
                terminal.draw(|frame| render(frame, &self.state))?;
                self.dirty = false;
            }

            if event::poll(POLL_INTERVAL)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.dispatch(StudioEvent::Key(key));
            }

            if last_tick.elapsed() >= self.tick_interval {
                last_tick = Instant::now();
                let was_dirty = self.dirty;
                let before = (self.state.message.clone(), self.state.spinner_frame);
                self.dispatch(StudioEvent::Tick(last_tick));
                let changed = before != (self.state.message.clone(), self.state.spinner_frame);
                self.dirty = was_dirty || changed;
            }
        }

        log_info!("Leaving studio");
        Ok(())
    }

    /// Feed every finished task's event through the reducer
    fn drain_results(&mut self) {
        while let Ok(event) = self.result_rx.try_recv() {
            self.dispatch(event);
        }
    }
}

/// Open the studio on `repo`; must be called from inside a tokio runtime
pub fn run_studio(repo: &GitRepo, config: &Config) -> Result<()> {
    log_info!("Opening studio in {}", repo.repo_path().display());
    StudioApp::new(repo, config).run()
}
