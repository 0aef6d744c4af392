//! Terminal User Interface for lanes
//!
//! A keyboard-driven kanban board.
//! Features:
//! - Status and context views over one ordered task list
//! - Keyboard drag and drop with optimistic updates
//! - Task editor and column renaming
//! - Auto-refresh on database changes

pub mod app;
pub mod editor;
pub mod events;
pub mod msg; // TEA message types (what happened)
pub mod state; // Pure state transformations (functional core)
pub mod ui;
pub mod views;

use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use crossterm::{
    event::{poll, read, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use ratatui::prelude::*;

use crate::config::Config;
use crate::db::Database;
use app::App;
use events::handle_event;

/// Run the TUI application
pub fn run(db: Database, config: &Config) -> anyhow::Result<()> {
    // Load before touching the terminal so errors print normally
    let app = App::new(db, config)?;

    // Setup terminal
    enable_raw_mode().context("could not enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app, ensuring cleanup happens even on error
    let result = run_app_inner(&mut terminal, app);

    // Restore terminal - this MUST run even if app fails
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    result
}

fn run_app_inner<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> anyhow::Result<()> {
    // Setup file watcher for auto-refresh
    let (tx, rx) = mpsc::channel();
    let db_path_for_watcher = app.db_path().to_path_buf();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                if event.kind.is_modify() {
                    let _ = tx.send(());
                }
            }
        },
        notify::Config::default(),
    )?;

    // Watch the database file
    if let Err(e) = watcher.watch(&db_path_for_watcher, RecursiveMode::NonRecursive) {
        tracing::warn!("auto-refresh disabled: {}", e);
    }

    tracing::info!(db = %db_path_for_watcher.display(), "board opened");
    run_event_loop(terminal, &mut app, rx)
}

fn run_event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    file_change_rx: mpsc::Receiver<()>,
) -> anyhow::Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        // Draw the UI
        terminal.draw(|f| ui::draw(f, app))?;

        // Handle input with timeout
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if poll(timeout)? {
            // Resizes need nothing: the next draw picks them up
            if let Event::Key(key) = read()? {
                if handle_event(app, key) {
                    return Ok(()); // Quit signal
                }
            }
        }

        // Finished writes: re-fetch and confirm
        app.poll_gateway();

        // Check for file changes (non-blocking), coalescing bursts
        let mut changed = false;
        while file_change_rx.try_recv().is_ok() {
            changed = true;
        }
        if changed {
            app.on_file_changed();
        }

        // Tick for indicator timeouts
        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }
}
