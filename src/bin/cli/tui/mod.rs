mod app_state;
mod author_widget;
mod key_handler;
mod learn_widget;
mod library_widget;
mod status_bar;
mod ui;

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;

use crate::app::App;
use app_state::TuiState;

/// Upper bound on how long one loop iteration may block on input
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn run(data_dir: Option<&Path>) -> Result<()> {
    let app = App::new(data_dir)?;
    let mut state = TuiState::new(app);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Event loop
    let result = run_loop(&mut terminal, &mut state);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop<B: Backend>(terminal: &mut Terminal<B>, state: &mut TuiState) -> Result<()> {
    loop {
        // Route cross-view events queued by the previous iteration
        state.dispatch_events();

        terminal.draw(|f| ui::draw(f, state))?;

        if state.quit {
            return Ok(());
        }

        // Block until input arrives or the next pending timer is due
        let timeout = state.timers.poll_timeout(POLL_INTERVAL);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    key_handler::handle_key(state, key);
                }
            }
        }

        state.fire_timers();
    }
}
