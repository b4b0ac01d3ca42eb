pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, ThemeColors};

use app::{InputMode, View};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

use crate::leads::Status;

const TICK_RATE_MS: u64 = 250;

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();
    let mut events = EventHandler::new(TICK_RATE_MS);

    let result = loop {
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(e.into());
        }

        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => app.update_flash(),
        }

        if app.should_quit {
            break Ok(());
        }
    };

    ratatui::restore();

    // Flush buffered stderr messages now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    result
}

/// Digit keys 1-6 pick a pipeline stage directly
fn status_for_digit(c: char) -> Option<Status> {
    let n = c.to_digit(10)? as usize;
    Status::ALL.get(n.checked_sub(1)?).cloned()
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, key),
        InputMode::Search => match key.code {
            KeyCode::Enter => app.finish_search(),
            KeyCode::Esc => app.cancel_search(),
            KeyCode::Backspace => app.pop_search_char(),
            KeyCode::Down => app.next_row(),
            KeyCode::Up => app.previous_row(),
            KeyCode::Char(c) => app.push_search_char(c),
            _ => {}
        },
        InputMode::Notes => match key.code {
            KeyCode::Enter => app.confirm_notes_input(),
            KeyCode::Esc => app.cancel_input(),
            KeyCode::Backspace => {
                app.notes_input.pop();
            }
            KeyCode::Char(c) => app.notes_input.push(c),
            // Ignore all other keys (don't propagate to Normal mode)
            _ => {}
        },
        InputMode::StatusPicker => match key.code {
            KeyCode::Char('j') | KeyCode::Down => app.status_picker_next(),
            KeyCode::Char('k') | KeyCode::Up => app.status_picker_previous(),
            KeyCode::Enter => app.confirm_status_picker(),
            KeyCode::Esc | KeyCode::Char('q') => app.cancel_input(),
            KeyCode::Char(c) => {
                if let Some(status) = status_for_digit(c) {
                    app.dismiss_overlay();
                    app.set_selected_status(status);
                }
            }
            _ => {}
        },
        InputMode::Details => match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => app.dismiss_overlay(),
            KeyCode::Char('b') => app.show_score_breakdown(),
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
            _ => {}
        },
        InputMode::ScoreBreakdown => match key.code {
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('q') => app.dismiss_overlay(),
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
            _ => {}
        },
        InputMode::Help => {
            // Any key exits help
            app.dismiss_overlay();
        }
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Tab => app.toggle_view(),
        KeyCode::Char('?') => app.show_help(),
        KeyCode::Char('r') => app.reload_from_disk(),
        KeyCode::Char('z') => app.undo_last(),
        _ if app.current_view == View::Leads => handle_leads_key(app, key),
        _ => {}
    }
}

fn handle_leads_key(app: &mut App, key: KeyEvent) {
    match key.code {
        // Navigation
        KeyCode::Char('j') | KeyCode::Down => app.next_row(),
        KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

        // Query
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Char('f') => app.cycle_status_filter(),
        KeyCode::Char('p') => app.cycle_priority_filter(),
        KeyCode::Char('c') => app.clear_filters(),
        KeyCode::Esc if app.query.is_filtered() => app.clear_filters(),

        // Edits
        KeyCode::Char('s') => app.start_status_picker(),
        KeyCode::Char('n') => app.start_notes_input(),
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if let Some(status) = status_for_digit(c) {
                app.set_selected_status(status);
            }
        }

        // Overlays
        KeyCode::Enter => app.show_details(),
        KeyCode::Char('b') => app.show_score_breakdown(),

        _ => {}
    }
}
