//! Mentions CLI - terminal playground for the mention tracking engine

mod app;
mod io;
mod logging;
mod ui;

use std::io::stdout;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::{info, warn};

use mentions_core::TextBuffer;

use app::App;

fn main() -> Result<()> {
    logging::init();

    // Get file path from args
    let args: Vec<String> = std::env::args().collect();
    let file_path = args.get(1);

    let settings = match io::load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Falling back to default settings: {:#}", e);
            io::Settings::default()
        }
    };

    let text = match file_path {
        Some(path) => io::load_file(path)?,
        None => String::new(),
    };

    let mut app = App::new(settings, &text)?;
    app.filename = file_path.cloned();
    info!(file = ?app.filename, "starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = res {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|f| ui::draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            // Clear status on any key
            app.clear_status();

            if app.show_help {
                app.show_help = false;
            } else if app.picker_visible() && handle_picker_key(app, key) {
                // consumed by the picker
            } else {
                handle_edit_key(app, key);
            }
        }
    }
    Ok(())
}

/// Keys the picker takes over while a search is shown
fn handle_picker_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Down => app.picker_next(),
        KeyCode::Up => app.picker_prev(),
        KeyCode::Tab => app.select_candidate(),
        _ => return false,
    }
    true
}

fn handle_edit_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('c') if ctrl => app.running = false,
        KeyCode::Char('l') if ctrl => app.clear_mentions(),
        KeyCode::F(1) => app.show_help = true,

        KeyCode::Char(c) => app.type_char(c),
        KeyCode::Enter => app.enter(),
        KeyCode::Backspace => app.backspace(),

        // Navigation
        KeyCode::Left => app.move_caret(TextBuffer::move_left),
        KeyCode::Right => app.move_caret(TextBuffer::move_right),
        KeyCode::Up => app.move_caret(TextBuffer::move_up),
        KeyCode::Down => app.move_caret(TextBuffer::move_down),
        KeyCode::Home => app.move_caret(TextBuffer::move_to_line_start),
        KeyCode::End => app.move_caret(TextBuffer::move_to_line_end),

        _ => {}
    }
}
