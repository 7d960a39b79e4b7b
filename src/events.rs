//! Event handling functions for user input and application state updates.

use color_eyre::eyre::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind};

use crate::{error::Endpoint, App};

/// Handles input events and advances the animation.
///
/// This function polls for keyboard events and dispatches them to [`handle_key`]. The poll timeout
/// never exceeds the time left until the next animation tick, so a slow typist does not stall the
/// running algorithm.
pub(crate) fn handle_events(app: &mut App) -> Result<()> {
    if event::poll(app.clock.poll_timeout())? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_key(app, key.code)?;
            }
        }
    }

    app.tick()
}

/// Applies a single key press to the application state.
///
/// This function maps vim-style and arrow keys to cursor movement, and the remaining bindings to
/// endpoint placement, solving, regeneration, skipping and quitting. Unbound keys are ignored.
pub(crate) fn handle_key(app: &mut App, code: KeyCode) -> Result<()> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.exit = true,
        KeyCode::Char('h') | KeyCode::Left => app.move_cursor(-1, 0),
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(0, 1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(0, -1),
        KeyCode::Char('l') | KeyCode::Right => app.move_cursor(1, 0),
        KeyCode::Char('s') => app.place(Endpoint::Start),
        KeyCode::Char('e') => app.place(Endpoint::End),
        KeyCode::Enter => app.begin_solving()?,
        KeyCode::Char(' ' | 'r') => app.regenerate()?,
        KeyCode::Char('f') => app.fast_forward()?,
        _ => {}
    }

    Ok(())
}
