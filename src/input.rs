//! Keyboard mapping for the terminal host.
//!
//! Translates crossterm key events into `RunnerInput`. Only presses count;
//! key repeat and release events (reported by some terminals) are dropped.

use crate::runner::RunnerInput;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// Map a key event, or `None` for events that are not presses.
pub fn map_key(key: KeyEvent) -> Option<RunnerInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    Some(match key.code {
        KeyCode::Char(' ') | KeyCode::Up => RunnerInput::Jump,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => RunnerInput::Quit,
        _ => RunnerInput::Other,
    })
}
