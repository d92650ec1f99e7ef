//! Key mapping from terminal events to engine controls.

use crate::types::{Control, InputEvent};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map a key to the control it drives.
pub fn map_key(code: KeyCode) -> Option<Control> {
    match code {
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(Control::Left)
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(Control::Right)
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(Control::SoftDrop)
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(Control::Rotate)
        }
        KeyCode::Char(' ') => Some(Control::HardDrop),
        _ => None,
    }
}

/// Translate a terminal key event into a press or release.
///
/// Auto-repeat events count as presses; the engine ignores a press for a
/// control it already considers held.
pub fn to_input_event(key: KeyEvent) -> Option<InputEvent> {
    let control = map_key(key.code)?;
    match key.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => Some(InputEvent::Press(control)),
        KeyEventKind::Release => Some(InputEvent::Release(control)),
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
