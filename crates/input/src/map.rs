//! Key mapping from terminal events to engine input events.

use crate::types::{InputEvent, InputKey, KeyPhase};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map a key code to the engine key it drives.
pub fn map_key_code(code: KeyCode, modifiers: KeyModifiers) -> Option<InputKey> {
    if should_quit_code(code, modifiers) {
        return Some(InputKey::Quit);
    }
    match code {
        KeyCode::Left => Some(InputKey::MoveLeft),
        KeyCode::Right => Some(InputKey::MoveRight),
        KeyCode::Down => Some(InputKey::SoftDrop),

        KeyCode::Up | KeyCode::Char('x') | KeyCode::Char('X') => Some(InputKey::Rotate),

        KeyCode::Char(' ') => Some(InputKey::HardDrop),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(InputKey::PauseToggle),
        KeyCode::Enter => Some(InputKey::BeginOrRestart),

        _ => None,
    }
}

/// Map a terminal key event to an engine event.
///
/// Terminal auto-repeat is dropped: the engine runs its own DAS/ARR from
/// the press and release pair.
pub fn map_key_event(key: KeyEvent) -> Option<InputEvent> {
    let phase = match key.kind {
        KeyEventKind::Press => KeyPhase::Press,
        KeyEventKind::Release => KeyPhase::Release,
        KeyEventKind::Repeat => return None,
    };
    let key = map_key_code(key.code, key.modifiers)?;
    Some(InputEvent { key, phase })
}

fn should_quit_code(code: KeyCode, modifiers: KeyModifiers) -> bool {
    matches!(code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    should_quit_code(key.code, key.modifiers)
}

/// Parse a key name as written in replay scripts.
///
/// Named keys are case-insensitive (`left`, `Space`, `ENTER`); any other
/// single character is taken literally.
pub fn parse_key_code(name: &str) -> Option<KeyCode> {
    let code = match name.to_ascii_lowercase().as_str() {
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "space" => KeyCode::Char(' '),
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some(code)
}
