//! Keyboard input handling

use game_core::ControlState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    Up,
    Down,
    Boost,
    Shield,
}

/// Map a `KeyboardEvent.key` value to a game key
pub fn key_from_str(key: &str) -> Option<InputKey> {
    match key {
        "ArrowUp" | "w" | "W" => Some(InputKey::Up),
        "ArrowDown" | "s" | "S" => Some(InputKey::Down),
        "b" | "B" | " " => Some(InputKey::Boost),
        "h" | "H" | "Shift" => Some(InputKey::Shield),
        _ => None,
    }
}

/// Update held flags. Shield is an action, not a held flag.
pub fn apply_key(controls: &mut ControlState, key: InputKey, pressed: bool) {
    match key {
        InputKey::Up => controls.up = pressed,
        InputKey::Down => controls.down = pressed,
        InputKey::Boost => controls.boost = pressed,
        InputKey::Shield => {}
    }
}
