// SPDX-License-Identifier: GPL-3.0-only

//! Key-name tables for action tokens.
//!
//! An action token resolves to one of three things, checked in order:
//!
//! 1. **Soft actions** (`KEYBOARD`, `DRAWER`, `PASTE`, `SCROLL`): routed to
//!    host callbacks, never to the terminal
//! 2. **Named keys** (`ESC`, `UP`, `F5`, ...): sent as synthetic key presses
//! 3. **Anything else**: sent as literal Unicode code points

use std::fmt;

/// A key that can be sent to the terminal as a synthetic key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Space,
    Escape,
    Tab,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    /// Forward delete (`DEL`)
    ForwardDelete,
    /// Backspace (`BKSP`)
    Backspace,
    Up,
    Left,
    Right,
    Down,
    Enter,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
}

const KEY_NAMES: [(&str, KeyCode); 27] = [
    ("SPACE", KeyCode::Space),
    ("ESC", KeyCode::Escape),
    ("TAB", KeyCode::Tab),
    ("HOME", KeyCode::Home),
    ("END", KeyCode::End),
    ("PGUP", KeyCode::PageUp),
    ("PGDN", KeyCode::PageDown),
    ("INS", KeyCode::Insert),
    ("DEL", KeyCode::ForwardDelete),
    ("BKSP", KeyCode::Backspace),
    ("UP", KeyCode::Up),
    ("LEFT", KeyCode::Left),
    ("RIGHT", KeyCode::Right),
    ("DOWN", KeyCode::Down),
    ("ENTER", KeyCode::Enter),
    ("F1", KeyCode::F1),
    ("F2", KeyCode::F2),
    ("F3", KeyCode::F3),
    ("F4", KeyCode::F4),
    ("F5", KeyCode::F5),
    ("F6", KeyCode::F6),
    ("F7", KeyCode::F7),
    ("F8", KeyCode::F8),
    ("F9", KeyCode::F9),
    ("F10", KeyCode::F10),
    ("F11", KeyCode::F11),
    ("F12", KeyCode::F12),
];

impl KeyCode {
    /// Looks up a key by its token spelling. Matching is case-sensitive.
    pub fn from_token(token: &str) -> Option<Self> {
        KEY_NAMES
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, code)| *code)
    }

    /// The token spelling of the key.
    pub fn name(self) -> &'static str {
        KEY_NAMES
            .iter()
            .find(|(_, code)| *code == self)
            .map_or("", |(name, _)| *name)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Host-side actions that bypass the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoftAction {
    /// `KEYBOARD`: show or hide the soft keyboard
    ToggleKeyboard,
    /// `DRAWER`: open or close the session drawer
    ToggleDrawer,
    /// `PASTE`: paste the clipboard into the terminal
    Paste,
    /// `SCROLL`: toggle auto-scroll
    ToggleAutoScroll,
}

impl SoftAction {
    /// Looks up a soft action by its token spelling.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "KEYBOARD" => Some(Self::ToggleKeyboard),
            "DRAWER" => Some(Self::ToggleDrawer),
            "PASTE" => Some(Self::Paste),
            "SCROLL" => Some(Self::ToggleAutoScroll),
            _ => None,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Every table entry round-trips through its name
    #[test]
    fn test_key_names_round_trip() {
        for (name, code) in KEY_NAMES {
            assert_eq!(KeyCode::from_token(name), Some(code));
            assert_eq!(code.name(), name);
        }
    }

    /// DEL is forward delete, BKSP is backspace
    #[test]
    fn test_delete_keys() {
        assert_eq!(KeyCode::from_token("DEL"), Some(KeyCode::ForwardDelete));
        assert_eq!(KeyCode::from_token("BKSP"), Some(KeyCode::Backspace));
    }

    /// Unknown and differently-cased tokens are not keys
    #[test]
    fn test_unknown_tokens() {
        assert_eq!(KeyCode::from_token("esc"), None);
        assert_eq!(KeyCode::from_token("F13"), None);
        assert_eq!(KeyCode::from_token("-"), None);
        assert_eq!(KeyCode::from_token("KEYBOARD"), None);
    }

    /// Soft actions
    #[test]
    fn test_soft_actions() {
        assert_eq!(SoftAction::from_token("PASTE"), Some(SoftAction::Paste));
        assert_eq!(SoftAction::from_token("SCROLL"), Some(SoftAction::ToggleAutoScroll));
        assert_eq!(SoftAction::from_token("ESC"), None);
    }

    /// Display uses the token spelling
    #[test]
    fn test_display() {
        assert_eq!(KeyCode::PageDown.to_string(), "PGDN");
        assert_eq!(format!("{}", KeyCode::F12), "F12");
    }
}
