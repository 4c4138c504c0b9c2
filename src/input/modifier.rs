// SPDX-License-Identifier: GPL-3.0-only

//! Special (modifier) button state.
//!
//! The special buttons CTRL, ALT, SHIFT and FN do not send anything when
//! tapped. A tap toggles them **active**, which applies the modifier to the
//! next key read from them. Holding one past the long-press timeout toggles
//! **lock**, which keeps it active across keys until tapped again.
//!
//! # Example
//!
//! ```rust,ignore
//! use extrakeys::input::{SpecialButton, SpecialButtons};
//!
//! let mut buttons = SpecialButtons::new(SpecialButton::ALL);
//! buttons.mark_created(SpecialButton::Ctrl);
//! buttons.tap(SpecialButton::Ctrl);
//!
//! assert_eq!(buttons.read(SpecialButton::Ctrl, true), Some(true));
//! assert_eq!(buttons.read(SpecialButton::Ctrl, true), Some(false));
//! ```

use crate::layout::ConfigError;
use std::fmt;
use std::str::FromStr;

/// A modifier button with active/locked toggle semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpecialButton {
    Ctrl,
    Alt,
    Shift,
    Fn,
}

impl SpecialButton {
    /// Every special button, in slot order.
    pub const ALL: [SpecialButton; 4] = [
        SpecialButton::Ctrl,
        SpecialButton::Alt,
        SpecialButton::Shift,
        SpecialButton::Fn,
    ];

    /// The matrix token spelling.
    pub fn key_name(self) -> &'static str {
        match self {
            SpecialButton::Ctrl => "CTRL",
            SpecialButton::Alt => "ALT",
            SpecialButton::Shift => "SHIFT",
            SpecialButton::Fn => "FN",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for SpecialButton {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|button| button.key_name() == s)
            .ok_or_else(|| ConfigError::unknown_special_button(s))
    }
}

impl fmt::Display for SpecialButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key_name())
    }
}

/// Runtime state of one special button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpecialButtonState {
    /// Applies to the next key read
    pub is_active: bool,
    /// Stays active across keys until cleared
    pub is_locked: bool,
    /// The button is present in the current matrix
    pub is_created: bool,
}

impl SpecialButtonState {
    /// Tap semantics: toggle active; clearing active clears the lock too.
    pub fn toggle_active(&mut self) {
        self.is_active = !self.is_active;
        if !self.is_active {
            self.is_locked = false;
        }
    }

    /// Long-press semantics: enter lock from inactive, leave it from active.
    pub fn toggle_lock(&mut self) {
        self.is_locked = !self.is_active;
        self.is_active = !self.is_active;
    }
}

/// Fixed-size table of special-button states indexed by [`SpecialButton`].
///
/// A `None` slot means the button is not treated as special at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialButtons {
    slots: [Option<SpecialButtonState>; 4],
}

impl SpecialButtons {
    /// Registers `buttons` with fresh state.
    pub fn new(buttons: impl IntoIterator<Item = SpecialButton>) -> Self {
        let mut slots = [None; 4];
        for button in buttons {
            slots[button.index()] = Some(SpecialButtonState::default());
        }
        Self { slots }
    }

    /// Returns true if `button` is registered.
    #[must_use]
    pub fn is_registered(&self, button: SpecialButton) -> bool {
        self.slots[button.index()].is_some()
    }

    /// Registered buttons, in slot order.
    pub fn registered(&self) -> impl Iterator<Item = SpecialButton> + '_ {
        SpecialButton::ALL
            .into_iter()
            .filter(|button| self.is_registered(*button))
    }

    /// Resolves a token to a registered special button.
    pub fn lookup(&self, token: &str) -> Option<SpecialButton> {
        token
            .parse::<SpecialButton>()
            .ok()
            .filter(|button| self.is_registered(*button))
    }

    /// The state of `button`, if registered.
    pub fn get(&self, button: SpecialButton) -> Option<&SpecialButtonState> {
        self.slots[button.index()].as_ref()
    }

    /// Mutable state of `button`, if registered.
    pub fn get_mut(&mut self, button: SpecialButton) -> Option<&mut SpecialButtonState> {
        self.slots[button.index()].as_mut()
    }

    /// Marks `button` as present in the matrix. Unregistered buttons are ignored.
    pub fn mark_created(&mut self, button: SpecialButton) {
        if let Some(state) = self.get_mut(button) {
            state.is_created = true;
        }
    }

    /// Resets every registered slot to all-false.
    pub fn reset(&mut self) {
        for state in self.slots.iter_mut().flatten() {
            *state = SpecialButtonState::default();
        }
    }

    /// Applies a tap. Returns false if `button` is not registered.
    pub fn tap(&mut self, button: SpecialButton) -> bool {
        match self.get_mut(button) {
            Some(state) => {
                state.toggle_active();
                true
            }
            None => false,
        }
    }

    /// Reads whether `button` is asserted.
    ///
    /// Returns `None` if the button is not registered or not present in the
    /// current matrix. When `auto_clear` is set and the button is not locked,
    /// reading consumes the active flag.
    pub fn read(&mut self, button: SpecialButton, auto_clear: bool) -> Option<bool> {
        let state = self.get_mut(button)?;
        if !state.is_created {
            return None;
        }
        if !state.is_active {
            return Some(false);
        }
        if auto_clear && !state.is_locked {
            state.is_active = false;
        }
        Some(true)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
