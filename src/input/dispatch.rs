// SPDX-License-Identifier: GPL-3.0-only

//! Key dispatch: macro interpretation and routing to a [`KeySink`].
//!
//! A macro is read left to right. Special-button tokens (`CTRL`, `ALT`,
//! `SHIFT`, `FN`) set a modifier flag; every other token is an action that is
//! dispatched with the flags collected so far, after which the flags reset.
//! Modifiers therefore apply only to the action immediately following them:
//!
//! ```text
//! "CTRL ALT DEL"  ->  DEL   (ctrl, alt)
//! "CTRL c ESC"    ->  c     (ctrl)
//!                     ESC   ()
//! ```
//!
//! A plain key is dispatched as a single action with no modifiers, even when
//! its token spells a special button.

use crate::input::keycode::{KeyCode, SoftAction};
use crate::input::modifier::SpecialButton;
use crate::input::sink::KeySink;
use crate::layout::ButtonSpec;

/// Modifier flags carried by a [`DispatchEvent`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub fn_key: bool,
}

impl Modifiers {
    /// Sets the flag for `button`.
    pub fn set(&mut self, button: SpecialButton) {
        match button {
            SpecialButton::Ctrl => self.ctrl = true,
            SpecialButton::Alt => self.alt = true,
            SpecialButton::Shift => self.shift = true,
            SpecialButton::Fn => self.fn_key = true,
        }
    }

    /// Returns true if no flag is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// What an action token does once dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchAction {
    /// Routed to a host callback
    Soft(SoftAction),
    /// Synthetic key press
    Key(KeyCode),
    /// Literal input
    CodePoints(Vec<char>),
}

impl DispatchAction {
    /// Classifies an action token.
    pub fn from_token(token: &str) -> Self {
        if let Some(action) = SoftAction::from_token(token) {
            Self::Soft(action)
        } else if let Some(code) = KeyCode::from_token(token) {
            Self::Key(code)
        } else {
            Self::CodePoints(token.chars().collect())
        }
    }
}

/// One resolved action with the modifiers that apply to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchEvent {
    pub token: String,
    pub modifiers: Modifiers,
}

impl DispatchEvent {
    /// Creates an event.
    pub fn new(token: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            token: token.into(),
            modifiers,
        }
    }

    /// Classifies the event's token.
    pub fn action(&self) -> DispatchAction {
        DispatchAction::from_token(&self.token)
    }
}

/// Resolves a button into the ordered events it dispatches.
pub fn resolve(spec: &ButtonSpec) -> Vec<DispatchEvent> {
    if spec.is_macro() {
        resolve_macro(spec.tokens())
    } else {
        vec![DispatchEvent::new(spec.token(), Modifiers::default())]
    }
}

/// Resolves a macro token sequence. Trailing modifiers produce nothing.
pub fn resolve_macro<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Vec<DispatchEvent> {
    let mut events = Vec::new();
    let mut modifiers = Modifiers::default();

    for token in tokens {
        match token.parse::<SpecialButton>() {
            Ok(button) => modifiers.set(button),
            Err(_) => {
                events.push(DispatchEvent::new(token, modifiers));
                modifiers = Modifiers::default();
            }
        }
    }

    events
}

/// Sends `events` to `sink` in order.
pub fn dispatch(events: &[DispatchEvent], sink: &mut dyn KeySink) {
    for event in events {
        let Modifiers {
            ctrl,
            alt,
            shift,
            fn_key,
        } = event.modifiers;

        match event.action() {
            DispatchAction::Soft(SoftAction::ToggleKeyboard) => sink.on_toggle_keyboard(),
            DispatchAction::Soft(SoftAction::ToggleDrawer) => sink.on_toggle_drawer(),
            DispatchAction::Soft(SoftAction::Paste) => sink.on_paste_from_clipboard(),
            DispatchAction::Soft(SoftAction::ToggleAutoScroll) => sink.on_toggle_auto_scroll(),
            DispatchAction::Key(code) => sink.send_key(code, ctrl, alt, shift, fn_key),
            // Shift and fn have no meaning for literal input and are dropped
            DispatchAction::CodePoints(points) => sink.send_code_points(&points, ctrl, alt),
        }
    }
}

/// Resolves `spec` and sends the result to `sink`.
pub fn dispatch_spec(spec: &ButtonSpec, sink: &mut dyn KeySink) {
    let events = resolve(spec);
    tracing::debug!("Dispatching '{}' as {} event(s)", spec.token(), events.len());
    dispatch(&events, sink);
}

// ============================================================================
// Unit Tests
// ============================================================================
