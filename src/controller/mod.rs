// SPDX-License-Identifier: GPL-3.0-only

//! Interaction controller for the extra-keys row.
//!
//! The controller turns touch events on a [`ButtonMatrix`] into calls on a
//! [`KeySink`]. It owns the special-button states, the single long-press
//! timer and the touch state machine:
//!
//! ```text
//! Idle --down--> Pressed --timeout--> Repeating --up/cancel--> Idle
//!                   |
//!                   +--swipe up (popup only)--> PopupRevealed --up--> Idle
//! ```
//!
//! # Gestures
//!
//! - **Tap**: dispatches the button, or toggles a special button's active state
//! - **Hold** a repeatable key (`UP`, `BKSP`, ...): auto-repeat after the
//!   long-press timeout, then every repeat delay
//! - **Hold** a special button: toggles its lock after the long-press timeout
//! - **Swipe up** on a button with a popup: reveals the popup; releasing
//!   dispatches the popup instead of the button
//!
//! # Threading
//!
//! Touch events are handled on the caller's thread. Timer firings run as a
//! tokio task on the runtime handle given at construction. Shared state is
//! locked sink first, then special-button state; the sink is never called
//! with the state lock held, so a sink may read modifiers through a
//! [`SpecialButtonsHandle`].

mod timer;

pub use timer::Timing;

use crate::app_settings::{
    DEFAULT_LONG_PRESS_TIMEOUT_MS, DEFAULT_REPEAT_DELAY_MS, DEFAULT_REPEATABLE_KEYS,
};
use crate::input::{
    HapticKind, KeySink, SpecialButton, SpecialButtonState, SpecialButtons, dispatch_spec,
    resolve,
};
use crate::layout::{ButtonId, ButtonMatrix, ButtonSpec, ConfigError, DisplayMap, load_layout};
use crate::settings::Settings;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use timer::{Shared, SharedSink, TimerHandle, lock};
use tokio::runtime::Handle;

// ============================================================================
// Touch Types
// ============================================================================

/// Phase of a touch event on one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// Touch position relative to the button's top-left corner.
///
/// A negative `y` is above the button.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TouchPosition {
    pub x: f32,
    pub y: f32,
}

impl TouchPosition {
    /// Creates a position.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Observable state of the touch state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchState {
    /// No button is held
    Idle,
    /// A button is held and its timer has not fired
    Pressed,
    /// The held press has fired at least once (auto-repeat or lock toggle)
    Repeating,
    /// The held button's popup is shown
    PopupRevealed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Touch {
    Idle,
    Pressed { button: ButtonId, popup_shown: bool },
}

// ============================================================================
// Options
// ============================================================================

/// Construction options for [`ExtraKeysController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Long-press timeout; values outside 200..=3000 fall back to 400
    pub long_press_timeout_ms: u64,
    /// Auto-repeat delay; values outside 5..=2000 fall back to 80
    pub repeat_delay_ms: u64,
    /// Tokens that auto-repeat while held
    pub repeatable_keys: HashSet<String>,
    /// Buttons treated as special
    pub special_buttons: Vec<SpecialButton>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            long_press_timeout_ms: DEFAULT_LONG_PRESS_TIMEOUT_MS,
            repeat_delay_ms: DEFAULT_REPEAT_DELAY_MS,
            repeatable_keys: DEFAULT_REPEATABLE_KEYS.iter().map(|k| k.to_string()).collect(),
            special_buttons: SpecialButton::ALL.to_vec(),
        }
    }
}

// ============================================================================
// Special Buttons Handle
// ============================================================================

/// Cloneable read access to the controller's special buttons.
///
/// Intended for the terminal side, which asks "is CTRL asserted?" when a
/// physical or soft-keyboard key arrives.
#[derive(Debug, Clone)]
pub struct SpecialButtonsHandle {
    shared: Arc<Mutex<Shared>>,
}

impl SpecialButtonsHandle {
    /// See [`ExtraKeysController::read_special_button`].
    pub fn read(&self, button: SpecialButton, auto_clear: bool) -> Option<bool> {
        lock(&self.shared).specials.read(button, auto_clear)
    }

    /// Snapshot of `button`'s state, if registered.
    pub fn state(&self, button: SpecialButton) -> Option<SpecialButtonState> {
        lock(&self.shared).specials.get(button).copied()
    }
}

// ============================================================================
// Controller
// ============================================================================

/// Touch state machine and key dispatcher for one on-screen extra-keys row.
pub struct ExtraKeysController {
    matrix: Arc<ButtonMatrix>,
    container_height: f32,
    timing: Timing,
    repeatable_keys: HashSet<String>,
    shared: Arc<Mutex<Shared>>,
    sink: SharedSink,
    touch: Touch,
    timer: TimerHandle,
    runtime: Handle,
}

impl ExtraKeysController {
    /// Creates a controller for `matrix`.
    ///
    /// Timer tasks are spawned on `runtime`.
    pub fn new(
        matrix: impl Into<Arc<ButtonMatrix>>,
        options: ControllerOptions,
        sink: Box<dyn KeySink>,
        runtime: Handle,
    ) -> Self {
        let matrix = matrix.into();
        let mut specials = SpecialButtons::new(options.special_buttons);
        mark_created(&mut specials, &matrix);

        Self {
            matrix,
            container_height: 0.0,
            timing: Timing::new(options.long_press_timeout_ms, options.repeat_delay_ms),
            repeatable_keys: options.repeatable_keys,
            shared: Arc::new(Mutex::new(Shared::new(specials))),
            sink: Arc::new(Mutex::new(sink)),
            touch: Touch::Idle,
            timer: TimerHandle::default(),
            runtime,
        }
    }

    /// Creates a controller from user settings.
    ///
    /// A malformed configured layout is replaced by the built-in default.
    /// Every recoverable problem is logged and reported to the sink's
    /// `on_diagnostic`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the built-in default layout fails to parse.
    pub fn from_settings(
        settings: &Settings,
        sink: Box<dyn KeySink>,
        runtime: Handle,
    ) -> Result<Self, ConfigError> {
        let (options, mut diagnostics) = settings.controller_options();
        let loaded = load_layout(
            &settings.extra_keys,
            &settings.extra_keys_style,
            DisplayMap::aliases(),
        )?;
        diagnostics.extend(loaded.diagnostics);

        let controller = Self::new(loaded.matrix, options, sink, runtime);
        for diagnostic in &diagnostics {
            controller.report(diagnostic);
        }
        Ok(controller)
    }

    /// Replaces the matrix and resets every special-button state.
    ///
    /// `container_height` is the height available to the whole row, used by
    /// [`row_height`](Self::row_height).
    pub fn reload(&mut self, matrix: impl Into<Arc<ButtonMatrix>>, container_height: f32) {
        self.timer.cancel(&self.shared);
        self.touch = Touch::Idle;
        self.matrix = matrix.into();
        self.container_height = container_height;

        let mut state = lock(&self.shared);
        state.repeat_count = 0;
        state.specials.reset();
        mark_created(&mut state.specials, &self.matrix);

        tracing::debug!(
            "Reloaded extra keys: {} row(s), {} column(s)",
            self.matrix.row_count(),
            self.matrix.column_count()
        );
    }

    /// Feeds one touch event. Out-of-order events are ignored.
    pub fn on_touch_event(&mut self, button: ButtonId, phase: TouchPhase, position: TouchPosition) {
        match phase {
            TouchPhase::Down => self.on_down(button),
            TouchPhase::Move => self.on_move(button, position),
            TouchPhase::Up => self.on_up(button),
            TouchPhase::Cancel => self.on_cancel(),
        }
    }

    /// Reads whether `button` is asserted.
    ///
    /// Returns `None` if the button is not special or not in the current
    /// matrix. With `auto_clear`, a non-locked active button is consumed.
    pub fn read_special_button(&self, button: SpecialButton, auto_clear: bool) -> Option<bool> {
        lock(&self.shared).specials.read(button, auto_clear)
    }

    /// Snapshot of `button`'s state, if registered.
    pub fn special_button_state(&self, button: SpecialButton) -> Option<SpecialButtonState> {
        lock(&self.shared).specials.get(button).copied()
    }

    /// Read access to the special buttons for use outside the controller.
    pub fn special_buttons(&self) -> SpecialButtonsHandle {
        SpecialButtonsHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Re-registers the special buttons with fresh state.
    pub fn set_special_buttons(&mut self, buttons: impl IntoIterator<Item = SpecialButton>) {
        let mut specials = SpecialButtons::new(buttons);
        mark_created(&mut specials, &self.matrix);
        lock(&self.shared).specials = specials;
    }

    /// Tokens that auto-repeat while held.
    pub fn repeatable_keys(&self) -> &HashSet<String> {
        &self.repeatable_keys
    }

    /// Replaces the auto-repeat token set. Takes effect on the next press.
    pub fn set_repeatable_keys<S: Into<String>>(&mut self, keys: impl IntoIterator<Item = S>) {
        self.repeatable_keys = keys.into_iter().map(Into::into).collect();
    }

    /// The current matrix.
    pub fn matrix(&self) -> &Arc<ButtonMatrix> {
        &self.matrix
    }

    /// Column count of the rendering grid.
    pub fn column_count(&self) -> usize {
        self.matrix.column_count()
    }

    /// Height of one row, or 0 for an empty matrix.
    pub fn row_height(&self) -> f32 {
        match self.matrix.row_count() {
            0 => 0.0,
            rows => self.container_height / rows as f32,
        }
    }

    /// Clamped long-press timeout.
    pub fn long_press_timeout(&self) -> Duration {
        self.timing.long_press_timeout()
    }

    /// Clamped repeat delay.
    pub fn repeat_delay(&self) -> Duration {
        self.timing.repeat_delay()
    }

    /// Number of timer firings during the current (or last) press.
    pub fn repeat_count(&self) -> u32 {
        lock(&self.shared).repeat_count
    }

    /// Returns true while the held button's popup is shown.
    pub fn popup_shown(&self) -> bool {
        matches!(
            self.touch,
            Touch::Pressed {
                popup_shown: true,
                ..
            }
        )
    }

    /// Current touch state.
    pub fn touch_state(&self) -> TouchState {
        match self.touch {
            Touch::Idle => TouchState::Idle,
            Touch::Pressed {
                popup_shown: true, ..
            } => TouchState::PopupRevealed,
            Touch::Pressed { .. } if self.repeat_count() > 0 => TouchState::Repeating,
            Touch::Pressed { .. } => TouchState::Pressed,
        }
    }

    // ------------------------------------------------------------------------
    // Gesture handling
    // ------------------------------------------------------------------------

    fn on_down(&mut self, button: ButtonId) {
        self.timer.cancel(&self.shared);
        self.touch = Touch::Idle;

        let matrix = Arc::clone(&self.matrix);
        let Some(spec) = matrix.get(button) else {
            tracing::debug!("Touch down on unknown button {}", button);
            return;
        };

        lock(&self.shared).repeat_count = 0;
        self.touch = Touch::Pressed {
            button,
            popup_shown: false,
        };

        if self.repeatable_keys.contains(spec.token()) {
            self.timer.start_repeat(
                &self.runtime,
                &self.shared,
                &self.sink,
                resolve(spec),
                self.timing,
            );
        } else if let Some(special) = self.lookup_special(spec) {
            self.timer.start_lock(
                &self.runtime,
                &self.shared,
                &self.sink,
                special,
                self.timing.long_press_timeout(),
            );
        }
    }

    fn on_move(&mut self, button: ButtonId, position: TouchPosition) {
        let Touch::Pressed {
            button: pressed,
            popup_shown,
        } = self.touch
        else {
            return;
        };
        if pressed != button {
            return;
        }
        let has_popup = self
            .matrix
            .get(button)
            .is_some_and(|spec| spec.popup().is_some());
        if !has_popup {
            return;
        }

        if !popup_shown && position.y < 0.0 {
            self.timer.cancel(&self.shared);
            self.touch = Touch::Pressed {
                button,
                popup_shown: true,
            };
            tracing::debug!("Popup revealed on {}", button);
        } else if popup_shown && position.y > 0.0 {
            self.touch = Touch::Pressed {
                button,
                popup_shown: false,
            };
            tracing::debug!("Popup dismissed on {}", button);
        }
    }

    fn on_up(&mut self, button: ButtonId) {
        self.timer.cancel(&self.shared);
        let touch = std::mem::replace(&mut self.touch, Touch::Idle);

        let Touch::Pressed {
            button: pressed,
            popup_shown,
        } = touch
        else {
            return;
        };
        if pressed != button {
            tracing::debug!("Touch up on {} while {} was pressed", button, pressed);
            return;
        }

        let matrix = Arc::clone(&self.matrix);
        let Some(spec) = matrix.get(button) else {
            return;
        };

        if popup_shown {
            if let Some(popup) = spec.popup() {
                self.tap(popup);
            }
        } else if self.repeat_count() == 0 {
            self.haptic();
            self.tap(spec);
        }
    }

    fn on_cancel(&mut self) {
        self.timer.cancel(&self.shared);
        self.touch = Touch::Idle;
    }

    /// Single-tap semantics shared by normal releases and popups.
    fn tap(&self, spec: &ButtonSpec) {
        if let Some(button) = self.lookup_special(spec) {
            let mut state = lock(&self.shared);
            if state.repeat_count > 0 {
                return;
            }
            state.specials.tap(button);
            if let Some(slot) = state.specials.get(button) {
                tracing::debug!("{} tapped: active={}", button, slot.is_active);
            }
            return;
        }

        let mut sink = lock(&self.sink);
        dispatch_spec(spec, &mut **sink);
    }

    fn lookup_special(&self, spec: &ButtonSpec) -> Option<SpecialButton> {
        lock(&self.shared).specials.lookup(spec.token())
    }

    fn haptic(&self) {
        if !lock(&self.sink).on_haptic_feedback(HapticKind::KeyboardTap) {
            tracing::trace!("Haptic feedback declined");
        }
    }

    fn report(&self, error: &ConfigError) {
        tracing::warn!("{}", error);
        lock(&self.sink).on_diagnostic(error);
    }
}

impl Drop for ExtraKeysController {
    fn drop(&mut self) {
        self.timer.cancel(&self.shared);
    }
}

/// Marks every registered special button that appears in `matrix`, as a grid
/// key or as a popup.
fn mark_created(specials: &mut SpecialButtons, matrix: &ButtonMatrix) {
    for (_, spec) in matrix.iter() {
        for candidate in std::iter::once(spec).chain(spec.popup()) {
            if let Some(button) = specials.lookup(candidate.token()) {
                specials.mark_created(button);
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
