// SPDX-License-Identifier: GPL-3.0-only

//! Extra keys - a configurable auxiliary key row for touch terminals
//!
//! This crate provides the logical model behind an on-screen row of terminal
//! keys (arrows, ESC, CTRL, macros, ...): a parser for the declarative layout
//! and a controller that turns touch gestures into key dispatches. Rendering
//! is left to the host.
//!
//! # Architecture
//!
//! The crate consists of two halves:
//!
//! 1. **Layout** (`layout`): parses layout text plus a display style into an
//!    immutable button matrix, with fallback to a built-in layout.
//!
//! 2. **Interaction** (`controller`, `input`): a touch state machine with
//!    sticky and lockable modifiers, long-press auto-repeat and swipe-up
//!    popups, dispatching to a host-provided `KeySink`.
//!
//! # Modules
//!
//! - `app_settings`: Centralized constants (default layout, timing bounds)
//! - `controller`: Touch state machine and timer
//! - `input`: Key tables, macro dispatch, special buttons, sinks
//! - `layout`: Layout parser, display styles, loader
//! - `settings`: User settings persisted as TOML

pub mod app_settings;
pub mod controller;
pub mod input;
pub mod layout;
pub mod settings;

pub use controller::{ExtraKeysController, TouchPhase, TouchPosition, TouchState};
pub use settings::Settings;

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod integration_tests {
    use crate::controller::{ControllerOptions, SpecialButtonsHandle};
    use crate::input::{ChannelSink, KeyCode, KeySink, SinkEvent, SpecialButton};
    use crate::layout::{ButtonId, DisplayMap, load_layout};
    use crate::{ExtraKeysController, Settings, TouchPhase, TouchPosition};
    use futures::StreamExt;
    use std::sync::{Arc, OnceLock};
    use std::time::Duration;
    use tokio::runtime::Handle;

    const INSIDE: TouchPosition = TouchPosition::new(5.0, 5.0);

    /// A terminal-side sink that applies the extra-keys modifiers to the keys
    /// it receives, the way a terminal reads CTRL/ALT for soft-keyboard input.
    struct ModifierAwareSink {
        inner: ChannelSink,
        specials: Arc<OnceLock<SpecialButtonsHandle>>,
    }

    impl KeySink for ModifierAwareSink {
        fn send_key(&mut self, code: KeyCode, ctrl: bool, alt: bool, shift: bool, fn_key: bool) {
            self.inner.send_key(code, ctrl, alt, shift, fn_key);
        }

        fn send_code_points(&mut self, points: &[char], ctrl: bool, alt: bool) {
            let ctrl = ctrl
                || self
                    .specials
                    .get()
                    .and_then(|h| h.read(SpecialButton::Ctrl, true))
                    .unwrap_or(false);
            self.inner.send_code_points(points, ctrl, alt);
        }

        fn on_toggle_keyboard(&mut self) {
            self.inner.on_toggle_keyboard();
        }

        fn on_toggle_drawer(&mut self) {
            self.inner.on_toggle_drawer();
        }

        fn on_paste_from_clipboard(&mut self) {
            self.inner.on_paste_from_clipboard();
        }

        fn on_toggle_auto_scroll(&mut self) {
            self.inner.on_toggle_auto_scroll();
        }
    }

    fn tap(controller: &mut ExtraKeysController, button: ButtonId) {
        controller.on_touch_event(button, TouchPhase::Down, INSIDE);
        controller.on_touch_event(button, TouchPhase::Up, INSIDE);
    }

    /// Integration Test 1: Settings -> layout -> controller -> sink
    #[tokio::test]
    async fn test_settings_to_dispatch() {
        let settings = Settings {
            extra_keys: "[['ESCAPE', {macro: 'CTRL c', display: '^C'}, 'PASTE']]".into(),
            ..Settings::default()
        };
        let (sink, rx) = ChannelSink::new();
        let mut controller =
            ExtraKeysController::from_settings(&settings, Box::new(sink), Handle::current())
                .unwrap();

        assert_eq!(controller.matrix().get(ButtonId::new(0, 1)).unwrap().display(), "^C");

        for col in 0..3 {
            tap(&mut controller, ButtonId::new(0, col));
        }
        drop(controller);

        let events: Vec<SinkEvent> = rx
            .filter(|e| futures::future::ready(!matches!(e, SinkEvent::Haptic(_))))
            .collect()
            .await;
        assert_eq!(
            events,
            vec![
                SinkEvent::Key {
                    code: KeyCode::Escape,
                    ctrl: false,
                    alt: false,
                    shift: false,
                    fn_key: false,
                },
                SinkEvent::CodePoints {
                    points: vec!['c'],
                    ctrl: true,
                    alt: false,
                },
                SinkEvent::PasteFromClipboard,
            ]
        );
    }

    /// Integration Test 2: A sink reads a tapped CTRL for the next literal key
    /// and consumes it
    #[tokio::test]
    async fn test_sink_reads_special_buttons() {
        let loaded = load_layout("[['CTRL', 'x']]", "default", DisplayMap::aliases()).unwrap();
        let (inner, mut rx) = ChannelSink::new();
        let specials = Arc::new(OnceLock::new());

        let mut controller = ExtraKeysController::new(
            loaded.matrix,
            ControllerOptions::default(),
            Box::new(ModifierAwareSink {
                inner,
                specials: Arc::clone(&specials),
            }),
            Handle::current(),
        );
        specials.set(controller.special_buttons()).unwrap();

        tap(&mut controller, ButtonId::new(0, 0));
        tap(&mut controller, ButtonId::new(0, 1));
        tap(&mut controller, ButtonId::new(0, 1));

        let mut literals = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if matches!(event, SinkEvent::CodePoints { .. }) {
                literals.push(event);
            }
        }
        assert_eq!(
            literals,
            vec![
                SinkEvent::CodePoints {
                    points: vec!['x'],
                    ctrl: true,
                    alt: false,
                },
                SinkEvent::CodePoints {
                    points: vec!['x'],
                    ctrl: false,
                    alt: false,
                },
            ]
        );
    }

    /// Integration Test 3: Locked modifiers persist across reads until tapped
    #[tokio::test(start_paused = true)]
    async fn test_locked_modifier_persists() {
        let (sink, _rx) = ChannelSink::new();
        let loaded = load_layout("[['ALT']]", "all", DisplayMap::aliases()).unwrap();
        let mut controller = ExtraKeysController::new(
            loaded.matrix,
            ControllerOptions::default(),
            Box::new(sink),
            Handle::current(),
        );
        let alt = ButtonId::new(0, 0);
        let handle = controller.special_buttons();

        controller.on_touch_event(alt, TouchPhase::Down, INSIDE);
        tokio::time::sleep(Duration::from_millis(500)).await;
        controller.on_touch_event(alt, TouchPhase::Up, INSIDE);

        for _ in 0..3 {
            assert_eq!(handle.read(SpecialButton::Alt, true), Some(true));
        }

        tap(&mut controller, alt);
        assert_eq!(handle.read(SpecialButton::Alt, true), Some(false));
    }
}
