// SPDX-License-Identifier: GPL-3.0-only

//! The terminal input boundary.
//!
//! The controller never talks to a terminal directly. Every resolved key is
//! handed to a [`KeySink`], which the host implements. [`ChannelSink`] is a
//! ready-made sink that forwards each call as a [`SinkEvent`] over an
//! unbounded channel, so a host event loop can consume dispatches as a stream.

use crate::input::keycode::KeyCode;
use crate::layout::ConfigError;
use futures::channel::mpsc;

/// Haptic feedback requested by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HapticKind {
    /// A normal tap on an extra key
    KeyboardTap,
}

/// Receiver of resolved key dispatches.
///
/// Calls are fire-and-forget. Implementations must not call back into the
/// controller that owns them; reading special buttons through a
/// [`SpecialButtonsHandle`](crate::controller::SpecialButtonsHandle) is fine.
pub trait KeySink: Send {
    /// Sends a synthetic key press with modifier flags.
    fn send_key(&mut self, code: KeyCode, ctrl: bool, alt: bool, shift: bool, fn_key: bool);

    /// Sends literal input. Shift and fn do not apply to literal input.
    fn send_code_points(&mut self, points: &[char], ctrl: bool, alt: bool);

    /// `KEYBOARD` soft action.
    fn on_toggle_keyboard(&mut self);

    /// `DRAWER` soft action.
    fn on_toggle_drawer(&mut self);

    /// `PASTE` soft action.
    fn on_paste_from_clipboard(&mut self);

    /// `SCROLL` soft action.
    fn on_toggle_auto_scroll(&mut self);

    /// Best-effort haptic feedback. Returns true if feedback was performed.
    fn on_haptic_feedback(&mut self, _kind: HapticKind) -> bool {
        false
    }

    /// A recoverable problem the host may want to surface.
    fn on_diagnostic(&mut self, _error: &ConfigError) {}
}

/// A sink call, as forwarded by [`ChannelSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Key {
        code: KeyCode,
        ctrl: bool,
        alt: bool,
        shift: bool,
        fn_key: bool,
    },
    CodePoints {
        points: Vec<char>,
        ctrl: bool,
        alt: bool,
    },
    ToggleKeyboard,
    ToggleDrawer,
    PasteFromClipboard,
    ToggleAutoScroll,
    Haptic(HapticKind),
    /// One-line rendering of a [`ConfigError`]
    Diagnostic(String),
}

/// A [`KeySink`] that forwards every call over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SinkEvent>,
}

impl ChannelSink {
    /// Creates a sink and the receiver for its events.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SinkEvent>) {
        let (tx, rx) = mpsc::unbounded();
        (Self { tx }, rx)
    }

    fn forward(&self, event: SinkEvent) {
        if let Err(e) = self.tx.unbounded_send(event) {
            tracing::debug!("Dropping sink event, receiver closed: {:?}", e.into_inner());
        }
    }
}

impl KeySink for ChannelSink {
    fn send_key(&mut self, code: KeyCode, ctrl: bool, alt: bool, shift: bool, fn_key: bool) {
        self.forward(SinkEvent::Key {
            code,
            ctrl,
            alt,
            shift,
            fn_key,
        });
    }

    fn send_code_points(&mut self, points: &[char], ctrl: bool, alt: bool) {
        self.forward(SinkEvent::CodePoints {
            points: points.to_vec(),
            ctrl,
            alt,
        });
    }

    fn on_toggle_keyboard(&mut self) {
        self.forward(SinkEvent::ToggleKeyboard);
    }

    fn on_toggle_drawer(&mut self) {
        self.forward(SinkEvent::ToggleDrawer);
    }

    fn on_paste_from_clipboard(&mut self) {
        self.forward(SinkEvent::PasteFromClipboard);
    }

    fn on_toggle_auto_scroll(&mut self) {
        self.forward(SinkEvent::ToggleAutoScroll);
    }

    fn on_haptic_feedback(&mut self, kind: HapticKind) -> bool {
        self.forward(SinkEvent::Haptic(kind));
        false
    }

    fn on_diagnostic(&mut self, error: &ConfigError) {
        self.forward(SinkEvent::Diagnostic(error.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    /// Events arrive in call order
    #[tokio::test]
    async fn test_channel_sink_forwards_in_order() {
        let (mut sink, mut rx) = ChannelSink::new();

        sink.send_key(KeyCode::Up, true, false, false, false);
        sink.send_code_points(&['|'], false, true);
        sink.on_paste_from_clipboard();
        drop(sink);

        assert_eq!(
            rx.next().await,
            Some(SinkEvent::Key {
                code: KeyCode::Up,
                ctrl: true,
                alt: false,
                shift: false,
                fn_key: false,
            })
        );
        assert_eq!(
            rx.next().await,
            Some(SinkEvent::CodePoints {
                points: vec!['|'],
                ctrl: false,
                alt: true,
            })
        );
        assert_eq!(rx.next().await, Some(SinkEvent::PasteFromClipboard));
        assert_eq!(rx.next().await, None);
    }

    /// A closed receiver does not panic the sender
    #[test]
    fn test_closed_receiver_is_ignored() {
        let (mut sink, rx) = ChannelSink::new();
        drop(rx);

        sink.on_toggle_drawer();
        assert!(!sink.on_haptic_feedback(HapticKind::KeyboardTap));
    }

    /// Diagnostics are forwarded as one-line text
    #[test]
    fn test_diagnostic_forwarded() {
        let (mut sink, mut rx) = ChannelSink::new();
        sink.on_diagnostic(&ConfigError::unknown_special_button("META"));

        match rx.try_recv() {
            Ok(SinkEvent::Diagnostic(text)) => assert!(text.contains("META")),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
