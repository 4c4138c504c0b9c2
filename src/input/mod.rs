// SPDX-License-Identifier: GPL-3.0-only

//! Input handling for the extra-keys row.
//!
//! This module turns resolved buttons into calls on the terminal input
//! boundary, and holds the state of the special (modifier) buttons.
//!
//! # Features
//!
//! - **Key tables**: named keys (`ESC`, `PGUP`, `F1`..`F12`) and soft actions
//!   (`KEYBOARD`, `DRAWER`, `PASTE`, `SCROLL`)
//! - **Macro dispatch**: `"CTRL ALT DEL"` becomes one `DEL` press with ctrl+alt
//! - **Special buttons**: CTRL/ALT/SHIFT/FN with active and locked states
//! - **Sinks**: the [`KeySink`] trait and a channel-backed [`ChannelSink`]
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use extrakeys::input::{dispatch_spec, ChannelSink};
//! use extrakeys::layout::ButtonSpec;
//!
//! let (mut sink, mut rx) = ChannelSink::new();
//! dispatch_spec(&ButtonSpec::macro_keys("CTRL c"), &mut sink);
//! // rx yields SinkEvent::CodePoints { points: ['c'], ctrl: true, alt: false }
//! ```

// Sub-modules
pub mod dispatch;
pub mod keycode;
pub mod modifier;
pub mod sink;

// Re-export commonly used types
pub use dispatch::{
    DispatchAction, DispatchEvent, Modifiers, dispatch, dispatch_spec, resolve, resolve_macro,
};
pub use keycode::{KeyCode, SoftAction};
pub use modifier::{SpecialButton, SpecialButtonState, SpecialButtons};
pub use sink::{ChannelSink, HapticKind, KeySink, SinkEvent};
