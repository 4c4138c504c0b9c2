// SPDX-License-Identifier: GPL-3.0-only

//! Centralized application settings and constants.

/// Directory name under the user config dir.
pub const APP_CONFIG_DIR: &str = "extrakeys";

/// Settings file name inside [`APP_CONFIG_DIR`].
pub const SETTINGS_FILE: &str = "config.toml";

/// Built-in layout used when no layout is configured or the configured one is
/// malformed.
pub const DEFAULT_LAYOUT: &str = "[['ESC','/',{key: '-', popup: '|'},'HOME','UP','END','PGUP'], \
                                  ['TAB','CTRL','ALT','LEFT','DOWN','RIGHT','PGDN']]";

/// Built-in display style name.
pub const DEFAULT_STYLE: &str = "default";

/// Default long-press timeout in milliseconds.
pub const DEFAULT_LONG_PRESS_TIMEOUT_MS: u64 = 400;

/// Shortest accepted long-press timeout in milliseconds.
pub const MIN_LONG_PRESS_TIMEOUT_MS: u64 = 200;

/// Longest accepted long-press timeout in milliseconds.
pub const MAX_LONG_PRESS_TIMEOUT_MS: u64 = 3000;

/// Default delay between auto-repeat firings in milliseconds.
pub const DEFAULT_REPEAT_DELAY_MS: u64 = 80;

/// Shortest accepted repeat delay in milliseconds.
pub const MIN_REPEAT_DELAY_MS: u64 = 5;

/// Longest accepted repeat delay in milliseconds.
pub const MAX_REPEAT_DELAY_MS: u64 = 2000;

/// Keys that auto-repeat while held.
pub const DEFAULT_REPEATABLE_KEYS: [&str; 8] =
    ["UP", "DOWN", "LEFT", "RIGHT", "BKSP", "DEL", "PGUP", "PGDN"];
