// SPDX-License-Identifier: GPL-3.0-only

//! Display-map registry.
//!
//! A display map substitutes a raw token spelling with a glyph for the button
//! label (`LEFT` is shown as `←`). Maps are grouped into named styles selected
//! by the `extra-keys-style` setting. The same map type also carries the
//! token alias table applied before lookup (`ESCAPE` becomes `ESC`).

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// A token → replacement lookup table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayMap {
    entries: HashMap<String, String>,
}

impl DisplayMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the replacement for `token`, if any.
    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(String::as_str)
    }

    /// Returns the replacement for `token`, or `token` itself.
    pub fn get_or<'a>(&'a self, token: &'a str) -> &'a str {
        self.get(token).unwrap_or(token)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The built-in control-character alias table.
    pub fn aliases() -> &'static DisplayMap {
        &CONTROL_CHARS_ALIASES
    }

    fn merged(parts: &[&[(&str, &str)]]) -> Self {
        parts.iter().flat_map(|part| part.iter().copied()).collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DisplayMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ============================================================================
// Symbol Tables
// ============================================================================

const CLASSIC_ARROWS: &[(&str, &str)] = &[
    ("LEFT", "←"),
    ("RIGHT", "→"),
    ("UP", "↑"),
    ("DOWN", "↓"),
];

const WELL_KNOWN_CHARACTERS: &[(&str, &str)] = &[
    ("ENTER", "↲"),
    ("TAB", "↹"),
    ("BKSP", "⌫"),
    ("DEL", "⌦"),
    ("DRAWER", "☰"),
    ("KEYBOARD", "⌨"),
    ("PASTE", "⎘"),
    ("SCROLL", "⇳"),
];

const LESS_KNOWN_CHARACTERS: &[(&str, &str)] = &[
    ("HOME", "⇱"),
    ("END", "⇲"),
    ("PGUP", "⇑"),
    ("PGDN", "⇓"),
];

const NOT_KNOWN_ISO_CHARACTERS: &[(&str, &str)] = &[
    ("CTRL", "⎈"),
    ("ALT", "⎇"),
    ("ESC", "⎋"),
];

const NICER_LOOKING_DISPLAY: &[(&str, &str)] = &[("-", "―")];

const ALIASES: &[(&str, &str)] = &[
    ("ESCAPE", "ESC"),
    ("CONTROL", "CTRL"),
    ("SHFT", "SHIFT"),
    ("RETURN", "ENTER"),
    ("FUNCTION", "FN"),
    ("LT", "LEFT"),
    ("RT", "RIGHT"),
    ("DN", "DOWN"),
    ("PAGEUP", "PGUP"),
    ("PAGE_UP", "PGUP"),
    ("PAGE UP", "PGUP"),
    ("PAGE-UP", "PGUP"),
    ("PAGEDOWN", "PGDN"),
    ("PAGE_DOWN", "PGDN"),
    ("PAGE DOWN", "PGDN"),
    ("PAGE-DOWN", "PGDN"),
    ("DELETE", "DEL"),
    ("BACKSPACE", "BKSP"),
    ("BACKSLASH", "\\"),
    ("QUOTE", "\""),
    ("APOSTROPHE", "'"),
];

static DEFAULT_DISPLAY: LazyLock<DisplayMap> = LazyLock::new(|| {
    DisplayMap::merged(&[CLASSIC_ARROWS, WELL_KNOWN_CHARACTERS, NICER_LOOKING_DISPLAY])
});

static ARROWS_ONLY_DISPLAY: LazyLock<DisplayMap> =
    LazyLock::new(|| DisplayMap::merged(&[CLASSIC_ARROWS, NICER_LOOKING_DISPLAY]));

static ARROWS_ALL_DISPLAY: LazyLock<DisplayMap> = LazyLock::new(|| {
    DisplayMap::merged(&[
        CLASSIC_ARROWS,
        WELL_KNOWN_CHARACTERS,
        LESS_KNOWN_CHARACTERS,
        NICER_LOOKING_DISPLAY,
    ])
});

static FULL_ISO_DISPLAY: LazyLock<DisplayMap> = LazyLock::new(|| {
    DisplayMap::merged(&[
        CLASSIC_ARROWS,
        WELL_KNOWN_CHARACTERS,
        LESS_KNOWN_CHARACTERS,
        NICER_LOOKING_DISPLAY,
        NOT_KNOWN_ISO_CHARACTERS,
    ])
});

static EMPTY_DISPLAY: LazyLock<DisplayMap> = LazyLock::new(DisplayMap::new);

static CONTROL_CHARS_ALIASES: LazyLock<DisplayMap> =
    LazyLock::new(|| DisplayMap::merged(&[ALIASES]));

// ============================================================================
// Styles
// ============================================================================

/// Named display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayStyle {
    /// Arrows plus well-known editing glyphs
    #[default]
    Default,
    /// Arrow glyphs only
    ArrowsOnly,
    /// Arrows plus navigation glyphs
    ArrowsAll,
    /// Every known glyph, including ISO modifier symbols
    All,
    /// No substitution; labels are the raw tokens
    Empty,
}

impl DisplayStyle {
    /// Every style, in registry order.
    pub const ALL: [DisplayStyle; 5] = [
        DisplayStyle::Default,
        DisplayStyle::ArrowsOnly,
        DisplayStyle::ArrowsAll,
        DisplayStyle::All,
        DisplayStyle::Empty,
    ];

    /// Looks up a style by its setting name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|style| style.name() == name)
    }

    /// The setting name of the style.
    pub fn name(self) -> &'static str {
        match self {
            DisplayStyle::Default => "default",
            DisplayStyle::ArrowsOnly => "arrows-only",
            DisplayStyle::ArrowsAll => "arrows-all",
            DisplayStyle::All => "all",
            DisplayStyle::Empty => "none",
        }
    }

    /// The symbol table of the style.
    pub fn display_map(self) -> &'static DisplayMap {
        match self {
            DisplayStyle::Default => &DEFAULT_DISPLAY,
            DisplayStyle::ArrowsOnly => &ARROWS_ONLY_DISPLAY,
            DisplayStyle::ArrowsAll => &ARROWS_ALL_DISPLAY,
            DisplayStyle::All => &FULL_ISO_DISPLAY,
            DisplayStyle::Empty => &EMPTY_DISPLAY,
        }
    }
}

impl fmt::Display for DisplayStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
