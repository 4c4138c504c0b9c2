// SPDX-License-Identifier: GPL-3.0-only

//! Core data types for the extra-keys layout parser.
//!
//! This module defines the error taxonomy shared by the parser, the settings
//! loader and the controller, together with the immutable button model the
//! parser produces.

use crate::layout::display::DisplayStyle;
use std::fmt;

// ============================================================================
// Error Handling Types
// ============================================================================

/// Errors and warnings produced while loading and driving an extra-keys layout.
///
/// Only [`ConfigError::Syntax`], [`ConfigError::Malformed`],
/// [`ConfigError::Io`] and [`ConfigError::InvalidSettings`] are fatal to the
/// operation that produced them. The remaining variants are reported as
/// warnings and never abort parsing or gesture handling.
#[derive(Debug)]
pub enum ConfigError {
    /// The layout text is not an array of rows
    Syntax {
        /// Description of the syntax problem
        message: String,
    },

    /// A cell in the layout is structurally invalid
    Malformed {
        /// Zero-based row index of the offending cell
        row: usize,
        /// Zero-based column index of the offending cell
        col: usize,
        /// Human-readable reason
        reason: String,
    },

    /// The requested display style does not exist; the default style was used
    UnknownStyle {
        /// The style name as requested
        name: String,
    },

    /// A special button name could not be resolved
    UnknownSpecialButton {
        /// The name as given
        name: String,
    },

    /// I/O error while reading a layout or settings file
    Io {
        /// The underlying I/O error
        source: std::io::Error,
        /// Optional file path that caused the error
        file_path: Option<String>,
    },

    /// The settings file is not valid TOML for the settings schema
    InvalidSettings {
        /// The underlying TOML error
        source: toml::de::Error,
        /// Optional file path being parsed
        file_path: Option<String>,
    },
}

impl ConfigError {
    /// Creates a syntax error.
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
        }
    }

    /// Creates a malformed-cell error at `row`/`col`.
    pub fn malformed(row: usize, col: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            row,
            col,
            reason: reason.into(),
        }
    }

    /// Creates an unknown-style warning.
    pub fn unknown_style(name: impl Into<String>) -> Self {
        Self::UnknownStyle { name: name.into() }
    }

    /// Creates an unknown-special-button warning.
    pub fn unknown_special_button(name: impl Into<String>) -> Self {
        Self::UnknownSpecialButton { name: name.into() }
    }

    /// Creates an I/O error with file path.
    pub fn io_error_with_path(source: std::io::Error, file_path: impl Into<String>) -> Self {
        Self::Io {
            source,
            file_path: Some(file_path.into()),
        }
    }

    /// Creates a settings error with file path.
    pub fn invalid_settings_with_path(
        source: toml::de::Error,
        file_path: impl Into<String>,
    ) -> Self {
        Self::InvalidSettings {
            source,
            file_path: Some(file_path.into()),
        }
    }

    /// Returns true if this error aborts the operation that produced it.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::UnknownStyle { .. } | Self::UnknownSpecialButton { .. }
        )
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Syntax { message } => {
                write!(f, "Invalid extra-keys layout: {}", message)
            }
            ConfigError::Malformed { row, col, reason } => {
                write!(
                    f,
                    "Malformed extra-keys cell at row {}, column {}: {}",
                    row, col, reason
                )
            }
            ConfigError::UnknownStyle { name } => {
                write!(
                    f,
                    "Unknown extra-keys style '{}', using '{}'",
                    name,
                    DisplayStyle::default().name()
                )
            }
            ConfigError::UnknownSpecialButton { name } => {
                write!(f, "Unknown special button '{}', ignored", name)
            }
            ConfigError::Io { source, file_path } => {
                write!(f, "I/O error")?;
                if let Some(path) = file_path {
                    write!(f, " reading file '{}'", path)?;
                }
                write!(f, ": {}", source)
            }
            ConfigError::InvalidSettings { source, file_path } => {
                write!(f, "Invalid settings")?;
                if let Some(path) = file_path {
                    write!(f, " in file '{}'", path)?;
                }
                // toml errors span several lines; keep the diagnostic on one
                let message = source.message().replace('\n', " ");
                write!(f, ": {}", message.trim())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::InvalidSettings { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            source: err,
            file_path: None,
        }
    }
}

// ============================================================================
// ParseResult Type
// ============================================================================

/// Result of successfully parsing a layout, with non-fatal warnings.
#[derive(Debug)]
pub struct ParseResult<T> {
    /// The successfully parsed layout
    pub layout: T,
    /// The display style that was actually applied
    pub style: DisplayStyle,
    /// Non-fatal warnings, such as [`ConfigError::UnknownStyle`]
    pub warnings: Vec<ConfigError>,
}

impl<T> ParseResult<T> {
    /// Creates a new parse result with no warnings.
    pub fn new(layout: T, style: DisplayStyle) -> Self {
        Self {
            layout,
            style,
            warnings: Vec::new(),
        }
    }

    /// Creates a new parse result with warnings.
    pub fn with_warnings(layout: T, style: DisplayStyle, warnings: Vec<ConfigError>) -> Self {
        Self {
            layout,
            style,
            warnings,
        }
    }

    /// Returns true if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Consumes the result and returns the layout, discarding warnings.
    pub fn into_layout(self) -> T {
        self.layout
    }
}

// ============================================================================
// Button Model
// ============================================================================

/// One logical key of the extra-keys row.
///
/// The token is either a single key name or, for macros, a sequence of key
/// names separated by single spaces. It is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonSpec {
    token: String,
    display: String,
    is_macro: bool,
    popup: Option<Box<ButtonSpec>>,
}

impl ButtonSpec {
    /// Creates a single-key button whose label is the token itself.
    pub fn key(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            display: token.clone(),
            token,
            is_macro: false,
            popup: None,
        }
    }

    /// Creates a macro button from its space-separated tokens.
    pub fn macro_keys(token: impl Into<String>) -> Self {
        Self {
            is_macro: true,
            ..Self::key(token)
        }
    }

    /// Replaces the display label.
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = display.into();
        self
    }

    /// Attaches a popup. Any popup the given spec carries is dropped.
    pub fn with_popup(mut self, mut popup: ButtonSpec) -> Self {
        popup.popup = None;
        self.popup = Some(Box::new(popup));
        self
    }

    /// The key name or space-joined macro tokens.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The label shown to the user.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Whether the cell was declared with `macro`.
    pub fn is_macro(&self) -> bool {
        self.is_macro
    }

    /// The button revealed by swiping up, if any.
    pub fn popup(&self) -> Option<&ButtonSpec> {
        self.popup.as_deref()
    }

    /// Iterates over the individual tokens of the button.
    ///
    /// A plain key always yields exactly one token, even if the key name
    /// itself contains spaces.
    pub fn tokens(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        if self.is_macro {
            Box::new(self.token.split_whitespace())
        } else {
            Box::new(std::iter::once(self.token.as_str()))
        }
    }
}

/// Position of a button in a [`ButtonMatrix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ButtonId {
    /// Zero-based row index
    pub row: usize,
    /// Zero-based column index within the row
    pub col: usize,
}

impl ButtonId {
    /// Creates a new button id.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Immutable grid of buttons. Rows may have different lengths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonMatrix {
    rows: Vec<Vec<ButtonSpec>>,
}

impl ButtonMatrix {
    /// Creates a matrix from its rows.
    pub fn new(rows: Vec<Vec<ButtonSpec>>) -> Self {
        Self { rows }
    }

    /// All rows, top to bottom.
    pub fn rows(&self) -> &[Vec<ButtonSpec>] {
        &self.rows
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column count of the rendering grid: the length of the longest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Returns true if the matrix has no buttons at all.
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Vec::is_empty)
    }

    /// Looks up the button at `id`.
    pub fn get(&self, id: ButtonId) -> Option<&ButtonSpec> {
        self.rows.get(id.row)?.get(id.col)
    }

    /// Iterates over every grid button with its id, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (ButtonId, &ButtonSpec)> {
        self.rows.iter().enumerate().flat_map(|(row, buttons)| {
            buttons
                .iter()
                .enumerate()
                .map(move |(col, spec)| (ButtonId::new(row, col), spec))
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
