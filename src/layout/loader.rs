// SPDX-License-Identifier: GPL-3.0-only

//! Layout loading with fallback to the built-in default layout.

use crate::app_settings::{DEFAULT_LAYOUT, DEFAULT_STYLE};
use crate::layout::display::{DisplayMap, DisplayStyle};
use crate::layout::parser::parse;
use crate::layout::types::{ButtonMatrix, ConfigError};

/// A layout ready to hand to the controller.
#[derive(Debug)]
pub struct LoadedLayout {
    /// The parsed matrix
    pub matrix: ButtonMatrix,
    /// The display style that was applied
    pub style: DisplayStyle,
    /// Every recoverable problem met on the way, in order
    pub diagnostics: Vec<ConfigError>,
    /// True if the configured layout was rejected and the default used instead
    pub used_fallback: bool,
}

/// Parses `layout_text`, falling back to [`DEFAULT_LAYOUT`] with the default
/// style if it is malformed.
///
/// The rejected layout's error is kept in `diagnostics`.
///
/// # Errors
///
/// Returns the default layout's own error if the fallback fails too. The
/// built-in layout is expected to always parse.
pub fn load_layout(
    layout_text: &str,
    style_name: &str,
    aliases: &DisplayMap,
) -> Result<LoadedLayout, ConfigError> {
    match parse(layout_text, style_name, aliases) {
        Ok(result) => Ok(LoadedLayout {
            matrix: result.layout,
            style: result.style,
            diagnostics: result.warnings,
            used_fallback: false,
        }),
        Err(err) if err.is_fatal() => {
            tracing::warn!("{}; using the default extra-keys layout", err);
            let fallback = parse(DEFAULT_LAYOUT, DEFAULT_STYLE, aliases).inspect_err(|e| {
                tracing::error!("Default extra-keys layout failed to parse: {}", e);
            })?;

            let mut diagnostics = vec![err];
            diagnostics.extend(fallback.warnings);
            Ok(LoadedLayout {
                matrix: fallback.layout,
                style: fallback.style,
                diagnostics,
                used_fallback: true,
            })
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::ButtonId;

    /// The built-in default layout parses without warnings
    #[test]
    fn test_default_layout_parses() {
        let loaded = load_layout(DEFAULT_LAYOUT, DEFAULT_STYLE, DisplayMap::aliases()).unwrap();

        assert!(!loaded.used_fallback);
        assert!(loaded.diagnostics.is_empty());
        assert_eq!(loaded.matrix.row_count(), 2);
        assert_eq!(loaded.matrix.column_count(), 7);
        assert_eq!(
            loaded
                .matrix
                .get(ButtonId::new(0, 2))
                .and_then(|s| s.popup())
                .map(|p| p.token()),
            Some("|")
        );
    }

    /// Malformed layouts fall back to the default layout and style
    #[test]
    fn test_malformed_falls_back() {
        let loaded =
            load_layout("[[{key: 'a', macro: 'b'}]]", "all", DisplayMap::aliases()).unwrap();

        assert!(loaded.used_fallback);
        assert_eq!(loaded.style, DisplayStyle::Default);
        assert_eq!(loaded.matrix.row_count(), 2);
        assert!(matches!(
            loaded.diagnostics.as_slice(),
            [ConfigError::Malformed { row: 0, col: 0, .. }]
        ));
    }

    /// Syntax errors fall back too
    #[test]
    fn test_syntax_error_falls_back() {
        let loaded = load_layout("not a layout", "default", DisplayMap::aliases()).unwrap();
        assert!(loaded.used_fallback);
        assert!(matches!(loaded.diagnostics[0], ConfigError::Syntax { .. }));
    }

    /// Unknown style is kept as a diagnostic without falling back
    #[test]
    fn test_unknown_style_no_fallback() {
        let loaded = load_layout("[['x']]", "bogus", DisplayMap::aliases()).unwrap();
        assert!(!loaded.used_fallback);
        assert_eq!(loaded.matrix.row_count(), 1);
        assert!(matches!(loaded.diagnostics[0], ConfigError::UnknownStyle { .. }));
    }
}
