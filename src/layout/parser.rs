// SPDX-License-Identifier: GPL-3.0-only

//! Layout parsing logic for extra-keys definitions.
//!
//! A layout is an array of rows, each an array of cells. The text is read as
//! JSON5 so hand-written layouts may use single quotes and unquoted keys:
//!
//! ```text
//! [['ESC', '/', {key: '-', popup: '|'}, 'HOME', 'UP', 'END', 'PGUP'],
//!  ['TAB', 'CTRL', 'ALT', 'LEFT', 'DOWN', 'RIGHT', 'PGDN']]
//! ```

use crate::layout::display::{DisplayMap, DisplayStyle};
use crate::layout::types::{ButtonMatrix, ButtonSpec, ConfigError, ParseResult};
use serde::Deserialize;
use serde_json::Value;
use std::fs;

/// A raw cell after structural validation, before aliasing and display
/// resolution.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Symbol(String),
    Key(Entry),
    Macro(Entry),
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    tokens: String,
    display: Option<String>,
    popup: Option<Box<Cell>>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    key: Option<String>,
    #[serde(rename = "macro")]
    macro_keys: Option<String>,
    display: Option<String>,
    popup: Option<Value>,
}

/// Parses an extra-keys layout.
///
/// # Arguments
///
/// * `layout_text` - JSON5 array of rows
/// * `style_name` - Name of the display style used for default labels
/// * `aliases` - Token alias table applied before display lookup
///
/// # Returns
///
/// The matrix together with the style actually applied. An unknown style is
/// not an error: the default style is used and a
/// [`ConfigError::UnknownStyle`] warning is attached to the result.
///
/// # Errors
///
/// * [`ConfigError::Syntax`] if the text is not an array
/// * [`ConfigError::Malformed`] for the first invalid row or cell
///
/// # Example
///
/// ```rust,ignore
/// use extrakeys::layout::{parse, DisplayMap};
///
/// let result = parse("[['ESC', 'CTRL', {key: '-', popup: '|'}]]", "default", DisplayMap::aliases())?;
/// assert_eq!(result.layout.column_count(), 3);
/// ```
pub fn parse(
    layout_text: &str,
    style_name: &str,
    aliases: &DisplayMap,
) -> Result<ParseResult<ButtonMatrix>, ConfigError> {
    let mut warnings = Vec::new();
    let style = match DisplayStyle::from_name(style_name) {
        Some(style) => style,
        None => {
            tracing::warn!("Unknown extra-keys style '{}', using default", style_name);
            warnings.push(ConfigError::unknown_style(style_name));
            DisplayStyle::default()
        }
    };

    let root: Value = json5::from_str(layout_text)
        .map_err(|e| ConfigError::syntax(e.to_string().replace('\n', " ")))?;
    let Value::Array(rows) = root else {
        return Err(ConfigError::syntax("expected an array of rows"));
    };

    let display_map = style.display_map();
    let mut matrix = Vec::with_capacity(rows.len());
    for (row, line) in rows.iter().enumerate() {
        let Value::Array(cells) = line else {
            return Err(ConfigError::malformed(row, 0, "row must be an array"));
        };

        let mut buttons = Vec::with_capacity(cells.len());
        for (col, value) in cells.iter().enumerate() {
            let spec = read_cell(value, true)
                .and_then(|cell| build_spec(&cell, display_map, aliases))
                .map_err(|reason| ConfigError::malformed(row, col, reason))?;
            buttons.push(spec);
        }
        matrix.push(buttons);
    }

    tracing::debug!(
        "Parsed extra-keys layout: {} row(s), style '{}'",
        matrix.len(),
        style
    );

    Ok(ParseResult::with_warnings(
        ButtonMatrix::new(matrix),
        style,
        warnings,
    ))
}

/// Parses an extra-keys layout from a file.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
/// errors of [`parse`].
pub fn parse_layout_file(
    path: &str,
    style_name: &str,
    aliases: &DisplayMap,
) -> Result<ParseResult<ButtonMatrix>, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::io_error_with_path(e, path))?;
    parse(&text, style_name, aliases)
}

/// Validates one cell. `allow_popup` is false for popups themselves, whose
/// own `popup` field is ignored.
fn read_cell(value: &Value, allow_popup: bool) -> Result<Cell, String> {
    let entry = match value {
        Value::String(symbol) => return Ok(Cell::Symbol(symbol.clone())),
        Value::Object(_) => RawEntry::deserialize(value).map_err(|e| e.to_string())?,
        _ => return Err("cell must be a string or an object".into()),
    };

    let popup = match entry.popup {
        Some(ref popup) if allow_popup => Some(Box::new(
            read_cell(popup, false).map_err(|reason| format!("popup: {}", reason))?,
        )),
        Some(_) => {
            tracing::debug!("Ignoring popup nested inside a popup");
            None
        }
        None => None,
    };

    match (entry.key, entry.macro_keys) {
        (Some(_), Some(_)) => Err("cell cannot have both 'key' and 'macro'".into()),
        (None, None) => Err("cell must have either 'key' or 'macro'".into()),
        (Some(key), None) => Ok(Cell::Key(Entry {
            tokens: key,
            display: entry.display,
            popup,
        })),
        (None, Some(macro_keys)) => Ok(Cell::Macro(Entry {
            tokens: macro_keys,
            display: entry.display,
            popup,
        })),
    }
}

/// Applies aliases and resolves the display label.
fn build_spec(
    cell: &Cell,
    display_map: &DisplayMap,
    aliases: &DisplayMap,
) -> Result<ButtonSpec, String> {
    let (tokens, entry, is_macro): (Vec<&str>, Option<&Entry>, bool) = match cell {
        Cell::Symbol(symbol) => (vec![symbol.as_str()], None, false),
        Cell::Key(entry) => (vec![entry.tokens.as_str()], Some(entry), false),
        Cell::Macro(entry) => (entry.tokens.split_whitespace().collect(), Some(entry), true),
    };

    if tokens.iter().all(|token| token.is_empty()) {
        return Err(if is_macro {
            "macro must contain at least one key".into()
        } else {
            "key must not be empty".into()
        });
    }

    let tokens: Vec<&str> = tokens.into_iter().map(|t| aliases.get_or(t)).collect();
    let token = tokens.join(" ");

    let display = match entry.and_then(|e| e.display.as_deref()) {
        Some(display) => display.to_string(),
        None => tokens
            .iter()
            .map(|t| display_map.get_or(t))
            .collect::<Vec<_>>()
            .join(" "),
    };

    let spec = if is_macro {
        ButtonSpec::macro_keys(token)
    } else {
        ButtonSpec::key(token)
    }
    .with_display(display);

    match entry.and_then(|e| e.popup.as_deref()) {
        Some(popup) => Ok(spec.with_popup(build_spec(popup, display_map, aliases)?)),
        None => Ok(spec),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::ButtonId;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse_default(text: &str) -> Result<ParseResult<ButtonMatrix>, ConfigError> {
        parse(text, "default", DisplayMap::aliases())
    }

    /// Test 1: Plain strings normalize to the same spec as `{key: ...}`
    #[test]
    fn test_plain_string_equals_key_record() {
        for symbol in ["ESC", "UP", "-", "|", "PAGE_UP", "CTRL"] {
            let plain = parse_default(&format!("[[{}]]", serde_json::json!(symbol))).unwrap();
            let record =
                parse_default(&serde_json::json!([[{ "key": symbol }]]).to_string()).unwrap();
            assert_eq!(plain.layout, record.layout, "symbol {}", symbol);
        }
    }

    /// Test 2: Round-trip layout with a popup
    #[test]
    fn test_popup_layout() {
        let result = parse_default("[['ESC','CTRL',{key:'-', popup:'|'}]]").unwrap();
        let matrix = &result.layout;

        assert_eq!(matrix.row_count(), 1);
        assert_eq!(matrix.column_count(), 3);

        let dash = matrix.get(ButtonId::new(0, 2)).unwrap();
        assert_eq!(dash.token(), "-");
        assert_eq!(dash.display(), "―");
        assert_eq!(dash.popup().map(ButtonSpec::token), Some("|"));
        assert_eq!(result.style, DisplayStyle::Default);
        assert!(!result.has_warnings());
    }

    /// Test 3: Unknown style falls back to default with a warning
    #[test]
    fn test_unknown_style_warns() {
        let result = parse("[['LEFT']]", "bogus", DisplayMap::aliases()).unwrap();

        assert_eq!(result.style, DisplayStyle::Default);
        assert_eq!(result.warning_count(), 1);
        assert!(matches!(
            &result.warnings[0],
            ConfigError::UnknownStyle { name } if name == "bogus"
        ));
        assert_eq!(result.layout.get(ButtonId::new(0, 0)).unwrap().display(), "←");
    }

    /// Test 4: Style "none" keeps raw tokens as labels
    #[test]
    fn test_none_style() {
        let result = parse("[['LEFT', 'BKSP']]", "none", DisplayMap::aliases()).unwrap();
        let labels: Vec<&str> = result.layout.iter().map(|(_, s)| s.display()).collect();
        assert_eq!(labels, vec!["LEFT", "BKSP"]);
        assert!(!result.has_warnings());
    }

    /// Test 5: Display resolution order
    #[test]
    fn test_display_resolution() {
        let text = r#"[[
            {key: 'UP', display: 'up!'},
            'UP',
            'x',
            {macro: 'CTRL LEFT'}
        ]]"#;
        let matrix = parse_default(text).unwrap().layout;
        let labels: Vec<&str> = matrix.iter().map(|(_, s)| s.display()).collect();
        assert_eq!(labels, vec!["up!", "↑", "x", "CTRL ←"]);
    }

    /// Test 6: Aliases rewrite tokens before lookup
    #[test]
    fn test_aliases_applied() {
        let text = "[['ESCAPE', {macro: 'CONTROL  PAGE_UP'}, 'PAGE UP', 'BACKSPACE']]";
        let matrix = parse_default(text).unwrap().layout;
        let tokens: Vec<&str> = matrix.iter().map(|(_, s)| s.token()).collect();
        assert_eq!(tokens, vec!["ESC", "CTRL PGUP", "PGUP", "BKSP"]);
        assert_eq!(matrix.get(ButtonId::new(0, 3)).unwrap().display(), "⌫");
    }

    /// Test 7: Both key and macro is malformed, naming the cell
    #[test]
    fn test_key_and_macro_is_malformed() {
        let err = parse_default("[['ESC'], ['TAB', {key: 'a', macro: 'b'}]]").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { row: 1, col: 1, .. }));
    }

    /// Test 8: Neither key nor macro is malformed
    #[test]
    fn test_missing_key_is_malformed() {
        let err = parse_default("[[{display: 'x'}]]").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { row: 0, col: 0, .. }));
    }

    /// Test 9: Malformed popup is reported on the parent cell
    #[test]
    fn test_malformed_popup() {
        let err = parse_default("[['ESC', {key: '-', popup: 42}]]").unwrap_err();
        match err {
            ConfigError::Malformed { row, col, reason } => {
                assert_eq!((row, col), (0, 1));
                assert!(reason.starts_with("popup:"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    /// Test 10: Non-string, non-object cells and non-array rows are malformed
    #[test]
    fn test_bad_cell_types() {
        assert!(matches!(
            parse_default("[['ESC', 1]]").unwrap_err(),
            ConfigError::Malformed { row: 0, col: 1, .. }
        ));
        assert!(matches!(
            parse_default("[['ESC'], 'TAB']").unwrap_err(),
            ConfigError::Malformed { row: 1, col: 0, .. }
        ));
        assert!(matches!(
            parse_default("[['']]").unwrap_err(),
            ConfigError::Malformed { .. }
        ));
        assert!(matches!(
            parse_default("[[{macro: '   '}]]").unwrap_err(),
            ConfigError::Malformed { .. }
        ));
    }

    /// Test 11: Invalid syntax and non-array roots
    #[test]
    fn test_syntax_errors() {
        assert!(matches!(
            parse_default("[['ESC',").unwrap_err(),
            ConfigError::Syntax { .. }
        ));
        assert!(matches!(
            parse_default("{key: 'ESC'}").unwrap_err(),
            ConfigError::Syntax { .. }
        ));
    }

    /// Test 12: Popups nested inside popups are ignored
    #[test]
    fn test_nested_popup_ignored() {
        let matrix = parse_default("[[{key: 'a', popup: {key: 'b', popup: 'c'}}]]")
            .unwrap()
            .layout;
        let popup = matrix.get(ButtonId::new(0, 0)).unwrap().popup().unwrap();
        assert_eq!(popup.token(), "b");
        assert!(popup.popup().is_none());
    }

    /// Test 13: Ragged rows and an empty layout
    #[test]
    fn test_ragged_and_empty() {
        let matrix = parse_default("[['a'], ['b', 'c', 'd'], []]").unwrap().layout;
        assert_eq!(matrix.row_count(), 3);
        assert_eq!(matrix.column_count(), 3);

        assert!(parse_default("[]").unwrap().layout.is_empty());
    }

    /// Test 14: Macro flag survives parsing
    #[test]
    fn test_macro_flag() {
        let matrix = parse_default("[[{macro: 'CTRL c'}, 'CTRL']]").unwrap().layout;
        assert!(matrix.get(ButtonId::new(0, 0)).unwrap().is_macro());
        assert!(!matrix.get(ButtonId::new(0, 1)).unwrap().is_macro());
    }

    /// Test 15: Parse from file
    #[test]
    fn test_parse_layout_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[['ESC', 'TAB']]").unwrap();

        let result =
            parse_layout_file(file.path().to_str().unwrap(), "all", DisplayMap::aliases())
                .unwrap();
        assert_eq!(result.layout.get(ButtonId::new(0, 0)).unwrap().display(), "⎋");
    }

    /// Test 16: Missing file is an I/O error with the path
    #[test]
    fn test_parse_layout_file_missing() {
        let err = parse_layout_file("/nonexistent/keys.json", "default", DisplayMap::aliases())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { file_path: Some(ref p), .. } if p == "/nonexistent/keys.json"));
    }
}
