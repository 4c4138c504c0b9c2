// SPDX-License-Identifier: GPL-3.0-only

//! Extra-keys layout parser.
//!
//! This module turns a declarative layout description into an immutable
//! [`ButtonMatrix`]. A layout is an array of rows; each row is an array of
//! cells. A cell is either a plain key name or a record:
//!
//! ```text
//! Cell := Symbol
//!       | { key: Symbol, display?: String, popup?: Cell }
//!       | { macro: Symbol (" " Symbol)*, display?: String, popup?: Cell }
//! ```
//!
//! # Features
//!
//! - **Lenient syntax**: layouts are JSON5, so `[['ESC', {key: '-', popup: '|'}]]` works
//! - **Display styles**: labels default to glyphs from a named style (`default`,
//!   `arrows-only`, `arrows-all`, `all`, `none`)
//! - **Aliases**: long spellings such as `ESCAPE` or `PAGE_UP` are normalized
//! - **Fallback**: [`load_layout`] retries with the built-in layout when the
//!   configured one is malformed
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use extrakeys::layout::{load_layout, DisplayMap};
//!
//! let loaded = load_layout("[['ESC', 'CTRL', {key: '-', popup: '|'}]]", "default", DisplayMap::aliases())?;
//! for diagnostic in &loaded.diagnostics {
//!     eprintln!("Warning: {}", diagnostic);
//! }
//! println!("{} columns", loaded.matrix.column_count());
//! ```
//!
//! ## Error Handling
//!
//! ```rust,ignore
//! use extrakeys::layout::{parse, ConfigError, DisplayMap};
//!
//! match parse(text, "default", DisplayMap::aliases()) {
//!     Ok(result) => { /* result.layout, result.warnings */ }
//!     Err(ConfigError::Malformed { row, col, reason }) => {
//!         eprintln!("Bad cell at {}:{}: {}", row, col, reason);
//!     }
//!     Err(e) => eprintln!("Parse error: {}", e),
//! }
//! ```

// Sub-modules
pub mod display;
pub mod loader;
pub mod parser;
pub mod types;

// Re-export public API - Error handling types
pub use types::{ConfigError, ParseResult};

// Re-export public API - Parser functions
pub use loader::{LoadedLayout, load_layout};
pub use parser::{parse, parse_layout_file};

// Re-export public API - Data structures
pub use display::{DisplayMap, DisplayStyle};
pub use types::{ButtonId, ButtonMatrix, ButtonSpec};

// ============================================================================
// Public API Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Test 1: The advanced layout from the user documentation parses
    #[test]
    fn test_public_api_parse_advanced_layout() {
        let text = r#"[[
            {key: 'ESC', popup: {macro: "CTRL f d", display: "tmux exit"}},
            {key: 'CTRL', popup: {macro: "CTRL f BKSP", display: "tmux ←"}},
            {key: 'ALT', popup: {macro: "CTRL f TAB", display: "tmux →"}},
            {key: 'TAB', popup: {macro: "ALT a", display: 'A-a'}},
            {key: 'LEFT', popup: 'HOME'},
            {key: 'DOWN', popup: 'PGDN'},
            {key: 'UP', popup: 'PGUP'},
            {key: 'RIGHT', popup: 'END'},
            {macro: "ALT j", display: 'A-j', popup: {macro: "ALT g", display: 'A-g'}},
            {key: 'KEYBOARD', popup: {macro: "CTRL d", display: 'exit'}}
        ]]"#;

        let result = parse(text, "arrows-all", DisplayMap::aliases()).unwrap();
        let matrix = result.layout;

        assert_eq!(matrix.row_count(), 1);
        assert_eq!(matrix.column_count(), 10);

        let esc = matrix.get(ButtonId::new(0, 0)).unwrap();
        let popup = esc.popup().unwrap();
        assert!(popup.is_macro());
        assert_eq!(popup.token(), "CTRL f d");
        assert_eq!(popup.display(), "tmux exit");

        let left = matrix.get(ButtonId::new(0, 4)).unwrap();
        assert_eq!(left.display(), "←");
        assert_eq!(left.popup().unwrap().display(), "⇱");

        let keyboard = matrix.get(ButtonId::new(0, 9)).unwrap();
        assert_eq!(keyboard.display(), "⌨");
    }

    /// Test 2: Public re-exports cover the whole parse pipeline
    #[test]
    fn test_public_api_reexports() {
        let result: Result<ParseResult<ButtonMatrix>, ConfigError> =
            parse("[['UP']]", DisplayStyle::ArrowsOnly.name(), &DisplayMap::new());
        let matrix = result.unwrap().into_layout();
        assert_eq!(matrix.get(ButtonId::new(0, 0)).map(ButtonSpec::display), Some("↑"));
    }
}
