// SPDX-License-Identifier: GPL-3.0-only

//! User settings for the extra-keys row.
//!
//! Settings are read from a TOML file. The path is taken from the
//! `EXTRAKEYS_CONFIG` environment variable, or defaults to
//! `~/.config/extrakeys/config.toml`. Every field is optional:
//!
//! ```toml
//! extra_keys = "[['ESC', 'TAB', 'CTRL', 'ALT', {key: '-', popup: '|'}, 'DOWN', 'UP']]"
//! extra_keys_style = "arrows-all"
//! long_press_timeout_ms = 400
//! repeat_delay_ms = 80
//! repeatable_keys = ["UP", "DOWN", "LEFT", "RIGHT", "BKSP", "DEL"]
//! special_buttons = ["CTRL", "ALT", "SHIFT", "FN"]
//! ```

use crate::app_settings::{
    APP_CONFIG_DIR, DEFAULT_LAYOUT, DEFAULT_LONG_PRESS_TIMEOUT_MS, DEFAULT_REPEAT_DELAY_MS,
    DEFAULT_STYLE, SETTINGS_FILE,
};
use crate::controller::ControllerOptions;
use crate::input::SpecialButton;
use crate::layout::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable overriding the settings path.
pub const CONFIG_ENV: &str = "EXTRAKEYS_CONFIG";

/// Extra-keys settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Layout text (JSON5 array of rows)
    pub extra_keys: String,
    /// Display style name
    pub extra_keys_style: String,
    /// Long-press timeout in milliseconds
    pub long_press_timeout_ms: u64,
    /// Auto-repeat delay in milliseconds
    pub repeat_delay_ms: u64,
    /// Tokens that auto-repeat while held (built-in set if absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeatable_keys: Option<Vec<String>>,
    /// Special button names (all four if absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_buttons: Option<Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            extra_keys: DEFAULT_LAYOUT.to_string(),
            extra_keys_style: DEFAULT_STYLE.to_string(),
            long_press_timeout_ms: DEFAULT_LONG_PRESS_TIMEOUT_MS,
            repeat_delay_ms: DEFAULT_REPEAT_DELAY_MS,
            repeatable_keys: None,
            special_buttons: None,
        }
    }
}

impl Settings {
    /// Settings file path, if one exists.
    ///
    /// Search order:
    /// 1. `EXTRAKEYS_CONFIG` environment variable
    /// 2. `~/.config/extrakeys/config.toml`
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let path = dirs::config_dir()?.join(APP_CONFIG_DIR).join(SETTINGS_FILE);
        path.exists().then_some(path)
    }

    /// Loads settings from [`config_path`](Self::config_path), falling back
    /// to defaults if there is no file or it cannot be read.
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            match Self::load_from_file(&path.to_string_lossy()) {
                Ok(settings) => {
                    tracing::info!("Loaded settings: {}", path.display());
                    return settings;
                }
                Err(e) => {
                    tracing::warn!("Failed to load settings {}: {}", path.display(), e);
                }
            }
        }
        tracing::info!("Using built-in default settings");
        Self::default()
    }

    /// Loads settings from `path`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::InvalidSettings`] if it is not valid settings TOML.
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io_error_with_path(e, path))?;
        toml::from_str(&content).map_err(|e| ConfigError::invalid_settings_with_path(e, path))
    }

    /// Resolves the configured special buttons.
    ///
    /// Unknown names are skipped and returned as
    /// [`ConfigError::UnknownSpecialButton`] warnings.
    pub fn special_buttons(&self) -> (Vec<SpecialButton>, Vec<ConfigError>) {
        let Some(names) = &self.special_buttons else {
            return (SpecialButton::ALL.to_vec(), Vec::new());
        };

        let mut buttons = Vec::new();
        let mut warnings = Vec::new();
        for name in names {
            match name.parse::<SpecialButton>() {
                Ok(button) if !buttons.contains(&button) => buttons.push(button),
                Ok(_) => {}
                Err(e) => warnings.push(e),
            }
        }
        (buttons, warnings)
    }

    /// Builds controller options from these settings.
    pub fn controller_options(&self) -> (ControllerOptions, Vec<ConfigError>) {
        let (special_buttons, warnings) = self.special_buttons();
        let defaults = ControllerOptions::default();

        let options = ControllerOptions {
            long_press_timeout_ms: self.long_press_timeout_ms,
            repeat_delay_ms: self.repeat_delay_ms,
            repeatable_keys: match &self.repeatable_keys {
                Some(keys) => keys.iter().cloned().collect(),
                None => defaults.repeatable_keys,
            },
            special_buttons,
        };
        (options, warnings)
    }
}
