//! Persisted configuration.
//!
//! The config file holds the color table rows plus the last-used style
//! toggles, so the next run starts from the same choices:
//!
//! ```text
//! {
//!   "color_entries": [ { "word": "bug", "group": "", "color": "#0a0" } ],
//!   "bold_enabled": true,
//!   "italic_enabled": false,
//!   "bold_plurals_enabled": true,
//!   "colorize_enabled": true
//! }
//! ```
//!
//! Missing keys take their defaults, so an empty object (or no file at all)
//! is a valid config. Matching flags (`whole_words`, `case_insensitive`) are
//! chosen per run and are not persisted.
//!
//! When `color_entries` is empty, the table falls back to a separate entries
//! file (conventionally [`DATA_FILE_NAME`]) that mirrors the rows on save.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ColoringOptions;
use crate::error::Result;
use crate::table::{self, ColorEntry, ColorTable};

/// Conventional name of the entries mirror file.
pub const DATA_FILE_NAME: &str = "wordtint_data.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub color_entries: Vec<ColorEntry>,
    pub bold_enabled: bool,
    pub italic_enabled: bool,
    pub bold_plurals_enabled: bool,
    pub colorize_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color_entries: Vec::new(),
            bold_enabled: true,
            italic_enabled: false,
            bold_plurals_enabled: true,
            colorize_enabled: true,
        }
    }
}

impl Config {
    /// Load `path`, or the defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write the config as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Replace the stored rows (blank rows are dropped).
    ///
    /// Mirror them to the data file with [`table::save_entries`] if the
    /// fallback file is in use.
    pub fn set_entries(&mut self, entries: Vec<ColorEntry>) {
        self.color_entries = entries.into_iter().filter(ColorEntry::is_valid).collect();
    }

    /// Materialize the color table.
    ///
    /// Uses `color_entries` when present; otherwise reads `data_path` if it
    /// is given and exists. Returns an empty table when neither has rows.
    pub fn color_table(&self, data_path: Option<&Path>) -> Result<ColorTable> {
        if !self.color_entries.is_empty() {
            return Ok(ColorTable::from_entries(&self.color_entries));
        }
        match data_path {
            Some(path) if path.exists() => {
                let entries = table::load_entries(path)?;
                debug!(path = %path.display(), rows = entries.len(), "loaded color table from data file");
                Ok(ColorTable::from_entries(&entries))
            }
            _ => Ok(ColorTable::new()),
        }
    }

    /// Options for a run: persisted style toggles plus per-run matching flags.
    pub fn options(&self, whole_words: bool, case_insensitive: bool) -> ColoringOptions {
        ColoringOptions {
            whole_words,
            case_insensitive,
            bold: self.bold_enabled,
            italic: self.italic_enabled,
            bold_plurals: self.bold_plurals_enabled,
            colorize: self.colorize_enabled,
        }
    }

    /// Remember the style toggles of `options` for the next run.
    pub fn remember(&mut self, options: &ColoringOptions) {
        self.bold_enabled = options.bold;
        self.italic_enabled = options.italic;
        self.bold_plurals_enabled = options.bold_plurals;
        self.colorize_enabled = options.colorize;
    }
}
