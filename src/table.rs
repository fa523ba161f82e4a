//! Word → color tables.
//!
//! The editor side of the system stores a list of [`ColorEntry`] rows
//! (word, color and a free-form group). Before anything reaches the engine
//! the rows are materialized into a [`ColorTable`]: blank rows are dropped,
//! values are trimmed, and duplicate words resolve last-writer-wins.
//!
//! ## JSON shape
//!
//! Entries are exchanged as a JSON array of objects:
//!
//! ```text
//! [
//!   { "word": "bug", "group": "insects", "color": "#00aa00" },
//!   { "word": "cat", "group": "", "color": "red" }
//! ]
//! ```
//!
//! Parsing is forgiving per row: rows that are not objects are skipped, a missing `group` is empty,
//! and scalar values (numbers, booleans) are stringified.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};

/// One editable row of the color table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorEntry {
    pub word: String,
    #[serde(default)]
    pub group: String,
    pub color: String,
}

impl ColorEntry {
    pub fn new(word: impl Into<String>, color: impl Into<String>) -> Self {
        Self { word: word.into(), group: String::new(), color: color.into() }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Both `word` and `color` are non-empty after trimming.
    pub fn is_valid(&self) -> bool {
        !self.word.trim().is_empty() && !self.color.trim().is_empty()
    }
}

/// Insertion-ordered word → color mapping, as read by the compiler.
///
/// Keys keep the case they were typed with; case folding is a matching
/// option, not a property of the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorTable {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl ColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from editor rows, skipping invalid ones.
    pub fn from_entries(entries: &[ColorEntry]) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.insert(&entry.word, &entry.color);
        }
        table
    }

    /// Insert a trimmed `word → color` pair.
    ///
    /// Returns `false` (and leaves the table untouched) when either side is
    /// blank. An existing word keeps its position and takes the new color.
    pub fn insert(&mut self, word: &str, color: &str) -> bool {
        let (word, color) = (word.trim(), color.trim());
        if word.is_empty() || color.is_empty() {
            return false;
        }
        match self.index.get(word) {
            Some(&pos) => self.entries[pos].1 = color.to_string(),
            None => {
                self.index.insert(word.to_string(), self.entries.len());
                self.entries.push((word.to_string(), color.to_string()));
            }
        }
        true
    }

    pub fn get(&self, word: &str) -> Option<&str> {
        self.index.get(word).map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(word, color)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(w, c)| (w.as_str(), c.as_str()))
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(w, _)| w.as_str())
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for ColorTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (word, color) in iter {
            table.insert(word, color);
        }
        table
    }
}

/// Parse a JSON array of entry objects.
///
/// The top level must be an array. Individual rows are accepted leniently
/// (see the module docs); rows that are not objects are skipped.
pub fn parse_entries(json: &str) -> Result<Vec<ColorEntry>> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(rows) = value else {
        return Err(Error::config("expected a JSON array of {word, group, color} objects"));
    };

    let mut entries = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        let Value::Object(map) = row else {
            warn!(row = idx, "skipping non-object color table row");
            continue;
        };
        entries.push(ColorEntry {
            word: scalar_field(map.get("word")),
            group: scalar_field(map.get("group")),
            color: scalar_field(map.get("color")),
        });
    }
    Ok(entries)
}

/// Serialize entries as pretty JSON, keeping only valid, trimmed rows.
pub fn entries_to_json(entries: &[ColorEntry]) -> Result<String> {
    let cleaned: Vec<ColorEntry> = entries
        .iter()
        .filter(|e| e.is_valid())
        .map(|e| ColorEntry {
            word: e.word.trim().to_string(),
            group: e.group.trim().to_string(),
            color: e.color.trim().to_string(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&cleaned)?)
}

/// Read entries from a JSON file.
pub fn load_entries(path: &Path) -> Result<Vec<ColorEntry>> {
    let raw = std::fs::read_to_string(path)?;
    parse_entries(&raw)
}

/// Write entries to a JSON file (see [`entries_to_json`]).
pub fn save_entries(path: &Path, entries: &[ColorEntry]) -> Result<()> {
    std::fs::write(path, entries_to_json(entries)?)?;
    Ok(())
}

fn scalar_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_trims_and_rejects_blank_sides() {
        let mut table = ColorTable::new();
        assert!(table.insert("  bug ", " #0a0 "));
        assert!(!table.insert("   ", "#fff"));
        assert!(!table.insert("cat", ""));

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("bug"), Some("#0a0"));
    }

    #[test]
    fn duplicate_words_are_last_writer_wins_in_first_position() {
        let table = ColorTable::from_entries(&[
            ColorEntry::new("cat", "#111"),
            ColorEntry::new("dog", "#222"),
            ColorEntry::new("cat", "#333"),
        ]);

        let pairs: Vec<(&str, &str)> = table.iter().collect();
        assert_eq!(pairs, vec![("cat", "#333"), ("dog", "#222")]);
    }

    #[test]
    fn keys_keep_their_case() {
        let table: ColorTable = [("Paris", "blue"), ("paris", "red")].into_iter().collect();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("Paris"), Some("blue"));
    }

    #[test]
    fn parse_entries_is_lenient_per_row() {
        let json = r##"[
            {"word": " bug ", "color": "#0a0", "group": "insects"},
            "not a row",
            {"word": 42, "color": "red"},
            {"word": "empty"}
        ]"##;
        let entries = parse_entries(json).unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], ColorEntry::new("bug", "#0a0").with_group("insects"));
        assert_eq!(entries[1].word, "42");
        assert!(!entries[2].is_valid());

        let table = ColorTable::from_entries(&entries);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn parse_entries_rejects_non_array() {
        let err = parse_entries(r#"{"word": "bug"}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn entries_to_json_drops_invalid_rows_and_orders_fields() {
        let json = entries_to_json(&[ColorEntry::new("bug", "#0a0"), ColorEntry::new("", "#fff")]).unwrap();
        let word = json.find("\"word\"").unwrap();
        let group = json.find("\"group\"").unwrap();
        let color = json.find("\"color\"").unwrap();

        assert!(word < group && group < color);
        assert_eq!(parse_entries(&json).unwrap(), vec![ColorEntry::new("bug", "#0a0")]);
    }

    #[test]
    fn entries_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wordtint_data.json");
        save_entries(&path, &[ColorEntry::new("moth", "#555").with_group("night")]).unwrap();

        let loaded = load_entries(&path).unwrap();
        assert_eq!(loaded, vec![ColorEntry::new("moth", "#555").with_group("night")]);
    }
}
