//! Batch driver: color every note in a set of decks.
//!
//! The engine only transforms single fragments. This module is the loop
//! around it. It picks notes by deck, annotates every field, and persists a
//! note only when at least one field actually changed. It also counts what it
//! did.
//!
//! ```text
//! ColorTable ──compile (once)──▶ CompiledPattern
//!                                     │
//! NoteStore::note_ids(selection) ──▶ for each id:
//!                                     ├─ cancelled? ─▶ stop
//!                                     ├─ is_cloze() && skip_cloze ─▶ skip
//!                                     ├─ annotate each field
//!                                     └─ any field changed ─▶ NoteStore::update
//! ```
//!
//! Storage is behind [`NoteStore`]; [`NoteCollection`] is a plain JSON-backed
//! implementation used by the CLI and the tests.

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::{annotate, compile};
use crate::error::{Error, Result};
use crate::{ColorTable, ColoringOptions};

/// One named field of a note. `value` is an HTML fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    /// Full deck name; subdecks are separated by `::`.
    pub deck: String,
    #[serde(default)]
    pub model: String,
    /// Cloze notes can be skipped; their fields carry cloze markup.
    #[serde(default)]
    pub cloze: bool,
    pub fields: Vec<Field>,
}

impl Note {
    /// Flagged as cloze, or built from a cloze note type.
    pub fn is_cloze(&self) -> bool {
        self.cloze || self.model.contains("Cloze")
    }
}

/// Which decks a run covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckSelection {
    pub decks: Vec<String>,
    pub include_children: bool,
}

impl DeckSelection {
    pub fn new<I, S>(decks: I, include_children: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { decks: decks.into_iter().map(Into::into).collect(), include_children }
    }

    /// Whether `deck` is selected: an exact name, or a subdeck
    /// (`Parent::Child`) when children are included.
    pub fn matches(&self, deck: &str) -> bool {
        self.decks.iter().any(|name| {
            deck == name
                || (self.include_children
                    && deck.len() > name.len() + 2
                    && deck.starts_with(name.as_str())
                    && deck[name.len()..].starts_with("::"))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }
}

/// Access to the notes a batch run reads and writes.
pub trait NoteStore {
    /// Ids of notes in the selected decks, in processing order.
    fn note_ids(&self, selection: &DeckSelection) -> Vec<u64>;

    fn note(&self, id: u64) -> Option<Note>;

    /// Persist a modified note.
    fn update(&mut self, note: Note) -> Result<()>;
}

/// An in-memory note collection, loadable from and savable to JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteCollection {
    notes: Vec<Note>,
}

impl NoteCollection {
    pub fn new(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }
}

impl NoteStore for NoteCollection {
    fn note_ids(&self, selection: &DeckSelection) -> Vec<u64> {
        self.notes.iter().filter(|n| selection.matches(&n.deck)).map(|n| n.id).collect()
    }

    fn note(&self, id: u64) -> Option<Note> {
        self.notes.iter().find(|n| n.id == id).cloned()
    }

    fn update(&mut self, note: Note) -> Result<()> {
        let slot = self
            .notes
            .iter_mut()
            .find(|n| n.id == note.id)
            .ok_or_else(|| Error::invalid_argument(format!("unknown note id {}", note.id)))?;
        *slot = note;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    pub skip_cloze: bool,
    /// Annotate and count, but never call [`NoteStore::update`].
    pub dry_run: bool,
}

/// Totals for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub notes_seen: usize,
    pub notes_modified: usize,
    pub total_replacements: usize,
    /// The run stopped early because the cancel flag was set.
    pub cancelled: bool,
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Notes scanned: {}", self.notes_seen)?;
        writeln!(f, "Notes modified: {}", self.notes_modified)?;
        write!(f, "Total replacements: {}", self.total_replacements)?;
        if self.cancelled {
            write!(f, "\n(cancelled)")?;
        }
        Ok(())
    }
}

/// Color every note in `selection`.
///
/// `cancel` is checked before each note; setting it stops the run after the
/// note in progress and marks the report as cancelled. Fails with
/// [`Error::EmptyTable`] before touching anything when `table` is empty.
pub fn run_batch<S: NoteStore + ?Sized>(
    store: &mut S,
    table: &ColorTable,
    options: &ColoringOptions,
    selection: &DeckSelection,
    batch: &BatchOptions,
    cancel: &AtomicBool,
) -> Result<BatchReport> {
    if table.is_empty() {
        return Err(Error::EmptyTable);
    }
    let pattern = compile(table, options)?;

    let mut report = BatchReport::default();
    if selection.is_empty() {
        return Ok(report);
    }

    let ids = store.note_ids(selection);
    info!(notes = ids.len(), decks = ?selection.decks, dry_run = batch.dry_run, "starting color coding run");

    for (idx, id) in ids.iter().copied().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            warn!(processed = idx, total = ids.len(), "color coding run cancelled");
            report.cancelled = true;
            break;
        }

        let Some(mut note) = store.note(id) else {
            warn!(id, "note disappeared during run, skipping");
            continue;
        };
        report.notes_seen += 1;

        if batch.skip_cloze && note.is_cloze() {
            continue;
        }

        let mut modified = false;
        let mut replacements = 0;
        for field in &mut note.fields {
            let out = annotate(&field.value, &pattern, options);
            if out.changed() {
                field.value = out.html;
                modified = true;
                replacements += out.replacements;
            }
        }

        if modified {
            debug!(id, replacements, "note modified");
            report.notes_modified += 1;
            report.total_replacements += replacements;
            if !batch.dry_run {
                store.update(note)?;
            }
        }

        if idx % 200 == 0 {
            debug!(processed = idx + 1, total = ids.len(), "processing notes");
        }
    }

    info!(
        seen = report.notes_seen,
        modified = report.notes_modified,
        replacements = report.total_replacements,
        "color coding run finished"
    );
    Ok(report)
}
