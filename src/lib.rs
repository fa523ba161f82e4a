//! Color-code vocabulary words inside HTML fragments.
//!
//! A [`ColorTable`] maps words to CSS colors. [`compile`] turns the table and a
//! set of [`ColoringOptions`] into one combined [`CompiledPattern`], and
//! [`annotate`] applies it to a fragment of inline HTML, wrapping every
//! configured word found in text (never inside tags) in a styled span.
//!
//! Annotation is idempotent: previous wrappers are stripped before matching,
//! so re-running with different toggles never nests markup, and re-running
//! with the same toggles reports zero replacements.
//!
//! ```
//! use wordtint::{ColorTable, ColoringOptions, annotate, compile};
//!
//! let mut table = ColorTable::new();
//! table.insert("bug", "#0a0");
//! let opts = ColoringOptions { bold: false, ..ColoringOptions::default() };
//!
//! let pattern = compile(&table, &opts).unwrap();
//! let out = annotate("one bug, many bugs", &pattern, &opts);
//! assert_eq!(out.replacements, 2);
//! ```

#[macro_use]
mod macros;
mod api;
pub mod batch;
pub mod config;
mod engine;
pub mod error;
pub mod table;

pub use api::{AnnotationDetails, AnnotationResultVerbose, MatchSummary, annotate, annotate_verbose, compile};
pub use batch::{BatchOptions, BatchReport, DeckSelection, Field, Note, NoteCollection, NoteStore, run_batch};
pub use config::Config;
pub use engine::CompiledPattern;
pub use error::{Error, Result};
pub use table::{ColorEntry, ColorTable};

use serde::{Deserialize, Serialize};

// --- Public data model -------------------------------------------------------

/// Matching and styling switches for one run.
///
/// `whole_words`, `case_insensitive` and `bold_plurals` decide *what* matches;
/// `bold`, `italic` and `colorize` decide *how* a match is styled. Options are
/// fixed for the duration of a run: compile and annotate with the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ColoringOptions {
    /// Only match whole words (Unicode word boundaries on both sides).
    pub whole_words: bool,
    /// Match regardless of case; the table is keyed by lowercased words.
    pub case_insensitive: bool,
    /// Emit `font-weight:bold;`.
    pub bold: bool,
    /// Emit `font-style:italic;`.
    pub italic: bool,
    /// Also match `<word>s` and resolve it to the color of `<word>`.
    pub bold_plurals: bool,
    /// Emit `color:<color>;`. Turning it off decolorizes previous runs.
    pub colorize: bool,
}

impl Default for ColoringOptions {
    fn default() -> Self {
        Self { whole_words: true, case_insensitive: true, bold: true, italic: false, bold_plurals: true, colorize: true }
    }
}

/// Output of [`annotate`].
///
/// When `replacements == 0`, `html` is equal to the input fragment and the
/// caller can skip persisting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationResult {
    /// The annotated fragment.
    pub html: String,
    /// Spans newly wrapped in this call, or (for a pure de-styling run) the
    /// number of wrappers removed.
    pub replacements: usize,
}

impl AnnotationResult {
    pub(crate) fn unchanged(html: &str) -> Self {
        Self { html: html.to_string(), replacements: 0 }
    }

    /// Whether the call changed the fragment.
    pub fn changed(&self) -> bool {
        self.replacements > 0
    }
}

// --- Internal types ----------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Range {
    /// Start byte index (inclusive).
    pub start: usize,
    /// End byte index (exclusive).
    pub end: usize,
}

impl Range {
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// One piece of a segmented fragment. Tags are opaque and never searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Chunk<'a> {
    Text(&'a str),
    Tag(&'a str),
}

impl<'a> Chunk<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Chunk::Text(s) | Chunk::Tag(s) => s,
        }
    }
}

/// How a matched span found its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Resolution {
    /// The normalized match is a table key.
    Direct,
    /// The match minus a trailing `s` is a table key.
    Plural,
    /// Found only through the forced-lowercase retry.
    Lowercase,
}
