//! Combined pattern construction.
//!
//! The whole table is compiled into a single alternation so a fragment is
//! scanned once, no matter how many words are configured. Two details make the
//! alternation behave:
//!
//! - **Longest first.** The regex engine is leftmost-first: at a given
//!   position it takes the first alternative that matches. Sorting words by
//!   length (descending) keeps `cat` from shadowing `caterpillar`.
//! - **The trailing-`s` guard.** With both whole-word and plural matching off,
//!   a stem must not match when an `s` follows it (`bug` inside `bugs`). The
//!   `regex` crate has no look-around, so the guard is a shared suffix:
//!
//! ```text
//! (?P<word>caterpillar|bug|cat)(?:[^s]|\z)
//! └──────── reported span ────┘└─ consumed, never part of the match
//! ```
//!
//!   For a fixed start position, `(a|b)G` tries `a` then `b`, each followed by
//!   `G`, exactly like `a(?!s)|b(?!s)`. The annotator resumes scanning at the
//!   end of the `word` group, so the consumed guard character can still begin
//!   the next match.
//!
//! ## Alternatives per word
//!
//! | whole_words | bold_plurals | alternatives        |
//! |-------------|--------------|---------------------|
//! | yes         | yes          | `\bw\b`, `\bws\b`   |
//! | yes         | no           | `\bw\b`             |
//! | no          | yes          | `w`, `ws`           |
//! | no          | no           | `w` + guard         |

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::error::Result;
use crate::{ColorTable, ColoringOptions, Range};

/// A pattern that compiles fine and matches nothing (an empty class).
const NEVER_MATCHES: &str = r"[^\s\S]";

/// Name of the capture group holding the span when the guard is in use.
const WORD_GROUP: &str = "word";

/// Trailing-`s` guard: the next character is not `s`, or there is none.
const PLURAL_GUARD: &str = r"(?:[^s]|\z)";

/// A table compiled against one set of options.
///
/// Immutable once built; share it by reference across threads or fragments.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
    key_map: HashMap<String, String>,
    guarded: bool,
    case_insensitive: bool,
    word_count: usize,
}

impl CompiledPattern {
    /// Number of words the pattern was built from.
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// True when built from an empty table: nothing can ever match.
    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    /// The combined regular expression, for diagnostics.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Color stored under an already-normalized key.
    pub fn color_for(&self, key: &str) -> Option<&str> {
        self.key_map.get(key).map(String::as_str)
    }

    /// Normalize a matched span into a key-map key.
    pub(crate) fn key_for(&self, text: &str) -> String {
        if self.case_insensitive { text.to_lowercase() } else { text.to_string() }
    }

    /// Leftmost match starting at or after `start`.
    ///
    /// `start` is a position inside `haystack` rather than a sliced
    /// haystack, so `\b` still sees the character before it.
    pub(crate) fn find_at(&self, haystack: &str, start: usize) -> Option<Range> {
        if self.guarded {
            let caps = self.regex.captures_at(haystack, start)?;
            let word = caps.name(WORD_GROUP)?;
            Some(Range { start: word.start(), end: word.end() })
        } else {
            self.regex.find_at(haystack, start).map(|m| Range { start: m.start(), end: m.end() })
        }
    }
}

/// Compile `table` into a [`CompiledPattern`] for `options`.
pub fn compile_pattern(table: &ColorTable, options: &ColoringOptions) -> Result<CompiledPattern> {
    let mut words: Vec<&str> = table.words().collect();
    // Stable: equal-length words keep table order.
    words.sort_by_key(|w| std::cmp::Reverse(w.chars().count()));

    let mut alternatives: Vec<String> = Vec::with_capacity(words.len() * 2);
    for word in &words {
        let escaped = regex::escape(word);
        match (options.whole_words, options.bold_plurals) {
            (true, true) => {
                alternatives.push(format!(r"\b{escaped}\b"));
                alternatives.push(format!(r"\b{escaped}s\b"));
            }
            (true, false) => alternatives.push(format!(r"\b{escaped}\b")),
            (false, true) => {
                alternatives.push(escaped.clone());
                alternatives.push(format!("{escaped}s"));
            }
            (false, false) => alternatives.push(escaped),
        }
    }

    let guarded = !options.whole_words && !options.bold_plurals && !alternatives.is_empty();
    let source = if alternatives.is_empty() {
        NEVER_MATCHES.to_string()
    } else if guarded {
        format!("(?P<{WORD_GROUP}>{}){PLURAL_GUARD}", alternatives.join("|"))
    } else {
        alternatives.join("|")
    };

    let regex = RegexBuilder::new(&source).case_insensitive(options.case_insensitive).build()?;

    let key_map: HashMap<String, String> = table
        .iter()
        .map(|(word, color)| {
            let key = if options.case_insensitive { word.to_lowercase() } else { word.to_string() };
            (key, color.to_string())
        })
        .collect();

    debug!(
        words = words.len(),
        keys = key_map.len(),
        whole_words = options.whole_words,
        case_insensitive = options.case_insensitive,
        bold_plurals = options.bold_plurals,
        guarded,
        "compiled color pattern"
    );

    Ok(CompiledPattern {
        regex,
        key_map,
        guarded,
        case_insensitive: options.case_insensitive,
        word_count: words.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(whole_words: bool, bold_plurals: bool) -> ColoringOptions {
        ColoringOptions { whole_words, bold_plurals, case_insensitive: false, ..ColoringOptions::default() }
    }

    fn table(pairs: &[(&'static str, &'static str)]) -> ColorTable {
        pairs.iter().copied().collect()
    }

    fn spans(pattern: &CompiledPattern, text: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut pos = 0;
        while let Some(r) = pattern.find_at(text, pos) {
            out.push(text[r.start..r.end].to_string());
            pos = r.end;
        }
        out
    }

    #[test]
    fn longer_words_come_first() {
        let p = compile_pattern(&table(&[("cat", "#111"), ("caterpillar", "#222")]), &opts(false, true)).unwrap();
        assert!(p.as_str().starts_with("caterpillar|caterpillars|cat|cats"));
        assert_eq!(spans(&p, "the caterpillar ran"), vec!["caterpillar"]);
    }

    #[test]
    fn equal_length_words_keep_table_order() {
        let p = compile_pattern(&table(&[("dog", "#1"), ("cat", "#2")]), &opts(true, false)).unwrap();
        assert_eq!(p.as_str(), r"\bdog\b|\bcat\b");
    }

    #[test]
    fn length_is_counted_in_characters() {
        // "éé" is 4 bytes but 2 characters; "abc" must still sort first.
        let p = compile_pattern(&table(&[("éé", "#1"), ("abc", "#2")]), &opts(true, false)).unwrap();
        assert!(p.as_str().starts_with(r"\babc\b"));
    }

    #[test]
    fn words_are_escaped() {
        let p = compile_pattern(&table(&[("a.b", "#1")]), &opts(false, true)).unwrap();
        assert_eq!(spans(&p, "axb a.b"), vec!["a.b"]);
    }

    #[test]
    fn whole_words_respect_boundaries() {
        let p = compile_pattern(&table(&[("cat", "#1")]), &opts(true, true)).unwrap();
        assert_eq!(spans(&p, "cat cats concat catalog"), vec!["cat", "cats"]);

        let p = compile_pattern(&table(&[("cat", "#1")]), &opts(true, false)).unwrap();
        assert_eq!(spans(&p, "cat cats"), vec!["cat"]);
    }

    #[test]
    fn bare_mode_matches_inside_words() {
        let p = compile_pattern(&table(&[("cat", "#1")]), &opts(false, true)).unwrap();
        // Leftmost-first takes the bare stem before `cats`.
        assert_eq!(spans(&p, "concat cats"), vec!["cat", "cat"]);
    }

    #[test]
    fn guard_suppresses_stem_followed_by_s() {
        let p = compile_pattern(&table(&[("bug", "#1")]), &opts(false, false)).unwrap();
        assert_eq!(spans(&p, "bugs"), Vec::<String>::new());
        assert_eq!(spans(&p, "bug"), vec!["bug"]);
        assert_eq!(spans(&p, "debugger"), vec!["bug"]);
    }

    #[test]
    fn guard_falls_through_to_shorter_alternative() {
        // `bug` is followed by `s`, so `bu` (followed by `g`) matches instead.
        let p = compile_pattern(&table(&[("bug", "#1"), ("bu", "#2")]), &opts(false, false)).unwrap();
        assert_eq!(spans(&p, "bugs"), vec!["bu"]);
    }

    #[test]
    fn guard_does_not_swallow_adjacent_matches() {
        let p = compile_pattern(&table(&[("cat", "#1")]), &opts(false, false)).unwrap();
        assert_eq!(spans(&p, "catcat"), vec!["cat", "cat"]);
    }

    #[test]
    fn guard_is_case_insensitive_with_the_pattern() {
        let options = ColoringOptions { whole_words: false, bold_plurals: false, ..ColoringOptions::default() };
        let p = compile_pattern(&table(&[("bug", "#1")]), &options).unwrap();
        assert_eq!(spans(&p, "BUGS Bug"), vec!["Bug"]);
    }

    #[test]
    fn empty_table_never_matches() {
        for (ww, bp) in [(true, true), (true, false), (false, true), (false, false)] {
            let p = compile_pattern(&ColorTable::new(), &opts(ww, bp)).unwrap();
            assert!(p.is_empty());
            assert_eq!(p.as_str(), NEVER_MATCHES);
            assert!(p.find_at("anything at all", 0).is_none());
            assert!(p.find_at("", 0).is_none());
        }
    }

    #[test]
    fn key_map_is_normalized_last_writer_wins() {
        let t = table(&[("Bug", "#1"), ("bug", "#2")]);

        let insensitive = compile_pattern(&t, &ColoringOptions::default()).unwrap();
        assert_eq!(insensitive.color_for("bug"), Some("#2"));
        assert_eq!(insensitive.color_for("Bug"), None);

        let sensitive = compile_pattern(&t, &opts(true, true)).unwrap();
        assert_eq!(sensitive.color_for("Bug"), Some("#1"));
        assert_eq!(sensitive.color_for("bug"), Some("#2"));
    }
}
