//! Fragment annotation.
//!
//! `Annotator` applies one compiled pattern to one fragment:
//!
//! ```text
//! html ─▶ strip_annotations ─▶ segment ─┬─ Tag  ─────────────────────────▶ copied verbatim
//!                                       └─ Text ─▶ find_at loop
//!                                                   ├─ resolve_color ─ None ─▶ copied
//!                                                   └─ declaration ── None ─▶ copied
//!                                                                   └─ Some ─▶ wrap()
//! ```
//!
//! ## Replacement count
//!
//! The count is chosen so that `replacements == 0` exactly when the returned
//! html equals the input:
//!
//! - output identical to the input (nothing matched, or the same wrappers
//!   were re-applied) → input returned, count 0;
//! - otherwise, if anything was wrapped → number of wraps;
//! - otherwise (a de-styling run) → number of wrappers removed, which is
//!   non-zero because the output differs from the input.

use std::time::Instant;

use tracing::trace;

use super::compiler::CompiledPattern;
use super::metrics::{AnnotateMetrics, AnnotateRun, MatchSample};
use super::normalize::strip_annotations;
use super::resolve::resolve_color;
use super::segment::segment;
use super::style::{StyleMask, wrap};
use crate::{AnnotationResult, Chunk, ColoringOptions, Range};

/// Applies a [`CompiledPattern`] to HTML fragments.
///
/// Cheap to construct. It borrows the pattern and options and holds no other
/// state, so one annotator can serve any number of fragments.
#[derive(Debug, Clone, Copy)]
pub struct Annotator<'a> {
    pattern: &'a CompiledPattern,
    options: &'a ColoringOptions,
    style: StyleMask,
}

impl<'a> Annotator<'a> {
    pub fn new(pattern: &'a CompiledPattern, options: &'a ColoringOptions) -> Self {
        Self { pattern, options, style: StyleMask::from_options(options) }
    }

    /// Annotate `html`.
    pub fn run(&self, html: &str) -> AnnotationResult {
        self.run_with_metrics(html).result
    }

    /// Annotate `html` and report timings and match statistics.
    pub fn run_with_metrics(&self, html: &str) -> AnnotateRun {
        let started = Instant::now();
        let mut metrics = AnnotateMetrics::default();

        if html.is_empty() || self.pattern.is_empty() {
            metrics.total = started.elapsed();
            return AnnotateRun { result: AnnotationResult::unchanged(html), metrics };
        }

        let phase = Instant::now();
        let (normalized, unwrapped) = strip_annotations(html);
        metrics.normalize = phase.elapsed();
        metrics.unwrapped = unwrapped;

        let phase = Instant::now();
        let chunks = segment(&normalized);
        metrics.segment = phase.elapsed();

        let phase = Instant::now();
        let mut out = String::with_capacity(normalized.len() + normalized.len() / 4);
        let mut offset = 0;
        for chunk in &chunks {
            match chunk {
                Chunk::Tag(tag) => {
                    metrics.tag_chunks += 1;
                    out.push_str(tag);
                }
                Chunk::Text(text) => {
                    metrics.text_chunks += 1;
                    self.annotate_text(text, offset, &mut out, &mut metrics);
                }
            }
            offset += chunk.as_str().len();
        }
        metrics.matching = phase.elapsed();

        let result = if out == html {
            AnnotationResult::unchanged(html)
        } else if metrics.wrapped > 0 {
            AnnotationResult { html: out, replacements: metrics.wrapped }
        } else {
            AnnotationResult { html: out, replacements: metrics.unwrapped }
        };

        trace!(
            matches = metrics.matches,
            wrapped = metrics.wrapped,
            unwrapped = metrics.unwrapped,
            replacements = result.replacements,
            "annotated fragment"
        );

        metrics.total = started.elapsed();
        AnnotateRun { result, metrics }
    }

    /// Match inside one text chunk, appending the rewritten text to `out`.
    ///
    /// `offset` is the chunk's position in the normalized fragment; it only
    /// feeds the sample ranges.
    fn annotate_text(&self, text: &str, offset: usize, out: &mut String, metrics: &mut AnnotateMetrics) {
        let mut pos = 0;
        while pos < text.len() {
            let Some(m) = self.pattern.find_at(text, pos) else {
                break;
            };
            out.push_str(&text[pos..m.start]);

            if m.is_empty() {
                // Only reachable for a degenerate pattern; step over one char.
                let step = text[m.start..].chars().next().map_or(1, char::len_utf8);
                out.push_str(&text[m.start..m.start + step]);
                pos = m.start + step;
                continue;
            }

            let matched = &text[m.start..m.end];
            let resolved = resolve_color(matched, self.pattern, self.options);
            metrics.record(resolved.map(|(_, how)| how));

            match resolved.and_then(|(color, how)| self.style.declaration(color).map(|style| (color, how, style))) {
                Some((color, how, style)) => {
                    out.push_str(&wrap(matched, &style));
                    metrics.wrapped += 1;
                    metrics.sample(MatchSample {
                        range: Range { start: offset + m.start, end: offset + m.end },
                        text: matched.to_string(),
                        color: color.to_string(),
                        resolution: how,
                    });
                }
                None => {
                    if resolved.is_some() {
                        metrics.unstyled += 1;
                    }
                    out.push_str(matched);
                }
            }
            pos = m.end;
        }
        if pos < text.len() {
            out.push_str(&text[pos..]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColorTable;
    use crate::engine::compile_pattern;

    fn run(pairs: &[(&'static str, &'static str)], options: ColoringOptions, html: &str) -> AnnotateRun {
        let table: ColorTable = pairs.iter().copied().collect();
        let pattern = compile_pattern(&table, &options).unwrap();
        Annotator::new(&pattern, &options).run_with_metrics(html)
    }

    fn color_only() -> ColoringOptions {
        ColoringOptions { bold: false, italic: false, colorize: true, ..ColoringOptions::default() }
    }

    #[test]
    fn wraps_words_in_text_chunks() {
        let out = run(&[("fox", "orange")], color_only(), "<p>The fox</p>");
        assert_eq!(out.result.html, r#"<p>The <span class="cc-color" style="color:orange;">fox</span></p>"#);
        assert_eq!(out.result.replacements, 1);
        assert_eq!(out.metrics.text_chunks, 3);
        assert_eq!(out.metrics.tag_chunks, 2);
    }

    #[test]
    fn empty_fragment_is_a_no_op() {
        let out = run(&[("fox", "orange")], color_only(), "");
        assert_eq!(out.result, AnnotationResult { html: String::new(), replacements: 0 });
    }

    #[test]
    fn empty_table_does_not_touch_the_fragment() {
        let html = r#"<span class="cc-color" style="color:red;">fox</span>"#;
        let out = run(&[], color_only(), html);
        assert_eq!(out.result.html, html);
        assert_eq!(out.result.replacements, 0);
        assert_eq!(out.metrics.unwrapped, 0);
    }

    #[test]
    fn stale_wrapper_is_stripped_and_counted_with_toggles_on() {
        let html = r#"a <span class="cc-color" style="color:red;">moth</span> flew"#;
        let out = run(&[("fox", "orange")], color_only(), html);
        assert_eq!(out.metrics.wrapped, 0);
        assert_eq!(out.metrics.unwrapped, 1);
        assert_eq!(out.result, AnnotationResult { html: "a moth flew".to_string(), replacements: 1 });
    }

    #[test]
    fn sample_ranges_point_into_normalized_fragment() {
        let out = run(&[("fox", "orange")], color_only(), "<b>a</b> fox");
        let sample = &out.metrics.samples[0];
        assert_eq!((sample.start(), sample.end()), (9, 12));
        assert_eq!(sample.text, "fox");
        assert_eq!(sample.color, "orange");
        assert_eq!(sample.resolution_name(), "direct");
    }

    #[test]
    fn metrics_partition_matches() {
        let options = ColoringOptions { whole_words: false, ..color_only() };
        let out = run(&[("ant", "#1"), ("bee", "#2")], options, "ants and bees, an ant");
        let m = &out.metrics;
        assert_eq!(m.matches, m.resolved_direct + m.resolved_plural + m.resolved_lowercase + m.unresolved);
        assert_eq!(m.wrapped, m.matches - m.unresolved - m.unstyled);
        assert_eq!(out.result.replacements, m.wrapped);
    }

    #[test]
    fn resolved_but_unstyled_matches_are_counted() {
        let options = ColoringOptions { bold: false, italic: false, colorize: false, ..ColoringOptions::default() };
        let out = run(&[("fox", "orange")], options, "fox");
        assert_eq!(out.metrics.unstyled, 1);
        assert_eq!(out.metrics.wrapped, 0);
        assert_eq!(out.result.html, "fox");
        assert_eq!(out.result.replacements, 0);
    }

    #[test]
    fn samples_are_capped() {
        let html = "fox ".repeat(20);
        let out = run(&[("fox", "orange")], color_only(), &html);
        assert_eq!(out.result.replacements, 20);
        assert_eq!(out.metrics.samples.len(), super::super::metrics::MAX_SAMPLES);
    }
}
