use std::time::Duration;

use crate::engine::{self, AnnotateMetrics, Annotator, CompiledPattern, MatchSample};
use crate::error::Result;
use crate::{AnnotationResult, ColorTable, ColoringOptions};

/// Compile `table` for `options`.
///
/// Call once per run and reuse the result for every fragment. An empty table
/// is valid and yields a pattern that never matches.
///
/// # Example
/// ```
/// use wordtint::{ColorTable, ColoringOptions, compile};
///
/// let table: ColorTable = [("cat", "#111"), ("caterpillar", "#222")].into_iter().collect();
/// let pattern = compile(&table, &ColoringOptions::default()).unwrap();
/// assert_eq!(pattern.word_count(), 2);
/// ```
pub fn compile(table: &ColorTable, options: &ColoringOptions) -> Result<CompiledPattern> {
    engine::compile_pattern(table, options)
}

/// Annotate one HTML fragment.
///
/// Previous annotations are removed first, so the output reflects only the
/// current `options`. `options` must be the value `pattern` was compiled with.
pub fn annotate(html: &str, pattern: &CompiledPattern, options: &ColoringOptions) -> AnnotationResult {
    Annotator::new(pattern, options).run(html)
}

/// A compact summary of one wrapped match.
#[derive(Debug, Clone)]
pub struct MatchSummary {
    /// Start byte offset in the normalized fragment.
    pub start: usize,
    /// End byte offset in the normalized fragment (exclusive).
    pub end: usize,
    pub text: String,
    pub color: String,
    /// `"direct"`, `"plural"` or `"lowercase"`.
    pub resolution: String,
    pub plural: bool,
}

/// Additional details returned by [`annotate_verbose`].
#[derive(Debug, Clone)]
pub struct AnnotationDetails {
    pub total: Duration,
    pub normalize: Duration,
    pub segment: Duration,
    pub matching: Duration,
    /// Wrappers from earlier runs that were removed.
    pub unwrapped: usize,
    pub text_chunks: usize,
    pub tag_chunks: usize,
    pub matches: usize,
    pub resolved_direct: usize,
    pub resolved_plural: usize,
    pub resolved_lowercase: usize,
    pub unresolved: usize,
    pub unstyled: usize,
    pub wrapped: usize,
    /// The first few wrapped matches.
    pub samples: Vec<MatchSummary>,
    /// The combined pattern, for inspection.
    pub pattern: String,
}

/// Result from [`annotate_verbose`].
#[derive(Debug, Clone)]
pub struct AnnotationResultVerbose {
    pub result: AnnotationResult,
    pub details: AnnotationDetails,
}

/// Annotate `html` and return timing and match details alongside the result.
///
/// The plain [`annotate`] path produces the same `result`.
pub fn annotate_verbose(html: &str, pattern: &CompiledPattern, options: &ColoringOptions) -> AnnotationResultVerbose {
    let run = Annotator::new(pattern, options).run_with_metrics(html);
    let details = metrics_to_details(&run.metrics, pattern);
    AnnotationResultVerbose { result: run.result, details }
}

fn metrics_to_details(metrics: &AnnotateMetrics, pattern: &CompiledPattern) -> AnnotationDetails {
    AnnotationDetails {
        total: metrics.total,
        normalize: metrics.normalize,
        segment: metrics.segment,
        matching: metrics.matching,
        unwrapped: metrics.unwrapped,
        text_chunks: metrics.text_chunks,
        tag_chunks: metrics.tag_chunks,
        matches: metrics.matches,
        resolved_direct: metrics.resolved_direct,
        resolved_plural: metrics.resolved_plural,
        resolved_lowercase: metrics.resolved_lowercase,
        unresolved: metrics.unresolved,
        unstyled: metrics.unstyled,
        wrapped: metrics.wrapped,
        samples: metrics.samples.iter().map(sample_to_summary).collect(),
        pattern: pattern.as_str().to_string(),
    }
}

fn sample_to_summary(sample: &MatchSample) -> MatchSummary {
    MatchSummary {
        start: sample.start(),
        end: sample.end(),
        text: sample.text.chars().take(80).collect(),
        color: sample.color.clone(),
        resolution: sample.resolution_name().to_string(),
        plural: sample.is_plural(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bug_table() -> ColorTable {
        [("bug", "#0a0")].into_iter().collect()
    }

    #[test]
    fn annotate_and_verbose_agree() {
        let options = ColoringOptions::default();
        let pattern = compile(&bug_table(), &options).unwrap();
        let html = "<p>bug</p> and bugs";

        let plain = annotate(html, &pattern, &options);
        let verbose = annotate_verbose(html, &pattern, &options);

        assert_eq!(plain, verbose.result);
        assert_eq!(verbose.details.wrapped, 2);
        assert_eq!(verbose.details.resolved_plural, 1);
        assert!(verbose.details.matching <= verbose.details.total);
        assert_eq!(verbose.details.pattern, pattern.as_str());
    }

    #[test]
    fn verbose_samples_flag_plurals() {
        let options = ColoringOptions::default();
        let pattern = compile(&bug_table(), &options).unwrap();
        let res = annotate_verbose("bugs", &pattern, &options);

        let sample = &res.details.samples[0];
        assert_eq!((sample.start, sample.end), (0, 4));
        assert_eq!(sample.text, "bugs");
        assert_eq!(sample.color, "#0a0");
        assert_eq!(sample.resolution, "plural");
        assert!(sample.plural);
    }

    #[test]
    fn empty_table_compiles() {
        let pattern = compile(&ColorTable::new(), &ColoringOptions::default()).unwrap();
        assert!(pattern.is_empty());
        let res = annotate("bug", &pattern, &ColoringOptions::default());
        assert_eq!(res.replacements, 0);
        assert_eq!(res.html, "bug");
    }
}
