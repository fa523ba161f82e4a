//! Annotation run metrics.
//!
//! `Annotator::run_with_metrics` fills these in alongside the result. They
//! exist for the verbose API and the CLI report; the plain `annotate` path
//! simply drops them.
//!
//! Counts are per fragment. The resolution counters partition `matches`:
//! `resolved_direct + resolved_plural + resolved_lowercase + unresolved ==
//! matches`. Of the resolved matches, `unstyled` were left plain because no
//! style toggle was on, and the rest were `wrapped`.

use std::time::Duration;

use crate::{AnnotationResult, Range, Resolution};

/// Keep at most this many samples per run.
pub const MAX_SAMPLES: usize = 8;

#[derive(Debug, Default, Clone)]
pub struct AnnotateMetrics {
    /// Total elapsed time for the run.
    pub total: Duration,
    /// Time spent unwrapping previous annotations.
    pub normalize: Duration,
    /// Time spent splitting tags from text.
    pub segment: Duration,
    /// Time spent matching, resolving and wrapping.
    pub matching: Duration,
    /// Marker spans removed by normalization.
    pub unwrapped: usize,
    pub text_chunks: usize,
    pub tag_chunks: usize,
    /// Pattern matches found in text chunks.
    pub matches: usize,
    pub resolved_direct: usize,
    pub resolved_plural: usize,
    pub resolved_lowercase: usize,
    pub unresolved: usize,
    /// Resolved matches left plain because the style mask was empty.
    pub unstyled: usize,
    pub wrapped: usize,
    /// First few resolved matches, for debugging.
    pub samples: Vec<MatchSample>,
}

impl AnnotateMetrics {
    pub(crate) fn record(&mut self, resolution: Option<Resolution>) {
        self.matches += 1;
        match resolution {
            Some(Resolution::Direct) => self.resolved_direct += 1,
            Some(Resolution::Plural) => self.resolved_plural += 1,
            Some(Resolution::Lowercase) => self.resolved_lowercase += 1,
            None => self.unresolved += 1,
        }
    }

    pub(crate) fn sample(&mut self, sample: MatchSample) {
        if self.samples.len() < MAX_SAMPLES {
            self.samples.push(sample);
        }
    }
}

/// A resolved match. `range` is relative to the normalized fragment.
#[derive(Debug, Clone)]
pub struct MatchSample {
    pub(crate) range: Range,
    pub text: String,
    pub color: String,
    pub(crate) resolution: Resolution,
}

impl MatchSample {
    pub fn start(&self) -> usize {
        self.range.start
    }

    pub fn end(&self) -> usize {
        self.range.end
    }

    pub fn is_plural(&self) -> bool {
        self.resolution == Resolution::Plural
    }

    pub fn resolution_name(&self) -> &'static str {
        match self.resolution {
            Resolution::Direct => "direct",
            Resolution::Plural => "plural",
            Resolution::Lowercase => "lowercase",
        }
    }
}

/// Annotator output bundled with its metrics.
#[derive(Debug, Clone)]
pub struct AnnotateRun {
    pub result: AnnotationResult,
    pub metrics: AnnotateMetrics,
}
