//! Pattern compilation and HTML annotation engine.
//!
//! Annotating a fragment is a two-stage pipeline. The first stage runs once per
//! batch run; the second once per fragment:
//!
//! ```text
//! ColorTable + ColoringOptions
//!        │  compile_pattern                  (compiler.rs)
//!        │   - longest words first
//!        │   - whole-word / plural alternatives
//!        v
//! CompiledPattern { regex, key map }
//!        │
//! html ──┼─ strip_annotations                (normalize.rs)
//!        │   - unwrap previous cc-color spans
//!        ├─ segment                          (segment.rs)
//!        │   - alternate text / <tag> chunks
//!        ├─ Annotator::run                   (annotator.rs)
//!        │   - match inside text chunks only
//!        │   - resolve_color                 (resolve.rs)
//!        │   - StyleMask::declaration + wrap (style.rs)
//!        v
//! AnnotationResult { html, replacements }
//! ```
//!
//! Nothing here holds state between calls. A `CompiledPattern` is immutable
//! and can be shared by reference across threads.
//!
//! ## Responsibilities by module
//!
//! - `compiler.rs`: builds the combined regex and the normalized key map.
//! - `normalize.rs`: removes wrappers written by earlier runs.
//! - `segment.rs`: the tag/text split; tolerant of unbalanced markup.
//! - `resolve.rs`: maps a matched span to a color (direct, plural stem,
//!   lowercase retry).
//! - `style.rs`: turns options into style bits and renders the wrapper span.
//! - `annotator.rs`: drives the above over one fragment.
//! - `metrics.rs`: opt-in timings and match statistics.

#[path = "engine/annotator.rs"]
mod annotator;
#[path = "engine/compiler.rs"]
mod compiler;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/normalize.rs"]
mod normalize;
#[path = "engine/resolve.rs"]
mod resolve;
#[path = "engine/segment.rs"]
mod segment;
#[path = "engine/style.rs"]
mod style;


pub use annotator::Annotator;
pub use compiler::{CompiledPattern, compile_pattern};
#[allow(unused_imports)]
pub use metrics::{AnnotateMetrics, AnnotateRun, MatchSample};
