//! Removal of wrappers left by earlier runs.
//!
//! Every span this crate writes carries the `cc-color` marker class. Before
//! matching, each such span is replaced by its inner text, so the output of a
//! run depends only on the current options and never on the history of
//! previous runs. This is what lets a run with every style toggle off fully
//! de-style a fragment.
//!
//! The pattern is non-greedy and does not understand nesting: a foreign
//! `</span>` inside a marker span ends the unwrap early. The crate never
//! writes nested markers, so this only matters for hand-edited content.

use std::borrow::Cow;

use regex::Captures;

/// Unwrap every marker span in `html`.
///
/// Returns the normalized fragment (borrowed when nothing was unwrapped) and
/// the number of spans removed.
pub(crate) fn strip_annotations(html: &str) -> (Cow<'_, str>, usize) {
    let wrapper = regex!(r#"(?is)<span class="cc-color"[^>]*>(.*?)</span>"#);

    let mut unwrapped = 0usize;
    let normalized = wrapper.replace_all(html, |caps: &Captures<'_>| {
        unwrapped += 1;
        caps.get(1).map_or(String::new(), |m| m.as_str().to_string())
    });
    (normalized, unwrapped)
}
