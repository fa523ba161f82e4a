//! Match → color resolution.
//!
//! The combined pattern only says *that* something matched; which table entry
//! it belongs to is decided here, by looking the matched text up in the key
//! map. Three attempts are made, in order:
//!
//! ```text
//! matched ──▶ key(matched)                 hit ─▶ Direct
//!        └──▶ key(matched minus "s"/"S")   hit ─▶ Plural     (bold_plurals only)
//!        └──▶ lowercase(matched)           hit ─▶ Lowercase  (case_insensitive only)
//!        └──▶ None: leave the text as it is
//! ```
//!
//! Resolution never changes styling: a plural-derived match is styled exactly
//! like its stem.

use tracing::trace;

use super::compiler::CompiledPattern;
use crate::{ColoringOptions, Resolution};

pub(crate) fn resolve_color<'p>(
    matched: &str,
    pattern: &'p CompiledPattern,
    options: &ColoringOptions,
) -> Option<(&'p str, Resolution)> {
    let resolved = resolve(matched, pattern, options);
    trace!(matched, resolution = ?resolved.map(|(_, how)| how), "resolved match");
    resolved
}

fn resolve<'p>(matched: &str, pattern: &'p CompiledPattern, options: &ColoringOptions) -> Option<(&'p str, Resolution)> {
    if let Some(color) = pattern.color_for(&pattern.key_for(matched)) {
        return Some((color, Resolution::Direct));
    }

    if options.bold_plurals {
        if let Some(stem) = matched.strip_suffix(['s', 'S']) {
            if let Some(color) = pattern.color_for(&pattern.key_for(stem)) {
                return Some((color, Resolution::Plural));
            }
        }
    }

    if options.case_insensitive {
        if let Some(color) = pattern.color_for(&matched.to_lowercase()) {
            return Some((color, Resolution::Lowercase));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColorTable;
    use crate::engine::compile_pattern;

    fn compiled(options: &ColoringOptions) -> CompiledPattern {
        let table: ColorTable = [("bug", "#0a0"), ("Moth", "#555")].into_iter().collect();
        compile_pattern(&table, options).unwrap()
    }

    #[test]
    fn direct_hit() {
        let options = ColoringOptions::default();
        let p = compiled(&options);
        assert_eq!(resolve_color("BUG", &p, &options), Some(("#0a0", Resolution::Direct)));
    }

    #[test]
    fn plural_stem_hit_only_with_plurals_enabled() {
        let on = ColoringOptions::default();
        let p = compiled(&on);
        assert_eq!(resolve_color("Bugs", &p, &on), Some(("#0a0", Resolution::Plural)));
        assert_eq!(resolve_color("BUGS", &p, &on), Some(("#0a0", Resolution::Plural)));

        let off = ColoringOptions { bold_plurals: false, ..on };
        let p = compiled(&off);
        assert_eq!(resolve_color("bugs", &p, &off), None);
    }

    #[test]
    fn case_sensitive_lookup_is_exact() {
        let options = ColoringOptions { case_insensitive: false, ..ColoringOptions::default() };
        let p = compiled(&options);
        assert_eq!(resolve_color("Moth", &p, &options), Some(("#555", Resolution::Direct)));
        assert_eq!(resolve_color("Moths", &p, &options), Some(("#555", Resolution::Plural)));
        assert_eq!(resolve_color("moth", &p, &options), None);
    }

    #[test]
    fn unknown_text_is_unresolved() {
        let options = ColoringOptions::default();
        let p = compiled(&options);
        assert_eq!(resolve_color("s", &p, &options), None);
        assert_eq!(resolve_color("ant", &p, &options), None);
    }
}
