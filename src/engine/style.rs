//! Style bits and wrapper rendering.

use crate::ColoringOptions;

/// Marker class identifying spans written by this crate.
pub const MARKER_CLASS: &str = "cc-color";

bitflags::bitflags! {
    /// Which declarations a wrapper carries. Derived once per run from the
    /// options; an empty mask means matches are left as plain text.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StyleMask: u8 {
        const COLOR  = 1 << 0;
        const BOLD   = 1 << 1;
        const ITALIC = 1 << 2;
    }
}

impl StyleMask {
    pub fn from_options(options: &ColoringOptions) -> Self {
        let mut mask = StyleMask::empty();
        mask.set(StyleMask::COLOR, options.colorize);
        mask.set(StyleMask::BOLD, options.bold);
        mask.set(StyleMask::ITALIC, options.italic);
        mask
    }

    /// Inline style for a match resolved to `color`, or `None` when the mask
    /// is empty.
    ///
    /// Declarations appear in color, bold, italic order, separated by one
    /// space: `color:#0a0; font-weight:bold;`.
    pub fn declaration(self, color: &str) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let mut bits: Vec<String> = Vec::with_capacity(3);
        if self.contains(StyleMask::COLOR) {
            bits.push(format!("color:{};", escape_attr(color)));
        }
        if self.contains(StyleMask::BOLD) {
            bits.push("font-weight:bold;".to_string());
        }
        if self.contains(StyleMask::ITALIC) {
            bits.push("font-style:italic;".to_string());
        }
        Some(bits.join(" "))
    }
}

/// Wrap `text` (verbatim) in a marker span carrying `style`.
pub(crate) fn wrap(text: &str, style: &str) -> String {
    format!(r#"<span class="{MARKER_CLASS}" style="{style}">{text}</span>"#)
}

// A color containing `"` or `>` would otherwise end the attribute or the tag,
// and the normalizer could no longer find the wrapper.
fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(colorize: bool, bold: bool, italic: bool) -> StyleMask {
        StyleMask::from_options(&ColoringOptions { colorize, bold, italic, ..ColoringOptions::default() })
    }

    #[test]
    fn mask_follows_toggles() {
        assert_eq!(mask(true, true, true), StyleMask::all());
        assert_eq!(mask(false, true, false), StyleMask::BOLD);
        assert!(mask(false, false, false).is_empty());
    }

    #[test]
    fn declaration_orders_and_joins_bits() {
        assert_eq!(mask(true, false, false).declaration("#0a0").as_deref(), Some("color:#0a0;"));
        assert_eq!(
            mask(true, true, true).declaration("red").as_deref(),
            Some("color:red; font-weight:bold; font-style:italic;")
        );
        assert_eq!(mask(false, true, true).declaration("red").as_deref(), Some("font-weight:bold; font-style:italic;"));
        assert_eq!(mask(false, false, false).declaration("red"), None);
    }

    #[test]
    fn declaration_escapes_color() {
        assert_eq!(
            mask(true, false, false).declaration(r#"red"><b>"#).as_deref(),
            Some("color:red&quot;&gt;&lt;b&gt;;")
        );
    }

    #[test]
    fn wrap_preserves_text() {
        assert_eq!(wrap("Bugs", "color:#0a0;"), r#"<span class="cc-color" style="color:#0a0;">Bugs</span>"#);
    }
}
