/// Compile a literal pattern once and hand out a `&'static Regex`.
///
/// Only for fixed, known-good patterns; user-provided words go through
/// `engine::compiler` instead.
#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).expect(concat!("invalid static regex: ", $pat)));
        &*RE
    }};
}
