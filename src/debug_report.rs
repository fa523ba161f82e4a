use wordtint::{AnnotationDetails, AnnotationResultVerbose, BatchReport, MatchSummary};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(input: &str, run: &AnnotationResultVerbose, color: bool) {
    let palette = ansi::Palette::new(color);
    let details = &run.details;
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Annotating: \"{}\"", preview(input)), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Pattern ━━━", ansi::GRAY));
    println!("  {}", palette.dim(preview(&details.pattern)));

    println!("\n{}", palette.paint("━━━ Matching ━━━", ansi::GRAY));
    print_matching(details, &palette);

    println!("\n{}", palette.paint("━━━ Wrapped ━━━", ansi::GRAY));
    if details.samples.is_empty() {
        println!("{}", palette.dim("  Nothing wrapped"));
        if details.matches == 0 {
            println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
            println!("  • No configured word occurs in a text chunk (words in tags are never matched)");
            println!("  • Whole-word mode rejected a match inside a longer word");
            println!("  • Plural matching is off and only plurals occur");
        } else if details.unstyled > 0 {
            println!("\n{}", palette.dim("  Tip: all style toggles are off; matches were left as plain text"));
        }
    } else {
        for (idx, sample) in details.samples.iter().enumerate() {
            println!("  {} {}", palette.paint(format!("[{}]", idx), ansi::GRAY), fmt_sample(sample, &palette));
        }
        if details.wrapped > details.samples.len() {
            println!("  {}", palette.dim(format!("... +{} more", details.wrapped - details.samples.len())));
        }
    }

    println!("\n{}", palette.paint("━━━ Result ━━━", ansi::GRAY));
    let replacements = run.result.replacements;
    println!(
        "  Replacements: {}",
        if replacements > 0 {
            palette.paint(format!("✓ {}", replacements), ansi::GREEN)
        } else {
            palette.dim(format!("✗ {} (unchanged)", replacements))
        }
    );

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Normalize: {}  │  Segment: {}  │  Matching: {}",
        palette.paint(format!("{:?}", details.total), ansi::GREEN),
        palette.dim(format!("{:?}", details.normalize)),
        palette.dim(format!("{:?}", details.segment)),
        palette.paint(format!("{:?}", details.matching), ansi::CYAN),
    );
    println!();
}

pub fn print_batch(decks: &[String], include_children: bool, report: &BatchReport, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("{}", palette.bold(palette.paint("Color coding complete.", ansi::GREEN)));
    println!();
    println!("Decks: {}", decks.join(", "));
    println!("Include subdecks: {}", if include_children { "Yes" } else { "No" });
    println!("{}", report);
}

fn print_matching(details: &AnnotationDetails, palette: &ansi::Palette) {
    println!(
        "  {} {}  {} {}  {} {}",
        palette.dim("chunks:"),
        palette.paint(format!("{} text / {} tag", details.text_chunks, details.tag_chunks), ansi::BLUE),
        palette.dim("│ unwrapped:"),
        palette.paint(details.unwrapped.to_string(), ansi::YELLOW),
        palette.dim("│ matches:"),
        palette.paint(details.matches.to_string(), ansi::YELLOW),
    );
    println!(
        "  {} {}  {} {}  {} {}  {} {}  {} {}",
        palette.dim("direct:"),
        details.resolved_direct,
        palette.dim("plural:"),
        details.resolved_plural,
        palette.dim("lowercase:"),
        details.resolved_lowercase,
        palette.dim("unresolved:"),
        details.unresolved,
        palette.dim("unstyled:"),
        details.unstyled,
    );
}

fn fmt_sample(sample: &MatchSummary, palette: &ansi::Palette) -> String {
    format!(
        "{} {} {} {}",
        palette.bold(palette.paint(&sample.text, ansi::GREEN)),
        palette.dim("│"),
        palette.paint(format!("span {}..{}", sample.start, sample.end), ansi::YELLOW),
        palette.paint(format!("{} ({})", sample.color, sample.resolution), ansi::BLUE),
    )
}

fn preview(s: &str) -> String {
    let mut out: String = s.chars().take(120).collect();
    if s.chars().count() > 120 {
        out.push('…');
    }
    out
}
