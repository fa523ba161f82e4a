mod debug_report;

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use tracing_subscriber::EnvFilter;
use wordtint::config::DATA_FILE_NAME;
use wordtint::{
    BatchOptions, ColorTable, ColoringOptions, Config, DeckSelection, Error, NoteCollection, annotate,
    annotate_verbose, compile, run_batch, table,
};

const LOG_ENV: &str = "WORDTINT_LOG";

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    init_tracing(config.verbose);

    if let Err(err) = run(&config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

enum Mode {
    Fragment { input: String },
    Batch { notes: PathBuf, decks: Vec<String>, include_children: bool, skip_cloze: bool, dry_run: bool },
}

/// Per-run toggles given on the command line; `None` keeps the config value.
#[derive(Default)]
struct Toggles {
    whole_words: Option<bool>,
    case_insensitive: Option<bool>,
    bold: Option<bool>,
    italic: Option<bool>,
    plurals: Option<bool>,
    colorize: Option<bool>,
}

struct CliConfig {
    mode: Mode,
    table: Option<PathBuf>,
    config: Option<PathBuf>,
    toggles: Toggles,
    remember: bool,
    report: bool,
    color: bool,
    verbose: bool,
}

fn run(cli: &CliConfig) -> Result<(), Error> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let table = load_table(cli, &config)?;
    let options = resolve_options(&config, &cli.toggles);

    if cli.remember {
        if let Some(path) = &cli.config {
            config.remember(&options);
            config.save(path)?;
        }
    }

    match &cli.mode {
        Mode::Fragment { input } => {
            if table.is_empty() {
                return Err(Error::EmptyTable);
            }
            let pattern = compile(&table, &options)?;
            if cli.report {
                let run = annotate_verbose(input, &pattern, &options);
                debug_report::print_run(input, &run, cli.color);
                println!("{}", run.result.html);
            } else {
                println!("{}", annotate(input, &pattern, &options).html);
            }
        }
        Mode::Batch { notes, decks, include_children, skip_cloze, dry_run } => {
            let mut collection = NoteCollection::load(notes)?;
            let selection = DeckSelection::new(decks.iter().cloned(), *include_children);
            let batch = BatchOptions { skip_cloze: *skip_cloze, dry_run: *dry_run };
            let cancel = AtomicBool::new(false);

            let report = run_batch(&mut collection, &table, &options, &selection, &batch, &cancel)?;
            if !dry_run && report.notes_modified > 0 {
                collection.save(notes)?;
            }
            debug_report::print_batch(decks, *include_children, &report, cli.color);
        }
    }
    Ok(())
}

/// `--table` wins; otherwise the config's entries, falling back to the data
/// file next to the config.
fn load_table(cli: &CliConfig, config: &Config) -> Result<ColorTable, Error> {
    if let Some(path) = &cli.table {
        return Ok(ColorTable::from_entries(&table::load_entries(path)?));
    }
    let data_path = cli.config.as_deref().map(|p| p.parent().unwrap_or(Path::new(".")).join(DATA_FILE_NAME));
    config.color_table(data_path.as_deref())
}

fn resolve_options(config: &Config, toggles: &Toggles) -> ColoringOptions {
    let mut options = config.options(toggles.whole_words.unwrap_or(true), toggles.case_insensitive.unwrap_or(true));
    options.bold = toggles.bold.unwrap_or(options.bold);
    options.italic = toggles.italic.unwrap_or(options.italic);
    options.bold_plurals = toggles.plurals.unwrap_or(options.bold_plurals);
    options.colorize = toggles.colorize.unwrap_or(options.colorize);
    options
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "wordtint=debug" } else { "wordtint=warn" }));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut notes: Option<PathBuf> = None;
    let mut decks: Vec<String> = Vec::new();
    let mut include_children = true;
    let mut skip_cloze = false;
    let mut dry_run = false;
    let mut table: Option<PathBuf> = None;
    let mut config: Option<PathBuf> = None;
    let mut toggles = Toggles::default();
    let mut remember = false;
    let mut report = false;
    let mut color = io::stdout().is_terminal();
    let mut verbose = false;
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("wordtint {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--verbose" | "-v" => verbose = true,
            "--report" => report = true,
            "--remember" => remember = true,
            "--whole-words" => toggles.whole_words = Some(true),
            "--no-whole-words" => toggles.whole_words = Some(false),
            "--case-insensitive" => toggles.case_insensitive = Some(true),
            "--case-sensitive" => toggles.case_insensitive = Some(false),
            "--bold" => toggles.bold = Some(true),
            "--no-bold" => toggles.bold = Some(false),
            "--italic" => toggles.italic = Some(true),
            "--no-italic" => toggles.italic = Some(false),
            "--plurals" => toggles.plurals = Some(true),
            "--no-plurals" => toggles.plurals = Some(false),
            "--colorize" => toggles.colorize = Some(true),
            "--no-colorize" => toggles.colorize = Some(false),
            "--no-subdecks" => include_children = false,
            "--skip-cloze" => skip_cloze = true,
            "--dry-run" => dry_run = true,
            "--table" | "-t" => table = Some(PathBuf::from(expect_value(&mut args, "--table")?)),
            "--config" | "-c" => config = Some(PathBuf::from(expect_value(&mut args, "--config")?)),
            "--notes" | "-n" => notes = Some(PathBuf::from(expect_value(&mut args, "--notes")?)),
            "--deck" | "-d" => decks.push(expect_value(&mut args, "--deck")?),
            "--input" | "-i" => {
                let value = expect_value(&mut args, "--input")?;
                set_input(&mut input, value)?;
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    set_input(&mut input, rest)?;
                }
                break;
            }
            _ if arg.starts_with("--table=") => table = Some(PathBuf::from(arg.trim_start_matches("--table="))),
            _ if arg.starts_with("--config=") => config = Some(PathBuf::from(arg.trim_start_matches("--config="))),
            _ if arg.starts_with("--notes=") => notes = Some(PathBuf::from(arg.trim_start_matches("--notes="))),
            _ if arg.starts_with("--deck=") => decks.push(arg.trim_start_matches("--deck=").to_string()),
            _ if arg.starts_with("--input=") => set_input(&mut input, arg.trim_start_matches("--input=").to_string())?,
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                set_input(&mut input, rest)?;
                break;
            }
        }
    }

    if remember && config.is_none() {
        return Err("error: --remember requires --config".to_string());
    }

    let mode = match notes {
        Some(notes) => {
            if input.is_some() {
                return Err("error: --notes cannot be combined with an input fragment".to_string());
            }
            if decks.is_empty() {
                return Err(format!("error: --notes requires at least one --deck\n\n{}", help_text()));
            }
            Mode::Batch { notes, decks, include_children, skip_cloze, dry_run }
        }
        None => {
            if !decks.is_empty() {
                return Err("error: --deck only applies with --notes".to_string());
            }
            let input = match input {
                Some(value) => value,
                None => read_stdin_input()?,
            };
            if input.trim().is_empty() {
                return Err(format!("error: no input provided\n\n{}", help_text()));
            }
            Mode::Fragment { input }
        }
    };

    Ok(CliConfig { mode, table, config, toggles, remember, report, color, verbose })
}

fn expect_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next().ok_or_else(|| format!("error: {flag} expects a value"))
}

fn set_input(input: &mut Option<String>, value: String) -> Result<(), String> {
    if input.is_some() {
        return Err("error: input provided multiple times".to_string());
    }
    *input = Some(value);
    Ok(())
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "wordtint {version}

Color-code vocabulary words inside HTML fragments.

Usage:
  wordtint [OPTIONS] [--] <html...>
  wordtint [OPTIONS] --input <html>
  wordtint [OPTIONS] --notes <file> --deck <name> [--deck <name>...]

Sources:
  -t, --table <file>         Color table: JSON array of {{word, group, color}}.
  -c, --config <file>        Config JSON (entries + remembered toggles). Without
                             --table, entries fall back to {data_file}
                             next to the config.

Matching:
  --whole-words / --no-whole-words          Default: whole words.
  --case-insensitive / --case-sensitive     Default: case-insensitive.
  --plurals / --no-plurals                  Match <word>s. Default: from config.

Styling (defaults from config):
  --colorize / --no-colorize
  --bold / --no-bold
  --italic / --no-italic
  --remember                 Save the style toggles back to --config.

Batch:
  -n, --notes <file>         JSON note collection to update in place.
  -d, --deck <name>          Deck to process (repeatable).
  --no-subdecks              Do not include Parent::Child decks.
  --skip-cloze               Leave cloze notes untouched.
  --dry-run                  Count changes without writing.

Output:
  -i, --input <html>         Fragment to annotate. If omitted, reads remaining
                             args or stdin when no args are provided.
  --report                   Print a matching report before the result.
  --color / --no-color       Force or disable ANSI color in reports.
  -v, --verbose              Debug logging (or set {log_env}).
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Exit codes:
  0  Success.
  1  Runtime error (I/O, malformed JSON, empty color table).
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        data_file = DATA_FILE_NAME,
        log_env = LOG_ENV,
    )
}
