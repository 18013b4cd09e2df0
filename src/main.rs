//! retrohtml - Legacy terminal art to HTML
//!
//! retrohtml converts text carrying ANSI escape sequences or bulletin board
//! colour codes into sanitized HTML that an external stylesheet colours in.
//!
//! # Features
//!
//! - **ANSI**: SGR colours, decorations, xterm 256-colour and RGB extensions
//! - **BBS Codes**: Celerity, PCBoard, Renegade, Telegard, Wildcat! and WWIV
//! - **Detection**: picks the colour code format from the text itself
//! - **Stylesheet**: generated CSS for every class name, with 4 palettes
//! - **Info**: size, lines, width and code statistics as text or TOML
//!
//! # Quick Start
//!
//! ```text
//! retrohtml logo.ans > logo.html        # HTML fragment
//! retrohtml -d -t "Logo" logo.ans       # complete document
//! cat bbs.msg | retrohtml -f pcboard    # force a format
//! retrohtml --css --palette tango       # stylesheet only
//! ```

mod config;
mod core;
mod css;
mod info;
mod source;

use std::env;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use crossterm::tty::IsTty;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{Config as RetroConfig, Palette};
use crate::core::bbs::{self, Dialect};
use crate::core::html::{self, Grid};
use crate::info::Info;
use crate::source::Source;

/// Log filter environment variable
const LOG_ENV: &str = "RETROHTML_LOG";

/// Input format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    /// No colour codes, escape only
    Plain,
    Codes(Dialect),
}

impl Format {
    fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("plain") {
            return Some(Format::Plain);
        }
        Dialect::from_id(s).map(Format::Codes)
    }
}

/// Command line configuration
#[derive(Debug, Default)]
struct Config {
    /// Input file, stdin when absent
    file: Option<String>,
    /// Forced input format
    format: Option<Format>,
    /// Document mode, overrides config.toml
    document: Option<bool>,
    title: Option<String>,
    palette: Option<String>,
    css: bool,
    strip: bool,
    info: bool,
    toml: bool,
    list: bool,
    write_config: bool,
}

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    eprintln!("retrohtml {}", VERSION);
}

fn print_help() {
    eprintln!("retrohtml {} - Legacy terminal art to HTML", VERSION);
    eprintln!();
    eprintln!("Usage: retrohtml [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Reads FILE, or standard input when FILE is absent or -.");
    eprintln!();
    eprintln!("Conversion options:");
    eprintln!("  (default)             Detect the colour code format");
    eprintln!("  -f, --format <NAME>   Force a format: ansi, celerity, pcboard, renegade,");
    eprintln!("                        telegard, wildcat, wwiv-hash, wwiv-heart, plain");
    eprintln!("  -d, --document        Output a complete HTML document");
    eprintln!("  -t, --title <TEXT>    Document title (default: file name)");
    eprintln!("      --palette <NAME>  Stylesheet palette: vga, xterm, tango, solarized");
    eprintln!("      --strip           Remove colour codes, output plain text");
    eprintln!();
    eprintln!("Other options:");
    eprintln!("      --css             Print the stylesheet");
    eprintln!("  -i, --info            Show input statistics");
    eprintln!("      --toml            Print --info as TOML");
    eprintln!("  -l, --list            List supported formats");
    eprintln!("      --write-config    Save the effective configuration");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  retrohtml logo.ans > logo.html");
    eprintln!("  retrohtml -d -t \"Welcome\" --palette tango welcome.ans");
    eprintln!("  cat news.msg | retrohtml -f pcboard");
    eprintln!();
    eprintln!("Configuration: ~/.retrohtml/config.toml");
    eprintln!("Logging: set {}=debug for diagnostics", LOG_ENV);
}

fn parse_args() -> Result<Config, String> {
    let args: Vec<String> = env::args().collect();
    parse_args_from(args.get(1..).unwrap_or_default())
}

fn parse_args_from(args: &[String]) -> Result<Config, String> {
    let mut config = Config::default();
    let mut i = 0;

    // Value of an option that takes an argument
    let value = |i: &mut usize, name: &str| -> Result<String, String> {
        *i += 1;
        args.get(*i)
            .cloned()
            .ok_or_else(|| format!("Missing argument for {}", name))
    };

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            // Conversion
            "-f" | "--format" => {
                let name = value(&mut i, "--format")?;
                config.format = Some(
                    Format::parse(&name)
                        .ok_or_else(|| format!("Unknown format: {}. Use -l to list formats.", name))?,
                );
            }
            "-d" | "--document" => {
                config.document = Some(true);
            }
            "-t" | "--title" => {
                config.title = Some(value(&mut i, "--title")?);
            }
            "--palette" => {
                config.palette = Some(value(&mut i, "--palette")?);
            }
            "--strip" => {
                config.strip = true;
            }
            // Other
            "--css" => {
                config.css = true;
            }
            "-i" | "--info" => {
                config.info = true;
            }
            "--toml" => {
                config.toml = true;
            }
            "-l" | "--list" => {
                config.list = true;
            }
            "--write-config" => {
                config.write_config = true;
            }
            "-" => {
                config.file = None;
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
            arg => {
                if config.file.is_some() {
                    return Err(format!("Unexpected argument: {}. Only one FILE is read.", arg));
                }
                config.file = Some(arg.to_string());
            }
        }
        i += 1;
    }

    Ok(config)
}

/// Open `path` for appending, creating its directory.
fn open_log(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the tracing subscriber, writing to `log_file` when given.
///
/// Falls back to stderr when the file cannot be opened and returns the
/// reason, to be logged once the subscriber is up.
fn init_logging(log_file: Option<&Path>) -> Option<String> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let mut problem = None;
    let file = log_file.and_then(|path| match open_log(path) {
        Ok(file) => Some(file),
        Err(e) => {
            problem = Some(format!("cannot open log file {}: {}, logging to stderr", path.display(), e));
            None
        }
    });

    let _ = match file {
        Some(file) => builder
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .try_init(),
        None => builder
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_tty())
            .try_init(),
    };
    problem
}

/// Log problems found before the subscriber was installed.
fn report_deferred(messages: &[String]) {
    for message in messages {
        warn!("{}", message);
    }
}

/// Convert `src` to an HTML fragment.
fn convert(src: &[u8], format: Option<Format>) -> anyhow::Result<String> {
    let format = format
        .or_else(|| bbs::detect(src).map(Format::Codes))
        .unwrap_or(Format::Codes(Dialect::Ansi));
    debug!(?format, "converting");
    let html = match format {
        Format::Plain => html::plain_to_html(src),
        Format::Codes(Dialect::Ansi) => html::ansi_to_html(src),
        Format::Codes(dialect) => dialect.to_html(&String::from_utf8_lossy(src))?,
    };
    Ok(html)
}

/// Remove colour codes from `src`.
fn strip(src: &[u8], format: Option<Format>) -> String {
    match format.or_else(|| bbs::detect(src).map(Format::Codes)) {
        Some(Format::Plain) => String::from_utf8_lossy(src).into_owned(),
        Some(Format::Codes(dialect)) if dialect != Dialect::Ansi => {
            dialect.strip(&String::from_utf8_lossy(src))
        }
        _ => Grid::from_ansi(src).text(),
    }
}

fn print_list(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Formats:")?;
    for dialect in Dialect::ALL {
        writeln!(out, "  {:<12}{}", dialect.id(), dialect)?;
    }
    writeln!(out, "  {:<12}{}", "plain", "no colour codes")?;
    writeln!(out)?;
    writeln!(out, "Palettes: {}", Palette::list().join(", "))
}

fn run(args: Config) -> anyhow::Result<()> {
    let mut deferred = Vec::new();
    let mut config = RetroConfig::load().unwrap_or_else(|e| {
        deferred.push(format!("ignoring config: {}", e));
        RetroConfig::default()
    });
    if let Some(palette) = args.palette {
        config.palette = palette;
    }
    if let Some(document) = args.document {
        config.document = document;
    }
    if args.title.is_some() {
        config.title = args.title;
    }

    deferred.extend(init_logging(config.log_file.as_deref()));
    report_deferred(&deferred);
    info!("retrohtml {} starting", VERSION);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.write_config {
        let path = config.save().context("failed to save configuration")?;
        writeln!(out, "Configuration written to {}", path.display())?;
        return Ok(());
    }
    if args.list {
        print_list(&mut out)?;
        return Ok(());
    }
    let palette = config.get_palette();
    if args.css {
        out.write_all(css::stylesheet(&palette).as_bytes())?;
        return Ok(());
    }

    let source = Source::from_arg(args.file.as_deref());
    let src = source.read()?;

    if args.info || args.toml {
        let report = Info::new(&source.name(), &src);
        if args.toml {
            out.write_all(report.to_toml().context("failed to format info")?.as_bytes())?;
        } else {
            let color = io::stdout().is_tty();
            report.write_text(&mut out, color)?;
        }
        return Ok(());
    }

    if args.strip {
        out.write_all(strip(&src, args.format).as_bytes())?;
        return Ok(());
    }

    let fragment = convert(&src, args.format)?;
    let html = if config.document {
        let title = config.title.clone().unwrap_or_else(|| source.name());
        html::document(&title, &css::stylesheet(&palette), &fragment)
    } else {
        fragment
    };
    out.write_all(html.as_bytes())?;
    out.flush()?;
    info!(bytes = html.len(), "done");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = match parse_args() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };
    run(args)
}
