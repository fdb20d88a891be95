//! Terminal presentation: logger setup, colour decisions, spinner and error
//! reporting.

use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use owo_colors::{OwoColorize, Style};
use std::io::Write;
use std::time::Duration;

/// Labels in key/value listings.
pub fn label() -> Style {
    Style::new().cyan()
}

pub fn success() -> Style {
    Style::new().green().bold()
}

pub fn failure() -> Style {
    Style::new().red().bold()
}

pub fn dim() -> Style {
    Style::new().dimmed()
}

/// Route `log` records to stderr. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level.to_string().to_lowercase()),
    )
    .format(|buf, record| {
        writeln!(
            buf,
            "[{} {}] {}",
            record.level(),
            record.target(),
            record.args()
        )
    })
    .init();
}

/// Colour is on unless disabled by flag, config, `NO_COLOR`, or a non-tty
/// stdout.
pub fn color_enabled(no_color: bool, configured: bool) -> bool {
    !no_color && configured && console::colors_enabled()
}

pub fn paint(text: &str, style: Style, enabled: bool) -> String {
    if enabled {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

/// A stderr spinner, hidden when stderr is not a terminal.
pub fn spinner(message: &str) -> ProgressBar {
    if !console::Term::stderr().is_term() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn print_error(err: &anyhow::Error) {
    let label = paint("Error:", failure(), console::colors_enabled_stderr());
    eprintln!("{label} {err:#}");
}
