//! Subcommand implementations. Each module owns its clap arguments and a
//! `run` function; the algorithms live in `devhelper-core`.

pub mod config;
pub mod convert;
pub mod encode;
pub mod format;
pub mod generate;
pub mod hash;
pub mod http;
pub mod monitor;

use crate::output;
use anyhow::{Context as _, Result};
use devhelper_core::config::{Config, ConfigManager};
use owo_colors::Style;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

/// State shared by every subcommand.
pub struct Context {
    pub manager: ConfigManager,
    pub color: bool,
}

impl Context {
    pub fn new(manager: ConfigManager, no_color: bool) -> Self {
        let color = output::color_enabled(no_color, manager.config().general.color_enabled);
        Self { manager, color }
    }

    pub fn config(&self) -> &Config {
        self.manager.config()
    }

    pub fn paint(&self, text: &str, style: Style) -> String {
        output::paint(text, style, self.color)
    }
}

/// Open `path`, or stdin when absent.
pub fn open_input(path: Option<&Path>) -> Result<Box<dyn Read>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open file: {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

pub fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    open_input(path)?
        .read_to_end(&mut buf)
        .with_context(|| match path {
            Some(path) => format!("Failed to read file: {}", path.display()),
            None => "Failed to read from stdin".to_string(),
        })?;
    Ok(buf)
}

pub fn read_text(path: Option<&Path>) -> Result<String> {
    let bytes = read_input(path)?;
    String::from_utf8(bytes).context("Input is not valid UTF-8")
}

/// A positional string argument, or all of stdin when it was omitted.
pub fn arg_or_stdin(arg: Option<String>) -> Result<Vec<u8>> {
    match arg {
        Some(text) => Ok(text.into_bytes()),
        None => read_input(None),
    }
}

pub fn write_output(path: Option<&Path>, content: &[u8]) -> Result<()> {
    match path {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("Failed to write file: {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content)
                .and_then(|()| stdout.flush())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
