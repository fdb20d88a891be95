use super::{read_text, Context};
use anyhow::Result;
use clap::Args;
use devhelper_core::highlight::{highlight, Language, Theme};
use devhelper_core::pretty::format_document;
use devhelper_core::Format;
use std::path::PathBuf;

#[derive(Args)]
pub struct FormatArgs {
    /// Document format: json, yaml (yml) or xml
    format: Format,
    /// Input file (reads from stdin if omitted)
    file: Option<PathBuf>,
    /// Spaces per indentation level (JSON and XML)
    #[arg(long)]
    indent: Option<usize>,
    /// Sort object keys alphabetically (JSON)
    #[arg(long)]
    sort_keys: bool,
}

pub fn run(args: FormatArgs, ctx: &Context) -> Result<()> {
    let format = args.format;
    let text = read_text(args.file.as_deref())?;
    let indent = args.indent.unwrap_or(ctx.config().general.default_indent);
    let sort_keys = args.sort_keys || ctx.config().formatter.sort_keys;

    let formatted = format_document(&text, format, indent, sort_keys)?;
    if ctx.color {
        print!("{}", highlight(&formatted, Language::from(format), &Theme::default()));
    } else {
        print!("{formatted}");
    }
    Ok(())
}
