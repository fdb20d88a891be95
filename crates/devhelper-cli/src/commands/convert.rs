use super::{open_input, write_output, Context};
use anyhow::Result;
use clap::Args;
use devhelper_core::{convert, ConvertOptions, Format};
use log::info;
use std::io;
use std::path::PathBuf;

/// Format tokens are parsed by clap, before the config file or input is read.
#[derive(Args)]
pub struct ConvertArgs {
    /// Source format: json, yaml (yml) or xml
    from: Format,
    /// Target format: json, yaml (yml) or xml
    to: Format,
    /// Input file (reads from stdin if omitted)
    file: Option<PathBuf>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Spaces per indentation level for JSON and XML (0 = compact)
    #[arg(long)]
    indent: Option<usize>,
    /// Element name wrapping XML output
    #[arg(long, default_value = "root")]
    xml_root: String,
}

pub fn run(args: ConvertArgs, ctx: &Context) -> Result<()> {
    let (from, to) = (args.from, args.to);
    let options = ConvertOptions {
        indent: args.indent.unwrap_or(ctx.config().general.default_indent),
        xml_root: args.xml_root,
    };

    let input = open_input(args.file.as_deref())?;
    match args.output.as_deref() {
        Some(path) => {
            let mut buf = Vec::new();
            convert(input, &mut buf, from, to, &options)?;
            write_output(Some(path), &buf)?;
            info!("{from} -> {to}: wrote {} bytes to {}", buf.len(), path.display());
        }
        None => convert(input, io::stdout().lock(), from, to, &options)?,
    }
    Ok(())
}
