use super::Context;
use anyhow::{Context as _, Result};
use chrono::Local;
use clap::{Args, Subcommand};
use devhelper_core::generate::{
    parse_date, write_items, Charset, Generator, OutputStyle, DEFAULT_START_DATE,
};
use std::io;

#[derive(Args)]
pub struct GenerateArgs {
    #[command(subcommand)]
    kind: Kind,
}

#[derive(Subcommand)]
enum Kind {
    /// Random version 4 UUIDs
    Uuid {
        /// How many to generate
        #[arg(default_value_t = 1)]
        count: usize,
        /// Output format: string, json or csv
        #[arg(short, long)]
        format: Option<String>,
        /// Upper-case hex digits
        #[arg(short, long)]
        upper: bool,
    },
    /// Random strings
    String {
        #[arg(default_value_t = 10)]
        length: usize,
        #[arg(default_value_t = 1)]
        count: usize,
        /// alphanumeric, alpha, numeric, ascii or hex
        #[arg(short, long)]
        charset: Option<String>,
        #[arg(short, long)]
        format: Option<String>,
    },
    /// Random numbers in [min, max]
    #[command(allow_negative_numbers = true)]
    Number {
        #[arg(default_value_t = 1)]
        min: i64,
        #[arg(default_value_t = 100)]
        max: i64,
        #[arg(default_value_t = 1)]
        count: usize,
        /// Fractional numbers with six decimals instead of integers
        #[arg(long)]
        float: bool,
        #[arg(short, long)]
        format: Option<String>,
    },
    /// Random dates between two YYYY-MM-DD bounds
    Date {
        /// Earliest date (default 2000-01-01)
        start: Option<String>,
        /// Latest date (default today)
        end: Option<String>,
        #[arg(default_value_t = 1)]
        count: usize,
        #[arg(short, long)]
        format: Option<String>,
        /// strftime pattern for each date, e.g. %d.%m.%Y
        #[arg(short, long)]
        date_format: Option<String>,
    },
}

pub fn run(args: GenerateArgs, ctx: &Context) -> Result<()> {
    let defaults = &ctx.config().generator;
    let style = |flag: Option<String>| -> Result<OutputStyle> {
        Ok(flag.as_deref().unwrap_or(&defaults.default_output).parse()?)
    };
    let mut generator = Generator::new();

    let (items, style) = match args.kind {
        Kind::Uuid {
            count,
            format,
            upper,
        } => (generator.uuids(count, upper)?, style(format)?),
        Kind::String {
            length,
            count,
            charset,
            format,
        } => {
            let charset: Charset = charset
                .as_deref()
                .unwrap_or(&defaults.default_charset)
                .parse()?;
            (generator.strings(length, count, charset)?, style(format)?)
        }
        Kind::Number {
            min,
            max,
            count,
            float,
            format,
        } => {
            let items = if float {
                generator.floats(min, max, count)?
            } else {
                generator.integers(min, max, count)?
            };
            (items, style(format)?)
        }
        Kind::Date {
            start,
            end,
            count,
            format,
            date_format,
        } => {
            let start = parse_date(start.as_deref().unwrap_or(DEFAULT_START_DATE))?;
            let end = match end {
                Some(end) => parse_date(&end)?,
                None => Local::now().date_naive(),
            };
            let pattern = date_format.unwrap_or_else(|| defaults.default_date_format.clone());
            (generator.dates(start, end, count, &pattern)?, style(format)?)
        }
    };

    write_items(&items, style, &mut io::stdout().lock()).context("Failed to write output")
}
