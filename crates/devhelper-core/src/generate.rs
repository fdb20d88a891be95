//! Random test data: UUIDs, strings, numbers and dates.
//!
//! Generators only produce `Vec<String>`; [`write_items`] renders them as
//! plain lines, a JSON array or quoted CSV rows.
//!
//! ```
//! use devhelper_core::generate::{Charset, Generator};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut gen = Generator::with_rng(StdRng::seed_from_u64(7));
//! let ids = gen.strings(8, 3, Charset::Hex).unwrap();
//! assert_eq!(ids.len(), 3);
//! assert!(ids.iter().all(|s| s.len() == 8));
//! ```

use crate::error::{Error, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Write as _;
use std::io::Write;
use std::str::FromStr;

/// Input layout accepted for date bounds.
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";
/// Earliest date used when no start is given.
pub const DEFAULT_START_DATE: &str = "2000-01-01";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Alphanumeric,
    Alpha,
    Numeric,
    Ascii,
    Hex,
}

impl Charset {
    pub fn chars(self) -> &'static [u8] {
        match self {
            Charset::Alphanumeric => {
                b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789"
            }
            Charset::Alpha => b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz",
            Charset::Numeric => b"0123456789",
            Charset::Ascii => {
                b"!\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~"
            }
            Charset::Hex => b"0123456789abcdef",
        }
    }
}

impl FromStr for Charset {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "alphanumeric" => Ok(Charset::Alphanumeric),
            "alpha" => Ok(Charset::Alpha),
            "numeric" => Ok(Charset::Numeric),
            "ascii" => Ok(Charset::Ascii),
            "hex" => Ok(Charset::Hex),
            _ => Err(Error::InvalidArgument(format!(
                "unknown charset: '{name}' (expected alphanumeric, alpha, numeric, ascii or hex)"
            ))),
        }
    }
}

/// How generated items are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStyle {
    /// One item per line.
    Lines,
    /// Pretty-printed JSON array of strings.
    Json,
    /// One double-quoted item per line.
    Csv,
}

impl FromStr for OutputStyle {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "string" | "lines" => Ok(OutputStyle::Lines),
            "json" => Ok(OutputStyle::Json),
            "csv" => Ok(OutputStyle::Csv),
            _ => Err(Error::InvalidArgument(format!(
                "unknown output format: '{name}' (expected string, json or csv)"
            ))),
        }
    }
}

pub struct Generator<R: Rng = StdRng> {
    rng: R,
}

impl Generator<StdRng> {
    /// A generator seeded from the operating system's entropy source.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for Generator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Generator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Random (version 4) UUIDs in hyphenated form.
    pub fn uuids(&mut self, count: usize, upper: bool) -> Result<Vec<String>> {
        check_count(count)?;
        Ok((0..count)
            .map(|_| {
                let id = uuid::Builder::from_random_bytes(self.rng.gen())
                    .into_uuid()
                    .hyphenated()
                    .to_string();
                if upper {
                    id.to_uppercase()
                } else {
                    id
                }
            })
            .collect())
    }

    pub fn strings(&mut self, length: usize, count: usize, charset: Charset) -> Result<Vec<String>> {
        check_count(count)?;
        if length == 0 {
            return Err(Error::InvalidArgument("length must be at least 1".to_string()));
        }
        let chars = charset.chars();
        Ok((0..count)
            .map(|_| {
                (0..length)
                    .map(|_| chars[self.rng.gen_range(0..chars.len())] as char)
                    .collect()
            })
            .collect())
    }

    /// Uniform integers in `[min, max]`.
    pub fn integers(&mut self, min: i64, max: i64, count: usize) -> Result<Vec<String>> {
        check_count(count)?;
        check_range(min, max)?;
        Ok((0..count)
            .map(|_| self.rng.gen_range(min..=max).to_string())
            .collect())
    }

    /// Uniform floats in `[min, max)` with six decimals.
    pub fn floats(&mut self, min: i64, max: i64, count: usize) -> Result<Vec<String>> {
        check_count(count)?;
        check_range(min, max)?;
        let (lo, hi) = (min as f64, max as f64);
        Ok((0..count)
            .map(|_| {
                let n = if lo < hi { self.rng.gen_range(lo..hi) } else { lo };
                format!("{n:.6}")
            })
            .collect())
    }

    /// Uniform whole days in `[start, end]`, rendered with a strftime pattern.
    pub fn dates(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        count: usize,
        pattern: &str,
    ) -> Result<Vec<String>> {
        check_count(count)?;
        if end < start {
            return Err(Error::InvalidArgument(
                "end date must not be before start date".to_string(),
            ));
        }
        if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
            return Err(Error::InvalidArgument(format!(
                "invalid date format: '{pattern}'"
            )));
        }

        let span = (end - start).num_days() as u64;
        let mut dates = Vec::with_capacity(count);
        for _ in 0..count {
            let offset = self.rng.gen_range(0..=span);
            let date = start
                .checked_add_days(Days::new(offset))
                .ok_or_else(|| Error::InvalidArgument("date out of range".to_string()))?;
            let mut text = String::new();
            write!(text, "{}", date.format(pattern)).map_err(|_| {
                Error::InvalidArgument(format!(
                    "date format '{pattern}' needs fields a calendar date does not have"
                ))
            })?;
            dates.push(text);
        }
        Ok(dates)
    }
}

/// Parse a `YYYY-MM-DD` date bound.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_INPUT_FORMAT)
        .map_err(|err| Error::InvalidArgument(format!("invalid date '{text}': {err}")))
}

/// Write generated items in the requested style.
pub fn write_items<W: Write>(items: &[String], style: OutputStyle, out: &mut W) -> Result<()> {
    match style {
        OutputStyle::Lines => {
            for item in items {
                writeln!(out, "{item}")?;
            }
        }
        OutputStyle::Json => {
            serde_json::to_writer_pretty(&mut *out, items)
                .map_err(|err| Error::InvalidArgument(err.to_string()))?;
            writeln!(out)?;
        }
        OutputStyle::Csv => {
            for item in items {
                writeln!(out, "\"{}\"", item.replace('"', "\"\""))?;
            }
        }
    }
    Ok(())
}

fn check_count(count: usize) -> Result<()> {
    if count == 0 {
        return Err(Error::InvalidArgument("count must be at least 1".to_string()));
    }
    Ok(())
}

fn check_range(min: i64, max: i64) -> Result<()> {
    if max < min {
        return Err(Error::InvalidArgument(format!(
            "max ({max}) must not be less than min ({min})"
        )));
    }
    Ok(())
}
