//! System resource monitor: a sampler plus three renderers on a fixed tick.
//!
//! ## Display modes
//!
//! - **dashboard**: clears the screen and draws a table with usage bars
//! - **simple**: one summary line per tick
//! - **csv**: a header row, then one row per tick

use crate::error::{Error, Result};
use crate::units::format_bytes;
use chrono::{Local, NaiveDateTime};
use log::debug;
use owo_colors::{OwoColorize, Style};
use std::io::Write;
use std::str::FromStr;
use std::thread;
use std::time::Duration;
use sysinfo::{Disks, System};

pub const CSV_HEADER: &str = "Time,CPU (%),Memory (%),Memory Used,Memory Total,Swap (%),Swap Used,Swap Total,Disk (%),Disk Used,Disk Total";

const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

/// One snapshot of resource usage. Sizes are in bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemStats {
    pub cpu_percent: f64,
    pub cpu_cores: usize,
    pub used_memory: u64,
    pub total_memory: u64,
    pub used_swap: u64,
    pub total_swap: u64,
    pub used_disk: u64,
    pub total_disk: u64,
}

impl SystemStats {
    pub fn memory_percent(&self) -> f64 {
        percent(self.used_memory, self.total_memory)
    }

    pub fn swap_percent(&self) -> f64 {
        percent(self.used_swap, self.total_swap)
    }

    pub fn disk_percent(&self) -> f64 {
        percent(self.used_disk, self.total_disk)
    }
}

fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        used as f64 / total as f64 * 100.0
    }
}

/// Source of snapshots.
pub trait Sampler {
    fn sample(&mut self) -> Result<SystemStats>;
}

/// Live metrics from the operating system.
pub struct SysinfoSampler {
    system: System,
    disks: Disks,
}

impl SysinfoSampler {
    pub fn new() -> Self {
        let mut system = System::new();
        // CPU usage is a delta between two refreshes; prime the first one.
        system.refresh_cpu();
        system.refresh_memory();
        Self {
            system,
            disks: Disks::new_with_refreshed_list(),
        }
    }
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler for SysinfoSampler {
    fn sample(&mut self) -> Result<SystemStats> {
        self.system.refresh_cpu();
        self.system.refresh_memory();
        self.disks.refresh();

        let (total_disk, available_disk) = self
            .disks
            .list()
            .iter()
            .fold((0u64, 0u64), |(total, available), disk| {
                (total + disk.total_space(), available + disk.available_space())
            });

        Ok(SystemStats {
            cpu_percent: f64::from(self.system.global_cpu_info().cpu_usage()),
            cpu_cores: self.system.cpus().len(),
            used_memory: self.system.used_memory(),
            total_memory: self.system.total_memory(),
            used_swap: self.system.used_swap(),
            total_swap: self.system.total_swap(),
            used_disk: total_disk.saturating_sub(available_disk),
            total_disk,
        })
    }
}

/// Returns the same snapshot on every tick.
#[derive(Debug, Clone)]
pub struct FixedSampler {
    pub stats: SystemStats,
}

impl FixedSampler {
    /// Canned numbers for demos and screenshots.
    pub fn demo() -> Self {
        const GB: u64 = 1024 * 1024 * 1024;
        Self {
            stats: SystemStats {
                cpu_percent: 25.5,
                cpu_cores: 8,
                used_memory: 4 * GB,
                total_memory: 8 * GB,
                used_swap: GB,
                total_swap: 4 * GB,
                used_disk: 200 * GB,
                total_disk: 500 * GB,
            },
        }
    }
}

impl Sampler for FixedSampler {
    fn sample(&mut self) -> Result<SystemStats> {
        Ok(self.stats.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Dashboard,
    Simple,
    Csv,
}

impl FromStr for DisplayMode {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "dashboard" => Ok(DisplayMode::Dashboard),
            "simple" => Ok(DisplayMode::Simple),
            "csv" => Ok(DisplayMode::Csv),
            _ => Err(Error::InvalidArgument(format!(
                "unknown display mode: '{name}' (expected dashboard, simple or csv)"
            ))),
        }
    }
}

pub struct Monitor {
    pub interval: Duration,
    pub mode: DisplayMode,
    /// Terminal width used to size dashboard bars.
    pub width: usize,
    pub color: bool,
}

impl Monitor {
    /// Sample every `interval` and render to `out`. Runs until `ticks`
    /// snapshots were written, or forever when `ticks` is `None`.
    pub fn run<S: Sampler, W: Write>(
        &self,
        sampler: &mut S,
        out: &mut W,
        ticks: Option<u64>,
    ) -> Result<()> {
        debug!("monitor: {:?} every {:?}", self.mode, self.interval);
        if self.mode == DisplayMode::Csv {
            writeln!(out, "{CSV_HEADER}")?;
        }

        let mut emitted = 0u64;
        while ticks.map_or(true, |limit| emitted < limit) {
            thread::sleep(self.interval);
            let stats = sampler.sample()?;
            let now = Local::now().naive_local();
            let frame = match self.mode {
                DisplayMode::Dashboard => render_dashboard(&stats, now, self.width, self.color),
                DisplayMode::Simple => render_simple(&stats, now),
                DisplayMode::Csv => render_csv_row(&stats, now),
            };
            out.write_all(frame.as_bytes())?;
            out.flush()?;
            emitted += 1;
        }
        Ok(())
    }
}

pub fn render_simple(stats: &SystemStats, at: NaiveDateTime) -> String {
    format!(
        "{} | CPU: {:.1}% | Memory: {:.1}% ({}/{}) | Disk: {:.1}% ({}/{})\n",
        at.format("%H:%M:%S"),
        stats.cpu_percent,
        stats.memory_percent(),
        format_bytes(stats.used_memory),
        format_bytes(stats.total_memory),
        stats.disk_percent(),
        format_bytes(stats.used_disk),
        format_bytes(stats.total_disk),
    )
}

pub fn render_csv_row(stats: &SystemStats, at: NaiveDateTime) -> String {
    format!(
        "{},{:.1},{:.1},{},{},{:.1},{},{},{:.1},{},{}\n",
        at.format("%Y-%m-%d %H:%M:%S"),
        stats.cpu_percent,
        stats.memory_percent(),
        format_bytes(stats.used_memory),
        format_bytes(stats.total_memory),
        stats.swap_percent(),
        format_bytes(stats.used_swap),
        format_bytes(stats.total_swap),
        stats.disk_percent(),
        format_bytes(stats.used_disk),
        format_bytes(stats.total_disk),
    )
}

/// Full-screen table: resource, usage bar, percentage, details.
pub fn render_dashboard(stats: &SystemStats, at: NaiveDateTime, width: usize, color: bool) -> String {
    let bar_width = (width / 3).max(10);
    let rows = [
        (
            "CPU",
            stats.cpu_percent,
            format!("{} cores", stats.cpu_cores),
        ),
        (
            "Memory",
            stats.memory_percent(),
            format!("{} / {}", format_bytes(stats.used_memory), format_bytes(stats.total_memory)),
        ),
        (
            "Swap",
            stats.swap_percent(),
            format!("{} / {}", format_bytes(stats.used_swap), format_bytes(stats.total_swap)),
        ),
        (
            "Disk",
            stats.disk_percent(),
            format!("{} / {}", format_bytes(stats.used_disk), format_bytes(stats.total_disk)),
        ),
    ];

    let details_width = rows
        .iter()
        .map(|(_, _, details)| details.chars().count())
        .max()
        .unwrap_or(0)
        .max("Details".len());
    let widths = [8, bar_width + 2, 7, details_width];

    let mut out = String::new();
    out.push_str(CLEAR_SCREEN);
    out.push_str(&format!("\n {} | DevHelper System Monitor\n\n", at.format("%H:%M:%S")));
    out.push_str(&border('┌', '┬', '┐', &widths));
    out.push_str(&format!(
        "│ {:<w0$} │ {:<w1$} │ {:>w2$} │ {:<w3$} │\n",
        "Resource",
        "Usage",
        "Percent",
        "Details",
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
        w3 = widths[3],
    ));
    out.push_str(&border('├', '┼', '┤', &widths));
    for (name, pct, details) in &rows {
        let pct_text = format!("{:>w$}", format!("{pct:.1}%"), w = widths[2]);
        let pct_text = if color {
            pct_text.style(percent_style(*pct)).to_string()
        } else {
            pct_text
        };
        out.push_str(&format!(
            "│ {:<w0$} │ {} │ {} │ {:<w3$} │\n",
            name,
            progress_bar(*pct, bar_width),
            pct_text,
            details,
            w0 = widths[0],
            w3 = widths[3],
        ));
    }
    out.push_str(&border('└', '┴', '┘', &widths));
    out.push_str("\nPress Ctrl+C to exit\n");
    out
}

fn border(left: char, mid: char, right: char, widths: &[usize]) -> String {
    let mut line = String::new();
    line.push(left);
    for (i, w) in widths.iter().enumerate() {
        if i > 0 {
            line.push(mid);
        }
        line.push_str(&"─".repeat(w + 2));
    }
    line.push(right);
    line.push('\n');
    line
}

/// `[=====     ]` with `width` cells between the brackets (minimum 10).
pub fn progress_bar(percent: f64, width: usize) -> String {
    let width = width.max(10);
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64) as usize;
    format!("[{}{}]", "=".repeat(filled), " ".repeat(width - filled))
}

/// Green below 70 %, yellow below 90 %, red above.
pub fn percent_style(percent: f64) -> Style {
    if percent >= 90.0 {
        Style::new().red()
    } else if percent >= 70.0 {
        Style::new().yellow()
    } else {
        Style::new().green()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_of_empty_total_is_zero() {
        assert_eq!(percent(5, 0), 0.0);
        assert_eq!(percent(1, 4), 25.0);
    }

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(progress_bar(50.0, 10), "[=====     ]");
        assert_eq!(progress_bar(150.0, 10), "[==========]");
        assert_eq!(progress_bar(-5.0, 4), "[          ]");
    }

    #[test]
    fn style_bands() {
        assert_eq!(percent_style(10.0), Style::new().green());
        assert_eq!(percent_style(75.0), Style::new().yellow());
        assert_eq!(percent_style(95.0), Style::new().red());
    }
}
