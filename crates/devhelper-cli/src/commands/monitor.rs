use super::Context;
use anyhow::{bail, Result};
use clap::Args;
use devhelper_core::monitor::{DisplayMode, FixedSampler, Monitor, SysinfoSampler};
use std::io;
use std::time::Duration;

#[derive(Args)]
pub struct MonitorArgs {
    /// Seconds between samples
    #[arg(short, long)]
    interval: Option<u64>,
    /// dashboard, simple or csv
    #[arg(short, long)]
    display: Option<String>,
    /// Stop after this many samples (runs until Ctrl+C otherwise)
    #[arg(short = 'n', long)]
    count: Option<u64>,
    /// Show fixed sample numbers instead of live metrics
    #[arg(long)]
    demo: bool,
}

pub fn run(args: MonitorArgs, ctx: &Context) -> Result<()> {
    let defaults = &ctx.config().monitor;
    let interval = args.interval.unwrap_or(defaults.default_interval_secs);
    if interval == 0 {
        bail!("interval must be at least 1 second");
    }
    let mode: DisplayMode = args
        .display
        .as_deref()
        .unwrap_or(&defaults.default_display)
        .parse()?;

    let (_, width) = console::Term::stdout().size();
    let monitor = Monitor {
        interval: Duration::from_secs(interval),
        mode,
        width: usize::from(width),
        color: ctx.color,
    };

    let mut out = io::stdout().lock();
    if args.demo {
        monitor.run(&mut FixedSampler::demo(), &mut out, args.count)?;
    } else {
        monitor.run(&mut SysinfoSampler::new(), &mut out, args.count)?;
    }
    Ok(())
}
