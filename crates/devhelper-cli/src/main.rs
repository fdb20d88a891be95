//! `devhelper` CLI: a toolbox of small utilities for day-to-day development.
//!
//! ## Usage
//!
//! ```sh
//! # Convert JSON to YAML (stdin -> stdout)
//! echo '{"name":"John","age":30}' | devhelper convert json yaml
//!
//! # Convert a file, writing the result to another file
//! devhelper convert xml json data.xml -o data.json --indent 4
//!
//! # Pretty-print and colour a document
//! devhelper format json response.json
//!
//! # Test data
//! devhelper generate uuid 5 --format json
//! devhelper generate number 1 6 10
//!
//! # Encoding and hashing
//! devhelper encode base64 encode "hello"
//! devhelper hash sha256 -f release.tar.gz -v 2cf24dba...
//!
//! # Poke an API
//! devhelper http https://api.example.com/users -H "Accept: application/json"
//!
//! # Watch system resources
//! devhelper monitor --display simple --interval 2
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use commands::Context;
use devhelper_core::config::{ConfigManager, CONFIG_ENV};
use log::debug;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "devhelper",
    version,
    about = "DevHelper: a multi-purpose toolbox for developers"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Raise log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Config file to use instead of the platform default
    #[arg(long, global = true, env = CONFIG_ENV, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert between JSON, YAML and XML
    Convert(commands::convert::ConvertArgs),
    /// Validate, re-indent and highlight JSON, YAML or XML
    Format(commands::format::FormatArgs),
    /// Generate random test data
    Generate(commands::generate::GenerateArgs),
    /// Base64 and URL encoding and decoding
    Encode(commands::encode::EncodeArgs),
    /// Compute or verify MD5 / SHA digests
    Hash(commands::hash::HashArgs),
    /// Send a single HTTP request and show the response
    Http(commands::http::HttpArgs),
    /// Watch CPU, memory, swap and disk usage
    Monitor(commands::monitor::MonitorArgs),
    /// Show, locate or reset the configuration file
    Config(commands::config::ConfigArgs),
    /// Show version, build time and commit
    Version,
    /// Print a shell completion script
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    output::init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            output::print_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let path = cli.config.unwrap_or_else(ConfigManager::default_path);
    debug!("config path: {}", path.display());

    // A broken config file must not prevent repairing or locating it.
    let manager = match &cli.command {
        Commands::Config(args) if args.tolerates_broken_file() => {
            ConfigManager::load(&path).unwrap_or_else(|err| {
                log::warn!("{err}; falling back to defaults");
                ConfigManager::new(&path)
            })
        }
        _ => ConfigManager::load(&path)?,
    };
    let ctx = Context::new(manager, cli.no_color);

    match cli.command {
        Commands::Convert(args) => commands::convert::run(args, &ctx)?,
        Commands::Format(args) => commands::format::run(args, &ctx)?,
        Commands::Generate(args) => commands::generate::run(args, &ctx)?,
        Commands::Encode(args) => commands::encode::run(args)?,
        Commands::Hash(args) => return commands::hash::run(args, &ctx),
        Commands::Http(args) => commands::http::run(args, &ctx)?,
        Commands::Monitor(args) => commands::monitor::run(args, &ctx)?,
        Commands::Config(args) => commands::config::run(args, ctx)?,
        Commands::Version => print_version(&ctx),
        Commands::Completion { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "devhelper", &mut io::stdout());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn print_version(ctx: &Context) {
    let rows = [
        ("Version", env!("CARGO_PKG_VERSION")),
        ("Build Time", option_env!("DEVHELPER_BUILD_TIME").unwrap_or("unknown")),
        ("Git Commit", option_env!("DEVHELPER_GIT_COMMIT").unwrap_or("unknown")),
    ];
    for (label, value) in rows {
        println!("{}: {value}", ctx.paint(label, output::label()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["devhelper", "-vv", "version"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let cli = Cli::try_parse_from(["devhelper", "version", "--no-color", "--config", "x.yaml"])
            .unwrap();
        assert!(cli.no_color);
        assert_eq!(cli.config, Some(PathBuf::from("x.yaml")));
    }
}
