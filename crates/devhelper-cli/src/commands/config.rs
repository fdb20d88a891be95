use super::Context;
use crate::output;
use anyhow::Result;
use clap::{Args, Subcommand};
use devhelper_core::highlight::{highlight, Language, Theme};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Overwrite the config file with defaults
    Reset,
}

impl ConfigArgs {
    /// `path` and `reset` still work when the file cannot be parsed.
    pub fn tolerates_broken_file(&self) -> bool {
        matches!(self.action, Action::Path | Action::Reset)
    }
}

pub fn run(args: ConfigArgs, ctx: Context) -> Result<()> {
    let Context { mut manager, color } = ctx;
    match args.action {
        Action::Show => {
            let text = manager.render()?;
            let language = if manager.path().extension().is_some_and(|ext| ext == "json") {
                Language::Json
            } else {
                Language::Yaml
            };
            if color {
                print!("{}", highlight(&text, language, &Theme::default()));
            } else {
                print!("{text}");
            }
        }
        Action::Path => println!("{}", manager.path().display()),
        Action::Reset => {
            manager.reset()?;
            println!(
                "{} {}",
                output::paint("Configuration reset:", output::success(), color),
                manager.path().display()
            );
        }
    }
    Ok(())
}
