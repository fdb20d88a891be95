use super::{arg_or_stdin, write_output};
use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use devhelper_core::encoding::{base64_decode, base64_encode, url_decode, url_encode};

#[derive(Args)]
pub struct EncodeArgs {
    #[command(subcommand)]
    scheme: Scheme,
}

#[derive(Subcommand)]
enum Scheme {
    /// Base64 encoding and decoding
    Base64 {
        #[command(subcommand)]
        action: Action,
        /// Use the URL-safe alphabet (- and _ instead of + and /)
        #[arg(long, global = true)]
        urlsafe: bool,
    },
    /// URL query encoding and decoding
    Url {
        #[command(subcommand)]
        action: Action,
    },
}

#[derive(Subcommand)]
enum Action {
    /// Encode a string (reads stdin if omitted)
    Encode { text: Option<String> },
    /// Decode a string (reads stdin if omitted)
    Decode { text: Option<String> },
}

pub fn run(args: EncodeArgs) -> Result<()> {
    match args.scheme {
        Scheme::Base64 { action, urlsafe } => match action {
            Action::Encode { text } => {
                let data = arg_or_stdin(text)?;
                println!("{}", base64_encode(&data, urlsafe));
            }
            Action::Decode { text } => {
                let data = arg_or_stdin(text)?;
                let text = String::from_utf8(data).context("Base64 input is not valid UTF-8")?;
                write_output(None, &base64_decode(&text, urlsafe)?)?;
            }
        },
        Scheme::Url { action } => match action {
            Action::Encode { text } => {
                let data = arg_or_stdin(text)?;
                let text = String::from_utf8(data).context("Input is not valid UTF-8")?;
                println!("{}", url_encode(text.trim_end_matches(['\r', '\n'])));
            }
            Action::Decode { text } => {
                let data = arg_or_stdin(text)?;
                let text = String::from_utf8(data).context("Input is not valid UTF-8")?;
                println!("{}", url_decode(&text)?);
            }
        },
    }
    Ok(())
}
