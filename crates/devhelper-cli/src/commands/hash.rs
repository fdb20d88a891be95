use super::{open_input, Context};
use crate::output;
use anyhow::Result;
use clap::Args;
use devhelper_core::hash::{hash_reader, verify, Algorithm};
use std::io::Cursor;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Args)]
pub struct HashArgs {
    /// md5, sha1, sha256 or sha512
    algorithm: String,
    /// String to hash (reads stdin if omitted)
    text: Option<String>,
    /// Hash a file instead of a string or stdin
    #[arg(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,
    /// Print the digest in upper case
    #[arg(short, long)]
    upper: bool,
    /// Compare against an expected digest; exit status 1 on mismatch
    #[arg(short, long, value_name = "DIGEST")]
    verify: Option<String>,
    /// With --verify, print nothing and report only through the exit status
    #[arg(short, long)]
    quiet: bool,
}

pub fn run(args: HashArgs, ctx: &Context) -> Result<ExitCode> {
    let algorithm: Algorithm = args.algorithm.parse()?;
    let mut digest = match (&args.text, &args.file) {
        (Some(text), None) => hash_reader(algorithm, Cursor::new(text.as_bytes()))?,
        (_, file) => hash_reader(algorithm, open_input(file.as_deref())?)?,
    };
    if args.upper {
        digest = digest.to_uppercase();
    }

    let Some(expected) = args.verify else {
        println!("{digest}");
        return Ok(ExitCode::SUCCESS);
    };

    let matched = verify(&digest, &expected);
    if !args.quiet {
        if matched {
            eprintln!("Hash check: {}", ctx.paint("OK", output::success()));
        } else {
            eprintln!("Hash check: {}", ctx.paint("MISMATCH", output::failure()));
            eprintln!("Expected: {}", expected.trim());
            eprintln!("Actual:   {digest}");
        }
    }
    Ok(if matched {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
