use super::{write_output, Context};
use crate::output;
use anyhow::{Context as _, Result};
use clap::Args;
use devhelper_core::highlight::{highlight, Theme};
use devhelper_core::http::{parse_header, BasicAuth, HttpClient, RequestSpec};
use devhelper_core::units::{format_bytes, format_duration, truncate};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Header values wider than this are cut in the listing.
const MAX_HEADER_WIDTH: usize = 120;

#[derive(Args)]
pub struct HttpArgs {
    /// Request URL; http:// is assumed when no scheme is given
    url: String,
    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,
    /// Request header 'Name: value' (repeatable)
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    headers: Vec<String>,
    /// Request body
    #[arg(short, long, conflicts_with = "data_file")]
    data: Option<String>,
    /// Read the request body from a file
    #[arg(short = 'f', long, value_name = "FILE")]
    data_file: Option<PathBuf>,
    /// Timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,
    /// Shorthand for --content-type application/json
    #[arg(short, long)]
    json: bool,
    /// Content-Type header for the body
    #[arg(long)]
    content_type: Option<String>,
    /// Basic auth as 'user' or 'user:password'
    #[arg(short, long)]
    user: Option<String>,
    /// Basic auth password when not part of --user
    #[arg(short, long, requires = "user")]
    password: Option<String>,
    /// Skip TLS certificate verification
    #[arg(short = 'k', long)]
    insecure: bool,
    /// Save the response body to a file instead of printing it
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Echo the request before the response
    #[arg(short, long)]
    verbose: bool,
}

pub fn run(args: HttpArgs, ctx: &Context) -> Result<()> {
    let mut settings = ctx
        .config()
        .http
        .settings()
        .context("Invalid default header in config")?;
    if let Some(secs) = args.timeout {
        settings.timeout = Duration::from_secs(secs);
    }
    settings.insecure |= args.insecure;

    let mut headers = args
        .headers
        .iter()
        .map(|raw| parse_header(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let content_type = if args.json {
        Some("application/json".to_string())
    } else {
        args.content_type
    };
    if let Some(content_type) = content_type {
        headers.retain(|(name, _)| !name.eq_ignore_ascii_case("content-type"));
        headers.push(("Content-Type".to_string(), content_type));
    }

    let body = match (&args.data, &args.data_file) {
        (Some(data), _) => Some(data.clone().into_bytes()),
        (None, Some(path)) => Some(
            fs::read(path).with_context(|| format!("Failed to read data file: {}", path.display()))?,
        ),
        (None, None) => None,
    };

    let request = RequestSpec {
        method: args.method,
        url: args.url,
        headers,
        body,
        basic_auth: args
            .user
            .as_deref()
            .map(|user| BasicAuth::parse(user, args.password.as_deref())),
    };

    if args.verbose {
        print_request(&request, ctx);
    }

    let client = HttpClient::new(&settings)?;
    let spinner = output::spinner("Sending request...");
    let result = client.send(&request);
    spinner.finish_and_clear();
    let response = result.with_context(|| format!("{} {} failed", request.method, request.url))?;

    if let Some(path) = args.output.as_deref() {
        write_output(Some(path), &response.body)?;
        println!("Response saved to {}", path.display());
        return Ok(());
    }

    let status_style = if response.status >= 400 {
        output::failure()
    } else {
        output::label()
    };
    println!(
        "{} {} {}",
        response.version,
        ctx.paint(&response.status_line(), status_style),
        ctx.paint(
            &format!(
                "({}, {})",
                format_duration(response.elapsed),
                format_bytes(response.body.len() as u64)
            ),
            output::dim()
        )
    );
    for (name, value) in &response.headers {
        println!("{}: {}", ctx.paint(name, output::label()), truncate(value, MAX_HEADER_WIDTH));
    }
    println!();

    let body = response.pretty_body();
    if ctx.color {
        println!("{}", highlight(&body, response.language(), &Theme::default()));
    } else {
        println!("{body}");
    }
    Ok(())
}

fn print_request(request: &RequestSpec, ctx: &Context) {
    let marker = ctx.paint(">", output::dim());
    println!("{marker} {} {}", request.method.to_uppercase(), request.url);
    for (name, value) in &request.headers {
        println!("{marker} {name}: {value}");
    }
    if let Some(body) = &request.body {
        println!("{marker}");
        println!("{}", String::from_utf8_lossy(body));
    }
    println!();
}
