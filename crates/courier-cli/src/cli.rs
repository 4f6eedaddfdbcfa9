use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "courier", about = "Upload a pre-built payload once and report the outcome")]
pub struct Cli {
    /// JSON uploader config (timeouts, concurrency, user agent).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Perform one upload attempt.
    Upload {
        #[arg(long)]
        url: String,

        #[arg(long, default_value = "POST")]
        method: String,

        /// Payload file; omit to send no body.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Extra header as `Name: value`; repeatable.
        #[arg(long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,

        /// Cancel the upload if it has not completed after this many milliseconds.
        #[arg(long)]
        cancel_after_ms: Option<u64>,
    },
    /// Print how a status code would be classified.
    Classify { status: u16 },
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected `Name: value`, got {raw:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in {raw:?}"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
