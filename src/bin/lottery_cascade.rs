//! Command-line front end.
//!
//! Loads a configuration document, evaluates every case and prints the
//! reports (or one JSON document). Logs go to stderr; set `RUST_LOG` for more.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use lottery_cascade::config::DEFAULT_CONFIG_PATH;
use lottery_cascade::{load_config, run_cases, BatchReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Win probabilities for staged ticket lotteries.
#[derive(Parser, Debug)]
#[command(name = "lottery-cascade", version)]
struct Cli {
    /// Path of the JSON configuration document.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Print the per-stage table for every case.
    #[arg(short, long)]
    details: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("cannot start without a configuration ({})", cli.config.display()))?;
    let outcome = run_cases(&config);

    match cli.format {
        OutputFormat::Text => {
            print!("{}", BatchReport::new(&config, &outcome).with_details(cli.details));
        }
        OutputFormat::Json => {
            let document = outcome.document(Utc::now());
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }

    if outcome.all_failed() {
        bail!("all {} cases failed", outcome.failures().len());
    }
    Ok(())
}
