use anyhow::Context;
use clap::{Parser, Subcommand};
use pipeline::{RunConfig, DEFAULT_RESULTS_DIR, DEFAULT_ROWS};
use std::path::PathBuf;

mod compute;
mod dashboard;
mod data;
mod generate;
mod pipeline;
mod read;
mod write;

/// Generates synthetic sales transactions and summarizes them into CSV tables.
#[derive(Parser, Debug)]
#[command(name = "sales", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate transactions and write the three result tables
    Run {
        /// Number of transactions to generate
        #[arg(long, default_value_t = DEFAULT_ROWS)]
        rows: usize,
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = DEFAULT_RESULTS_DIR)]
        results_dir: PathBuf,
    },
    /// Show the result tables as a text dashboard
    Dashboard {
        #[arg(long, default_value = DEFAULT_RESULTS_DIR)]
        results_dir: PathBuf,
    },
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sales=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        None => {
            pipeline::run(&RunConfig::default()).context("pipeline run failed")?;
        }
        Some(Command::Run {
            rows,
            seed,
            results_dir,
        }) => {
            let config = RunConfig {
                rows,
                seed,
                results_dir,
            };
            pipeline::run(&config).context("pipeline run failed")?;
        }
        Some(Command::Dashboard { results_dir }) => {
            dashboard::show(&results_dir, std::io::stdout().lock())?;
        }
    }
    Ok(())
}
