//! Civica command-line interface.
//!
//! Operator commands for running the triage pipeline by hand:
//! - `civica triage`: classify, score, and route one complaint
//! - `civica health`: validate that the classifier endpoints are reachable

mod health;
mod triage_cmd;

use anyhow::{Context, Result};
use civica_core::TriageConfig;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "civica", version, about = "Civic complaint triage and routing engine")]
struct Cli {
    /// Path to a YAML config file overlaying the built-in defaults
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Triage one complaint and print the result
    Triage(triage_cmd::TriageArgs),

    /// Check classifier endpoint reachability
    Health(health::HealthArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Triage(args) => triage_cmd::execute(&config, args).await,
        Commands::Health(args) => health::execute(&config, args).await,
    }
}

fn load_config(path: Option<&Path>) -> Result<TriageConfig> {
    match path {
        Some(path) => TriageConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(TriageConfig::default()),
    }
}
