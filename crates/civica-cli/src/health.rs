//! Health command for validating classifier readiness.

use anyhow::{bail, Result};
use civica_core::{HttpClassifierTransport, TriageConfig};
use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
pub struct HealthArgs {
    /// Show detailed pass/fail status for each check
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Run only specific check(s) (sentiment, zero-shot)
    #[arg(long, value_name = "NAME", action = ArgAction::Append)]
    pub check: Vec<String>,
}

pub async fn execute(config: &TriageConfig, args: HealthArgs) -> Result<()> {
    let transport = HttpClassifierTransport::new(&config.classifier)?;

    let checks = [
        ("sentiment", transport.sentiment_url().to_string()),
        ("zero-shot", transport.zero_shot_url().to_string()),
    ];

    let mut failures = Vec::new();
    for (name, url) in &checks {
        if !args.check.is_empty() && !args.check.iter().any(|c| c == name) {
            continue;
        }
        match transport.ping(url).await {
            Ok(()) => {
                if args.verbose && !args.quiet {
                    println!("{name}: ok ({url})");
                }
            }
            Err(err) => {
                failures.push(format!("{name}: {err}"));
            }
        }
    }

    if !failures.is_empty() {
        bail!("classifier endpoints unreachable:\n{}", failures.join("\n"));
    }

    if !args.quiet {
        println!("System OK");
    }
    Ok(())
}
