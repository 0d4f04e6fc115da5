//! Triage command: run one complaint through the pipeline.

use anyhow::Result;
use civica_core::{HttpClassifierTransport, TriageConfig, TriageOrchestrator};
use civica_proto::{TriageInput, TrustClass};
use clap::Parser;
use std::sync::Arc;

#[derive(Parser, Debug)]
pub struct TriageArgs {
    /// Complaint text to triage
    pub text: String,

    /// Treat the submitter as anonymous (the default)
    #[arg(long, conflicts_with = "registered")]
    pub anonymous: bool,

    /// Treat the submitter as registered
    #[arg(long)]
    pub registered: bool,

    /// Category label supplied by the operator, bypassing classification
    #[arg(long, value_name = "LABEL")]
    pub category: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(config: &TriageConfig, args: TriageArgs) -> Result<()> {
    let transport = HttpClassifierTransport::new(&config.classifier)?;
    let pipeline = TriageOrchestrator::new(config, Arc::new(transport));

    let trust = if args.registered {
        TrustClass::Registered
    } else {
        TrustClass::Anonymous
    };
    let mut input = TriageInput::new(args.text, trust);
    if let Some(label) = args.category {
        input = input.with_category_override(label);
    }

    let result = pipeline.triage(&input).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    match result.category {
        Some(category) => println!(
            "category:  {} ({:.0}% confidence)",
            category,
            result.category_confidence * 100.0
        ),
        None => println!("category:  undetermined — manual selection required"),
    }
    println!(
        "sentiment: {} ({:.2})",
        result.sentiment, result.sentiment_score
    );
    println!("hazard:    {:.2}", result.hazard_score);
    println!(
        "urgency:   {:.2} ({})",
        result.urgency_score, result.urgency_level
    );
    println!("authority: {}", result.assigned_authority);
    if let Some(error) = &result.error {
        println!("note:      {error}");
    }

    Ok(())
}
