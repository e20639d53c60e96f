//! # cardshot
//!
//! Command-line front end for the card detection engine.
//!
//! ## Overview
//!
//! Loads a JSON page snapshot (viewport plus a laid-out node tree), warms up
//! a detector over it and prints the ranked cards as JSON on stdout. Logs go
//! to stderr.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cardshot::commands;
use cardshot::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    match cli.command {
        Commands::Detect(args) => {
            let result = commands::detect(&args, &config).await?;
            if !result.success {
                tracing::warn!("Detection reported a failure");
            }
            println!("{}", commands::render(&result, args.pretty)?);
        }
        Commands::Count { snapshot, selector } => {
            let count = commands::count(&snapshot, &selector, &config)?;
            println!("{count}");
        }
    }

    Ok(())
}
