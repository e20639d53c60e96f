use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cardshot")]
#[command(author, version, about = "Find card-like regions in a page snapshot", long_about = None)]
#[command(after_help = r#"Examples:
  cardshot detect page.json                      Detect cards with default thresholds
  cardshot detect page.json --min-score 0.6      Keep only confident cards
  cardshot detect page.json --pretty             Pretty-print the result JSON
  cardshot count page.json ".product"            Count elements matching a selector
"#)]
pub struct Cli {
    /// Detector configuration file (YAML)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect and rank cards in a snapshot
    Detect(DetectArgs),

    /// Count unique elements matching a selector
    Count {
        /// Page snapshot (JSON)
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,

        /// Selector, e.g. `.card`, `[data-id]`, `section > div`
        #[arg(value_name = "SELECTOR")]
        selector: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct DetectArgs {
    /// Page snapshot (JSON)
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Minimum confidence score (0-1)
    #[arg(long)]
    pub min_score: Option<f64>,

    /// Minimum card width in pixels
    #[arg(long)]
    pub min_width: Option<f64>,

    /// Minimum card height in pixels
    #[arg(long)]
    pub min_height: Option<f64>,

    /// Pretty-print the result
    #[arg(long)]
    pub pretty: bool,
}
