use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use cardshot_core::{DetectionOptions, DetectionResult, DetectorConfig, Selector};
use cardshot_detector::{CardDetector, MemoryDocument};

use crate::cli::DetectArgs;

/// Load configuration, or defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<DetectorConfig> {
    match path {
        Some(path) => DetectorConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(DetectorConfig::default()),
    }
}

/// Read a JSON page snapshot.
pub fn load_snapshot(path: &Path) -> Result<MemoryDocument> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let doc = MemoryDocument::from_json(&json)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
    debug!("Loaded snapshot with {} nodes", doc.len());
    Ok(doc)
}

/// Configured thresholds with command-line overrides applied.
pub fn resolve_options(args: &DetectArgs, defaults: DetectionOptions) -> DetectionOptions {
    DetectionOptions {
        min_score: args.min_score.unwrap_or(defaults.min_score),
        min_width: args.min_width.unwrap_or(defaults.min_width),
        min_height: args.min_height.unwrap_or(defaults.min_height),
    }
}

/// Warm up a detector over the snapshot and run one detection pass.
pub async fn detect(args: &DetectArgs, config: &DetectorConfig) -> Result<DetectionResult> {
    let doc = load_snapshot(&args.snapshot)?;
    let detector = CardDetector::with_config(doc, config)?;

    detector
        .warm_up_with_progress(|progress| {
            info!("Preparing detector: {}%", progress.progress);
            Ok(())
        })
        .await?;

    let options = resolve_options(args, detector.default_options());
    let result = detector.detect_cards(&options)?;
    Ok(result)
}

/// Render a detection result as JSON.
pub fn render(result: &DetectionResult, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    Ok(json)
}

/// Count unique elements in the snapshot matching `selector`.
pub fn count(snapshot: &Path, selector: &str, config: &DetectorConfig) -> Result<usize> {
    let selector: Selector = selector.parse()?;
    let detector = CardDetector::with_config(load_snapshot(snapshot)?, config)?;
    let count = detector.count_matches(&selector)?;
    Ok(count)
}
