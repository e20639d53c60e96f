//! Configuration types for cardshot.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Error, Selector};

/// Per-call detection thresholds.
///
/// Field names deserialize from camelCase so a caller's
/// `{"minScore": .., "minWidth": .., "minHeight": ..}` maps directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DetectionOptions {
    /// Cards scoring below this are dropped
    pub min_score: f64,
    /// Minimum rendered width in pixels
    pub min_width: f64,
    /// Minimum rendered height in pixels
    pub min_height: f64,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            min_score: 0.3,
            min_width: 100.0,
            min_height: 100.0,
        }
    }
}

impl DetectionOptions {
    /// Create options with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum score.
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    /// Set the minimum width and height.
    pub fn with_min_size(mut self, min_width: f64, min_height: f64) -> Self {
        self.min_width = min_width;
        self.min_height = min_height;
        self
    }

    /// Validate option ranges.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.min_score.is_finite() || !(0.0..=1.0).contains(&self.min_score) {
            return Err(Error::InvalidOptions(format!(
                "min_score must be within [0, 1], got {}",
                self.min_score
            )));
        }

        for (name, value) in [("min_width", self.min_width), ("min_height", self.min_height)] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidOptions(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        Ok(())
    }
}

/// Detector configuration loaded from YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Default detection thresholds
    pub detection: DetectionOptions,
    /// Warm-up settings
    pub warm_up: WarmUpSettings,
    /// Pattern vocabulary settings
    pub patterns: PatternSettings,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            detection: DetectionOptions::default(),
            warm_up: WarmUpSettings::default(),
            patterns: PatternSettings::default(),
        }
    }
}

impl DetectorConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    pub fn from_yaml(yaml: &str) -> crate::Result<Self> {
        let config: DetectorConfig =
            serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> crate::Result<()> {
        self.detection
            .validate()
            .map_err(|e| Error::Config(format!("detection: {e}")))?;

        self.patterns.validate()?;

        Ok(())
    }
}

/// Warm-up settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WarmUpSettings {
    /// Delay between progress stages in milliseconds
    pub stage_delay_ms: u64,
}

impl Default for WarmUpSettings {
    fn default() -> Self {
        Self {
            stage_delay_ms: 500,
        }
    }
}

/// Pattern vocabulary settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternSettings {
    /// Extra selectors collected alongside the built-in table
    pub custom_selectors: Vec<String>,
    /// Class tokens that earn the exact-match scoring bonus
    pub high_confidence_classes: Vec<String>,
}

impl Default for PatternSettings {
    fn default() -> Self {
        Self {
            custom_selectors: vec![],
            high_confidence_classes: vec![
                "card".to_string(),
                "typhoon-card".to_string(),
                "data-card".to_string(),
            ],
        }
    }
}

impl PatternSettings {
    /// Parse the custom selectors.
    pub fn selectors(&self) -> crate::Result<Vec<Selector>> {
        self.custom_selectors
            .iter()
            .map(|raw| {
                raw.parse::<Selector>()
                    .map_err(|e| Error::Config(format!("custom selector: {e}")))
            })
            .collect()
    }

    /// Validate the pattern settings.
    pub fn validate(&self) -> crate::Result<()> {
        self.selectors()?;

        if self
            .high_confidence_classes
            .iter()
            .any(|class| class.trim().is_empty() || class.contains(char::is_whitespace))
        {
            return Err(Error::Config(
                "high_confidence_classes entries must be single class tokens".to_string(),
            ));
        }

        Ok(())
    }
}
