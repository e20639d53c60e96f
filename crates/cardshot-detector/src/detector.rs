//! Card detector facade.
//!
//! [`CardDetector`] owns the readiness state and runs the full detection
//! pass: collect, validate, drop nested candidates, score, cut and rank.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use cardshot_core::{
    Card, DetectionOptions, DetectionResult, DetectorConfig, Error, Result, Selector,
};

use crate::detection::{CandidateCollector, ScoredCandidate};
use crate::document::DocumentQuery;
use crate::nesting::{filter_nested, rank};
use crate::scorer::Scorer;
use crate::validity::ValidityFilter;

/// Progress values reported during warm-up, in order.
pub const WARM_UP_STAGES: [u8; 4] = [0, 30, 60, 100];

/// Warm-up stage being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WarmUpStage {
    /// Rule engine preparation
    Algorithm,
}

/// Progress notification delivered during warm-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WarmUpProgress {
    /// Stage being reported
    pub stage: WarmUpStage,
    /// Percent complete (0-100)
    pub progress: u8,
}

impl WarmUpProgress {
    fn algorithm(progress: u8) -> Self {
        Self {
            stage: WarmUpStage::Algorithm,
            progress,
        }
    }
}

/// Readiness state shared by every caller of one detector.
#[derive(Debug, Default)]
struct ReadyState {
    /// Held for the whole warm-up sequence; later callers queue on it.
    gate: Mutex<()>,
    ready: AtomicBool,
    warming: AtomicBool,
    /// Number of finished warm-up runs, successful or not.
    runs: AtomicU64,
}

/// Detects card-like regions in a laid-out document.
pub struct CardDetector<D> {
    doc: D,
    collector: CandidateCollector,
    scorer: Scorer,
    defaults: DetectionOptions,
    stage_delay: Duration,
    state: ReadyState,
}

impl<D: DocumentQuery> CardDetector<D> {
    /// Create a detector with the built-in patterns and default settings.
    pub fn new(doc: D) -> Self {
        let config = DetectorConfig::default();
        Self {
            doc,
            collector: CandidateCollector::default(),
            scorer: Scorer::new(config.patterns.high_confidence_classes),
            defaults: config.detection,
            stage_delay: Duration::from_millis(config.warm_up.stage_delay_ms),
            state: ReadyState::default(),
        }
    }

    /// Create a detector from configuration.
    pub fn with_config(doc: D, config: &DetectorConfig) -> Result<Self> {
        config.validate()?;
        let custom_selectors = config.patterns.selectors()?;

        debug!(
            "Building detector with {} custom selectors",
            custom_selectors.len()
        );

        Ok(Self {
            doc,
            collector: CandidateCollector::with_defaults(custom_selectors),
            scorer: Scorer::new(config.patterns.high_confidence_classes.clone()),
            defaults: config.detection,
            stage_delay: Duration::from_millis(config.warm_up.stage_delay_ms),
            state: ReadyState::default(),
        })
    }

    /// Override the delay between warm-up stages.
    pub fn with_stage_delay(mut self, delay: Duration) -> Self {
        self.stage_delay = delay;
        self
    }

    /// The document this detector reads.
    pub fn document(&self) -> &D {
        &self.doc
    }

    /// Options from configuration, used when a caller supplies none.
    pub fn default_options(&self) -> DetectionOptions {
        self.defaults
    }

    /// Whether warm-up has completed.
    pub fn is_ready(&self) -> bool {
        self.state.ready.load(Ordering::Acquire)
    }

    /// Whether a warm-up run is in flight.
    pub fn is_warming(&self) -> bool {
        self.state.warming.load(Ordering::Acquire)
    }

    /// Warm up without progress reporting.
    pub async fn warm_up(&self) -> Result<bool> {
        self.warm_up_with_progress(|_| Ok(())).await
    }

    /// Warm up, reporting each stage to `on_progress`.
    ///
    /// Returns `Ok(true)` at once when already ready. Concurrent callers
    /// share one run: only the first executes the stages, the rest wait for
    /// it and return the resulting readiness. An error from `on_progress`
    /// aborts the run and leaves the detector not ready.
    pub async fn warm_up_with_progress<F>(&self, mut on_progress: F) -> Result<bool>
    where
        F: FnMut(WarmUpProgress) -> Result<()>,
    {
        if self.is_ready() {
            return Ok(true);
        }

        let runs_before = self.state.runs.load(Ordering::Acquire);
        let _gate = self.state.gate.lock().await;

        if self.is_ready() {
            return Ok(true);
        }
        if self.state.runs.load(Ordering::Acquire) != runs_before {
            // A run finished while this caller was queued.
            return Ok(self.is_ready());
        }

        self.state.warming.store(true, Ordering::Release);
        let outcome = self.run_stages(&mut on_progress).await;
        self.state.ready.store(outcome.is_ok(), Ordering::Release);
        self.state.warming.store(false, Ordering::Release);
        self.state.runs.fetch_add(1, Ordering::AcqRel);

        match outcome {
            Ok(()) => {
                info!("Card detector ready");
                Ok(true)
            }
            Err(e) => {
                warn!("Warm-up failed: {}", e);
                Err(e)
            }
        }
    }

    async fn run_stages<F>(&self, on_progress: &mut F) -> Result<()>
    where
        F: FnMut(WarmUpProgress) -> Result<()>,
    {
        for (index, progress) in WARM_UP_STAGES.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.stage_delay).await;
            }
            debug!("Warm-up progress {}%", progress);
            on_progress(WarmUpProgress::algorithm(*progress))?;
        }
        Ok(())
    }

    /// Return to the not-ready state. Safe to call repeatedly.
    pub fn dispose(&self) {
        self.state.ready.store(false, Ordering::Release);
        debug!("Card detector disposed");
    }

    /// Run one detection pass.
    ///
    /// Fails with [`Error::NotReady`] before warm-up and with
    /// [`Error::InvalidOptions`] for out-of-range options. Any failure
    /// during the pass itself is reported as an unsuccessful
    /// [`DetectionResult`] instead.
    pub fn detect_cards(&self, options: &DetectionOptions) -> Result<DetectionResult> {
        if !self.is_ready() {
            return Err(Error::NotReady);
        }
        options.validate()?;

        match self.run_pass(options) {
            Ok(cards) => {
                info!("Detected {} cards", cards.len());
                Ok(DetectionResult::from_cards(cards))
            }
            Err(e) => {
                warn!("Card detection failed: {}", e);
                Ok(DetectionResult::failure(e.to_string()))
            }
        }
    }

    fn run_pass(&self, options: &DetectionOptions) -> Result<Vec<Card>> {
        let doc: &dyn DocumentQuery = &self.doc;
        let filter = ValidityFilter::new(options.min_width, options.min_height);

        let candidates = self.collector.collect(doc, &filter)?;
        let collected = candidates.len();

        let candidates = filter_nested(doc, candidates);
        debug!(
            "Nesting filter kept {} of {} candidates",
            candidates.len(),
            collected
        );

        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|candidate| self.scorer.score_candidate(doc, candidate))
            .filter(|scored| scored.score >= options.min_score)
            .collect();
        rank(&mut scored);

        Ok(scored.into_iter().map(ScoredCandidate::into_card).collect())
    }

    /// Number of unique elements matching `selector`.
    pub fn count_matches(&self, selector: &Selector) -> Result<usize> {
        let matched = self.doc.query_selector_all(selector)?;
        let unique: HashSet<_> = matched.into_iter().collect();
        Ok(unique.len())
    }
}
