//! Core detection types and traits.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use cardshot_core::{Card, ElementHandle, Rect, Result, Selector};

use crate::document::DocumentQuery;
use crate::strategies::{LayoutStrategy, PatternStrategy};
use crate::validity::ValidityFilter;

/// Element paired with its box, as collected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Element reference
    pub handle: ElementHandle,
    /// Bounding box read during collection
    pub rect: Rect,
}

impl Candidate {
    /// Create a new candidate.
    pub fn new(handle: ElementHandle, rect: Rect) -> Self {
        Self { handle, rect }
    }
}

/// Candidate with its confidence score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    /// Element reference
    pub handle: ElementHandle,
    /// Bounding box read during collection
    pub rect: Rect,
    /// Score in `[0.5, 0.95]`
    pub score: f64,
}

impl ScoredCandidate {
    /// Attach a score to a candidate.
    pub fn new(candidate: Candidate, score: f64) -> Self {
        Self {
            handle: candidate.handle,
            rect: candidate.rect,
            score,
        }
    }

    /// Convert into the output card.
    pub fn into_card(self) -> Card {
        Card::new(self.handle, self.rect, self.score)
    }
}

/// Trait for candidate collection strategies.
pub trait CandidateStrategy: Send + Sync {
    /// Strategy name for debugging/logging.
    fn name(&self) -> &'static str;

    /// Priority (higher = runs first, claims elements first).
    ///
    /// Built-in priorities:
    /// - 100: class/id vocabulary
    /// - 80: data attributes, roles and semantic structure
    /// - 70: user-supplied selectors
    /// - 50: sibling layout clustering
    fn priority(&self) -> u32;

    /// Raw element matches, before validation and deduplication.
    ///
    /// Strategies that run several queries must skip queries the host
    /// rejects rather than fail the whole strategy.
    fn collect(&self, doc: &dyn DocumentQuery) -> Result<Vec<ElementHandle>>;

    /// Whether this strategy is enabled.
    fn enabled(&self) -> bool {
        true
    }
}

/// Runs strategies in priority order and unions their validated matches.
pub struct CandidateCollector {
    strategies: Vec<Arc<dyn CandidateStrategy>>,
}

impl CandidateCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Collector with the built-in strategies plus any custom selectors.
    pub fn with_defaults(custom_selectors: Vec<Selector>) -> Self {
        let mut collector = Self::new();
        collector.add_strategy(Arc::new(PatternStrategy::class_names()));
        collector.add_strategy(Arc::new(PatternStrategy::attributes()));
        collector.add_strategy(Arc::new(PatternStrategy::custom(custom_selectors)));
        collector.add_strategy(Arc::new(LayoutStrategy::new()));
        collector
    }

    /// Add a strategy to the collector.
    pub fn add_strategy(&mut self, strategy: Arc<dyn CandidateStrategy>) {
        self.strategies.push(strategy);
        // Sort by priority (descending)
        self.strategies
            .sort_by_key(|s| std::cmp::Reverse(s.priority()));
    }

    /// Strategy names in execution order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Collect valid candidates from every enabled strategy.
    ///
    /// Each element is considered once no matter how many strategies match
    /// it; output order is first-match order.
    pub fn collect(
        &self,
        doc: &dyn DocumentQuery,
        filter: &ValidityFilter,
    ) -> Result<Vec<Candidate>> {
        let mut visited = HashSet::new();
        let mut candidates = Vec::new();

        for strategy in &self.strategies {
            if !strategy.enabled() {
                continue;
            }

            let matched = strategy.collect(doc)?;
            let before = candidates.len();

            for handle in matched {
                if !visited.insert(handle) {
                    continue;
                }

                let candidate = Candidate::new(handle, doc.bounding_rect(handle)?);
                if filter.is_valid(doc, &candidate) {
                    candidates.push(candidate);
                }
            }

            debug!(
                "Strategy {} admitted {} candidates",
                strategy.name(),
                candidates.len() - before
            );
        }

        Ok(candidates)
    }
}

impl Default for CandidateCollector {
    fn default() -> Self {
        Self::with_defaults(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryDocument, NodeSpec};
    use cardshot_core::Viewport;

    struct FixedStrategy {
        name: &'static str,
        priority: u32,
        handles: Vec<ElementHandle>,
    }

    impl CandidateStrategy for FixedStrategy {
        fn name(&self) -> &'static str {
            self.name
        }

        fn priority(&self) -> u32 {
            self.priority
        }

        fn collect(&self, _doc: &dyn DocumentQuery) -> Result<Vec<ElementHandle>> {
            Ok(self.handles.clone())
        }
    }

    fn three_cards() -> MemoryDocument {
        let card = |x: f64| {
            NodeSpec::new("div")
                .with_class("card")
                .with_rect(x, 0.0, 200.0, 200.0)
        };
        MemoryDocument::new(
            Viewport::default(),
            NodeSpec::new("body").with_children(vec![card(0.0), card(220.0), card(440.0)]),
        )
    }

    #[test]
    fn test_priority_ordering() {
        let mut collector = CandidateCollector::new();
        for (name, priority) in [("low", 10), ("high", 100), ("medium", 50)] {
            collector.add_strategy(Arc::new(FixedStrategy {
                name,
                priority,
                handles: Vec::new(),
            }));
        }

        assert_eq!(collector.strategy_names(), vec!["high", "medium", "low"]);
    }

    #[test]
    fn test_default_strategies() {
        let collector = CandidateCollector::default();
        assert_eq!(
            collector.strategy_names(),
            vec!["class_pattern", "attribute", "custom", "layout"]
        );
    }

    #[test]
    fn test_union_counts_each_element_once() {
        let doc = three_cards();
        let a = ElementHandle::new(1);
        let b = ElementHandle::new(2);
        let c = ElementHandle::new(3);

        let mut collector = CandidateCollector::new();
        collector.add_strategy(Arc::new(FixedStrategy {
            name: "first",
            priority: 100,
            handles: vec![b, a, b],
        }));
        collector.add_strategy(Arc::new(FixedStrategy {
            name: "second",
            priority: 50,
            handles: vec![a, c],
        }));

        let candidates = collector
            .collect(&doc, &ValidityFilter::new(100.0, 100.0))
            .unwrap();
        let handles: Vec<ElementHandle> = candidates.iter().map(|c| c.handle).collect();

        assert_eq!(handles, vec![b, a, c]);
    }

    #[test]
    fn test_invalid_matches_are_dropped() {
        let doc = three_cards();

        let mut collector = CandidateCollector::new();
        collector.add_strategy(Arc::new(FixedStrategy {
            name: "all",
            priority: 100,
            handles: vec![doc.root(), ElementHandle::new(1)],
        }));

        // Root has a zero-size box; cards are 200x200 but the minimum is 250.
        let candidates = collector
            .collect(&doc, &ValidityFilter::new(250.0, 250.0))
            .unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_layout_read_failure_propagates() {
        let doc = three_cards();

        let mut collector = CandidateCollector::new();
        collector.add_strategy(Arc::new(FixedStrategy {
            name: "stale",
            priority: 100,
            handles: vec![ElementHandle::new(42)],
        }));

        let result = collector.collect(&doc, &ValidityFilter::new(100.0, 100.0));
        assert!(result.is_err());
    }

    #[test]
    fn test_scored_candidate_into_card() {
        let candidate = Candidate::new(ElementHandle::new(5), Rect::new(1.0, 2.0, 3.0, 4.0));
        let card = ScoredCandidate::new(candidate, 0.7).into_card();

        assert_eq!(card.element_ref, ElementHandle::new(5));
        assert_eq!(card.bbox, Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(card.score, 0.7);
        assert_eq!(card.class, "card");
    }
}
