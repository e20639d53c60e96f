//! Selector-table strategy for class names, attributes and semantic markup.

use tracing::debug;

use cardshot_core::{ElementHandle, Result, Selector};

use crate::detection::CandidateStrategy;
use crate::document::DocumentQuery;
use crate::patterns;

/// Runs an ordered list of selectors and concatenates their matches.
pub struct PatternStrategy {
    name: &'static str,
    priority: u32,
    selectors: Vec<Selector>,
}

impl PatternStrategy {
    /// Create a strategy from an explicit selector list.
    pub fn new(name: &'static str, priority: u32, selectors: Vec<Selector>) -> Self {
        Self {
            name,
            priority,
            selectors,
        }
    }

    /// Class and id vocabulary matches.
    pub fn class_names() -> Self {
        Self::new("class_pattern", 100, patterns::class_name_selectors())
    }

    /// Data attributes, ARIA roles and semantic structure.
    pub fn attributes() -> Self {
        Self::new("attribute", 80, patterns::attribute_selectors())
    }

    /// User-supplied selectors.
    pub fn custom(selectors: Vec<Selector>) -> Self {
        Self::new("custom", 70, selectors)
    }
}

impl CandidateStrategy for PatternStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn collect(&self, doc: &dyn DocumentQuery) -> Result<Vec<ElementHandle>> {
        let mut matched = Vec::new();

        for selector in &self.selectors {
            match doc.query_selector_all(selector) {
                Ok(found) => matched.extend(found),
                // One unsupported pattern must not block the rest.
                Err(e) => debug!("Skipping selector {}: {}", selector, e),
            }
        }

        Ok(matched)
    }

    fn enabled(&self) -> bool {
        !self.selectors.is_empty()
    }
}
