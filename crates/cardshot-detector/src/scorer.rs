//! Confidence scoring for validated candidates.

use lazy_static::lazy_static;
use regex::Regex;

use cardshot_core::ElementHandle;

use crate::detection::{Candidate, ScoredCandidate};
use crate::document::DocumentQuery;
use crate::matcher::{class_tokens, has_class};
use crate::patterns::{CURRENCY_SYMBOLS, HEADING_TAGS, JOINED_CARD_FORMS, LIST_CLASSES, LIST_TAGS};

/// Score every candidate starts from.
pub const BASE_SCORE: f64 = 0.5;

/// Upper bound; a heuristic never claims certainty.
pub const MAX_SCORE: f64 = 0.95;

/// Signal weights.
pub mod weights {
    /// Exact high-confidence class token
    pub const EXACT_CARD_CLASS: f64 = 0.3;
    /// "card" anywhere in the class attribute
    pub const CARD_SUBSTRING: f64 = 0.2;
    /// "item" in the class attribute
    pub const ITEM: f64 = 0.15;
    /// "product" in the class attribute
    pub const PRODUCT: f64 = 0.15;
    /// "article" in the class attribute
    pub const ARTICLE: f64 = 0.1;
    /// Hyphen/underscore-joined "card" form; stacks with the card bonuses
    pub const JOINED_CARD: f64 = 0.25;
    /// Contains an image
    pub const IMAGE: f64 = 0.1;
    /// Contains a heading
    pub const HEADING: f64 = 0.1;
    /// Contains a link
    pub const LINK: f64 = 0.05;
    /// Text looks like it carries a price
    pub const PRICE: f64 = 0.15;
    /// Has a `data-*` attribute
    pub const DATA_ATTRIBUTE: f64 = 0.1;
    /// Sits inside a list or grid
    pub const LIST_CONTEXT: f64 = 0.1;
}

lazy_static! {
    static ref PRICE_PATTERN: Regex = Regex::new(r"\d+\.\d{2}").expect("valid price pattern");
}

/// Weighted-signal scorer.
#[derive(Debug, Clone)]
pub struct Scorer {
    high_confidence_classes: Vec<String>,
}

impl Scorer {
    /// Create a scorer with custom high-confidence class tokens.
    pub fn new(high_confidence_classes: Vec<String>) -> Self {
        Self {
            high_confidence_classes,
        }
    }

    /// Score a candidate.
    pub fn score_candidate(
        &self,
        doc: &dyn DocumentQuery,
        candidate: Candidate,
    ) -> ScoredCandidate {
        ScoredCandidate::new(candidate, self.score(doc, candidate.handle))
    }

    /// Score an element in `[BASE_SCORE, MAX_SCORE]`.
    ///
    /// Bonuses are summed first and clipped once, so strongly named elements
    /// saturate at the ceiling.
    pub fn score(&self, doc: &dyn DocumentQuery, element: ElementHandle) -> f64 {
        let class_name = doc.class_name(element);
        let lowered = class_name.to_lowercase();
        let mut score = BASE_SCORE;

        if self.has_high_confidence_class(&class_name) {
            score += weights::EXACT_CARD_CLASS;
        } else if lowered.contains("card") {
            score += weights::CARD_SUBSTRING;
        }

        if lowered.contains("item") {
            score += weights::ITEM;
        }
        if lowered.contains("product") {
            score += weights::PRODUCT;
        }
        if lowered.contains("article") {
            score += weights::ARTICLE;
        }
        if JOINED_CARD_FORMS.iter().any(|form| lowered.contains(form)) {
            score += weights::JOINED_CARD;
        }

        if doc.has_descendant(element, &["img"]) {
            score += weights::IMAGE;
        }
        if doc.has_descendant(element, HEADING_TAGS) {
            score += weights::HEADING;
        }
        if doc.has_descendant(element, &["a"]) {
            score += weights::LINK;
        }

        if looks_like_price(&doc.text_content(element)) {
            score += weights::PRICE;
        }

        if doc
            .attributes(element)
            .iter()
            .any(|(name, _)| name.starts_with("data-"))
        {
            score += weights::DATA_ATTRIBUTE;
        }

        if in_list_context(doc, element) {
            score += weights::LIST_CONTEXT;
        }

        score.min(MAX_SCORE)
    }

    fn has_high_confidence_class(&self, class_name: &str) -> bool {
        class_tokens(class_name).any(|token| {
            self.high_confidence_classes
                .iter()
                .any(|class| class == token)
        })
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(
            ["card", "typhoon-card", "data-card"]
                .iter()
                .map(|class| class.to_string())
                .collect(),
        )
    }
}

/// Currency symbol or a decimal amount with two fractional digits.
pub fn looks_like_price(text: &str) -> bool {
    text.contains(CURRENCY_SYMBOLS) || PRICE_PATTERN.is_match(text)
}

/// Whether the element or an ancestor is a list or grid container.
pub fn in_list_context(doc: &dyn DocumentQuery, element: ElementHandle) -> bool {
    let mut current = Some(element);
    while let Some(node) = current {
        let tag = doc.tag_name(node);
        if LIST_TAGS.contains(&tag.as_str()) {
            return true;
        }
        let class_name = doc.class_name(node);
        if LIST_CLASSES.iter().any(|class| has_class(&class_name, class)) {
            return true;
        }
        current = doc.parent(node);
    }
    false
}
