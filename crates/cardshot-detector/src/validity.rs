//! Geometric and content-sufficiency checks for candidates.

use crate::detection::Candidate;
use crate::document::DocumentQuery;
use crate::patterns::HEADING_TAGS;

/// Largest share of a viewport dimension a card may cover.
pub const MAX_VIEWPORT_SHARE: f64 = 0.95;

/// Accepted width/height ratio range.
pub const ASPECT_RATIO_RANGE: (f64, f64) = (0.1, 15.0);

/// Trimmed text must be longer than this, in UTF-16 code units, to count as
/// content. Browsers report text length in the same unit.
pub const MIN_TEXT_CHARS: usize = 5;

/// Validity filter for one detection pass.
///
/// Viewport intersection is not checked, so cards below the fold stay
/// detectable.
#[derive(Debug, Clone, Copy)]
pub struct ValidityFilter {
    min_width: f64,
    min_height: f64,
}

impl ValidityFilter {
    /// Create a filter with the given minimum box size.
    pub fn new(min_width: f64, min_height: f64) -> Self {
        Self {
            min_width,
            min_height,
        }
    }

    /// Check whether a candidate plausibly is a card.
    pub fn is_valid(&self, doc: &dyn DocumentQuery, candidate: &Candidate) -> bool {
        self.has_card_geometry(doc, candidate) && self.has_content(doc, candidate)
    }

    fn has_card_geometry(&self, doc: &dyn DocumentQuery, candidate: &Candidate) -> bool {
        let rect = candidate.rect;
        let viewport = doc.viewport();

        if rect.width < self.min_width || rect.height < self.min_height {
            return false;
        }

        if rect.width > viewport.width * MAX_VIEWPORT_SHARE
            || rect.height > viewport.height * MAX_VIEWPORT_SHARE
        {
            return false;
        }

        if rect.is_collapsed() {
            return false;
        }

        let (min_ratio, max_ratio) = ASPECT_RATIO_RANGE;
        match rect.aspect_ratio() {
            Some(ratio) => (min_ratio..=max_ratio).contains(&ratio),
            None => false,
        }
    }

    fn has_content(&self, doc: &dyn DocumentQuery, candidate: &Candidate) -> bool {
        let element = candidate.handle;

        // Explicitly named cards pass without content checks.
        if doc.class_name(element).to_lowercase().contains("card") {
            return true;
        }

        text_length(&doc.text_content(element)) > MIN_TEXT_CHARS
            || doc.has_descendant(element, &["img"])
            || doc.has_descendant(element, HEADING_TAGS)
            || doc.has_descendant(element, &["div"])
    }
}

/// Length of trimmed text in UTF-16 code units.
fn text_length(text: &str) -> usize {
    text.trim().encode_utf16().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryDocument, NodeSpec};
    use cardshot_core::{ElementHandle, Viewport};

    fn single(node: NodeSpec) -> (MemoryDocument, Candidate) {
        let doc = MemoryDocument::new(
            Viewport::new(1280.0, 800.0),
            NodeSpec::new("body").with_child(node),
        );
        let handle = ElementHandle::new(1);
        let rect = doc.bounding_rect(handle).unwrap();
        (doc, Candidate::new(handle, rect))
    }

    fn default_filter() -> ValidityFilter {
        ValidityFilter::new(100.0, 100.0)
    }

    #[test]
    fn test_accepts_named_card_without_content() {
        let (doc, candidate) = single(
            NodeSpec::new("div")
                .with_class("Product_Card")
                .with_rect(0.0, 0.0, 200.0, 300.0),
        );
        assert!(default_filter().is_valid(&doc, &candidate));
    }

    #[test]
    fn test_rejects_below_minimum_size() {
        let (doc, candidate) = single(
            NodeSpec::new("div")
                .with_class("box")
                .with_text("Plenty of text here")
                .with_rect(0.0, 0.0, 50.0, 50.0),
        );
        assert!(!default_filter().is_valid(&doc, &candidate));
        assert!(ValidityFilter::new(40.0, 40.0).is_valid(&doc, &candidate));
    }

    #[test]
    fn test_rejects_page_sized_containers() {
        let (doc, candidate) = single(
            NodeSpec::new("div")
                .with_class("card")
                .with_rect(0.0, 0.0, 1250.0, 300.0),
        );
        assert!(!default_filter().is_valid(&doc, &candidate));

        let (doc, candidate) = single(
            NodeSpec::new("div")
                .with_class("card")
                .with_rect(0.0, 0.0, 300.0, 780.0),
        );
        assert!(!default_filter().is_valid(&doc, &candidate));
    }

    #[test]
    fn test_rejects_collapsed_box_with_zero_minimums() {
        let (doc, candidate) = single(
            NodeSpec::new("div")
                .with_class("card")
                .with_rect(0.0, 0.0, 0.0, 200.0),
        );
        assert!(!ValidityFilter::new(0.0, 0.0).is_valid(&doc, &candidate));
    }

    #[test]
    fn test_rejects_degenerate_aspect_ratio() {
        // 1200 / 70 > 15
        let (doc, candidate) = single(
            NodeSpec::new("div")
                .with_class("card")
                .with_rect(0.0, 0.0, 1200.0, 70.0),
        );
        assert!(!ValidityFilter::new(10.0, 10.0).is_valid(&doc, &candidate));

        // 50 / 600 < 0.1
        let (doc, candidate) = single(
            NodeSpec::new("div")
                .with_class("card")
                .with_rect(0.0, 0.0, 50.0, 600.0),
        );
        assert!(!ValidityFilter::new(10.0, 10.0).is_valid(&doc, &candidate));
    }

    #[test]
    fn test_rejects_empty_leaf() {
        let (doc, candidate) = single(
            NodeSpec::new("div")
                .with_text(" abc ")
                .with_rect(0.0, 0.0, 200.0, 200.0),
        );
        assert!(!default_filter().is_valid(&doc, &candidate));
    }

    #[test]
    fn test_text_length_counts_utf16_units() {
        assert_eq!(text_length("  abc  "), 3);
        assert_eq!(text_length("😀😀😀"), 6);
        assert_eq!(text_length("价格便宜"), 4);

        // Three emoji are six code units, above the threshold.
        let (doc, candidate) = single(
            NodeSpec::new("div")
                .with_text("😀😀😀")
                .with_rect(0.0, 0.0, 200.0, 200.0),
        );
        assert!(default_filter().is_valid(&doc, &candidate));

        let (doc, candidate) = single(
            NodeSpec::new("div")
                .with_text("价格便宜")
                .with_rect(0.0, 0.0, 200.0, 200.0),
        );
        assert!(!default_filter().is_valid(&doc, &candidate));
    }

    #[test]
    fn test_accepts_any_content_signal() {
        let base = || NodeSpec::new("div").with_rect(0.0, 0.0, 200.0, 200.0);

        let variants = vec![
            base().with_text("Six chars"),
            base().with_child(NodeSpec::new("img")),
            base().with_child(NodeSpec::new("h5")),
            base().with_child(NodeSpec::new("div")),
        ];

        for node in variants {
            let (doc, candidate) = single(node);
            assert!(default_filter().is_valid(&doc, &candidate));
        }
    }

    #[test]
    fn test_below_fold_is_still_valid() {
        let (doc, candidate) = single(
            NodeSpec::new("div")
                .with_class("card")
                .with_rect(0.0, 5000.0, 200.0, 300.0),
        );
        assert!(default_filter().is_valid(&doc, &candidate));
    }
}
