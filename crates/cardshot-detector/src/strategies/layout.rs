//! Layout-clustering strategy for repeated siblings without telling names.

use std::collections::HashSet;

use tracing::debug;

use cardshot_core::{ElementHandle, Result, Selector};

use crate::detection::CandidateStrategy;
use crate::document::DocumentQuery;
use crate::matcher::class_signature;
use crate::patterns::BLOCK_TAGS;

/// Siblings whose heights differ by less than this count as similar.
pub const HEIGHT_TOLERANCE: f64 = 50.0;

/// Finds parents with two or more similar block children and returns those
/// children. Plain grid and list layouts are recovered this way.
pub struct LayoutStrategy {
    min_group: usize,
}

impl LayoutStrategy {
    /// Create a new layout strategy.
    pub fn new() -> Self {
        Self { min_group: 2 }
    }

    fn is_block(doc: &dyn DocumentQuery, element: ElementHandle) -> bool {
        let tag = doc.tag_name(element);
        BLOCK_TAGS.contains(&tag.as_str())
    }

    /// Parents of block elements, in first-seen document order.
    fn block_parents(&self, doc: &dyn DocumentQuery) -> Vec<ElementHandle> {
        let mut seen = HashSet::new();
        let mut parents = Vec::new();

        for tag in BLOCK_TAGS {
            let blocks = match doc.query_selector_all(&Selector::tag(*tag)) {
                Ok(blocks) => blocks,
                Err(e) => {
                    debug!("Skipping block tag {}: {}", tag, e);
                    continue;
                }
            };

            for parent in blocks.into_iter().filter_map(|block| doc.parent(block)) {
                if seen.insert(parent) {
                    parents.push(parent);
                }
            }
        }

        parents
    }
}

impl Default for LayoutStrategy {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a sibling group looks like repeated content.
///
/// Every child after the first is compared to the first by class signature
/// and by rendered height; the group is similar when at least half of those
/// children match on either signal.
pub fn are_similar(doc: &dyn DocumentQuery, children: &[ElementHandle]) -> Result<bool> {
    let Some((first, rest)) = children.split_first() else {
        return Ok(false);
    };
    if rest.is_empty() {
        return Ok(false);
    }

    let first_signature = class_signature(&doc.class_name(*first));
    let first_height = doc.bounding_rect(*first)?.height;

    let mut similar = 0usize;
    for child in rest {
        let same_classes = class_signature(&doc.class_name(*child)) == first_signature;
        let close_height =
            (doc.bounding_rect(*child)?.height - first_height).abs() < HEIGHT_TOLERANCE;
        if same_classes || close_height {
            similar += 1;
        }
    }

    Ok(similar * 2 >= rest.len())
}

impl CandidateStrategy for LayoutStrategy {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn priority(&self) -> u32 {
        50
    }

    fn collect(&self, doc: &dyn DocumentQuery) -> Result<Vec<ElementHandle>> {
        let mut matched = Vec::new();

        for parent in self.block_parents(doc) {
            let children: Vec<ElementHandle> = doc
                .children(parent)
                .into_iter()
                .filter(|&child| Self::is_block(doc, child))
                .collect();

            if children.len() >= self.min_group && are_similar(doc, &children)? {
                matched.extend(children);
            }
        }

        Ok(matched)
    }
}
