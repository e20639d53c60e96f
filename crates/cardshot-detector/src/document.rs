//! Host document capability.
//!
//! The detection engine never touches a browser directly. Everything it reads
//! goes through [`DocumentQuery`], so the same engine runs against a live DOM
//! binding, a serialized page snapshot, or an in-memory fixture.

use cardshot_core::{ElementHandle, Rect, Result, Selector, Viewport};

/// Read-only view of a laid-out document.
///
/// All reads are synchronous and must reflect one consistent layout for the
/// duration of a detection pass.
pub trait DocumentQuery {
    /// Size of the visible viewport.
    fn viewport(&self) -> Viewport;

    /// All elements matching a selector, in document order.
    ///
    /// Hosts return `Err` for selectors they cannot evaluate; callers treat
    /// that as "no matches for this pattern".
    fn query_selector_all(&self, selector: &Selector) -> Result<Vec<ElementHandle>>;

    /// Lowercase tag name.
    fn tag_name(&self, element: ElementHandle) -> String;

    /// All attributes as `(name, value)` pairs, including `class` and `id`.
    fn attributes(&self, element: ElementHandle) -> Vec<(String, String)>;

    /// Concatenated text of the element and all its descendants.
    fn text_content(&self, element: ElementHandle) -> String;

    /// Rendered bounding box in viewport coordinates.
    fn bounding_rect(&self, element: ElementHandle) -> Result<Rect>;

    /// Parent element, `None` for the root.
    fn parent(&self, element: ElementHandle) -> Option<ElementHandle>;

    /// Child elements in document order.
    fn children(&self, element: ElementHandle) -> Vec<ElementHandle>;

    /// Value of a single attribute.
    fn attribute(&self, element: ElementHandle, name: &str) -> Option<String> {
        self.attributes(element)
            .into_iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value)
    }

    /// Raw `class` attribute, empty when absent.
    fn class_name(&self, element: ElementHandle) -> String {
        self.attribute(element, "class").unwrap_or_default()
    }

    /// Raw `id` attribute, empty when absent.
    fn id(&self, element: ElementHandle) -> String {
        self.attribute(element, "id").unwrap_or_default()
    }

    /// Whether `element` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: ElementHandle, element: ElementHandle) -> bool {
        let mut current = Some(element);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Whether any strict descendant has one of the given tag names.
    fn has_descendant(&self, element: ElementHandle, tags: &[&str]) -> bool {
        let mut stack = self.children(element);
        while let Some(node) = stack.pop() {
            let tag = self.tag_name(node);
            if tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
                return true;
            }
            stack.extend(self.children(node));
        }
        false
    }
}
