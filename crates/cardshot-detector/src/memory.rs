//! In-memory document host.
//!
//! [`MemoryDocument`] implements [`DocumentQuery`] over a pre-laid-out node
//! tree. It backs the command-line front end (page snapshots serialized as
//! JSON) and every test in this workspace.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use cardshot_core::{ElementHandle, Error, Rect, Result, Selector, Viewport};

use crate::document::DocumentQuery;
use crate::matcher;

/// One node of a page snapshot, with its children inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSpec {
    /// Tag name
    pub tag: String,
    /// `id` attribute (empty = absent)
    pub id: String,
    /// `class` attribute (empty = absent)
    pub class: String,
    /// Remaining attributes
    pub attributes: BTreeMap<String, String>,
    /// Rendered bounding box
    pub rect: Rect,
    /// Text directly inside this node
    pub text: String,
    /// Child nodes in document order
    pub children: Vec<NodeSpec>,
}

impl Default for NodeSpec {
    fn default() -> Self {
        Self {
            tag: "div".to_string(),
            id: String::new(),
            class: String::new(),
            attributes: BTreeMap::new(),
            rect: Rect::default(),
            text: String::new(),
            children: Vec::new(),
        }
    }
}

impl NodeSpec {
    /// Create a node with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Set the class attribute.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    /// Set the id attribute.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Add an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the bounding box.
    pub fn with_rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.rect = Rect::new(x, y, width, height);
        self
    }

    /// Set the direct text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Append a child.
    pub fn with_child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children.
    pub fn with_children(mut self, children: impl IntoIterator<Item = NodeSpec>) -> Self {
        self.children.extend(children);
        self
    }
}

/// Serialized page: viewport plus the root node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// Viewport at capture time
    #[serde(default)]
    pub viewport: Viewport,
    /// Document root (usually `body`)
    pub root: NodeSpec,
}

#[derive(Debug, Clone)]
struct MemoryNode {
    tag: String,
    attributes: Vec<(String, String)>,
    text: String,
    rect: Rect,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Document held entirely in memory.
///
/// Handles are preorder indices, so `query_selector_all` naturally yields
/// document order.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    viewport: Viewport,
    nodes: Vec<MemoryNode>,
    supports_has: bool,
}

impl MemoryDocument {
    /// Build a document from a root node.
    pub fn new(viewport: Viewport, root: NodeSpec) -> Self {
        let mut doc = Self {
            viewport,
            nodes: Vec::new(),
            supports_has: true,
        };
        doc.insert(root, None);
        doc
    }

    /// Build a document from a snapshot.
    pub fn from_snapshot(snapshot: PageSnapshot) -> Self {
        Self::new(snapshot.viewport, snapshot.root)
    }

    /// Parse a JSON page snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: PageSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Reject `:has(...)` selectors the way hosts without that pseudo-class do.
    pub fn without_has_support(mut self) -> Self {
        self.supports_has = false;
        self
    }

    /// Root element.
    pub fn root(&self) -> ElementHandle {
        ElementHandle::new(0)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the document has no elements.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First element whose `id` attribute equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<ElementHandle> {
        self.handles().find(|&handle| self.id(handle) == id)
    }

    fn handles(&self) -> impl Iterator<Item = ElementHandle> + '_ {
        (0..self.nodes.len()).map(|idx| ElementHandle::new(idx as u64))
    }

    fn insert(&mut self, spec: NodeSpec, parent: Option<usize>) -> usize {
        let mut attributes = spec.attributes;
        if !spec.class.is_empty() {
            attributes.insert("class".to_string(), spec.class);
        }
        if !spec.id.is_empty() {
            attributes.insert("id".to_string(), spec.id);
        }

        let idx = self.nodes.len();
        self.nodes.push(MemoryNode {
            tag: spec.tag.to_ascii_lowercase(),
            attributes: attributes.into_iter().collect(),
            text: spec.text,
            rect: spec.rect,
            parent,
            children: Vec::new(),
        });

        for child in spec.children {
            let child_idx = self.insert(child, Some(idx));
            self.nodes[idx].children.push(child_idx);
        }

        idx
    }

    fn node(&self, element: ElementHandle) -> Option<&MemoryNode> {
        usize::try_from(element.id())
            .ok()
            .and_then(|idx| self.nodes.get(idx))
    }

    fn push_text(&self, idx: usize, out: &mut String) {
        let node = &self.nodes[idx];
        out.push_str(&node.text);
        for &child in &node.children {
            self.push_text(child, out);
        }
    }
}

fn uses_has(selector: &Selector) -> bool {
    matches!(
        selector,
        Selector::HasDescendant { .. }
            | Selector::HasDirectChild { .. }
            | Selector::HasAdjacentChildren { .. }
    )
}

impl DocumentQuery for MemoryDocument {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn query_selector_all(&self, selector: &Selector) -> Result<Vec<ElementHandle>> {
        if !self.supports_has && uses_has(selector) {
            return Err(Error::InvalidSelector(selector.to_string()));
        }

        Ok(self
            .handles()
            .filter(|&handle| matcher::matches(self, handle, selector))
            .collect())
    }

    fn tag_name(&self, element: ElementHandle) -> String {
        self.node(element)
            .map(|node| node.tag.clone())
            .unwrap_or_default()
    }

    fn attributes(&self, element: ElementHandle) -> Vec<(String, String)> {
        self.node(element)
            .map(|node| node.attributes.clone())
            .unwrap_or_default()
    }

    fn text_content(&self, element: ElementHandle) -> String {
        let mut text = String::new();
        if let Ok(idx) = usize::try_from(element.id()) {
            if idx < self.nodes.len() {
                self.push_text(idx, &mut text);
            }
        }
        text
    }

    fn bounding_rect(&self, element: ElementHandle) -> Result<Rect> {
        self.node(element)
            .map(|node| node.rect)
            .ok_or_else(|| Error::Detection(format!("element {} is not attached", element.id())))
    }

    fn parent(&self, element: ElementHandle) -> Option<ElementHandle> {
        self.node(element)
            .and_then(|node| node.parent)
            .map(|idx| ElementHandle::new(idx as u64))
    }

    fn children(&self, element: ElementHandle) -> Vec<ElementHandle> {
        self.node(element)
            .map(|node| {
                node.children
                    .iter()
                    .map(|&idx| ElementHandle::new(idx as u64))
                    .collect()
            })
            .unwrap_or_default()
    }
}
