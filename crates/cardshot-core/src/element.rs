//! Element references and detection output types.

use serde::Serialize;

use crate::Rect;

/// Label attached to every detected card.
pub const CARD_CLASS: &str = "card";

/// Opaque reference to a node in the host document.
///
/// Handles are only meaningful to the document that issued them and only for
/// the duration of one detection pass. Equality is node identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(u64);

impl ElementHandle {
    /// Wrap a host-assigned node id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Host-assigned node id.
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// A detected card-like region.
///
/// The box is a snapshot of layout at detection time; consumers must
/// re-resolve `element_ref` before capturing if the page may have scrolled.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Bounding box in viewport coordinates
    pub bbox: Rect,
    /// Confidence score in `[0.5, 0.95]`
    pub score: f64,
    /// Element this card was derived from
    #[serde(skip_serializing)]
    pub element_ref: ElementHandle,
    /// Always [`CARD_CLASS`]
    pub class: &'static str,
}

impl Card {
    /// Create a new card.
    pub fn new(element_ref: ElementHandle, bbox: Rect, score: f64) -> Self {
        Self {
            bbox,
            score,
            element_ref,
            class: CARD_CLASS,
        }
    }
}

/// Outcome of a detection pass.
///
/// An empty `cards` list with `success == true` means the page simply had no
/// candidates; `success == false` means the pass itself failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    /// Whether the pass ran to completion
    pub success: bool,
    /// Cards in non-increasing score order
    pub cards: Vec<Card>,
    /// Element references, parallel to `cards`
    #[serde(skip_serializing)]
    pub element_refs: Vec<ElementHandle>,
    /// Number of cards
    pub count: usize,
    /// Failure message when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DetectionResult {
    /// Successful result from ranked cards.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        let element_refs = cards.iter().map(|card| card.element_ref).collect();
        Self {
            success: true,
            count: cards.len(),
            cards,
            element_refs,
            error: None,
        }
    }

    /// Failed result carrying an error message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            cards: Vec::new(),
            element_refs: Vec::new(),
            count: 0,
            error: Some(error.into()),
        }
    }

    /// Whether no cards were found.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
