//! Declarative pattern tables.
//!
//! Every built-in selector the collector runs is listed here as data. Order
//! matters within a table: exact class matches come before substring matches
//! so the most specific signal claims an element first.

use cardshot_core::Selector;

/// Kind of a single-argument pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Exact class token
    ClassExact,
    /// Substring of the class attribute
    ClassContains,
    /// Substring of the id attribute
    IdContains,
    /// Attribute presence
    Attribute,
    /// Any attribute starting with the pattern
    AttributePrefix,
    /// ARIA role value
    Role,
    /// Tag name
    Tag,
}

impl PatternKind {
    /// Build the selector for a pattern of this kind.
    pub fn selector(self, pattern: &str) -> Selector {
        match self {
            Self::ClassExact => Selector::class(pattern),
            Self::ClassContains => Selector::class_contains(pattern),
            Self::IdContains => Selector::id_contains(pattern),
            Self::Attribute => Selector::attribute(pattern),
            Self::AttributePrefix => Selector::attribute_prefix(pattern),
            Self::Role => Selector::attribute_equals("role", pattern),
            Self::Tag => Selector::tag(pattern),
        }
    }
}

use PatternKind::*;

/// Class and id vocabulary for card-like containers.
pub const CLASS_NAME_PATTERNS: &[(PatternKind, &str)] = &[
    (ClassExact, "card"),
    (ClassExact, "Card"),
    (ClassExact, "typhoon-card"),
    (ClassExact, "data-card"),
    (ClassExact, "item"),
    (ClassExact, "Item"),
    (ClassExact, "product"),
    (ClassExact, "Product"),
    (ClassExact, "article"),
    (ClassExact, "post"),
    (ClassExact, "tile"),
    (ClassExact, "box"),
    (ClassExact, "panel"),
    (ClassExact, "widget"),
    (ClassExact, "module"),
    (ClassExact, "block"),
    (ClassExact, "cell"),
    (ClassContains, "card"),
    (ClassContains, "Card"),
    (ClassContains, "-card"),
    (ClassContains, "_card"),
    (ClassContains, "item"),
    (ClassContains, "Item"),
    (ClassContains, "product"),
    (ClassContains, "Product"),
    (ClassContains, "article"),
    (ClassContains, "post"),
    (ClassContains, "tile"),
    (ClassContains, "box"),
    (ClassContains, "panel"),
    (ClassContains, "widget"),
    (ClassContains, "module"),
    (ClassContains, "block"),
    (ClassContains, "cell"),
    (IdContains, "card"),
    (IdContains, "item"),
    (IdContains, "product"),
];

/// Data-carrying attributes, semantic roles and tags.
pub const ATTRIBUTE_PATTERNS: &[(PatternKind, &str)] = &[
    (AttributePrefix, "data-"),
    (Attribute, "data-item"),
    (Attribute, "data-product"),
    (Attribute, "data-card"),
    (Attribute, "data-id"),
    (Attribute, "data-index"),
    (Attribute, "itemscope"),
    (Role, "article"),
    (Role, "listitem"),
    (Tag, "article"),
];

/// Parents whose direct `div` children are treated as content blocks.
pub const CONTENT_PARENT_TAGS: &[&str] = &["section", "main", "aside"];

/// Heading tags.
pub const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Tags grouped by the layout-clustering strategy.
pub const BLOCK_TAGS: &[&str] = &["div", "section", "article", "li"];

/// Tags that make an ancestor list-like.
pub const LIST_TAGS: &[&str] = &["ul", "ol"];

/// Class tokens that make an ancestor list- or grid-like.
pub const LIST_CLASSES: &[&str] = &["list", "grid"];

/// Hyphen/underscore-joined card forms.
pub const JOINED_CARD_FORMS: &[&str] = &["-card", "_card"];

/// Symbols that mark a price.
pub const CURRENCY_SYMBOLS: &[char] = &['$', '¥', '￥', '€', '£'];

/// Selectors for the class/id pattern strategy, in table order.
pub fn class_name_selectors() -> Vec<Selector> {
    to_selectors(CLASS_NAME_PATTERNS)
}

/// Selectors for the attribute/semantic strategy, in table order.
pub fn attribute_selectors() -> Vec<Selector> {
    let mut selectors = to_selectors(ATTRIBUTE_PATTERNS);
    selectors.extend(semantic_selectors());
    selectors
}

/// Structural selectors for content blocks without telling class names.
pub fn semantic_selectors() -> Vec<Selector> {
    let mut selectors: Vec<Selector> = CONTENT_PARENT_TAGS
        .iter()
        .map(|parent| Selector::child(*parent, "div"))
        .collect();

    selectors.push(Selector::has_descendant("li", "img"));
    selectors.push(Selector::has_adjacent_children("div", "img", "div"));
    selectors.extend(
        ["h2", "h3", "h4"]
            .iter()
            .map(|heading| Selector::has_direct_child("div", *heading)),
    );

    selectors
}

fn to_selectors(table: &[(PatternKind, &str)]) -> Vec<Selector> {
    table
        .iter()
        .map(|(kind, pattern)| kind.selector(pattern))
        .collect()
}
