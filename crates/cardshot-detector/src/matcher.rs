//! Generic selector evaluation over any [`DocumentQuery`].

use cardshot_core::{ElementHandle, Selector};

use crate::document::DocumentQuery;

/// Whitespace-separated class tokens.
pub fn class_tokens(class_name: &str) -> impl Iterator<Item = &str> {
    class_name.split_whitespace()
}

/// Whether a class attribute carries an exact token.
pub fn has_class(class_name: &str, token: &str) -> bool {
    class_tokens(class_name).any(|t| t == token)
}

/// Class tokens sorted and joined, so ordering differences compare equal.
pub fn class_signature(class_name: &str) -> String {
    let mut tokens: Vec<&str> = class_tokens(class_name).collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Evaluate a selector against one element.
pub fn matches<D>(doc: &D, element: ElementHandle, selector: &Selector) -> bool
where
    D: DocumentQuery + ?Sized,
{
    let is_tag = |node: ElementHandle, tag: &str| doc.tag_name(node).eq_ignore_ascii_case(tag);

    match selector {
        Selector::Tag(tag) => is_tag(element, tag),
        Selector::ClassExact(class) => has_class(&doc.class_name(element), class),
        Selector::ClassContains(fragment) => doc.class_name(element).contains(fragment.as_str()),
        Selector::IdContains(fragment) => doc.id(element).contains(fragment.as_str()),
        Selector::HasAttribute(name) => doc.attribute(element, name).is_some(),
        Selector::AttributePrefix(prefix) => doc
            .attributes(element)
            .iter()
            .any(|(name, _)| name.starts_with(prefix.as_str())),
        Selector::AttributeEquals { name, value } => {
            doc.attribute(element, name).as_deref() == Some(value.as_str())
        }
        Selector::Child { parent, tag } => {
            is_tag(element, tag) && doc.parent(element).is_some_and(|p| is_tag(p, parent))
        }
        Selector::HasDescendant { tag, descendant } => {
            is_tag(element, tag) && doc.has_descendant(element, &[descendant.as_str()])
        }
        Selector::HasDirectChild { tag, child } => {
            is_tag(element, tag) && doc.children(element).into_iter().any(|c| is_tag(c, child))
        }
        Selector::HasAdjacentChildren { tag, first, second } => {
            is_tag(element, tag)
                && doc
                    .children(element)
                    .windows(2)
                    .any(|pair| is_tag(pair[0], first) && is_tag(pair[1], second))
        }
    }
}
