//! Structural element selectors.
//!
//! A [`Selector`] is the typed form of the small CSS subset the candidate
//! strategies need. Every variant renders to the equivalent CSS string through
//! `Display`, so a browser host can hand it to `querySelectorAll` unchanged,
//! while hosts without a selector engine can evaluate the variant directly.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Structural pattern matched against document elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Tag name, e.g. `article`
    Tag(String),
    /// Exact class token, e.g. `.card`
    ClassExact(String),
    /// Substring of the class attribute, e.g. `[class*="card"]`
    ClassContains(String),
    /// Substring of the id attribute, e.g. `[id*="card"]`
    IdContains(String),
    /// Attribute presence, e.g. `[data-item]`
    HasAttribute(String),
    /// Presence of any attribute with the given name prefix, rendered as `[data-*]`
    AttributePrefix(String),
    /// Attribute with an exact value, e.g. `[role="article"]`
    AttributeEquals {
        /// Attribute name
        name: String,
        /// Required value
        value: String,
    },
    /// Direct child of a tag, e.g. `section > div`
    Child {
        /// Parent tag
        parent: String,
        /// Child tag
        tag: String,
    },
    /// Tag with a descendant tag, e.g. `li:has(img)`
    HasDescendant {
        /// Matched tag
        tag: String,
        /// Required descendant tag
        descendant: String,
    },
    /// Tag with a direct child tag, e.g. `div:has(> h2)`
    HasDirectChild {
        /// Matched tag
        tag: String,
        /// Required child tag
        child: String,
    },
    /// Tag with two adjacent direct children, e.g. `div:has(> img + div)`
    HasAdjacentChildren {
        /// Matched tag
        tag: String,
        /// First child tag
        first: String,
        /// Tag of the sibling immediately after `first`
        second: String,
    },
}

impl Selector {
    /// Tag name selector.
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }

    /// Exact class token selector.
    pub fn class(class: impl Into<String>) -> Self {
        Self::ClassExact(class.into())
    }

    /// Class substring selector.
    pub fn class_contains(fragment: impl Into<String>) -> Self {
        Self::ClassContains(fragment.into())
    }

    /// Id substring selector.
    pub fn id_contains(fragment: impl Into<String>) -> Self {
        Self::IdContains(fragment.into())
    }

    /// Attribute presence selector.
    pub fn attribute(name: impl Into<String>) -> Self {
        Self::HasAttribute(name.into())
    }

    /// Attribute name prefix selector.
    pub fn attribute_prefix(prefix: impl Into<String>) -> Self {
        Self::AttributePrefix(prefix.into())
    }

    /// Attribute value selector.
    pub fn attribute_equals(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::AttributeEquals {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Direct child selector.
    pub fn child(parent: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::Child {
            parent: parent.into(),
            tag: tag.into(),
        }
    }

    /// Descendant presence selector.
    pub fn has_descendant(tag: impl Into<String>, descendant: impl Into<String>) -> Self {
        Self::HasDescendant {
            tag: tag.into(),
            descendant: descendant.into(),
        }
    }

    /// Direct child presence selector.
    pub fn has_direct_child(tag: impl Into<String>, child: impl Into<String>) -> Self {
        Self::HasDirectChild {
            tag: tag.into(),
            child: child.into(),
        }
    }

    /// Adjacent children selector.
    pub fn has_adjacent_children(
        tag: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::HasAdjacentChildren {
            tag: tag.into(),
            first: first.into(),
            second: second.into(),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => write!(f, "{tag}"),
            Self::ClassExact(class) => write!(f, ".{class}"),
            Self::ClassContains(fragment) => write!(f, "[class*=\"{fragment}\"]"),
            Self::IdContains(fragment) => write!(f, "[id*=\"{fragment}\"]"),
            Self::HasAttribute(name) => write!(f, "[{name}]"),
            Self::AttributePrefix(prefix) => write!(f, "[{prefix}*]"),
            Self::AttributeEquals { name, value } => write!(f, "[{name}=\"{value}\"]"),
            Self::Child { parent, tag } => write!(f, "{parent} > {tag}"),
            Self::HasDescendant { tag, descendant } => write!(f, "{tag}:has({descendant})"),
            Self::HasDirectChild { tag, child } => write!(f, "{tag}:has(> {child})"),
            Self::HasAdjacentChildren { tag, first, second } => {
                write!(f, "{tag}:has(> {first} + {second})")
            }
        }
    }
}

/// Parses the simple subset accepted for user-supplied selectors:
/// `tag`, `.class`, `[attr]`, `[prefix-*]`, `[attr="value"]`,
/// `[class*="x"]`, `[id*="x"]` and `parent > child`.
impl FromStr for Selector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || Error::InvalidSelector(s.to_string());

        if trimmed.is_empty() {
            return Err(invalid());
        }

        if let Some((parent, child)) = trimmed.split_once('>') {
            let (parent, child) = (parent.trim(), child.trim());
            if is_ident(parent) && is_ident(child) {
                return Ok(Self::child(
                    parent.to_ascii_lowercase(),
                    child.to_ascii_lowercase(),
                ));
            }
            return Err(invalid());
        }

        if let Some(class) = trimmed.strip_prefix('.') {
            return if is_ident(class) {
                Ok(Self::class(class))
            } else {
                Err(invalid())
            };
        }

        if let Some(inner) = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            return parse_attribute(inner.trim()).ok_or_else(invalid);
        }

        if is_ident(trimmed) {
            return Ok(Self::tag(trimmed.to_ascii_lowercase()));
        }

        Err(invalid())
    }
}

fn parse_attribute(inner: &str) -> Option<Selector> {
    if let Some((name, value)) = inner.split_once("*=") {
        let value = unquote(value.trim())?;
        return match name.trim() {
            "class" => Some(Selector::class_contains(value)),
            "id" => Some(Selector::id_contains(value)),
            _ => None,
        };
    }

    if let Some((name, value)) = inner.split_once('=') {
        let name = name.trim();
        if !is_ident(name) {
            return None;
        }
        return Some(Selector::attribute_equals(name, unquote(value.trim())?));
    }

    if let Some(prefix) = inner.strip_suffix('*') {
        return is_ident(prefix).then(|| Selector::attribute_prefix(prefix));
    }

    is_ident(inner).then(|| Selector::attribute(inner))
}

fn unquote(value: &str) -> Option<&str> {
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|q| value.strip_prefix(*q).and_then(|v| v.strip_suffix(*q)));

    match unquoted {
        Some(v) if !v.is_empty() => Some(v),
        Some(_) => None,
        None if is_ident(value) => Some(value),
        None => None,
    }
}

fn is_ident(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
