//! DOM Operations Adapter
//!
//! Thin helpers over the `dom_query` crate used by the listing and comment
//! parsers: attribute lookup, whitespace-normalized text, tag checks,
//! ancestor walks, and node-order iteration.

// Re-export core types for external use
pub use dom_query::{Document, NodeId, Selection};

pub use tendril::StrTendril;

// === Parsing ===

/// Parse an HTML string into a document.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

// === Attribute Operations ===

/// Get any attribute value.
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Get an attribute after whitespace normalization, `None` if blank.
#[must_use]
pub fn non_empty_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name)
        .map(|value| clean_text(&value))
        .filter(|value| !value.is_empty())
}

// === Tag/Node Information ===

/// Get tag name (lowercase).
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_string())
}

/// Check whether the first node of the selection is an element.
#[must_use]
pub fn is_element(sel: &Selection) -> bool {
    sel.nodes().first().is_some_and(dom_query::NodeRef::is_element)
}

/// Identity of the first node in the selection.
#[must_use]
pub fn node_id(sel: &Selection) -> Option<NodeId> {
    sel.nodes().first().map(|node| node.id)
}

// === Text Content ===

/// Get all text content of node and descendants.
///
/// Returns `StrTendril` for zero-copy passing.
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Collapse whitespace runs into single spaces and trim both ends.
#[must_use]
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-normalized text of node and descendants.
#[must_use]
pub fn clean_text_content(sel: &Selection) -> String {
    clean_text(&text_content(sel))
}

// === Tree Navigation ===

/// Split a selection into one selection per node, in document order.
#[must_use]
pub fn split<'a>(sel: &Selection<'a>) -> Vec<Selection<'a>> {
    sel.nodes().iter().map(|node| Selection::from(*node)).collect()
}

/// First node of a selection matching `selector` below `sel`.
#[must_use]
pub fn first_match<'a>(sel: &Selection<'a>, selector: &str) -> Option<Selection<'a>> {
    let found = sel.select(selector);
    found.nodes().first().map(|node| Selection::from(*node))
}

/// Nearest ancestor whose tag is one of `tags`.
#[must_use]
pub fn closest_ancestor<'a>(sel: &Selection<'a>, tags: &[&str]) -> Option<Selection<'a>> {
    let mut current = sel.parent();

    while current.exists() {
        if let Some(tag) = tag_name(&current) {
            if tags.contains(&tag.as_str()) {
                return Some(current);
            }
        }
        current = current.parent();
    }

    None
}
