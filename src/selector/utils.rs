//! Utility functions for selector pattern matching
//!
//! Attribute access and tag checks shared by the candidate and field rules.

use crate::dom;
use dom_query::Selection;

// === Element Attribute Helpers ===

/// Get element class attribute (empty string if missing)
#[inline]
#[must_use]
pub fn class(sel: &Selection) -> String {
    dom::get_attribute(sel, "class").unwrap_or_default()
}

/// Get tag name (empty string if missing)
#[inline]
#[must_use]
pub fn tag(sel: &Selection) -> String {
    dom::tag_name(sel).unwrap_or_default()
}

/// Check whether the class attribute contains `name` as a whole token.
///
/// # Example
///
/// ```rust
/// use nowshowing::selector::utils;
/// use nowshowing::dom;
///
/// let doc = dom::parse(r#"<li class="list-item ui-slide-item">x</li>"#);
/// let li = doc.select("li");
///
/// assert!(utils::has_class(&li, "list-item"));
/// assert!(!utils::has_class(&li, "list"));
/// ```
#[must_use]
pub fn has_class(sel: &Selection, name: &str) -> bool {
    class(sel).split_whitespace().any(|token| token == name)
}

// === Element Type Checks ===

/// Check if element has a specific tag name
#[inline]
#[must_use]
pub fn is_tag(sel: &Selection, expected: &str) -> bool {
    tag(sel) == expected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    #[test]
    fn test_attribute_helpers_default_to_empty() {
        let doc = dom::parse("<div>plain</div>");
        let div = doc.select("div");

        assert_eq!(class(&div), "");
        assert_eq!(tag(&div), "div");
    }

    #[test]
    fn test_has_class_matches_tokens_only() {
        let doc = dom::parse(r#"<div class="item  wish-count">x</div>"#);
        let div = doc.select("div");

        assert!(has_class(&div, "item"));
        assert!(has_class(&div, "wish-count"));
        assert!(!has_class(&div, "wish"));
    }

    #[test]
    fn test_tag_checks() {
        let doc = dom::parse("<ul><li>x</li></ul>");
        let li = doc.select("li");

        assert!(is_tag(&li, "li"));
        assert!(!is_tag(&li, "ul"));
    }
}
