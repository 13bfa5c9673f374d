//! Compiled regex patterns and CSS selectors for listing and comment pages.
//!
//! All patterns are compiled once at first use via `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// URL Patterns
// =============================================================================

/// Movie detail path; capture group 1 is the numeric subject id.
pub static SUBJECT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/subject/(\d+)/").expect("SUBJECT_ID regex"));

/// First run of ASCII digits.
pub static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("DIGITS regex"));

// =============================================================================
// Listing Selectors
// =============================================================================

/// Links pointing at a movie detail page.
pub const SUBJECT_LINK: &str = r#"a[href*="/subject/"]"#;

/// Explicit listing entries on the now-playing page.
pub const MARKED_LIST_ITEM: &str = "li.list-item";

/// Known listing containers, tried in order.
pub const LISTING_CONTAINERS: &[&str] = &["ul#showing-soon", "ul.lists"];

/// Generic item containers used by older layouts.
pub const GENERIC_ITEM: &str = "div.item";

/// Purchase button, which usually carries the title as its text.
pub const TICKET_LINK: &str = "a.ticket-btn";

/// Heading-like title holders, tried in order.
pub const TITLE_HOLDERS: &[&str] = &["h3", "h2", "span.title", "li.stitle"];

/// Release date holders, tried in order.
pub const RELEASE_DATE_HOLDERS: &[&str] =
    &["li.release-date", "span.release-date", "div.release-date"];

/// Country/region holders, tried in order.
pub const COUNTRY_HOLDERS: &[&str] = &["li.country", "span.country", "div.country"];

/// "Want to see" counter holders, tried in order.
pub const WISH_HOLDERS: &[&str] = &["span.wish", "li.wish", "span.wish-count", "div.wish"];

// =============================================================================
// Comment Selectors
// =============================================================================

/// Short comment bodies.
pub const SHORT_COMMENT: &str = "span.short";

/// Fallback comment containers.
pub const COMMENT_BLOCK: &str = "div.comment";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_id_captures_digits() {
        let caps = SUBJECT_ID
            .captures("https://movie.douban.com/subject/34780991/")
            .and_then(|c| c.get(1))
            .map(|m| m.as_str());
        assert_eq!(caps, Some("34780991"));
    }

    #[test]
    fn subject_id_requires_trailing_slash() {
        assert!(!SUBJECT_ID.is_match("https://movie.douban.com/subject/34780991"));
        assert!(!SUBJECT_ID.is_match("https://movie.douban.com/subject/abc/"));
    }

    #[test]
    fn digits_finds_first_run() {
        assert_eq!(DIGITS.find("abc 12 and 34").map(|m| m.as_str()), Some("12"));
        assert!(DIGITS.find("none").is_none());
    }
}
