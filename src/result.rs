//! Record types produced by the scraper.
//!
//! `MovieRecord` is the only type that crosses into persistence and
//! ranking; nothing about the DOM or the network leaks through it.

use serde::{Deserialize, Serialize};

/// One now-showing title.
///
/// `name` is never empty for a record returned by the listing parser. Every
/// other field degrades to empty or zero when the markup lacks it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Display title.
    pub name: String,

    /// Absolute detail page URL, or empty.
    pub url: String,

    /// Release date as printed on the page (free text).
    pub release_date: String,

    /// Country or region (free text).
    pub country: String,

    /// Number of users who marked the movie as "want to see".
    pub wish_count: u64,

    /// Short comments, in page order.
    pub comments: Vec<String>,
}

impl MovieRecord {
    /// Record with only a name, all other fields at their empty defaults.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
