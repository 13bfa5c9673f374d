//! Listing page parsing.
//!
//! Turns a now-playing listing page into [`MovieRecord`]s. Candidate
//! entries come from the cascade in [`crate::selector::candidates`], fields
//! from the cascades in [`crate::selector::fields`].

use dom_query::Selection;
use tracing::{debug, info, warn};
use url::Url;

use crate::dom;
use crate::error::{Error, Result};
use crate::fetch::RawPage;
use crate::patterns::DIGITS;
use crate::result::MovieRecord;
use crate::selector::candidates;
use crate::selector::fields::{
    first_value, COUNTRY_RULES, NAME_RULES, RELEASE_DATE_RULES, URL_RULES, WISH_RULES,
};
use crate::url_utils::create_absolute_url;

/// Pull the first run of digits out of free text, ignoring commas.
///
/// Returns 0 when there are no digits or the number does not fit in `u64`.
///
/// # Examples
/// ```
/// use nowshowing::listing::extract_number;
///
/// assert_eq!(extract_number("12,345人想看"), 12345);
/// assert_eq!(extract_number("abc"), 0);
/// ```
#[must_use]
pub fn extract_number(text: &str) -> u64 {
    let without_commas = text.replace(',', "");
    DIGITS
        .find(&without_commas)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Parser for listing pages.
#[derive(Debug, Clone)]
pub struct ListingParser {
    base: Url,
}

impl ListingParser {
    /// Create a parser resolving relative links against `base`.
    #[must_use]
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// Base URL relative links are resolved against.
    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Extract every movie on a listing page, in document order.
    ///
    /// Candidates without a name are dropped silently; candidates that fail
    /// to parse are logged and skipped.
    #[must_use]
    pub fn parse_listing(&self, page: &RawPage) -> Vec<MovieRecord> {
        if page.suspected_block() {
            warn!(
                url = page.url(),
                health = ?page.health(),
                "listing page looks like a block page, results may be empty"
            );
        }

        let Some((strategy, items)) = candidates::discover(page.document()) else {
            warn!(url = page.url(), "no listing candidates found");
            return Vec::new();
        };
        info!(count = items.len(), %strategy, "found listing candidates");

        let mut movies = Vec::with_capacity(items.len());
        for item in &items {
            match self.parse_item(item) {
                Ok(Some(movie)) => {
                    info!(name = %movie.name, "parsed movie");
                    movies.push(movie);
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "skipping listing candidate"),
            }
        }

        movies
    }

    /// Extract one movie from a candidate element.
    ///
    /// Returns `Ok(None)` when no name can be found, which is the only reason
    /// a well-formed candidate is rejected.
    pub fn parse_item(&self, item: &Selection) -> Result<Option<MovieRecord>> {
        if !dom::is_element(item) {
            return Err(Error::Extraction(
                "listing candidate is not an element".to_string(),
            ));
        }

        let Some(name) = first_value(item, NAME_RULES) else {
            debug!(class = ?dom::get_attribute(item, "class"), "candidate has no name");
            return Ok(None);
        };

        let url = first_value(item, URL_RULES)
            .map(|href| create_absolute_url(&href, &self.base))
            .unwrap_or_default();
        let release_date = first_value(item, RELEASE_DATE_RULES).unwrap_or_default();
        let country = first_value(item, COUNTRY_RULES).unwrap_or_default();
        let wish_count = first_value(item, WISH_RULES).map_or(0, |raw| extract_number(&raw));

        Ok(Some(MovieRecord {
            name,
            url,
            release_date,
            country,
            wish_count,
            comments: Vec::new(),
        }))
    }
}
