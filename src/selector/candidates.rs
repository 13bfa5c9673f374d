//! Listing Candidate Rules
//!
//! Strategies for locating the elements of a listing page that each hold
//! one movie. They are tried in the order of [`CandidateStrategy::ALL`];
//! the first strategy that yields at least one element is used on its own,
//! results are never merged across strategies.

use std::fmt;

use dom_query::{Document, NodeId, Selection};

use crate::dom;
use crate::patterns::{GENERIC_ITEM, LISTING_CONTAINERS, MARKED_LIST_ITEM, SUBJECT_LINK};
use crate::selector::query_all;
use crate::selector::utils::is_tag;

/// A candidate discovery heuristic.
pub type CandidateRule = for<'a> fn(&'a Document) -> Vec<Selection<'a>>;

/// Candidate discovery strategies, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateStrategy {
    /// `li.list-item`
    MarkedListItem,
    /// `li` inside a known listing container
    ListingContainer,
    /// Any `li` holding a subject link
    SubjectListItem,
    /// `div.item`
    GenericItem,
    /// Nearest `li`/`div` around each subject link
    SubjectLinkAncestor,
}

impl CandidateStrategy {
    /// All strategies, highest priority first.
    pub const ALL: [Self; 5] = [
        Self::MarkedListItem,
        Self::ListingContainer,
        Self::SubjectListItem,
        Self::GenericItem,
        Self::SubjectLinkAncestor,
    ];

    /// The rule implementing this strategy.
    #[must_use]
    pub fn rule(self) -> CandidateRule {
        match self {
            Self::MarkedListItem => marked_list_items,
            Self::ListingContainer => listing_container_items,
            Self::SubjectListItem => subject_list_items,
            Self::GenericItem => generic_items,
            Self::SubjectLinkAncestor => subject_link_ancestors,
        }
    }
}

impl fmt::Display for CandidateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::MarkedListItem => "marked list items",
            Self::ListingContainer => "listing container",
            Self::SubjectListItem => "list items with subject links",
            Self::GenericItem => "generic items",
            Self::SubjectLinkAncestor => "subject link ancestors",
        };
        f.write_str(label)
    }
}

/// Run the cascade and return the winning strategy with its elements.
///
/// `None` when no strategy finds anything.
#[must_use]
pub fn discover(doc: &Document) -> Option<(CandidateStrategy, Vec<Selection<'_>>)> {
    CandidateStrategy::ALL.into_iter().find_map(|strategy| {
        let found = (strategy.rule())(doc);
        if found.is_empty() {
            None
        } else {
            Some((strategy, found))
        }
    })
}

/// Step 1: explicitly marked listing entries.
#[must_use]
pub fn marked_list_items(doc: &Document) -> Vec<Selection<'_>> {
    dom::split(&doc.select(MARKED_LIST_ITEM))
}

/// Step 2: `li` elements inside the first known listing container present.
///
/// Only the first matching element counts; a page with several `ul.lists`
/// (now playing, coming soon) yields the items of the first one.
#[must_use]
pub fn listing_container_items(doc: &Document) -> Vec<Selection<'_>> {
    LISTING_CONTAINERS
        .iter()
        .find_map(|container| {
            let found = doc.select(container);
            found.exists().then(|| dom::split(&found.first().select("li")))
        })
        .unwrap_or_default()
}

/// Step 3: any `li` containing a link to a movie detail page.
#[must_use]
pub fn subject_list_items(doc: &Document) -> Vec<Selection<'_>> {
    query_all(&doc.select("html"), is_subject_list_item)
}

fn is_subject_list_item(sel: &Selection) -> bool {
    is_tag(sel, "li") && sel.select(SUBJECT_LINK).exists()
}

/// Step 4: generic item containers.
#[must_use]
pub fn generic_items(doc: &Document) -> Vec<Selection<'_>> {
    dom::split(&doc.select(GENERIC_ITEM))
}

/// Step 5: every subject link replaced by its nearest `li`/`div` ancestor.
///
/// Links without such an ancestor are dropped. Ancestors are deduplicated by
/// node identity and kept in order of first appearance.
#[must_use]
pub fn subject_link_ancestors(doc: &Document) -> Vec<Selection<'_>> {
    let mut seen: Vec<NodeId> = Vec::new();
    let mut items = Vec::new();

    for link in dom::split(&doc.select(SUBJECT_LINK)) {
        let Some(parent) = dom::closest_ancestor(&link, &["li", "div"]) else {
            continue;
        };
        let Some(id) = dom::node_id(&parent) else {
            continue;
        };
        if !seen.contains(&id) {
            seen.push(id);
            items.push(parent);
        }
    }

    items
}
