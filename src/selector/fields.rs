//! Field Rules
//!
//! Per-field extraction strategies for one listing entry. Each rule returns
//! a whitespace-normalized, non-empty value or `None`; [`first_value`] walks
//! a rule slice in order and stops at the first value.

use dom_query::Selection;

use crate::dom;
use crate::patterns::{
    COUNTRY_HOLDERS, RELEASE_DATE_HOLDERS, SUBJECT_LINK, TICKET_LINK, TITLE_HOLDERS, WISH_HOLDERS,
};

/// A single-field extraction strategy.
pub type FieldRule = fn(&Selection) -> Option<String>;

/// Title strategies.
pub static NAME_RULES: &[FieldRule] = &[
    data_title,
    title_attribute,
    subject_link_text,
    ticket_link_text,
    title_holder_text,
];

/// Detail link strategies. Values may still be relative.
pub static URL_RULES: &[FieldRule] = &[subject_link_href, ticket_link_href, data_href, data_url];

/// Release date strategies.
pub static RELEASE_DATE_RULES: &[FieldRule] = &[release_date_text, data_release];

/// Country/region strategies.
pub static COUNTRY_RULES: &[FieldRule] = &[country_text, data_region];

/// Raw "want to see" strategies; the winner still goes through number
/// extraction.
pub static WISH_RULES: &[FieldRule] = &[wish_text, data_wish];

/// Apply rules in order and return the first value produced.
#[must_use]
pub fn first_value(item: &Selection, rules: &[FieldRule]) -> Option<String> {
    rules.iter().find_map(|rule| rule(item))
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

/// Text of the first element matched by any of `selectors`, tried in order.
fn first_holder_text(item: &Selection, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|selector| {
        dom::first_match(item, selector).and_then(|holder| non_empty(dom::clean_text_content(&holder)))
    })
}

fn link_text(item: &Selection, selector: &str) -> Option<String> {
    dom::first_match(item, selector).and_then(|link| non_empty(dom::clean_text_content(&link)))
}

fn link_href(item: &Selection, selector: &str) -> Option<String> {
    dom::first_match(item, selector).and_then(|link| dom::non_empty_attribute(&link, "href"))
}

// === Name ===

/// `data-title` on the entry itself.
#[must_use]
pub fn data_title(item: &Selection) -> Option<String> {
    dom::non_empty_attribute(item, "data-title")
}

/// `title` on the entry itself.
#[must_use]
pub fn title_attribute(item: &Selection) -> Option<String> {
    dom::non_empty_attribute(item, "title")
}

/// Text of the first link to a detail page.
#[must_use]
pub fn subject_link_text(item: &Selection) -> Option<String> {
    link_text(item, SUBJECT_LINK)
}

/// Text of the ticket purchase link.
#[must_use]
pub fn ticket_link_text(item: &Selection) -> Option<String> {
    link_text(item, TICKET_LINK)
}

/// Text of a heading-like element; a link inside it wins over its own text.
#[must_use]
pub fn title_holder_text(item: &Selection) -> Option<String> {
    TITLE_HOLDERS.iter().find_map(|selector| {
        let holder = dom::first_match(item, selector)?;
        link_text(&holder, "a").or_else(|| non_empty(dom::clean_text_content(&holder)))
    })
}

// === URL ===

/// `href` of the first link to a detail page.
#[must_use]
pub fn subject_link_href(item: &Selection) -> Option<String> {
    link_href(item, SUBJECT_LINK)
}

/// `href` of the ticket purchase link.
#[must_use]
pub fn ticket_link_href(item: &Selection) -> Option<String> {
    link_href(item, TICKET_LINK)
}

/// `data-href` on the entry itself.
#[must_use]
pub fn data_href(item: &Selection) -> Option<String> {
    dom::non_empty_attribute(item, "data-href")
}

/// `data-url` on the entry itself.
#[must_use]
pub fn data_url(item: &Selection) -> Option<String> {
    dom::non_empty_attribute(item, "data-url")
}

// === Release date / country ===

/// Text of the first release date holder.
#[must_use]
pub fn release_date_text(item: &Selection) -> Option<String> {
    first_holder_text(item, RELEASE_DATE_HOLDERS)
}

/// `data-release` on the entry itself.
#[must_use]
pub fn data_release(item: &Selection) -> Option<String> {
    dom::non_empty_attribute(item, "data-release")
}

/// Text of the first country holder.
#[must_use]
pub fn country_text(item: &Selection) -> Option<String> {
    first_holder_text(item, COUNTRY_HOLDERS)
}

/// `data-region` on the entry itself.
#[must_use]
pub fn data_region(item: &Selection) -> Option<String> {
    dom::non_empty_attribute(item, "data-region")
}

// === Wish count ===

/// Text of the first "want to see" holder, digits not yet extracted.
#[must_use]
pub fn wish_text(item: &Selection) -> Option<String> {
    first_holder_text(item, WISH_HOLDERS)
}

/// `data-wish` on the entry itself.
#[must_use]
pub fn data_wish(item: &Selection) -> Option<String> {
    dom::non_empty_attribute(item, "data-wish")
}
