//! # nowshowing
//!
//! Scraper for the Douban "now playing" listing of a city.
//!
//! A crawl fetches one listing page, recovers a [`MovieRecord`] for every
//! movie on it, then walks each movie's short comment pages. Markup on the
//! listing varies between page generations, so entries and fields are found
//! through ordered cascades of selector strategies rather than one fixed
//! layout.
//!
//! ## Quick Start
//!
//! ```rust
//! use nowshowing::{ListingParser, RawPage};
//! use url::Url;
//!
//! let html = r#"<ul class="lists">
//!     <li class="list-item" data-title="Dune" data-wish="1,024">
//!         <a href="/subject/35575567/">Dune</a>
//!     </li>
//! </ul>"#;
//!
//! let page = RawPage::from_html("https://movie.douban.com/cinema/nowplaying/wuhan/", html);
//! let parser = ListingParser::new(Url::parse("https://movie.douban.com")?);
//! let movies = parser.parse_listing(&page);
//!
//! assert_eq!(movies[0].name, "Dune");
//! assert_eq!(movies[0].wish_count, 1024);
//! assert_eq!(movies[0].url, "https://movie.douban.com/subject/35575567/");
//! # Ok::<(), url::ParseError>(())
//! ```
//!
//! ## Features
//!
//! - **Listing parsing**: five-step candidate cascade, per-field fallbacks
//! - **Comment pagination**: bounded page walk with early stop
//! - **Block detection**: short or marker-less pages are flagged
//! - **Persistence**: JSON output and a wish-count ranking

mod error;
mod options;
mod patterns;
mod result;

/// DOM helpers over `dom_query`.
pub mod dom;

/// Selector strategies for listing candidates and their fields.
pub mod selector;

/// URL resolution and comment page URLs.
pub mod url_utils;

/// Character encoding detection and decoding.
pub mod encoding;

/// HTTP transport, page decoding, and block-page detection.
pub mod fetch;

/// Listing page parsing.
pub mod listing;

/// Short comment pagination.
pub mod comments;

/// Crawl orchestration.
pub mod crawl;

/// Ranking by wish count.
pub mod ranking;

/// JSON persistence.
pub mod store;

// Public API - re-exports
pub use comments::CommentPaginator;
pub use crawl::{CrawlSummary, Crawler};
pub use error::{Error, Result};
pub use fetch::{
    DebugSink, Fetch, FileDebugSink, HttpTransport, PageFetcher, PageHealth, RawPage, Transport,
    TransportResponse,
};
pub use listing::ListingParser;
pub use options::{CommentOptions, FetchOptions, Options, DEFAULT_HEADERS};
pub use result::MovieRecord;
