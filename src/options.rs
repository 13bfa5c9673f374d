//! Configuration options for crawling.
//!
//! The `Options` struct holds every tunable of a crawl. Components do not
//! read it directly; they take the narrower `FetchOptions` and
//! `CommentOptions` views so that tests can build them in isolation.

use std::path::PathBuf;
use std::time::Duration;

use encoding_rs::{Encoding, UTF_8};
use url::Url;

use crate::error::{Error, Result};

/// Browser-like request headers sent with every fetch.
///
/// `Accept-Encoding` is limited to the codecs the transport decompresses.
pub const DEFAULT_HEADERS: &[(&str, &str)] = &[
    (
        "User-Agent",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    ),
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
    ),
    ("Accept-Language", "zh-CN,zh;q=0.9,en;q=0.8"),
    ("Accept-Encoding", "gzip, deflate"),
    ("Connection", "keep-alive"),
    ("Upgrade-Insecure-Requests", "1"),
];

/// Configuration options for a crawl.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use nowshowing::Options;
/// use std::time::Duration;
///
/// let options = Options {
///     comments_per_movie: 50,
///     request_delay: Duration::from_secs(3),
///     ..Options::default()
/// };
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// City slug used in the default listing URL.
    ///
    /// Default: `"wuhan"`
    pub city: String,

    /// Listing page to scrape.
    ///
    /// Default: `https://movie.douban.com/cinema/nowplaying/wuhan/`
    pub listing_url: String,

    /// Base URL relative links and comment pages are resolved against.
    ///
    /// Default: `https://movie.douban.com`
    pub site_base: String,

    /// Request headers, sent on every fetch.
    ///
    /// Default: [`DEFAULT_HEADERS`]
    pub headers: Vec<(String, String)>,

    /// Upper bound on a single request.
    ///
    /// Default: 10 seconds
    pub request_timeout: Duration,

    /// Sleep after every successful fetch.
    ///
    /// Default: 2 seconds
    pub request_delay: Duration,

    /// Sleep between movies while collecting comments.
    ///
    /// Default: 2 seconds
    pub movie_delay: Duration,

    /// Decoded pages shorter than this (in characters) are flagged as
    /// suspected block pages.
    ///
    /// Default: `1000`
    pub min_content_len: usize,

    /// Markers expected somewhere in a genuine page. Matching is
    /// case-insensitive. An empty list disables the check.
    ///
    /// Default: `["豆瓣", "movie"]`
    pub expected_markers: Vec<String>,

    /// Encoding used when neither the server nor the bytes say otherwise.
    ///
    /// Default: UTF-8
    pub default_encoding: &'static Encoding,

    /// File every fetched page is written to, for diagnosis.
    ///
    /// Default: `Some("debug_page.html")`
    pub debug_dump_path: Option<PathBuf>,

    /// Target comment count per movie.
    ///
    /// Default: `30`
    pub comments_per_movie: usize,

    /// Comments requested per page.
    ///
    /// Default: `20`
    pub comments_page_size: usize,

    /// Comments of this many characters or fewer are dropped as noise.
    ///
    /// Default: `5`
    pub min_comment_chars: usize,

    /// How many movies the ranking report shows.
    ///
    /// Default: `5`
    pub top_n: usize,

    /// Where the record set is saved as JSON.
    ///
    /// Default: `data/movies.json`
    pub output_path: PathBuf,

    /// Where the record set is also saved as CSV, if anywhere.
    ///
    /// Default: `Some("data/movies.csv")`
    pub csv_path: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        let city = "wuhan".to_string();
        Self {
            listing_url: format!("https://movie.douban.com/cinema/nowplaying/{city}/"),
            city,
            site_base: "https://movie.douban.com".to_string(),
            headers: DEFAULT_HEADERS
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            request_timeout: Duration::from_secs(10),
            request_delay: Duration::from_secs(2),
            movie_delay: Duration::from_secs(2),
            min_content_len: 1000,
            expected_markers: vec!["豆瓣".to_string(), "movie".to_string()],
            default_encoding: UTF_8,
            debug_dump_path: Some(PathBuf::from("debug_page.html")),
            comments_per_movie: 30,
            comments_page_size: 20,
            min_comment_chars: 5,
            top_n: 5,
            output_path: PathBuf::from("data/movies.json"),
            csv_path: Some(PathBuf::from("data/movies.csv")),
        }
    }
}

impl Options {
    /// Listing URL for another city, keeping the default URL shape.
    #[must_use]
    pub fn for_city(city: &str) -> Self {
        Self {
            city: city.to_string(),
            listing_url: format!("https://movie.douban.com/cinema/nowplaying/{city}/"),
            ..Self::default()
        }
    }

    /// Check that the options can drive a crawl.
    pub fn validate(&self) -> Result<()> {
        self.site_base_url()?;
        Url::parse(&self.listing_url)
            .map_err(|e| Error::InvalidOptions(format!("listing_url {:?}: {e}", self.listing_url)))?;
        if self.comments_page_size == 0 {
            return Err(Error::InvalidOptions(
                "comments_page_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Parsed `site_base`.
    pub fn site_base_url(&self) -> Result<Url> {
        Url::parse(&self.site_base)
            .map_err(|e| Error::InvalidOptions(format!("site_base {:?}: {e}", self.site_base)))
    }

    /// The subset of options the page fetcher needs.
    #[must_use]
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            headers: self.headers.clone(),
            timeout: self.request_timeout,
            delay: self.request_delay,
            min_content_len: self.min_content_len,
            expected_markers: self.expected_markers.clone(),
            default_encoding: self.default_encoding,
        }
    }

    /// The subset of options the comment paginator needs.
    pub fn comment_options(&self) -> Result<CommentOptions> {
        Ok(CommentOptions {
            site_base: self.site_base_url()?,
            target: self.comments_per_movie,
            page_size: self.comments_page_size,
            min_chars: self.min_comment_chars,
        })
    }
}

/// Settings for [`crate::fetch::PageFetcher`] and [`crate::fetch::HttpTransport`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Request headers.
    pub headers: Vec<(String, String)>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Sleep after each successful fetch.
    pub delay: Duration,
    /// Minimum decoded length, in characters, of a genuine page.
    pub min_content_len: usize,
    /// Case-insensitive markers of a genuine page.
    pub expected_markers: Vec<String>,
    /// Fallback encoding.
    pub default_encoding: &'static Encoding,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Options::default().fetch_options()
    }
}

/// Settings for [`crate::comments::CommentPaginator`].
#[derive(Debug, Clone)]
pub struct CommentOptions {
    /// Site root comment pages hang off.
    pub site_base: Url,
    /// Target comment count per movie.
    pub target: usize,
    /// Comments requested per page.
    pub page_size: usize,
    /// Comments at or below this length (in characters) are dropped.
    pub min_chars: usize,
}
