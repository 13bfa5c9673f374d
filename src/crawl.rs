//! Crawl orchestration: one listing page, then comments for each movie.

use std::thread;
use std::time::Duration;

use tracing::{error, info};

use crate::comments::CommentPaginator;
use crate::error::Result;
use crate::fetch::{Fetch, FileDebugSink, HttpTransport, PageFetcher};
use crate::listing::ListingParser;
use crate::options::{CommentOptions, Options};
use crate::result::MovieRecord;

/// Outcome of a full crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Movies in listing order, comments filled in.
    pub movies: Vec<MovieRecord>,
    /// Total comments across all movies.
    pub comment_count: usize,
}

impl CrawlSummary {
    #[must_use]
    pub fn movie_count(&self) -> usize {
        self.movies.len()
    }
}

/// Drives a crawl over any [`Fetch`] implementation.
pub struct Crawler<F> {
    fetcher: F,
    parser: ListingParser,
    listing_url: String,
    comment_options: CommentOptions,
    movie_delay: Duration,
}

impl Crawler<PageFetcher<HttpTransport>> {
    /// Crawler over HTTP, configured entirely from `options`.
    ///
    /// Attaches a file debug sink when `options.debug_dump_path` is set.
    pub fn from_options(options: &Options) -> Result<Self> {
        options.validate()?;
        let mut fetcher = PageFetcher::http(options.fetch_options())?;
        if let Some(path) = &options.debug_dump_path {
            fetcher = fetcher.with_debug_sink(FileDebugSink::new(path));
        }
        Self::new(fetcher, options)
    }
}

impl<F: Fetch> Crawler<F> {
    /// Crawler using `fetcher` for every request.
    pub fn new(fetcher: F, options: &Options) -> Result<Self> {
        Ok(Self {
            fetcher,
            parser: ListingParser::new(options.site_base_url()?),
            listing_url: options.listing_url.clone(),
            comment_options: options.comment_options()?,
            movie_delay: options.movie_delay,
        })
    }

    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch and parse the listing page. A failed fetch yields no movies.
    #[must_use]
    pub fn crawl_movies(&self) -> Vec<MovieRecord> {
        let Some(page) = self.fetcher.fetch(&self.listing_url) else {
            error!(url = %self.listing_url, "listing page unavailable");
            return Vec::new();
        };

        let movies = self.parser.parse_listing(&page);
        info!(count = movies.len(), "listing parsed");
        movies
    }

    /// Fill in comments for every movie, in order.
    pub fn crawl_all_comments(&self, movies: &mut [MovieRecord]) {
        let paginator = CommentPaginator::new(&self.fetcher, self.comment_options.clone());
        let total = movies.len();

        for (index, movie) in movies.iter_mut().enumerate() {
            info!(name = %movie.name, position = index + 1, total, "fetching comments");
            movie.comments = paginator.fetch_comments(movie);

            if !self.movie_delay.is_zero() {
                thread::sleep(self.movie_delay);
            }
        }
    }

    /// Listing plus comments.
    #[must_use]
    pub fn run(&self) -> CrawlSummary {
        let mut movies = self.crawl_movies();
        self.crawl_all_comments(&mut movies);

        let comment_count = movies.iter().map(|m| m.comments.len()).sum();
        info!(movies = movies.len(), comments = comment_count, "crawl finished");

        CrawlSummary {
            movies,
            comment_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::RawPage;
    use std::collections::HashMap;

    /// Serves fixed markup per URL prefix.
    struct MapFetcher(HashMap<&'static str, String>);

    impl Fetch for MapFetcher {
        fn fetch(&self, url: &str) -> Option<RawPage> {
            self.0
                .iter()
                .find(|(prefix, _)| url.starts_with(*prefix))
                .map(|(_, html)| RawPage::from_html(url, html))
        }
    }

    fn quiet_options() -> Options {
        Options {
            request_delay: Duration::ZERO,
            movie_delay: Duration::ZERO,
            debug_dump_path: None,
            comments_per_movie: 3,
            comments_page_size: 3,
            ..Options::default()
        }
    }

    const LISTING: &str = r#"<ul class="lists">
        <li class="list-item" data-title="A" data-wish="10"><a href="/subject/1/">A</a></li>
        <li class="list-item" data-title="B" data-wish="20"><a href="/subject/2/">B</a></li>
    </ul>"#;

    const COMMENTS: &str = r#"<span class="short">first comment</span>
        <span class="short">second comment</span>
        <span class="short">third comment</span>"#;

    #[test]
    fn run_fills_comments_in_listing_order() {
        let mut pages = HashMap::new();
        pages.insert("https://movie.douban.com/cinema/", LISTING.to_string());
        pages.insert("https://movie.douban.com/subject/", COMMENTS.to_string());

        let crawler = Crawler::new(MapFetcher(pages), &quiet_options()).unwrap();
        let summary = crawler.run();

        assert_eq!(summary.movie_count(), 2);
        assert_eq!(summary.movies[0].name, "A");
        assert_eq!(summary.movies[1].name, "B");
        assert_eq!(summary.movies[0].comments.len(), 3);
        assert_eq!(summary.comment_count, 6);
    }

    #[test]
    fn missing_listing_yields_empty_summary() {
        let crawler = Crawler::new(MapFetcher(HashMap::new()), &quiet_options()).unwrap();
        assert_eq!(crawler.run(), CrawlSummary::default());
    }

    #[test]
    fn invalid_site_base_is_rejected() {
        let options = Options {
            site_base: "nope".to_string(),
            ..quiet_options()
        };
        assert!(Crawler::new(MapFetcher(HashMap::new()), &options).is_err());
    }
}
