//! Short comment pagination.
//!
//! Comments for one movie are spread over numbered pages of the site's
//! comment listing. [`CommentPaginator`] walks those pages until it has
//! enough comments, a page comes back short, or a fetch fails.

use tracing::{debug, info, warn};

use crate::dom;
use crate::fetch::{Fetch, RawPage};
use crate::options::CommentOptions;
use crate::patterns::{COMMENT_BLOCK, SHORT_COMMENT};
use crate::result::MovieRecord;
use crate::url_utils::{comments_page_url, subject_id};

/// Comments on a single comment page, in document order.
///
/// Uses `span.short` elements, or `div.comment` blocks when the page has
/// none. Whitespace is collapsed and anything of `min_chars` characters or
/// fewer is dropped.
#[must_use]
pub fn extract_page_comments(page: &RawPage, min_chars: usize) -> Vec<String> {
    let doc = page.document();
    let mut found = doc.select(SHORT_COMMENT);
    if !found.exists() {
        found = doc.select(COMMENT_BLOCK);
    }

    dom::split(&found)
        .iter()
        .map(dom::clean_text_content)
        .filter(|text| text.chars().count() > min_chars)
        .collect()
}

/// Collects short comments for movies, one page at a time.
pub struct CommentPaginator<'f, F: ?Sized> {
    fetcher: &'f F,
    options: CommentOptions,
}

impl<'f, F: Fetch + ?Sized> CommentPaginator<'f, F> {
    /// Paginator issuing every request through `fetcher`.
    #[must_use]
    pub fn new(fetcher: &'f F, options: CommentOptions) -> Self {
        Self { fetcher, options }
    }

    /// Settings this paginator was built with.
    #[must_use]
    pub fn options(&self) -> &CommentOptions {
        &self.options
    }

    /// Up to `target` comments for `movie`, in page order.
    ///
    /// Returns an empty list without touching the network when the movie
    /// URL carries no subject id. A failed page ends the walk but keeps
    /// what earlier pages produced.
    #[must_use]
    pub fn fetch_comments(&self, movie: &MovieRecord) -> Vec<String> {
        let Some(id) = subject_id(&movie.url) else {
            warn!(name = %movie.name, url = %movie.url, "cannot derive movie id, skipping comments");
            return Vec::new();
        };

        let CommentOptions {
            site_base,
            target,
            page_size,
            min_chars,
        } = &self.options;
        let (target, page_size) = (*target, *page_size);
        if target == 0 || page_size == 0 {
            return Vec::new();
        }

        let pages = target.div_ceil(page_size);
        let mut comments = Vec::new();

        for page_index in 0..pages {
            let url = comments_page_url(site_base, &id, page_index.saturating_mul(page_size), page_size);
            let Some(page) = self.fetcher.fetch(&url) else {
                warn!(name = %movie.name, page = page_index, "comment page unavailable, stopping");
                break;
            };

            let found = extract_page_comments(&page, *min_chars);
            let found_len = found.len();
            debug!(name = %movie.name, page = page_index, found = found_len, "comment page parsed");
            comments.extend(found);

            if found_len < page_size || comments.len() >= target {
                break;
            }
        }

        comments.truncate(target);
        info!(name = %movie.name, count = comments.len(), "collected comments");
        comments
    }
}
