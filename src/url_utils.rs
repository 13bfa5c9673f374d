//! URL Utility Functions
//!
//! Resolution of listing hrefs against the site base, subject id
//! extraction, and comment page URL construction.

use url::Url;

use crate::patterns::SUBJECT_ID;

/// Check if a string is a valid absolute URL.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if s.is_empty() {
        return (false, None);
    }

    // Must start with http:// or https://
    if !s.starts_with("http://") && !s.starts_with("https://") {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) => {
            if url.host().is_some() {
                (true, Some(url))
            } else {
                (false, None)
            }
        }
        Err(_) => (false, None),
    }
}

/// Convert a relative or absolute URL to absolute form.
///
/// Absolute `http(s)` URLs are returned verbatim, relative ones are joined
/// onto `base`. Protocol-relative and special-scheme values go through
/// `Url::join` too, which keeps them intact.
///
/// # Returns
/// * The absolute URL string, the trimmed input if resolution fails, or
///   an empty string for blank input
#[must_use]
pub fn create_absolute_url(url_str: &str, base: &Url) -> String {
    let url_str = url_str.trim();

    if url_str.is_empty() {
        return String::new();
    }

    let (is_abs, _) = is_absolute_url(url_str);
    if is_abs {
        return url_str.to_string();
    }

    match base.join(url_str) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => url_str.to_string(),
    }
}

/// Extract the numeric movie id from a `/subject/<digits>/` URL.
///
/// # Examples
/// ```
/// use nowshowing::url_utils::subject_id;
///
/// assert_eq!(subject_id("https://movie.douban.com/subject/34780991/"), Some("34780991".to_string()));
/// assert_eq!(subject_id("https://movie.douban.com/cinema/nowplaying/"), None);
/// ```
#[must_use]
pub fn subject_id(url: &str) -> Option<String> {
    SUBJECT_ID
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Build the URL of one comment page for a movie.
///
/// Comments are sorted by the site's recency-weighted score (`new_score`)
/// and restricted to viewers who have watched (`status=P`). The path is
/// anchored at the root of `site_base`; any path on the base is ignored.
#[must_use]
pub fn comments_page_url(site_base: &Url, movie_id: &str, start: usize, limit: usize) -> String {
    let path = format!("/subject/{movie_id}/comments");
    let mut url = match site_base.join(&path) {
        Ok(url) => url,
        Err(_) => return String::new(),
    };

    url.query_pairs_mut()
        .append_pair("start", &start.to_string())
        .append_pair("limit", &limit.to_string())
        .append_pair("status", "P")
        .append_pair("sort", "new_score");

    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://movie.douban.com").unwrap()
    }

    #[test]
    fn test_is_absolute_url() {
        assert!(is_absolute_url("https://movie.douban.com/subject/1/").0);
        assert!(is_absolute_url("  http://example.com  ").0);
        assert!(!is_absolute_url("/subject/1/").0);
        assert!(!is_absolute_url("").0);
        assert!(!is_absolute_url("ftp://example.com").0);
    }

    #[test]
    fn test_create_absolute_url_relative_path() {
        assert_eq!(
            create_absolute_url("/subject/1291546/", &base()),
            "https://movie.douban.com/subject/1291546/"
        );
    }

    #[test]
    fn test_create_absolute_url_keeps_absolute() {
        assert_eq!(
            create_absolute_url("https://m.douban.com/movie/subject/1/", &base()),
            "https://m.douban.com/movie/subject/1/"
        );
    }

    #[test]
    fn test_create_absolute_url_empty() {
        assert_eq!(create_absolute_url("   ", &base()), "");
    }

    #[test]
    fn test_subject_id() {
        assert_eq!(
            subject_id("https://movie.douban.com/subject/34780991/"),
            Some("34780991".to_string())
        );
        assert_eq!(
            subject_id("https://movie.douban.com/subject/34780991/?from=playing"),
            Some("34780991".to_string())
        );
        assert_eq!(subject_id("https://movie.douban.com/subject/34780991"), None);
        assert_eq!(subject_id(""), None);
    }

    #[test]
    fn test_comments_page_url() {
        assert_eq!(
            comments_page_url(&base(), "34780991", 20, 20),
            "https://movie.douban.com/subject/34780991/comments?start=20&limit=20&status=P&sort=new_score"
        );
    }

    #[test]
    fn test_comments_page_url_first_page() {
        let url = comments_page_url(&base(), "1", 0, 20);
        assert!(url.contains("start=0&limit=20"));
    }

    #[test]
    fn test_comments_page_url_ignores_base_path() {
        let nested = Url::parse("https://movie.douban.com/x/y").unwrap();
        assert_eq!(
            comments_page_url(&nested, "7", 0, 20),
            "https://movie.douban.com/subject/7/comments?start=0&limit=20&status=P&sort=new_score"
        );
    }
}
