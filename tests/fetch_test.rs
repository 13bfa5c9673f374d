use std::cell::Cell;
use std::fs;
use std::time::Duration;

use nowshowing::encoding::EncodingSource;
use nowshowing::{
    Error, Fetch, FetchOptions, FileDebugSink, PageFetcher, PageHealth, Result, Transport,
    TransportResponse,
};

/// Returns the same response every time and counts calls.
struct CannedTransport {
    response: TransportResponse,
    calls: Cell<usize>,
}

impl CannedTransport {
    fn new(status: u16, body: Vec<u8>, declared: Option<&str>) -> Self {
        Self {
            response: TransportResponse {
                status,
                body,
                declared_encoding: declared.map(str::to_string),
                final_url: "https://movie.douban.com/cinema/nowplaying/wuhan/".to_string(),
            },
            calls: Cell::new(0),
        }
    }
}

impl Transport for CannedTransport {
    fn get(&self, _url: &str) -> Result<TransportResponse> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.response.clone())
    }
}

fn options() -> FetchOptions {
    FetchOptions {
        delay: Duration::ZERO,
        min_content_len: 20,
        ..FetchOptions::default()
    }
}

fn long_page(body: &str) -> String {
    format!("<html><head><title>豆瓣电影</title></head><body>{body}</body></html>")
}

#[test]
fn gb18030_body_without_header_is_detected() {
    let html = long_page("<p class=\"t\">正在上映的电影</p>");
    let (bytes, _, _) = encoding_rs::GB18030.encode(&html);

    let fetcher = PageFetcher::new(CannedTransport::new(200, bytes.into_owned(), None), options());
    let page = fetcher.fetch("https://movie.douban.com/").expect("page");

    assert_eq!(page.encoding_source(), EncodingSource::Detected);
    assert_eq!(page.encoding(), encoding_rs::GB18030);
    assert_eq!(page.document().select("p.t").text().to_string(), "正在上映的电影");
}

#[test]
fn meta_charset_beats_trial_decoding() {
    let html = "<html><head><meta charset=\"gbk\"><title>豆瓣电影</title></head><body><p>热映</p></body></html>";
    let (bytes, _, _) = encoding_rs::GBK.encode(html);

    let fetcher = PageFetcher::new(
        CannedTransport::new(200, bytes.into_owned(), Some("iso-8859-1")),
        options(),
    );
    let page = fetcher.fetch("https://movie.douban.com/").expect("page");

    assert_eq!(page.encoding_source(), EncodingSource::Detected);
    assert_eq!(page.encoding(), encoding_rs::GBK);
    assert_eq!(page.document().select("p").text().to_string(), "热映");
}

#[test]
fn declared_header_is_trusted() {
    let html = long_page("<p>ok</p>");
    let fetcher = PageFetcher::new(
        CannedTransport::new(200, html.into_bytes(), Some("utf-8")),
        options(),
    );

    let page = fetcher.fetch("https://movie.douban.com/").expect("page");
    assert_eq!(page.encoding_source(), EncodingSource::Declared);
    assert_eq!(page.health(), PageHealth::Ok);
}

#[test]
fn missing_markers_flagged() {
    let html = "<html><body><p>Please solve the captcha to continue browsing</p></body></html>";
    let fetcher = PageFetcher::new(
        CannedTransport::new(200, html.as_bytes().to_vec(), Some("utf-8")),
        options(),
    );

    let page = fetcher.fetch("https://movie.douban.com/").expect("page");
    assert_eq!(page.health(), PageHealth::MissingMarkers);
    assert!(page.suspected_block());
}

#[test]
fn server_error_is_reported_and_swallowed() {
    let transport = CannedTransport::new(502, b"bad gateway".to_vec(), None);
    let fetcher = PageFetcher::new(transport, options());

    assert!(fetcher.fetch("https://movie.douban.com/").is_none());
    assert!(matches!(
        fetcher.try_fetch("https://movie.douban.com/"),
        Err(Error::HttpStatus { status: 502, .. })
    ));
}

#[test]
fn file_sink_keeps_last_page() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dump = dir.path().join("debug_page.html");

    let fetcher = PageFetcher::new(
        CannedTransport::new(200, long_page("<p>latest</p>").into_bytes(), Some("utf-8")),
        options(),
    )
    .with_debug_sink(FileDebugSink::new(&dump));

    fetcher.fetch("https://movie.douban.com/a").expect("page");
    fetcher.fetch("https://movie.douban.com/b").expect("page");

    let written = fs::read_to_string(&dump).expect("dump written");
    assert!(written.contains("<p>latest</p>"));
}

#[test]
fn unwritable_sink_does_not_fail_fetch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dump = dir.path().join("missing-dir").join("debug_page.html");

    let fetcher = PageFetcher::new(
        CannedTransport::new(200, long_page("<p>x</p>").into_bytes(), Some("utf-8")),
        options(),
    )
    .with_debug_sink(FileDebugSink::new(dump));

    assert!(fetcher.fetch("https://movie.douban.com/").is_some());
}
