//! Page fetching.
//!
//! [`PageFetcher`] wraps a [`Transport`] with everything the scraper needs
//! around a bare GET: charset decoding, block-page detection, a diagnostic
//! dump of each page, and a fixed post-fetch delay. Failures never escape
//! [`Fetch::fetch`]; they are logged and reported as "no page".

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use dom_query::Document;
use encoding_rs::Encoding;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use tracing::{debug, error, info, warn};

use crate::dom;
use crate::encoding::{charset_from_content_type, decode_body, EncodingSource};
use crate::error::{Error, Result};
use crate::options::FetchOptions;

/// Characters of a suspicious page echoed into the log.
const PREVIEW_CHARS: usize = 500;

// === Transport ===

/// What a transport hands back for one GET.
#[derive(Debug, Clone, Default)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw, already decompressed body.
    pub body: Vec<u8>,
    /// Charset from the `Content-Type` header, if any.
    pub declared_encoding: Option<String>,
    /// URL after redirects.
    pub final_url: String,
}

/// A blocking HTTP GET with headers and timeout fixed at construction.
pub trait Transport {
    /// Perform one GET. Network-level failures are errors; HTTP error
    /// statuses are not.
    fn get(&self, url: &str) -> Result<TransportResponse>;
}

/// [`Transport`] backed by `reqwest::blocking`.
///
/// Keeps a cookie store so consecutive requests look like one browser
/// session.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a client sending `options.headers` with `options.timeout`.
    pub fn new(options: &FetchOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &options.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::InvalidOptions(format!("header name {name:?}: {e}")))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| Error::InvalidOptions(format!("header {name}: {e}")))?;
            headers.insert(header_name, header_value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(options.timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| Error::InvalidOptions(format!("http client: {e}")))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<TransportResponse> {
        let transport_error = |e: reqwest::Error| Error::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url).send().map_err(transport_error)?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let declared_encoding = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(charset_from_content_type);
        let body = response.bytes().map_err(transport_error)?.to_vec();

        Ok(TransportResponse {
            status,
            body,
            declared_encoding,
            final_url,
        })
    }
}

// === Debug sink ===

/// Receives the decoded markup of every fetched page.
pub trait DebugSink {
    /// Store one page.
    fn record(&self, url: &str, html: &str) -> std::io::Result<()>;
}

/// Overwrites a single file with the most recently fetched page.
#[derive(Debug, Clone)]
pub struct FileDebugSink {
    path: PathBuf,
}

impl FileDebugSink {
    /// Sink writing to `path`, which is overwritten on every page.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File the pages are written to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DebugSink for FileDebugSink {
    fn record(&self, _url: &str, html: &str) -> std::io::Result<()> {
        fs::write(&self.path, html)
    }
}

// === Pages ===

/// How trustworthy a fetched page looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageHealth {
    /// Nothing unusual.
    Ok,
    /// Decoded text shorter than the minimum content length.
    TooShort,
    /// None of the expected site markers appear.
    MissingMarkers,
}

impl PageHealth {
    /// Classify decoded page text.
    #[must_use]
    pub fn assess(text: &str, min_len: usize, markers: &[String]) -> Self {
        if text.chars().count() < min_len {
            return Self::TooShort;
        }
        if markers.is_empty() {
            return Self::Ok;
        }
        let lower = text.to_lowercase();
        if markers.iter().any(|marker| lower.contains(&marker.to_lowercase())) {
            Self::Ok
        } else {
            Self::MissingMarkers
        }
    }
}

/// A fetched and parsed page.
///
/// Owned by whoever requested it and meant for a single parse pass.
pub struct RawPage {
    url: String,
    final_url: String,
    status: u16,
    content_len: usize,
    encoding: &'static Encoding,
    encoding_source: EncodingSource,
    health: PageHealth,
    document: Document,
}

impl RawPage {
    /// Wrap already-decoded markup, e.g. a saved page.
    ///
    /// Health is judged with the default thresholds.
    #[must_use]
    pub fn from_html(url: &str, html: &str) -> Self {
        let options = FetchOptions::default();
        Self {
            url: url.to_string(),
            final_url: url.to_string(),
            status: 200,
            content_len: html.chars().count(),
            encoding: encoding_rs::UTF_8,
            encoding_source: EncodingSource::Declared,
            health: PageHealth::assess(html, options.min_content_len, &options.expected_markers),
            document: dom::parse(html),
        }
    }

    /// Requested URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// URL after redirects.
    #[must_use]
    pub fn final_url(&self) -> &str {
        &self.final_url
    }

    /// HTTP status of the response.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Decoded length in characters.
    #[must_use]
    pub fn content_len(&self) -> usize {
        self.content_len
    }

    /// Encoding the body was decoded with.
    #[must_use]
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Which decoding step chose the encoding.
    #[must_use]
    pub fn encoding_source(&self) -> EncodingSource {
        self.encoding_source
    }

    /// Block-page assessment of the decoded text.
    #[must_use]
    pub fn health(&self) -> PageHealth {
        self.health
    }

    /// True when the page is probably a redirect or anti-scraping page.
    #[must_use]
    pub fn suspected_block(&self) -> bool {
        self.health != PageHealth::Ok
    }

    /// Parsed document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl fmt::Debug for RawPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawPage")
            .field("url", &self.url)
            .field("final_url", &self.final_url)
            .field("status", &self.status)
            .field("content_len", &self.content_len)
            .field("encoding", &self.encoding.name())
            .field("health", &self.health)
            .finish_non_exhaustive()
    }
}

// === Fetcher ===

/// Anything that can turn a URL into a page, or nothing.
pub trait Fetch {
    /// Fetch and parse `url`. Every failure is logged and yields `None`.
    fn fetch(&self, url: &str) -> Option<RawPage>;
}

/// Fetches pages through a [`Transport`].
pub struct PageFetcher<T> {
    transport: T,
    options: FetchOptions,
    debug_sink: Option<Box<dyn DebugSink>>,
}

impl PageFetcher<HttpTransport> {
    /// Fetcher over a real HTTP client.
    pub fn http(options: FetchOptions) -> Result<Self> {
        let transport = HttpTransport::new(&options)?;
        Ok(Self::new(transport, options))
    }
}

impl<T: Transport> PageFetcher<T> {
    /// Create a fetcher without a debug sink.
    #[must_use]
    pub fn new(transport: T, options: FetchOptions) -> Self {
        Self {
            transport,
            options,
            debug_sink: None,
        }
    }

    /// Write every fetched page to `sink`.
    #[must_use]
    pub fn with_debug_sink(mut self, sink: impl DebugSink + 'static) -> Self {
        self.debug_sink = Some(Box::new(sink));
        self
    }

    /// Settings this fetcher was built with.
    #[must_use]
    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch `url`, returning why it failed instead of logging it.
    pub fn try_fetch(&self, url: &str) -> Result<RawPage> {
        info!(url, "requesting page");

        let response = self.transport.get(url)?;
        if !(200..300).contains(&response.status) {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: response.status,
            });
        }

        let decoded = decode_body(
            &response.body,
            response.declared_encoding.as_deref(),
            self.options.default_encoding,
        );
        let content_len = decoded.text.chars().count();
        debug!(
            url,
            encoding = decoded.encoding.name(),
            source = ?decoded.source,
            content_len,
            "decoded page"
        );

        if let Some(sink) = &self.debug_sink {
            if let Err(e) = sink.record(url, &decoded.text) {
                warn!(url, error = %e, "failed to write debug page");
            }
        }

        let health = PageHealth::assess(
            &decoded.text,
            self.options.min_content_len,
            &self.options.expected_markers,
        );
        match health {
            PageHealth::Ok => {}
            PageHealth::TooShort => {
                let preview: String = decoded.text.chars().take(PREVIEW_CHARS).collect();
                warn!(
                    url,
                    content_len,
                    status = response.status,
                    final_url = %response.final_url,
                    %preview,
                    "response too short, possibly redirected or blocked"
                );
            }
            PageHealth::MissingMarkers => {
                warn!(url, final_url = %response.final_url, "page lacks expected markers, possibly blocked");
            }
        }

        let page = RawPage {
            url: url.to_string(),
            final_url: response.final_url,
            status: response.status,
            content_len,
            encoding: decoded.encoding,
            encoding_source: decoded.source,
            health,
            document: dom::parse(&decoded.text),
        };

        if !self.options.delay.is_zero() {
            thread::sleep(self.options.delay);
        }

        Ok(page)
    }
}

impl<T: Transport> Fetch for PageFetcher<T> {
    fn fetch(&self, url: &str) -> Option<RawPage> {
        match self.try_fetch(url) {
            Ok(page) => Some(page),
            Err(e) => {
                error!(url, error = %e, "request failed");
                None
            }
        }
    }
}
