//! Character encoding detection and transcoding.
//!
//! Response bodies are decoded with a three-step cascade:
//! 1. the charset declared in the HTTP `Content-Type` header, unless it is
//!    missing or the `ISO-8859-1` default servers emit when they know nothing;
//! 2. an encoding detected from the bytes (BOM, meta tags, trial decoding);
//! 3. a fixed default, decoded lossily.

use encoding_rs::{Encoding, GB18030, UTF_8};
use regex::Regex;
use std::sync::LazyLock;

/// Match `<meta charset="...">` tag
#[allow(clippy::expect_used)]
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>;]+)"#).expect("valid regex")
});

/// Match `<meta http-equiv="Content-Type" content="...; charset=...">` tag
#[allow(clippy::expect_used)]
static CONTENT_TYPE_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#).expect("valid regex")
});

/// Match the charset parameter of a `Content-Type` header value
#[allow(clippy::expect_used)]
static HEADER_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).expect("valid regex")
});

/// Labels that mean "the server did not say", not "this is Latin-1".
const UNTRUSTED_LABELS: &[&str] = &["iso-8859-1", "iso8859-1", "latin1", "latin-1", "l1"];

/// Encodings tried in order when nothing is declared.
fn trial_encodings() -> [&'static Encoding; 2] {
    [UTF_8, GB18030]
}

/// Which step of the cascade produced the encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingSource {
    /// HTTP `Content-Type` charset.
    Declared,
    /// BOM, meta tag, or trial decoding.
    Detected,
    /// Nothing worked; the fixed default was used.
    Default,
}

/// Text decoded from a response body.
#[derive(Debug, Clone)]
pub struct DecodedText {
    /// UTF-8 text.
    pub text: String,
    /// Encoding used to decode.
    pub encoding: &'static Encoding,
    /// Cascade step that picked the encoding.
    pub source: EncodingSource,
}

/// Extract the charset parameter from a `Content-Type` header value.
#[must_use]
pub fn charset_from_content_type(header: &str) -> Option<String> {
    HEADER_CHARSET_RE
        .captures(header)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Resolve a declared charset label, ignoring absent or untrusted defaults.
#[must_use]
pub fn trusted_declared_encoding(label: Option<&str>) -> Option<&'static Encoding> {
    let label = label?.trim();
    if label.is_empty() || UNTRUSTED_LABELS.contains(&label.to_ascii_lowercase().as_str()) {
        return None;
    }
    Encoding::for_label(label.as_bytes())
}

/// Detect character encoding from HTML bytes.
///
/// Looks, in order, at:
/// 1. a byte order mark
/// 2. `<meta charset="...">`
/// 3. `<meta http-equiv="Content-Type" content="...; charset=...">`
/// 4. the first of UTF-8 / GB18030 that decodes the whole body without errors
///
/// Meta tags are only searched in the first 1024 bytes.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> Option<&'static Encoding> {
    if let Some((encoding, _bom_len)) = Encoding::for_bom(html) {
        return Some(encoding);
    }

    let head = &html[..html.len().min(1024)];
    let head_str = String::from_utf8_lossy(head);

    let from_meta = extract_charset(&head_str)
        .or_else(|| extract_content_type_charset(&head_str))
        .and_then(|charset| Encoding::for_label(charset.as_bytes()));
    if from_meta.is_some() {
        return from_meta;
    }

    trial_encodings().into_iter().find(|encoding| {
        encoding
            .decode_without_bom_handling_and_without_replacement(html)
            .is_some()
    })
}

/// Extract charset from `<meta charset="...">` tag.
fn extract_charset(html: &str) -> Option<String> {
    CHARSET_META_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract charset from `<meta http-equiv="Content-Type" content="...; charset=...">` tag.
fn extract_content_type_charset(html: &str) -> Option<String> {
    CONTENT_TYPE_CHARSET_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Decode a response body through the declared → detected → default cascade.
///
/// Invalid sequences are replaced with U+FFFD rather than failing.
#[must_use]
pub fn decode_body(
    body: &[u8],
    declared: Option<&str>,
    default: &'static Encoding,
) -> DecodedText {
    let (encoding, source) = if let Some(encoding) = trusted_declared_encoding(declared) {
        (encoding, EncodingSource::Declared)
    } else if let Some(encoding) = detect_encoding(body) {
        (encoding, EncodingSource::Detected)
    } else {
        (default, EncodingSource::Default)
    };

    let (decoded, _encoding_used, _had_errors) = encoding.decode(body);

    DecodedText {
        text: decoded.into_owned(),
        encoding,
        source,
    }
}
