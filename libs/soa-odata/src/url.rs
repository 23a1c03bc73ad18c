//! Literal URL string helpers.
//!
//! Everything here works on the URL text as-is. Nothing is parsed into a
//! structured URL and re-serialized, so callers observe exactly the bytes they
//! passed in plus whatever was appended.

use std::borrow::Cow;

/// Percent-encode a single URL component (query value, path segment).
#[must_use]
pub fn encode_component(raw: &str) -> Cow<'_, str> {
    urlencoding::encode(raw)
}

/// Percent-decode a single URL component.
///
/// Input that does not decode to valid UTF-8 is returned unchanged.
#[must_use]
pub fn decode_component(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}

/// Delimiter for the next query fragment appended to `url`: `&` once the URL
/// carries a `?`, otherwise `?`.
#[must_use]
pub fn delimiter(url: &str) -> char {
    if url.contains('?') { '&' } else { '?' }
}

/// Query-string suffix of `url`, from the first `?` (inclusive) to the end.
#[must_use]
pub fn query_suffix(url: &str) -> Option<&str> {
    url.find('?').map(|index| &url[index..])
}

/// Raw value of the first `key=value` pair whose key equals `key` literally.
///
/// Only the segment between the first and second `?` is inspected. A pair
/// without `=` yields `None`; the value is returned undecoded and ends at the
/// next `=` if the pair contains several.
#[must_use]
pub fn query_value<'a>(url: &'a str, key: &str) -> Option<&'a str> {
    let query = url.split('?').nth(1)?;
    for pair in query.split('&') {
        let mut parts = pair.split('=');
        if parts.next() == Some(key) {
            return parts.next();
        }
    }
    None
}
