//! Outer PUT request header parsing and formatting.

use http::HeaderMap;

use crate::core::error::{BraidError, Result};
use crate::core::protocol::constants::headers;

/// Parse a base-10 unsigned integer with no sign and no surrounding text.
pub fn parse_decimal(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Join parent versions for the `Parents` header, preserving order and
/// empty entries.
#[inline]
pub fn format_parents(parents: &[String]) -> String {
    parents.join(",")
}

/// Split a `Parents` header value on commas and trim each entry.
///
/// An empty value yields a single empty entry, not an empty list.
pub fn parse_parents(value: &str) -> Vec<String> {
    value.split(',').map(|p| p.trim().to_string()).collect()
}

/// Parse the `Patches` count.
///
/// # Errors
///
/// [`BraidError::MissingPatchesHeader`] when the header is absent or blank,
/// [`BraidError::InvalidPatchesHeader`] when it is not a decimal count.
pub fn parse_patches_header(headers_map: &HeaderMap) -> Result<u64> {
    let value = header_string(headers_map, &headers::PATCHES);
    let value = value.trim();
    if value.is_empty() {
        return Err(BraidError::MissingPatchesHeader);
    }
    parse_decimal(value).ok_or_else(|| BraidError::InvalidPatchesHeader(value.to_string()))
}

/// Get a header value as a string, or an empty string when absent.
///
/// Bytes outside visible ASCII are decoded lossily.
pub fn header_string(headers_map: &HeaderMap, name: &http::HeaderName) -> String {
    headers_map
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default()
}
