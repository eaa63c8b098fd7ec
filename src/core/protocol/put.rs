//! Multi-patch PUT request encoding and decoding.
//!
//! A Braid-HTTP PUT packs N patches into one body. The outer headers carry the
//! version metadata and the patch count; the body is the patch blocks joined
//! by blank lines:
//!
//! ```text
//! PUT /doc HTTP/1.1
//! Version: 12345
//! Parents: foo,bar
//! Patches: 2
//! Content-Type: application/json
//! Content-Length: 74
//!
//! Content-Length: 16
//!
//! {"asdf": "jkl;"}
//!
//! Content-Length: 5
//! Quack: duck
//!
//! hello
//! ```
//!
//! Decoding runs the patch parser exactly `Patches` times over one shared
//! cursor. Bytes after the last declared patch are left unread.
//!
//! Neither direction observes cancellation: both are synchronous, and the
//! caller's transport decides the lifetime of the request.

use std::io::BufRead;

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, Request};

use crate::core::config::CodecConfig;
use crate::core::error::{BraidError, Result};
use crate::core::protocol::constants::headers;
use crate::core::protocol::formatter::format_patches;
use crate::core::protocol::headers::{
    format_parents, header_string, parse_parents, parse_patches_header,
};
use crate::core::protocol::parser::parse_patch;
use crate::core::types::PutRequest;

/// Build an outbound PUT to `destination` carrying every patch of `put`.
///
/// Sets `Version`, `Content-Type`, `Content-Length`, `Accept` (only when
/// non-empty), `Parents`, and `Patches`.
///
/// # Errors
///
/// - [`BraidError::BodyLengthMismatch`] if a patch body is shorter than its
///   declared length
/// - [`BraidError::Http`] if `destination` is not a valid URI or a header
///   value contains bytes HTTP does not allow
///
/// # Examples
///
/// ```
/// use braid_put::{make_put_request, Patch, PutRequest};
///
/// let put = PutRequest::new("v2")
///     .with_parent("v1")
///     .with_patch(Patch::new("hello"));
/// let request = make_put_request("http://example.com/doc", &put).unwrap();
///
/// assert_eq!(request.method(), http::Method::PUT);
/// assert_eq!(request.headers()["patches"], "1");
/// assert_eq!(request.body().as_ref(), b"Content-Length: 5\n\nhello");
/// ```
pub fn make_put_request(destination: &str, put: &PutRequest) -> Result<Request<Bytes>> {
    let body = format_patches(&put.patches)?;

    let mut builder = Request::builder()
        .method(Method::PUT)
        .uri(destination)
        .header(headers::VERSION, put.version.as_str())
        .header(headers::CONTENT_TYPE, put.content_type.as_str())
        .header(headers::CONTENT_LENGTH, body.len());
    if !put.accept.is_empty() {
        builder = builder.header(headers::ACCEPT, put.accept.as_str());
    }
    let request = builder
        .header(headers::PARENTS, format_parents(&put.parents))
        .header(headers::PATCHES, put.patches.len())
        .body(body)?;

    tracing::debug!(
        destination,
        version = %put.version,
        parents = put.parents.len(),
        patches = put.patches.len(),
        content_length = request.body().len(),
        "built put request"
    );
    Ok(request)
}

/// Decode a PUT request using the default [`CodecConfig`].
///
/// The body reader is advanced past the last declared patch and no further;
/// anything after it stays in `request.body_mut()` for the transport to drain.
pub fn read_put_request<B: BufRead>(request: &mut Request<B>) -> Result<PutRequest> {
    read_put_request_with_config(request, &CodecConfig::default())
}

/// Decode a PUT request with explicit limits.
pub fn read_put_request_with_config<B: BufRead>(
    request: &mut Request<B>,
    config: &CodecConfig,
) -> Result<PutRequest> {
    let (put, declared) = read_head(request.headers(), config)?;
    read_body(put, declared, request.body_mut(), config)
}

/// Decode a PUT request from its header map and body reader.
///
/// `Content-Type`, `Accept`, and `Version` are taken verbatim (empty when
/// absent). `Parents` is split on commas, so an absent or empty header yields
/// one empty parent. `Patches` is required.
///
/// # Errors
///
/// - [`BraidError::MissingPatchesHeader`] / [`BraidError::InvalidPatchesHeader`]
/// - [`BraidError::TooManyPatches`] when the count exceeds
///   [`CodecConfig::max_patches`]; nothing is read from `body` in that case
/// - any error from decoding an individual patch
pub fn read_put_parts<R: BufRead + ?Sized>(
    headers_map: &HeaderMap<HeaderValue>,
    body: &mut R,
    config: &CodecConfig,
) -> Result<PutRequest> {
    let (put, declared) = read_head(headers_map, config)?;
    read_body(put, declared, body, config)
}

fn read_head(headers_map: &HeaderMap<HeaderValue>, config: &CodecConfig) -> Result<(PutRequest, u64)> {
    let put = PutRequest {
        content_type: header_string(headers_map, &headers::CONTENT_TYPE),
        accept: header_string(headers_map, &headers::ACCEPT),
        version: header_string(headers_map, &headers::VERSION),
        parents: parse_parents(&header_string(headers_map, &headers::PARENTS)),
        patches: Vec::new(),
    };

    let declared = parse_patches_header(headers_map)?;
    if declared > config.max_patches as u64 {
        return Err(BraidError::TooManyPatches {
            declared,
            max: config.max_patches,
        });
    }
    Ok((put, declared))
}

fn read_body<R: BufRead + ?Sized>(
    mut put: PutRequest,
    declared: u64,
    body: &mut R,
    config: &CodecConfig,
) -> Result<PutRequest> {
    let mut patches = Vec::with_capacity(declared as usize);
    for index in 0..declared {
        tracing::trace!(index, declared, "reading patch");
        patches.push(parse_patch(body, config)?);
    }
    put.patches = patches;

    tracing::debug!(
        version = %put.version,
        parents = put.parents.len(),
        patches = put.patches.len(),
        "read put request"
    );
    Ok(put)
}
