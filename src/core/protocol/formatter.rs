//! Patch block formatter.
//!
//! Converts [`Patch`] values into the header-block-plus-body wire form and
//! joins several of them into a PUT body.

use bytes::{BufMut, Bytes, BytesMut};

use crate::core::error::{BraidError, Result};
use crate::core::protocol::constants::{patch_headers, PATCH_SEPARATOR};
use crate::core::types::Patch;

/// Format a single patch as header lines, a blank line, and its body.
///
/// Header order is `Patch-Name` (quoted, only when set), `Content-Range` (only
/// when set), `Content-Length` (always), then the extra headers in key order.
/// The body is copied for exactly `patch.len()` bytes.
///
/// # Errors
///
/// - [`BraidError::BodyLengthMismatch`] if the body is shorter than the
///   declared content length
/// - [`BraidError::InvalidPatchHeader`] if a header would not decode back to
///   the same field: a line break or surrounding whitespace in a value, a
///   quote at either end of the name, an extra header name that is empty or
///   holds `:`, whitespace or control bytes, or an extra header that shadows
///   `Patch-Name`, `Content-Range` or `Content-Length`
pub fn format_patch(patch: &Patch) -> Result<Bytes> {
    check_headers(patch)?;

    let content_length = patch.len();
    let available = patch.body.len() as u64;
    if available < content_length {
        return Err(BraidError::BodyLengthMismatch {
            expected: content_length,
            actual: available,
        });
    }

    let mut buffer = BytesMut::new();

    if !patch.name.is_empty() {
        write_header(&mut buffer, patch_headers::PATCH_NAME, &format!("\"{}\"", patch.name));
    }
    if !patch.content_range.is_empty() {
        write_header(&mut buffer, patch_headers::CONTENT_RANGE, &patch.content_range);
    }
    write_header(
        &mut buffer,
        patch_headers::CONTENT_LENGTH,
        &content_length.to_string(),
    );
    for (name, value) in &patch.extra_headers {
        write_header(&mut buffer, name, value);
    }

    buffer.put_u8(b'\n'); // End of patch headers
    buffer.extend_from_slice(&patch.body[..content_length as usize]);

    tracing::debug!(
        patch_name = %patch.name,
        content_length,
        extra_headers = patch.extra_headers.len(),
        "marshaled patch"
    );
    Ok(buffer.freeze())
}

/// Format every patch and join the blocks with a blank line.
///
/// Returns an empty body for an empty slice.
pub fn format_patches(patches: &[Patch]) -> Result<Bytes> {
    let mut body = BytesMut::new();
    for (i, patch) in patches.iter().enumerate() {
        if i > 0 {
            body.extend_from_slice(PATCH_SEPARATOR);
        }
        body.extend_from_slice(&format_patch(patch)?);
    }
    Ok(body.freeze())
}

fn check_headers(patch: &Patch) -> Result<()> {
    check_value(patch_headers::PATCH_NAME, &patch.name)?;
    if patch.name.starts_with('"') || patch.name.ends_with('"') {
        return Err(BraidError::InvalidPatchHeader(format!(
            "{} value {:?} starts or ends with a quote",
            patch_headers::PATCH_NAME,
            patch.name
        )));
    }
    check_value(patch_headers::CONTENT_RANGE, &patch.content_range)?;

    for (name, value) in &patch.extra_headers {
        let bad_name = name.is_empty()
            || name
                .bytes()
                .any(|b| b == b':' || b.is_ascii_whitespace() || b.is_ascii_control());
        if bad_name {
            return Err(BraidError::InvalidPatchHeader(format!(
                "bad header name {name:?}"
            )));
        }
        let reserved = [
            patch_headers::PATCH_NAME,
            patch_headers::CONTENT_RANGE,
            patch_headers::CONTENT_LENGTH,
        ];
        if reserved.iter().any(|r| name.eq_ignore_ascii_case(r)) {
            return Err(BraidError::InvalidPatchHeader(format!(
                "{name} is written from the patch fields"
            )));
        }
        check_value(name, value)?;
    }
    Ok(())
}

fn check_value(name: &str, value: &str) -> Result<()> {
    if value.contains(['\r', '\n']) {
        return Err(BraidError::InvalidPatchHeader(format!(
            "{name} value contains a line break"
        )));
    }
    if value.trim() != value {
        return Err(BraidError::InvalidPatchHeader(format!(
            "{name} value {value:?} has surrounding whitespace"
        )));
    }
    Ok(())
}

fn write_header(buffer: &mut BytesMut, key: &str, value: &str) {
    buffer.extend_from_slice(key.as_bytes());
    buffer.extend_from_slice(b": ");
    buffer.extend_from_slice(value.as_bytes());
    buffer.put_u8(b'\n');
}
