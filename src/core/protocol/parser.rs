//! Patch block parser.
//!
//! Decodes one patch at a time from a shared [`BufRead`] cursor with a small
//! state machine:
//!
//! 1. **Headers**: `Name: value` lines until a blank line. Blank lines before
//!    the first header are the separator left behind by the previous block
//!    and are skipped. Lines are capped at [`CodecConfig::max_header_line`].
//! 2. **Body**: exactly `Content-Length` bytes are read. Blank lines and
//!    delimiter bytes inside the body are content.
//! 3. **Done**: no more bytes are read.
//!
//! End of stream moves the machine straight to **Done** from any state. The
//! parser stops as soon as the body is complete, so it never reads into the
//! next block and never buffers more than the declared length.

use std::io::{BufRead, Read};

use bytes::Bytes;

use crate::core::config::CodecConfig;
use crate::core::error::{BraidError, Result};
use crate::core::protocol::constants::{patch_headers, LINE_DELIMITER};
use crate::core::protocol::headers::parse_decimal;
use crate::core::protocol::line::{read_line_limited, Line};
use crate::core::types::Patch;

/// Position in the patch parse state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Reading header lines. `seen_header` is false until the first
    /// non-blank line.
    Headers { seen_header: bool },
    /// Reading body bytes.
    Body,
    /// Finished; no more bytes are read.
    Done,
}

/// Parse one patch from `reader`.
///
/// # Errors
///
/// - [`BraidError::MalformedHeaderLine`] for a header line without `:`
/// - [`BraidError::HeaderLineTooLong`] for a header line longer than
///   [`CodecConfig::max_header_line`]
/// - [`BraidError::InvalidContentLength`] for a non-numeric `Content-Length`
/// - [`BraidError::ContentLengthTooLarge`] when it exceeds
///   [`CodecConfig::max_content_length`]
/// - [`BraidError::BodyLengthMismatch`] when the stream ends before the body
///   is complete
/// - [`BraidError::Io`] when the reader fails
pub fn parse_patch<R: BufRead + ?Sized>(reader: &mut R, config: &CodecConfig) -> Result<Patch> {
    let mut patch = Patch::default();
    let mut body = Vec::new();
    let mut state = ParseState::Headers { seen_header: false };

    while state != ParseState::Done {
        let next = match state {
            ParseState::Headers { seen_header } => {
                let line = read_line_limited(reader, LINE_DELIMITER, config.max_header_line)?;
                next_header_state(&mut patch, line, seen_header, config)?
            }
            ParseState::Body => {
                let remaining = patch.content_length - body.len() as u64;
                Read::take(&mut *reader, remaining).read_to_end(&mut body)?;
                ParseState::Done
            }
            ParseState::Done => ParseState::Done,
        };

        if next != state {
            tracing::trace!(from = ?state, to = ?next, "patch parse state");
        }
        state = next;
    }

    let actual = body.len() as u64;
    if actual < patch.content_length {
        return Err(BraidError::BodyLengthMismatch {
            expected: patch.content_length,
            actual,
        });
    }
    patch.body = Bytes::from(body);

    tracing::debug!(
        patch_name = %patch.name,
        content_length = patch.content_length,
        extra_headers = patch.extra_headers.len(),
        "parsed patch"
    );
    Ok(patch)
}

fn next_header_state(
    patch: &mut Patch,
    line: Line,
    seen_header: bool,
    config: &CodecConfig,
) -> Result<ParseState> {
    if let Line::Truncated(_) = line {
        return Err(BraidError::HeaderLineTooLong {
            max: config.max_header_line,
        });
    }

    if line.is_blank() {
        let next = if line.is_eof() {
            if !seen_header {
                tracing::warn!("end of stream before any patch header");
            }
            ParseState::Done
        } else if !seen_header {
            ParseState::Headers { seen_header }
        } else if patch.content_length == 0 {
            ParseState::Done
        } else {
            ParseState::Body
        };
        return Ok(next);
    }

    handle_header(patch, line.bytes(), config)?;
    if line.is_eof() {
        Ok(ParseState::Done)
    } else {
        Ok(ParseState::Headers { seen_header: true })
    }
}

fn handle_header(patch: &mut Patch, line: &[u8], config: &CodecConfig) -> Result<()> {
    let line = String::from_utf8_lossy(line);
    let Some((name, value)) = line.split_once(':') else {
        return Err(BraidError::MalformedHeaderLine(line.trim().to_string()));
    };
    let (name, value) = (name.trim(), value.trim());
    tracing::trace!(header = name, value, "patch header");

    if name.eq_ignore_ascii_case(patch_headers::PATCH_NAME) {
        patch.name = value.trim_matches('"').to_string();
    } else if name.eq_ignore_ascii_case(patch_headers::CONTENT_RANGE) {
        patch.content_range = value.to_string();
    } else if name.eq_ignore_ascii_case(patch_headers::CONTENT_LENGTH) {
        let length = parse_decimal(value)
            .ok_or_else(|| BraidError::InvalidContentLength(value.to_string()))?;
        if length > config.max_content_length {
            return Err(BraidError::ContentLengthTooLarge {
                declared: length,
                max: config.max_content_length,
            });
        }
        patch.content_length = length;
    } else {
        patch
            .extra_headers
            .insert(name.to_string(), value.to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn parse(input: &[u8]) -> Result<Patch> {
        let mut reader = input;
        parse_patch(&mut reader, &CodecConfig::default())
    }

    #[test]
    fn test_parse_full_patch() {
        let patch = parse(
            b"Patch-Name: \"merge\"\nContent-Range: json .a\nContent-Length: 2\nQuux: xyzzy\n\n{}",
        )
        .unwrap();
        assert_eq!(patch.name, "merge");
        assert_eq!(patch.content_range, "json .a");
        assert_eq!(patch.content_length, 2);
        assert_eq!(patch.extra_headers.get("Quux").map(String::as_str), Some("xyzzy"));
        assert_eq!(patch.body, Bytes::from_static(b"{}"));
    }

    #[test]
    fn test_header_names_case_insensitive() {
        let patch = parse(b"PATCH-NAME: x\ncontent-range: bytes 0-1\nCONTENT-length: 1\n\nz").unwrap();
        assert_eq!(patch.name, "x");
        assert_eq!(patch.content_range, "bytes 0-1");
        assert_eq!(patch.body, Bytes::from_static(b"z"));
        assert!(patch.extra_headers.is_empty());
    }

    #[test]
    fn test_extra_header_keeps_case_and_trims() {
        let patch = parse(b"  X-Custom-Thing :   some value  \nContent-Length: 0\n\n").unwrap();
        assert_eq!(
            patch.extra_headers.get("X-Custom-Thing").map(String::as_str),
            Some("some value")
        );
    }

    #[test]
    fn test_value_may_contain_colons() {
        let patch = parse(b"Content-Range: json .a:b\nContent-Length: 0\n\n").unwrap();
        assert_eq!(patch.content_range, "json .a:b");
    }

    #[test]
    fn test_crlf_lines() {
        let patch = parse(b"Content-Length: 3\r\nQuack: duck\r\n\r\nabc").unwrap();
        assert_eq!(patch.extra_headers.get("Quack").map(String::as_str), Some("duck"));
        assert_eq!(patch.body, Bytes::from_static(b"abc"));
    }

    #[test]
    fn test_body_with_blank_lines() {
        let patch = parse(b"Content-Length: 8\n\nab\n\ncd\n\n\n").unwrap();
        assert_eq!(patch.body, Bytes::from_static(b"ab\n\ncd\n\n"));
    }

    #[test]
    fn test_body_truncated_to_content_length() {
        let patch = parse(b"Content-Length: 3\n\nabc\n\nContent-Length: 1\n\nz").unwrap();
        assert_eq!(patch.body, Bytes::from_static(b"abc"));
        assert_eq!(patch.body.len() as u64, patch.content_length);
    }

    #[test]
    fn test_stops_after_body() {
        let mut reader: &[u8] = b"Content-Length: 3\n\nabc\n\nContent-Length: 1\n\nz";
        parse_patch(&mut reader, &CodecConfig::default()).unwrap();
        assert_eq!(reader, b"\n\nContent-Length: 1\n\nz");
    }

    #[test]
    fn test_body_read_is_bounded_by_content_length() {
        let config = CodecConfig {
            max_content_length: 16,
            ..Default::default()
        };
        let mut input = b"Content-Length: 1\n\n".to_vec();
        input.extend(std::iter::repeat(b'x').take(1024 * 1024));
        let mut reader = &input[..];

        let patch = parse_patch(&mut reader, &config).unwrap();
        assert_eq!(patch.body, Bytes::from_static(b"x"));
        assert_eq!(reader.len(), 1024 * 1024 - 1);
    }

    #[test]
    fn test_header_line_over_limit() {
        let config = CodecConfig {
            max_header_line: 32,
            ..Default::default()
        };
        let mut input = b"X-Long: ".to_vec();
        input.extend(std::iter::repeat(b'y').take(1024 * 1024));
        let mut reader = &input[..];

        let err = parse_patch(&mut reader, &config).unwrap_err();
        assert!(matches!(err, BraidError::HeaderLineTooLong { max: 32 }));
        assert_eq!(reader.len(), input.len() - 32);
    }

    #[test]
    fn test_header_line_at_limit() {
        let config = CodecConfig {
            max_header_line: 18,
            ..Default::default()
        };
        let patch = parse_patch(&mut &b"Content-Length: 2\n\nok"[..], &config).unwrap();
        assert_eq!(patch.body, Bytes::from_static(b"ok"));
    }

    #[test]
    fn test_extra_body_lines_left_for_next_call() {
        let mut reader: &[u8] = b"Content-Length: 2\n\nok\nstray line\n\n";
        let config = CodecConfig::default();
        assert_eq!(parse_patch(&mut reader, &config).unwrap().body, "ok");
        assert!(matches!(
            parse_patch(&mut reader, &config),
            Err(BraidError::MalformedHeaderLine(ref l)) if l == "stray line"
        ));
    }

    #[test]
    fn test_consecutive_patches_share_cursor() {
        let mut reader: &[u8] = b"Content-Length: 1\n\na\n\nContent-Length: 0\n\n\n\nContent-Length: 2\n\nbc";
        let config = CodecConfig::default();
        let first = parse_patch(&mut reader, &config).unwrap();
        let second = parse_patch(&mut reader, &config).unwrap();
        let third = parse_patch(&mut reader, &config).unwrap();
        assert_eq!(first.body, Bytes::from_static(b"a"));
        assert!(second.body.is_empty());
        assert_eq!(third.body, Bytes::from_static(b"bc"));
    }

    #[test]
    fn test_short_body_is_mismatch() {
        let mut input = b"Content-Length: 100\n\n".to_vec();
        input.extend(std::iter::repeat(b'x').take(50));
        let err = parse(&input).unwrap_err();
        assert!(matches!(
            err,
            BraidError::BodyLengthMismatch {
                expected: 100,
                actual: 50
            }
        ));
        assert!(err.to_string().contains("100"));
        assert!(err.to_string().contains("50"));
    }

    #[test]
    fn test_missing_colon() {
        let err = parse(b"Content-Length 5\n\nhello").unwrap_err();
        assert!(matches!(err, BraidError::MalformedHeaderLine(ref l) if l == "Content-Length 5"));
    }

    #[test]
    fn test_non_numeric_content_length() {
        let err = parse(b"Content-Length: five\n\nhello").unwrap_err();
        assert!(matches!(err, BraidError::InvalidContentLength(ref v) if v == "five"));
    }

    #[test]
    fn test_signed_content_length_rejected() {
        assert!(matches!(
            parse(b"Content-Length: +5\n\nhello"),
            Err(BraidError::InvalidContentLength(_))
        ));
    }

    #[test]
    fn test_content_length_over_limit() {
        let config = CodecConfig {
            max_content_length: 4,
            ..Default::default()
        };
        let mut reader: &[u8] = b"Content-Length: 5\n\nhello";
        let err = parse_patch(&mut reader, &config).unwrap_err();
        assert!(matches!(
            err,
            BraidError::ContentLengthTooLarge {
                declared: 5,
                max: 4
            }
        ));
    }

    #[test]
    fn test_empty_stream_yields_empty_patch() {
        let patch = parse(b"").unwrap();
        assert_eq!(patch, Patch::default());
    }

    #[test]
    fn test_eof_inside_headers() {
        let patch = parse(b"Patch-Name: \"tail\"").unwrap();
        assert_eq!(patch.name, "tail");
        assert!(patch.body.is_empty());
    }

    #[test]
    fn test_binary_body() {
        let mut input = b"Content-Length: 6\n\n".to_vec();
        input.extend_from_slice(&[0x00, b'\n', 0xff, b'\n', b'\n', 0x7f]);
        let patch = parse(&input).unwrap();
        assert_eq!(&patch.body[..], &[0x00, b'\n', 0xff, b'\n', b'\n', 0x7f]);
    }

    #[test]
    fn test_io_error_propagates() {
        struct Broken;
        impl std::io::Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
            }
        }
        let mut reader = std::io::BufReader::new(Broken);
        let err = parse_patch(&mut reader, &CodecConfig::default()).unwrap_err();
        assert!(matches!(err, BraidError::Io(_)));
        assert!(err.is_retryable());
    }
}
