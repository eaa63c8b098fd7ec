//! Delimiter-terminated line reading over a shared cursor.
//!
//! Every patch decoder call reads from the same [`BufRead`]. The reader owns
//! the only buffer, so a line read here never swallows bytes that belong to
//! the next call.

use std::io::{self, BufRead, Read};

/// One line read from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A full line, delimiter included.
    Delimited(Vec<u8>),
    /// The stream ended before a delimiter was found. Holds whatever was
    /// read first, which may be nothing.
    Eof(Vec<u8>),
    /// The length limit was reached before a delimiter was found. Holds the
    /// bytes read so far; the rest of the line is still in the stream.
    Truncated(Vec<u8>),
}

impl Line {
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        match self {
            Line::Delimited(bytes) | Line::Eof(bytes) | Line::Truncated(bytes) => bytes,
        }
    }

    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Line::Delimited(bytes) | Line::Eof(bytes) | Line::Truncated(bytes) => bytes,
        }
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        matches!(self, Line::Eof(_))
    }

    /// True when the line holds nothing but ASCII whitespace (`\n`, `\r\n`,
    /// or an empty end-of-stream read).
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.bytes().iter().all(u8::is_ascii_whitespace)
    }
}

/// Read up to and including the next `delim`, or to end of stream.
///
/// # Errors
///
/// Any I/O error from the underlying reader is returned as is.
pub fn read_line<R: BufRead + ?Sized>(reader: &mut R, delim: u8) -> io::Result<Line> {
    let mut line = Vec::new();
    reader.read_until(delim, &mut line)?;
    if line.last() == Some(&delim) {
        Ok(Line::Delimited(line))
    } else {
        Ok(Line::Eof(line))
    }
}

/// Like [`read_line`], but reads at most `limit` bytes, delimiter included.
///
/// A line that does not fit comes back as [`Line::Truncated`]. A stream that
/// ends exactly at the limit without a delimiter is reported the same way.
pub fn read_line_limited<R: BufRead + ?Sized>(
    reader: &mut R,
    delim: u8,
    limit: usize,
) -> io::Result<Line> {
    let mut line = Vec::new();
    Read::take(&mut *reader, limit as u64).read_until(delim, &mut line)?;
    if line.last() == Some(&delim) {
        Ok(Line::Delimited(line))
    } else if line.len() >= limit {
        Ok(Line::Truncated(line))
    } else {
        Ok(Line::Eof(line))
    }
}
