//! Error types for the Braid-HTTP patch transport.
//!
//! Every failure in this crate is a [`BraidError`]. The [`Result`] type alias
//! provides a convenient shorthand for operations that may fail.
//!
//! # Error Categories
//!
//! | Category | Variants | Retryable |
//! |----------|----------|-----------|
//! | Patch framing | `MalformedHeaderLine`, `InvalidContentLength`, `BodyLengthMismatch` | No |
//! | Request framing | `MissingPatchesHeader`, `InvalidPatchesHeader` | No |
//! | Limits | `TooManyPatches`, `ContentLengthTooLarge`, `HeaderLineTooLong` | No |
//! | Patch encoding | `InvalidPatchHeader` | No |
//! | Transport | `Io` | Yes |
//! | Request construction | `Http` | No |
//!
//! Errors are returned to the immediate caller as soon as they are detected.
//! No partially decoded [`Patch`](crate::core::types::Patch) or
//! [`PutRequest`](crate::core::types::PutRequest) is ever handed out alongside
//! an error.
//!
//! # Examples
//!
//! ```
//! use braid_put::BraidError;
//!
//! let err = BraidError::BodyLengthMismatch { expected: 100, actual: 50 };
//! assert!(err.to_string().contains("100"));
//! assert!(err.to_string().contains("50"));
//! assert!(!err.is_retryable());
//! ```

use std::io;
use thiserror::Error;

/// Result type for Braid patch transport operations.
pub type Result<T> = std::result::Result<T, BraidError>;

/// Errors that can occur while encoding or decoding patches and PUT requests.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BraidError {
    /// A patch header line had no `:` separating name and value.
    #[error("bad patch header: {0}")]
    MalformedHeaderLine(String),

    /// A patch `Content-Length` value was not a base-10 unsigned integer.
    #[error("bad patch Content-Length: {0}")]
    InvalidContentLength(String),

    /// Fewer body bytes were available than the declared `Content-Length`.
    #[error("bad content length (expected {expected}, got {actual})")]
    BodyLengthMismatch { expected: u64, actual: u64 },

    /// The PUT request carried no `Patches` header.
    #[error("missing Patches header")]
    MissingPatchesHeader,

    /// The `Patches` header was not a base-10 unsigned integer.
    #[error("bad Patches header: {0}")]
    InvalidPatchesHeader(String),

    /// The `Patches` header declared more patches than the codec accepts.
    #[error("too many patches: {declared} declared, at most {max} accepted")]
    TooManyPatches { declared: u64, max: usize },

    /// A patch declared a body larger than the codec accepts.
    #[error("patch Content-Length {declared} exceeds limit of {max} bytes")]
    ContentLengthTooLarge { declared: u64, max: u64 },

    /// A patch header line ran past the accepted length without a line end.
    #[error("patch header line longer than {max} bytes")]
    HeaderLineTooLong { max: usize },

    /// A patch field cannot be written as a header line that decodes back to
    /// the same value.
    #[error("cannot encode patch header: {0}")]
    InvalidPatchHeader(String),

    /// Reading the underlying byte stream failed.
    ///
    /// These errors are typically retryable at the level of the whole request.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Building the outbound HTTP request failed (bad URI or header value).
    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<http::Error> for BraidError {
    fn from(err: http::Error) -> Self {
        BraidError::Http(err.to_string())
    }
}

impl BraidError {
    /// Check if this error is retryable.
    ///
    /// Only stream failures qualify: the caller may retry the outer request
    /// once the transport recovers. Framing errors describe the bytes that were
    /// sent and will fail the same way again.
    ///
    /// # Examples
    ///
    /// ```
    /// use braid_put::BraidError;
    ///
    /// let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
    /// assert!(BraidError::from(io_err).is_retryable());
    /// assert!(!BraidError::MissingPatchesHeader.is_retryable());
    /// ```
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, BraidError::Io(_))
    }

    /// Check if this error was caused by malformed wire data.
    #[inline]
    #[must_use]
    pub fn is_framing(&self) -> bool {
        matches!(
            self,
            BraidError::MalformedHeaderLine(_)
                | BraidError::InvalidContentLength(_)
                | BraidError::BodyLengthMismatch { .. }
                | BraidError::MissingPatchesHeader
                | BraidError::InvalidPatchesHeader(_)
        )
    }
}
