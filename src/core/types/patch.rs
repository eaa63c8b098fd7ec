//! Patch: one versioned diff unit carried in a PUT body.
//!
//! A patch is a small header block followed by an exact-length body:
//!
//! ```text
//! Patch-Name: "json-merge"
//! Content-Range: json .users[0]
//! Content-Length: 16
//! Quux: xyzzy
//!
//! {"asdf": "jkl;"}
//! ```
//!
//! The body is opaque. `Content-Range` is never interpreted by this crate; it
//! is only carried through. Because the body is framed by its declared length
//! rather than by a delimiter, it may contain any bytes at all, blank lines
//! included.
//!
//! # Examples
//!
//! ```
//! use braid_put::Patch;
//!
//! let patch = Patch::new(r#"{"asdf": "jkl;"}"#)
//!     .with_name("json-merge")
//!     .with_content_range("json .users[0]")
//!     .with_header("Quux", "xyzzy");
//!
//! let wire = patch.marshal().unwrap();
//! let decoded = Patch::unmarshal(&mut &wire[..]).unwrap();
//!
//! assert_eq!(decoded.body, patch.body);
//! assert_eq!(decoded.content_length, 16);
//! ```

use std::collections::BTreeMap;
use std::io::BufRead;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::core::config::CodecConfig;
use crate::core::error::Result;
use crate::core::protocol::{formatter, parser};

/// A single patch with its metadata headers and byte-exact body.
///
/// Empty strings stand for absent headers: a patch with an empty `name` is
/// written without `Patch-Name`, and likewise for `content_range`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    /// Identifier of the patch's type or semantics (`Patch-Name`).
    pub name: String,

    /// Opaque description of what part of the document the patch targets.
    pub content_range: String,

    /// Byte length of `body`.
    ///
    /// Zero means "use `body.len()`" when marshaling. After a successful
    /// unmarshal `body.len() == content_length` always holds.
    pub content_length: u64,

    /// Extension headers, written one per line in key order.
    pub extra_headers: BTreeMap<String, String>,

    /// Raw patch payload.
    pub body: Bytes,
}

impl Patch {
    /// Create a patch carrying `body`, with its length taken from the body.
    #[must_use]
    pub fn new(body: impl Into<Bytes>) -> Self {
        let body = body.into();
        Patch {
            content_length: body.len() as u64,
            body,
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_content_range(mut self, content_range: impl Into<String>) -> Self {
        self.content_range = content_range.into();
        self
    }

    /// Declare an explicit content length.
    ///
    /// Marshaling writes only the first `length` bytes of the body, and fails
    /// if the body is shorter than `length`.
    pub fn with_content_length(mut self, length: u64) -> Self {
        self.content_length = length;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(name.into(), value.into());
        self
    }

    /// The length that goes on the wire: `content_length`, or the body length
    /// when `content_length` is unset.
    #[inline]
    #[must_use]
    pub fn len(&self) -> u64 {
        if self.content_length == 0 {
            self.body.len() as u64
        } else {
            self.content_length
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the body as a UTF-8 string, if it is one.
    #[inline]
    #[must_use]
    pub fn content_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Encode this patch as a header block followed by its body.
    ///
    /// # Errors
    ///
    /// Returns [`BodyLengthMismatch`](crate::BraidError::BodyLengthMismatch)
    /// if `content_length` is larger than the body, and
    /// [`InvalidPatchHeader`](crate::BraidError::InvalidPatchHeader) if a
    /// header field would not decode back unchanged.
    pub fn marshal(&self) -> Result<Bytes> {
        formatter::format_patch(self)
    }

    /// Decode one patch from `reader` using the default [`CodecConfig`].
    ///
    /// The reader is left positioned directly after the patch body, so the
    /// same reader can be handed to the next call.
    pub fn unmarshal<R: BufRead + ?Sized>(reader: &mut R) -> Result<Patch> {
        parser::parse_patch(reader, &CodecConfig::default())
    }
}
