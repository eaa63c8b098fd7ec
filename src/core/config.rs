//! Configuration for the patch codec.
//!
//! [`CodecConfig`] bounds how much untrusted input the decoders accept. The
//! encoders never consult it: outbound data is whatever the caller built.
//!
//! # Configuration Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `max_patches` | 1024 | Largest `Patches` count accepted on read |
//! | `max_content_length` | 64 MiB | Largest per-patch `Content-Length` accepted on read |
//! | `max_header_line` | 8 KiB | Longest patch header line accepted on read, line end included |
//!
//! # Examples
//!
//! ```
//! use braid_put::CodecConfig;
//!
//! let config = CodecConfig {
//!     max_patches: 16,
//!     ..Default::default()
//! };
//! assert_eq!(config.max_patches, 16);
//! assert_eq!(config.max_content_length, 64 * 1024 * 1024);
//! ```

/// Default upper bound on the `Patches` header.
pub const DEFAULT_MAX_PATCHES: usize = 1024;

/// Default upper bound on a single patch body, in bytes.
pub const DEFAULT_MAX_CONTENT_LENGTH: u64 = 64 * 1024 * 1024;

/// Default upper bound on one patch header line, in bytes.
pub const DEFAULT_MAX_HEADER_LINE: usize = 8 * 1024;

/// Limits applied while decoding patches and PUT requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodecConfig {
    /// Maximum number of patches a single PUT request may declare.
    ///
    /// A request declaring more fails with
    /// [`BraidError::TooManyPatches`](crate::BraidError::TooManyPatches)
    /// before any of its body is read.
    pub max_patches: usize,

    /// Maximum `Content-Length` a single patch may declare.
    ///
    /// The body reader never pulls more than the declared length from the
    /// stream, so this also caps the bytes buffered per patch.
    pub max_content_length: u64,

    /// Maximum length of one patch header line, delimiter included.
    ///
    /// A longer line fails with
    /// [`BraidError::HeaderLineTooLong`](crate::BraidError::HeaderLineTooLong)
    /// after at most this many bytes have been read.
    pub max_header_line: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            max_patches: DEFAULT_MAX_PATCHES,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            max_header_line: DEFAULT_MAX_HEADER_LINE,
        }
    }
}
