//! Wire constants for Braid-HTTP patch transport.

/// Header names used on the outer PUT request.
///
/// `http::HeaderName` stores names lowercased; lookups through a
/// `HeaderMap` are case-insensitive.
pub mod headers {
    use http::HeaderName;

    pub const VERSION: HeaderName = HeaderName::from_static("version");
    pub const PARENTS: HeaderName = HeaderName::from_static("parents");
    pub const PATCHES: HeaderName = HeaderName::from_static("patches");
    pub const CONTENT_TYPE: HeaderName = http::header::CONTENT_TYPE;
    pub const CONTENT_LENGTH: HeaderName = http::header::CONTENT_LENGTH;
    pub const ACCEPT: HeaderName = http::header::ACCEPT;
}

/// Line delimiter for patch header blocks.
pub const LINE_DELIMITER: u8 = b'\n';

/// Separator placed between consecutive patch blocks in a PUT body.
pub const PATCH_SEPARATOR: &[u8] = b"\n\n";

/// Canonical spelling of the patch block headers as they are written.
pub mod patch_headers {
    pub const PATCH_NAME: &str = "Patch-Name";
    pub const CONTENT_RANGE: &str = "Content-Range";
    pub const CONTENT_LENGTH: &str = "Content-Length";
}
