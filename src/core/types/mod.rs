//! Value types for the Braid-HTTP patch transport.

mod patch;
mod put_request;

pub use bytes::Bytes;
pub use patch::Patch;
pub use put_request::PutRequest;
