//! Braid-HTTP patch transport for Rust
//!
//! Packs one or more versioned patches into the body of a single HTTP PUT
//! and unpacks them again on the receiving side.
//!
//! # Modules
//!
//! - [`types`] - `Patch` and `PutRequest` value types
//! - [`protocol`] - line reader, patch codec, and PUT request codec
//! - [`config`] - decoding limits
//! - [`error`] - error type shared by every operation

pub mod config;
pub mod error;
pub mod protocol;
pub mod types;


pub use config::CodecConfig;
pub use error::{BraidError, Result};
pub use protocol::{make_put_request, read_put_parts, read_put_request, read_put_request_with_config};
pub use types::{Patch, PutRequest};
