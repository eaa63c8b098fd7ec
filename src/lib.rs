//! braid_put: the Braid-HTTP "patch" transport.
//!
//! A Braid-HTTP PUT carries N patches in one body. Each patch is a short
//! header block (`Patch-Name`, `Content-Range`, `Content-Length`, extension
//! headers) followed by exactly `Content-Length` body bytes; the outer request
//! announces how many patches follow with a `Patches` header.
//!
//! ```
//! use braid_put::{make_put_request, read_put_request, Patch, PutRequest};
//! use std::io::Cursor;
//!
//! let put = PutRequest::new("12345")
//!     .with_parents(["foo", "bar"])
//!     .with_content_type("application/json")
//!     .with_patch(Patch::new(r#"{"asdf": "jkl;"}"#).with_name("patch-type-1"));
//!
//! let request = make_put_request("http://braid.org", &put)?;
//! let mut inbound = request.map(Cursor::new);
//! assert_eq!(read_put_request(&mut inbound)?, put);
//! # Ok::<(), braid_put::BraidError>(())
//! ```

pub mod core;

pub use crate::core::config::CodecConfig;
pub use crate::core::error::{BraidError, Result};
pub use crate::core::protocol;
pub use crate::core::protocol::{
    make_put_request, read_put_parts, read_put_request, read_put_request_with_config,
};
pub use crate::core::types;
pub use crate::core::types::{Patch, PutRequest};
