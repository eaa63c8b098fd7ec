//! Protocol-level codecs for the Braid-HTTP patch transport.

pub mod constants;
pub mod formatter;
pub mod headers;
pub mod line;
pub mod parser;
pub mod put;

pub use formatter::{format_patch, format_patches};
pub use line::{read_line, read_line_limited, Line};
pub use parser::{parse_patch, ParseState};
pub use put::{make_put_request, read_put_parts, read_put_request, read_put_request_with_config};
