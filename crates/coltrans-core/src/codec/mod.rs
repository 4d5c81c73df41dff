//! Codecs for the structural encodings that differ between schema versions:
//! URLs, request bodies and headers.

pub mod body;
pub mod header;
pub mod url;

pub use body::{body_from_v1, body_to_v1, default_body, BodyMode};
pub use header::{header_data, header_string, parse_header_string};
pub use url::{parse, parse_query, unparse_query, url_from_v1, url_to_v1, ParsedUrl, QueryParam, V1Url};
