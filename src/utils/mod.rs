pub mod constants;
pub mod text;
pub mod url_utils;

pub use constants::*;
pub use text::{char_len, join_trimmed_lines, safe_truncate_chars, stripped_len};
pub use url_utils::parse_http_url;
