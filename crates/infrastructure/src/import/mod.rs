//! Import adapters.

mod curl;

pub use curl::{CurlCommandParser, parse_curl_command};
