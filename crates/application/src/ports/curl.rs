//! cURL import port.

use relay_domain::KeyValuePair;
use thiserror::Error;

/// Error type for cURL command parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CurlParseError {
    /// The input does not start with a `curl` invocation.
    #[error("not a curl command")]
    NotCurl,

    /// A quoted section is never closed.
    #[error("unterminated quote in command")]
    UnterminatedQuote,

    /// No URL could be found among the arguments.
    #[error("no URL found in command")]
    MissingUrl,

    /// A `-H` value is not of the form `Name: value`.
    #[error("invalid header: {0}")]
    InvalidHeader(String),
}

/// Request fields produced by parsing a cURL command.
///
/// Applied to a draft all-or-nothing: a parse error leaves the draft
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCurl {
    /// HTTP method; `GET` unless `-X` was given or a body implies `POST`.
    pub method: String,
    /// URL with its query string stripped into `params`.
    pub url: String,
    /// Parsed `-H` headers.
    pub headers: Vec<KeyValuePair>,
    /// Body fields from `-d`/`--data` style flags.
    pub body: Vec<KeyValuePair>,
    /// Query parameters split off the URL.
    pub params: Vec<KeyValuePair>,
}

impl Default for ParsedCurl {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            url: String::new(),
            headers: Vec::new(),
            body: Vec::new(),
            params: Vec::new(),
        }
    }
}

/// Port for the cURL command parser collaborator.
pub trait CurlImporter {
    /// Parses a cURL command into request fields.
    ///
    /// # Errors
    ///
    /// Returns a [`CurlParseError`] for unparseable input; nothing is
    /// partially applied in that case.
    fn parse(&self, input: &str) -> Result<ParsedCurl, CurlParseError>;
}
