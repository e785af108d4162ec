//! cURL command parser.
//!
//! Turns a pasted `curl ...` invocation into request fields. Only the flags
//! an API client meaningfully maps are honored; cosmetic transfer flags are
//! skipped.

use relay_application::ports::{CurlImporter, CurlParseError, ParsedCurl};
use relay_domain::KeyValuePair;

/// [`CurlImporter`] adapter over [`parse_curl_command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlCommandParser;

impl CurlCommandParser {
    /// Creates the parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CurlImporter for CurlCommandParser {
    fn parse(&self, input: &str) -> Result<ParsedCurl, CurlParseError> {
        parse_curl_command(input)
    }
}

/// Parses a cURL command into request fields.
///
/// Recognized flags: `-X`/`--request`, `-H`/`--header`, `-d`/`--data`/
/// `--data-raw`/`--data-binary` (implies `POST` when no explicit method is
/// given), `--url`. The URL's query string is split into parameter rows. A
/// JSON-object body becomes one row per top-level field; a
/// `key=value&key=value` body becomes one row per pair.
///
/// # Errors
///
/// Returns a [`CurlParseError`] for input that is not a curl command, has an
/// unterminated quote, a malformed `-H` value, or no URL.
pub fn parse_curl_command(input: &str) -> Result<ParsedCurl, CurlParseError> {
    // Line continuations join into one logical command.
    let normalized = input.replace("\\\r\n", " ").replace("\\\n", " ");
    let mut tokens = tokenize(&normalized)?;
    if tokens.first().map(String::as_str) != Some("curl") {
        return Err(CurlParseError::NotCurl);
    }
    tokens.remove(0);

    let mut parsed = ParsedCurl::default();
    let mut explicit_method = false;
    let mut raw_body: Option<String> = None;

    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        match token {
            "-X" | "--request" => {
                if let Some(method) = tokens.get(i + 1) {
                    parsed.method = method.to_ascii_uppercase();
                    explicit_method = true;
                    i += 1;
                }
            }
            "-H" | "--header" => {
                if let Some(header) = tokens.get(i + 1) {
                    parsed.headers.push(parse_header(header)?);
                    i += 1;
                }
            }
            "-d" | "--data" | "--data-raw" | "--data-binary" => {
                if let Some(data) = tokens.get(i + 1) {
                    raw_body = Some(data.clone());
                    i += 1;
                }
            }
            "--url" => {
                if let Some(url) = tokens.get(i + 1) {
                    parsed.url = url.clone();
                    i += 1;
                }
            }
            // Cosmetic transfer flags with no editor counterpart.
            "--compressed" | "-k" | "--insecure" | "-L" | "--location" | "-s" | "--silent"
            | "-v" | "--verbose" | "-i" | "--include" => {}
            _ if !token.starts_with('-') && parsed.url.is_empty() => {
                parsed.url = token.to_string();
            }
            _ => {}
        }
        i += 1;
    }

    if parsed.url.is_empty() {
        return Err(CurlParseError::MissingUrl);
    }

    let url = parsed.url.clone();
    if let Some((base, query)) = url.split_once('?') {
        parsed.url = base.to_string();
        parsed.params = split_pairs(query);
    }

    if let Some(body) = raw_body {
        parsed.body = parse_body(&body);
        if !explicit_method {
            parsed.method = "POST".to_string();
        }
    }

    Ok(parsed)
}

/// Splits a shell command into tokens, honoring quotes and backslash
/// escapes.
fn tokenize(input: &str) -> Result<Vec<String>, CurlParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_single_quote = false;
    let mut in_double_quote = false;
    let mut escape_next = false;
    let mut quoted = false;

    for c in input.chars() {
        if escape_next {
            current.push(c);
            escape_next = false;
            continue;
        }
        match c {
            '\\' if !in_single_quote => escape_next = true,
            '\'' if !in_double_quote => {
                in_single_quote = !in_single_quote;
                quoted = true;
            }
            '"' if !in_single_quote => {
                in_double_quote = !in_double_quote;
                quoted = true;
            }
            c if c.is_whitespace() && !in_single_quote && !in_double_quote => {
                if !current.is_empty() || quoted {
                    tokens.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            c => current.push(c),
        }
    }
    if in_single_quote || in_double_quote {
        return Err(CurlParseError::UnterminatedQuote);
    }
    if !current.is_empty() || quoted {
        tokens.push(current);
    }
    Ok(tokens)
}

/// `Name: value` to a header row.
fn parse_header(raw: &str) -> Result<KeyValuePair, CurlParseError> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| CurlParseError::InvalidHeader(raw.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CurlParseError::InvalidHeader(raw.to_string()));
    }
    Ok(KeyValuePair::new(name, value.trim()))
}

/// A body payload to rows: top-level fields of a JSON object, else
/// `key=value&key=value` pairs, else a single raw row.
fn parse_body(raw: &str) -> Vec<KeyValuePair> {
    if let Ok(serde_json::Value::Object(object)) = serde_json::from_str(raw) {
        return object
            .into_iter()
            .map(|(key, value)| {
                let rendered = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                KeyValuePair::new(key, rendered)
            })
            .collect();
    }
    if raw.contains('=') {
        return split_pairs(raw);
    }
    vec![KeyValuePair::new(raw, "")]
}

/// `a=1&b=2` to key-value rows; a bare `flag` becomes a valueless row.
fn split_pairs(query: &str) -> Vec<KeyValuePair> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            KeyValuePair::new(key, value)
        })
        .collect()
}
