//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `Transport` port using the reqwest library.
//! It handles all HTTP communication for the application.

use relay_application::ports::Transport;
use relay_domain::{RequestSpec, ResponseData, TransportFailure};
use reqwest::{Client, Method};
use tracing::debug;
use url::Url;

/// Transport implementation wrapping `reqwest::Client`.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a new transport with default settings.
    ///
    /// Default configuration:
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    /// - User-Agent: "Relay/0.1.0"
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, TransportFailure> {
        let client = Client::builder()
            .user_agent("Relay/0.1.0")
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| TransportFailure::message(e.to_string()))?;

        Ok(Self { client })
    }

    /// Creates a transport over a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

/// Parses the method string; free-form verbs are allowed.
fn parse_method(method: &str) -> Result<Method, TransportFailure> {
    Method::from_bytes(method.trim().to_ascii_uppercase().as_bytes())
        .map_err(|_| TransportFailure::message(format!("invalid method: {method}")))
}

/// Parses the URL and appends enabled query parameters.
fn build_url(spec: &RequestSpec) -> Result<Url, TransportFailure> {
    let mut url = Url::parse(&spec.url)
        .map_err(|e| TransportFailure::message(format!("invalid URL: {e}")))?;
    {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in spec.enabled_params() {
            pairs.append_pair(name, value);
        }
    }
    Ok(url)
}

/// Maps a reqwest error to a transport failure with a stable code.
fn map_error(error: &reqwest::Error) -> TransportFailure {
    if error.is_timeout() {
        TransportFailure::with_code("request timed out", "timeout")
    } else if error.is_connect() {
        TransportFailure::with_code(error.to_string(), "connect")
    } else if error.is_request() {
        TransportFailure::with_code(error.to_string(), "request")
    } else {
        TransportFailure::message(error.to_string())
    }
}

impl Transport for ReqwestTransport {
    async fn execute(&self, spec: &RequestSpec) -> Result<ResponseData, TransportFailure> {
        let method = parse_method(&spec.method)?;
        let url = build_url(spec)?;
        debug!(method = %method, url = %url, "executing request");

        let mut builder = self.client.request(method, url);
        for (name, value) in spec.enabled_headers() {
            builder = builder.header(name, value);
        }
        if let Some(body) = spec.body_object() {
            builder = builder.json(&body);
        }

        let response = builder.send().await.map_err(|e| map_error(&e))?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).to_string(),
                )
            })
            .collect();
        let body = response.text().await.map_err(|e| map_error(&e))?;

        // Any HTTP status is a successful transport outcome; only wire-level
        // failures surface as errors.
        Ok(ResponseData {
            status: status.as_u16(),
            status_text: status
                .canonical_reason()
                .unwrap_or_default()
                .to_string(),
            headers,
            size: body.len(),
            body,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use relay_domain::KeyValuePair;

    use super::*;

    #[test]
    fn test_free_form_methods_are_accepted() {
        assert_eq!(parse_method("get").unwrap(), Method::GET);
        assert_eq!(parse_method("PURGE").unwrap().as_str(), "PURGE");
        assert!(parse_method("NOT A METHOD").is_err());
    }

    #[test]
    fn test_build_url_appends_enabled_params_only() {
        let spec = RequestSpec {
            method: "GET".to_string(),
            url: "https://api.test/v1/users".to_string(),
            headers: Vec::new(),
            body: Vec::new(),
            params: vec![
                KeyValuePair::new("page", "2"),
                {
                    let mut disabled = KeyValuePair::new("debug", "1");
                    disabled.enabled = false;
                    disabled
                },
            ],
        };

        let url = build_url(&spec).unwrap();
        assert_eq!(url.as_str(), "https://api.test/v1/users?page=2");
    }

    #[test]
    fn test_build_url_keeps_existing_query() {
        let spec = RequestSpec {
            method: "GET".to_string(),
            url: "https://api.test/search?q=rust".to_string(),
            headers: Vec::new(),
            body: Vec::new(),
            params: vec![KeyValuePair::new("page", "2")],
        };

        let url = build_url(&spec).unwrap();
        assert_eq!(url.as_str(), "https://api.test/search?q=rust&page=2");
    }

    #[test]
    fn test_invalid_url_is_reported() {
        let spec = RequestSpec {
            method: "GET".to_string(),
            url: "not a url".to_string(),
            headers: Vec::new(),
            body: Vec::new(),
            params: Vec::new(),
        };
        let error = build_url(&spec).unwrap_err();
        assert!(error.to_string().contains("invalid URL"));
    }

    #[tokio::test]
    async fn test_execute_rejects_bad_spec_before_the_wire() {
        let transport = ReqwestTransport::new().unwrap();

        let bad_url = RequestSpec {
            method: "GET".to_string(),
            url: "not a url".to_string(),
            headers: Vec::new(),
            body: Vec::new(),
            params: Vec::new(),
        };
        let error = transport.execute(&bad_url).await.unwrap_err();
        assert!(error.to_string().contains("invalid URL"));

        let bad_method = RequestSpec {
            method: "NOT A METHOD".to_string(),
            url: "https://api.test".to_string(),
            headers: Vec::new(),
            body: Vec::new(),
            params: Vec::new(),
        };
        let error = transport.execute(&bad_method).await.unwrap_err();
        assert!(error.to_string().contains("invalid method"));
    }
}
