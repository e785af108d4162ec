//! Transport outcome types.

use serde::{Deserialize, Serialize};

/// A completed HTTP exchange as shown in the response panel.
///
/// Every HTTP status is a `ResponseData`, including 4xx/5xx; only failures
/// to complete the exchange become [`TransportFailure`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseData {
    /// HTTP status code.
    pub status: u16,
    /// Status text (e.g. "OK", "Not Found").
    pub status_text: String,
    /// Response headers in arrival order.
    pub headers: Vec<(String, String)>,
    /// Response body as text.
    pub body: String,
    /// Body size in bytes.
    pub size: usize,
}

impl ResponseData {
    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns true if the status code indicates a client error (4xx).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Returns true if the status code indicates a server error (5xx).
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }
}

impl Default for ResponseData {
    fn default() -> Self {
        Self {
            status: 0,
            status_text: String::new(),
            headers: Vec::new(),
            body: String::new(),
            size: 0,
        }
    }
}

/// A failed transport attempt.
///
/// Displayed and cached per tab exactly like a response; never raised as a
/// process error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportFailure {
    /// Human-readable failure message.
    pub message: String,
    /// Machine-readable failure category (e.g. "timeout", "connect").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// HTTP status, when the failure carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Partial body, when the failure carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl TransportFailure {
    /// Creates a failure with only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            status: None,
            body: None,
        }
    }

    /// Creates a failure with a category code.
    #[must_use]
    pub fn with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code.into()),
            status: None,
            body: None,
        }
    }
}

impl std::fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({code})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for TransportFailure {}
