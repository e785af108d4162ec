//! Wire-level request specification consumed by the transport.

use serde_json::{Map, Value};

use crate::key_value::KeyValuePair;

/// Everything the transport needs to execute one HTTP exchange.
///
/// Built from the live editor fields at send time, so the outcome can be
/// attributed to the tab that issued the call even if the user has switched
/// away by the time it resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    /// HTTP method as text (free-form, uppercased by convention).
    pub method: String,
    /// Request URL without the query string.
    pub url: String,
    /// Header rows; disabled or key-less rows are skipped on the wire.
    pub headers: Vec<KeyValuePair>,
    /// Body rows, serialized as a JSON object of the enabled rows.
    pub body: Vec<KeyValuePair>,
    /// Query parameter rows, appended to the URL.
    pub params: Vec<KeyValuePair>,
}

impl RequestSpec {
    /// Header rows that should be sent.
    pub fn enabled_headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .filter(|row| row.is_active())
            .map(|row| (row.key_name.as_str(), row.value.as_str()))
    }

    /// Query parameter rows that should be appended to the URL.
    pub fn enabled_params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params
            .iter()
            .filter(|row| row.is_active())
            .map(|row| (row.key_name.as_str(), row.value.as_str()))
    }

    /// Builds the JSON body object from the enabled rows.
    ///
    /// Returns `None` when no row is active, meaning the request is sent
    /// without a body.
    #[must_use]
    pub fn body_object(&self) -> Option<Value> {
        let mut object = Map::new();
        for row in self.body.iter().filter(|row| row.is_active()) {
            object.insert(row.key_name.clone(), Value::String(row.value.clone()));
        }
        if object.is_empty() {
            None
        } else {
            Some(Value::Object(object))
        }
    }
}
