//! JSON serialization helpers for deterministic output.

use std::io;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Serializes a value to deterministic JSON: 2-space indentation with a
/// trailing newline, so collection files diff cleanly under version control.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    let mut json = String::from_utf8(buffer)?;
    json.push('\n');
    Ok(json)
}

/// Deserializes JSON from a string.
///
/// Handles both pretty-printed and minified JSON.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, SerializationError> {
    serde_json::from_str(json).map_err(SerializationError::Deserialize)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_stable_output_has_trailing_newline_and_indent() {
        let mut map = BTreeMap::new();
        map.insert("key", "value");

        let json = to_json_stable(&map).expect("serialization should work");
        assert!(json.ends_with('\n'));
        assert!(json.contains("  \"key\""));
    }

    #[test]
    fn test_roundtrip() {
        let mut original = BTreeMap::new();
        original.insert("key".to_string(), "value".to_string());

        let json = to_json_stable(&original).expect("serialization should work");
        let restored: BTreeMap<String, String> =
            from_json(&json).expect("deserialization should work");

        assert_eq!(original, restored);
    }

    #[test]
    fn test_minified_input_accepted() {
        let value: serde_json::Value =
            from_json(r#"{"name":"test"}"#).expect("deserialization should work");
        assert_eq!(value["name"], "test");
    }
}
