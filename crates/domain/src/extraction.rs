//! Variable extraction rules applied to successful response bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::id::generate_id;

/// A single extraction rule: read a path from the response JSON and store
/// the value under `variable_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionRule {
    /// Stable identity within the rule list.
    #[serde(default = "generate_id")]
    pub id: String,

    /// Name the extracted value is stored under.
    pub variable_name: String,

    /// Path into the response body, either dotted (`data.token`) or a JSON
    /// pointer (`/data/token`).
    pub json_path: String,
}

impl ExtractionRule {
    /// Creates a rule with a generated id.
    #[must_use]
    pub fn new(variable_name: impl Into<String>, json_path: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            variable_name: variable_name.into(),
            json_path: json_path.into(),
        }
    }

    /// Applies the rule to a parsed response body.
    ///
    /// Strings are extracted verbatim; other scalar values are rendered as
    /// JSON text. Returns `None` when the path does not resolve.
    #[must_use]
    pub fn apply(&self, body: &Value) -> Option<String> {
        let pointer = as_pointer(&self.json_path);
        body.pointer(&pointer).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// Converts a dotted path to JSON-pointer form; pointers pass through.
fn as_pointer(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path.replace('.', "/"))
    }
}

/// Per-request variable extraction configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableExtraction {
    /// Whether the rules run after a successful response.
    #[serde(default)]
    pub enabled: bool,

    /// The rules, applied independently.
    #[serde(default)]
    pub rules: Vec<ExtractionRule>,
}

impl VariableExtraction {
    /// Applies every rule to a response body, skipping ones that fail.
    ///
    /// Returns the extracted `(name, value)` pairs. Non-JSON bodies yield
    /// nothing; extraction is best-effort and never errors.
    #[must_use]
    pub fn extract(&self, body_text: &str) -> Vec<(String, String)> {
        if !self.enabled {
            return Vec::new();
        }
        let Ok(body) = serde_json::from_str::<Value>(body_text) else {
            return Vec::new();
        };
        self.rules
            .iter()
            .filter_map(|rule| {
                rule.apply(&body)
                    .map(|value| (rule.variable_name.clone(), value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn extraction(rules: Vec<ExtractionRule>) -> VariableExtraction {
        VariableExtraction {
            enabled: true,
            rules,
        }
    }

    #[test]
    fn test_dotted_path_extraction() {
        let rules = extraction(vec![ExtractionRule::new("token", "data.token")]);
        let pairs = rules.extract(r#"{"data":{"token":"abc123"}}"#);
        assert_eq!(pairs, vec![("token".to_string(), "abc123".to_string())]);
    }

    #[test]
    fn test_pointer_path_and_non_string_value() {
        let rules = extraction(vec![ExtractionRule::new("count", "/meta/count")]);
        let pairs = rules.extract(r#"{"meta":{"count":42}}"#);
        assert_eq!(pairs, vec![("count".to_string(), "42".to_string())]);
    }

    #[test]
    fn test_unresolved_path_is_skipped() {
        let rules = extraction(vec![
            ExtractionRule::new("missing", "nope.nothing"),
            ExtractionRule::new("id", "id"),
        ]);
        let pairs = rules.extract(r#"{"id":"r1"}"#);
        assert_eq!(pairs, vec![("id".to_string(), "r1".to_string())]);
    }

    #[test]
    fn test_disabled_and_non_json_bodies() {
        let mut rules = extraction(vec![ExtractionRule::new("id", "id")]);
        assert!(rules.extract("not json").is_empty());

        rules.enabled = false;
        assert!(rules.extract(r#"{"id":"r1"}"#).is_empty());
    }
}
