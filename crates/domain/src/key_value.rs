//! Key-value rows used for headers, body fields, and query parameters.

use serde::{Deserialize, Serialize};

use crate::id::generate_id;

/// A single editable key-value row.
///
/// Order within the owning list is significant for serialization. `id` is
/// the stable identity used by edit and remove operations and must be unique
/// within the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValuePair {
    /// Stable identity within the owning list.
    #[serde(default = "generate_id")]
    pub id: String,

    /// The key (header name, form field name, parameter name).
    #[serde(default)]
    pub key_name: String,

    /// The value.
    #[serde(default)]
    pub value: String,

    /// Disabled rows stay in the list but are excluded from the wire request.
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

const fn enabled_default() -> bool {
    true
}

impl KeyValuePair {
    /// Creates an enabled row with the given key and value.
    #[must_use]
    pub fn new(key_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            key_name: key_name.into(),
            value: value.into(),
            enabled: true,
        }
    }

    /// Creates an empty enabled row, as shown for a fresh editor.
    #[must_use]
    pub fn blank() -> Self {
        Self::new("", "")
    }

    /// Returns true if the row should be sent: enabled with a non-empty key.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enabled && !self.key_name.is_empty()
    }
}

/// Compares two rows by content, ignoring their ids.
#[must_use]
pub fn same_content(a: &KeyValuePair, b: &KeyValuePair) -> bool {
    a.key_name == b.key_name && a.value == b.value && a.enabled == b.enabled
}

/// Compares two lists by row content and order, ignoring row ids.
///
/// Ids are regenerated when rows are copied between lists, so equality for
/// dirty-tracking purposes must not depend on them.
#[must_use]
pub fn content_eq(a: &[KeyValuePair], b: &[KeyValuePair]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same_content(x, y))
}
