//! Per-tab editor-field and response caches.
//!
//! Purely in-memory convenience so rapid tab switching never re-fetches or
//! resets fields; never drives persistence.

use std::collections::HashMap;
use std::time::Duration;

use relay_domain::{KeyValuePair, ResponseData, TransportFailure, VariableExtraction};

/// Partial snapshot of editor fields for one tab.
///
/// `None` means "derive from the referenced saved request, or defaults for
/// a blank tab"; `Some` overrides the baseline field-by-field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabEditorState {
    /// HTTP method override.
    pub method: Option<String>,
    /// URL override.
    pub url: Option<String>,
    /// Name the request would be saved under.
    pub name_for_save: Option<String>,
    /// Header list override.
    pub headers: Option<Vec<KeyValuePair>>,
    /// Body list override.
    pub body: Option<Vec<KeyValuePair>>,
    /// Parameter list override.
    pub params: Option<Vec<KeyValuePair>>,
    /// Extraction rules override.
    pub variable_extraction: Option<VariableExtraction>,
}

impl TabEditorState {
    /// Merges `other`'s set fields over this snapshot.
    pub fn merge(&mut self, other: Self) {
        if other.method.is_some() {
            self.method = other.method;
        }
        if other.url.is_some() {
            self.url = other.url;
        }
        if other.name_for_save.is_some() {
            self.name_for_save = other.name_for_save;
        }
        if other.headers.is_some() {
            self.headers = other.headers;
        }
        if other.body.is_some() {
            self.body = other.body;
        }
        if other.params.is_some() {
            self.params = other.params;
        }
        if other.variable_extraction.is_some() {
            self.variable_extraction = other.variable_extraction;
        }
    }
}

/// Outcome of the last transport call issued from a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabResponse {
    /// Success or failure; both are displayed in the response panel.
    pub outcome: Result<ResponseData, TransportFailure>,
    /// Wall-clock time the call took.
    pub response_time: Duration,
}

/// In-memory editor/response caches keyed by tab id.
#[derive(Debug, Default)]
pub struct TabCache {
    editors: HashMap<String, TabEditorState>,
    responses: HashMap<String, TabResponse>,
}

impl TabCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges partial fields into a tab's snapshot, creating it if absent.
    pub fn update_editor_state(&mut self, tab_id: &str, partial: TabEditorState) {
        self.editors
            .entry(tab_id.to_string())
            .or_default()
            .merge(partial);
    }

    /// The tab's cached snapshot, if it has been visited or edited.
    #[must_use]
    pub fn editor_state(&self, tab_id: &str) -> Option<&TabEditorState> {
        self.editors.get(tab_id)
    }

    /// Caches the last-seen call outcome for a tab.
    pub fn save_response(&mut self, tab_id: &str, response: TabResponse) {
        self.responses.insert(tab_id.to_string(), response);
    }

    /// The tab's cached call outcome, if any call completed since it opened.
    #[must_use]
    pub fn response(&self, tab_id: &str) -> Option<&TabResponse> {
        self.responses.get(tab_id)
    }

    /// Drops both caches for a closed tab.
    pub fn remove(&mut self, tab_id: &str) {
        self.editors.remove(tab_id);
        self.responses.remove(tab_id);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_update_merges_per_field() {
        let mut cache = TabCache::new();
        cache.update_editor_state(
            "t1",
            TabEditorState {
                url: Some("https://a.test".to_string()),
                ..Default::default()
            },
        );
        cache.update_editor_state(
            "t1",
            TabEditorState {
                method: Some("POST".to_string()),
                ..Default::default()
            },
        );

        let snapshot = cache.editor_state("t1").cloned().unwrap_or_default();
        assert_eq!(snapshot.url.as_deref(), Some("https://a.test"));
        assert_eq!(snapshot.method.as_deref(), Some("POST"));
        assert!(snapshot.headers.is_none());
    }

    #[test]
    fn test_remove_drops_both_caches() {
        let mut cache = TabCache::new();
        cache.update_editor_state("t1", TabEditorState::default());
        cache.save_response(
            "t1",
            TabResponse {
                outcome: Ok(ResponseData::default()),
                response_time: Duration::from_millis(5),
            },
        );

        cache.remove("t1");
        assert!(cache.editor_state("t1").is_none());
        assert!(cache.response("t1").is_none());
    }

    #[test]
    fn test_unknown_tab_has_no_state() {
        let cache = TabCache::new();
        assert!(cache.editor_state("nope").is_none());
        assert!(cache.response("nope").is_none());
    }
}
