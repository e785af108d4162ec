//! Live editor state: the fields the UI currently shows.
//!
//! Process-wide singleton mirroring the active tab. Written by user edits
//! and by the workbench during tab switches; read by the save and send
//! actions. The workbench keeps it consistent with the active tab's cached
//! snapshot, so no cross-tab leakage is possible.

use relay_domain::{KeyValuePair, RequestSpec, SavedRequest, VariableExtraction};

use crate::tabs::{TabEditorState, TabResponse};

/// Display name for a draft that has never been saved.
pub const UNTITLED_NAME: &str = "Untitled Request";

/// The currently displayed request draft and response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    /// The saved request these fields derive from, or `None` for a draft.
    pub active_request_id: Option<String>,
    /// Name the draft would be saved under.
    pub name: String,
    /// HTTP method.
    pub method: String,
    /// Request URL.
    pub url: String,
    /// Header rows.
    pub headers: Vec<KeyValuePair>,
    /// Body rows.
    pub body: Vec<KeyValuePair>,
    /// Query parameter rows.
    pub params: Vec<KeyValuePair>,
    /// Extraction rules for the draft.
    pub variable_extraction: Option<VariableExtraction>,
    /// Outcome shown in the response panel, if any.
    pub response: Option<TabResponse>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            active_request_id: None,
            name: UNTITLED_NAME.to_string(),
            method: "GET".to_string(),
            url: String::new(),
            headers: vec![KeyValuePair::blank()],
            body: Vec::new(),
            params: Vec::new(),
            variable_extraction: None,
            response: None,
        }
    }
}

impl EditorState {
    /// Restores defaults: GET, empty url/body/params, one blank header row,
    /// no active request, no response.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Copies all fields from a saved request, including its identity.
    ///
    /// The response panel is left alone; the workbench restores or clears
    /// it from the tab cache afterwards.
    pub fn load(&mut self, saved: &SavedRequest) {
        self.active_request_id = Some(saved.id.clone());
        self.name = saved.name.clone();
        self.method = saved.method.clone();
        self.url = saved.url.clone();
        self.headers = saved.headers.clone();
        self.body = saved.body.clone();
        self.params = saved.params.clone();
        self.variable_extraction = saved.variable_extraction.clone();
    }

    /// Overrides fields from a cached snapshot, field-by-field; unset
    /// snapshot fields keep their current (baseline) values.
    pub fn apply_snapshot(&mut self, snapshot: &TabEditorState) {
        if let Some(method) = &snapshot.method {
            self.method = method.clone();
        }
        if let Some(url) = &snapshot.url {
            self.url = url.clone();
        }
        if let Some(name) = &snapshot.name_for_save {
            self.name = name.clone();
        }
        if let Some(headers) = &snapshot.headers {
            self.headers = headers.clone();
        }
        if let Some(body) = &snapshot.body {
            self.body = body.clone();
        }
        if let Some(params) = &snapshot.params {
            self.params = params.clone();
        }
        if let Some(extraction) = &snapshot.variable_extraction {
            self.variable_extraction = Some(extraction.clone());
        }
    }

    /// Full snapshot of the current fields, every field set.
    #[must_use]
    pub fn snapshot(&self) -> TabEditorState {
        TabEditorState {
            method: Some(self.method.clone()),
            url: Some(self.url.clone()),
            name_for_save: Some(self.name.clone()),
            headers: Some(self.headers.clone()),
            body: Some(self.body.clone()),
            params: Some(self.params.clone()),
            variable_extraction: self.variable_extraction.clone(),
        }
    }

    /// The wire request these fields describe.
    #[must_use]
    pub fn request_spec(&self) -> RequestSpec {
        RequestSpec {
            method: self.method.clone(),
            url: self.url.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
            params: self.params.clone(),
        }
    }

    /// A saved request carrying the current fields, for a first save.
    /// The store replaces the id on insertion.
    #[must_use]
    pub fn to_saved_request(&self, folder_id: Option<String>) -> SavedRequest {
        let mut saved = SavedRequest::new(self.name.clone())
            .with_method(self.method.clone())
            .with_url(self.url.clone());
        saved.headers = self.headers.clone();
        saved.body = self.body.clone();
        saved.params = self.params.clone();
        saved.variable_extraction = self.variable_extraction.clone();
        saved.folder_id = folder_id;
        saved
    }
}
