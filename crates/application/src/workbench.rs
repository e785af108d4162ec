//! The tab switch orchestrator.
//!
//! Coordinates the collection store, the tab registry, the per-tab caches,
//! and the live editor so that "the tab being viewed" and "the underlying
//! saved request" stay synchronized: dirty tracking, confirmation-gated
//! destructive switches, per-tab response caching, and response attribution
//! for in-flight sends.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use relay_domain::{
    KeyValuePair, RequestSpec, ResponseData, SavedRequest, TransportFailure, VariableExtraction,
    key_value,
};
use tracing::debug;

use crate::editor::{EditorState, UNTITLED_NAME};
use crate::error::{StoreError, StoreResult};
use crate::ports::{CollectionPersistence, ConfirmPrompt, CurlImporter, CurlParseError, Transport};
use crate::store::{CollectionStore, RequestPatch};
use crate::tabs::{Tab, TabCache, TabEditorState, TabRegistry, TabResponse};

/// Message shown before discarding unsaved changes.
pub const DISCARD_PROMPT: &str = "Discard unsaved changes?";

/// Reconciliation mode.
///
/// `Switching` marks the synchronous window in which a tab switch rewrites
/// the editor and response panel programmatically; outcome-caching side
/// effects raised in that window are suppressed. The mode returns to `Idle`
/// when the switch unit completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchMode {
    /// Normal operation; user-driven changes are cached.
    #[default]
    Idle,
    /// A tab switch is being applied.
    Switching,
}

/// The orchestrator owning all tab/editor/collection state.
pub struct Workbench<P: CollectionPersistence> {
    store: CollectionStore<P>,
    registry: TabRegistry,
    cache: TabCache,
    editor: EditorState,
    mode: SwitchMode,
    variables: BTreeMap<String, String>,
}

impl<P: CollectionPersistence> Workbench<P> {
    /// Creates a workbench over a freshly loaded collection. No tabs are
    /// open and the editor shows defaults.
    pub fn new(persistence: P) -> Self {
        Self {
            store: CollectionStore::new(persistence),
            registry: TabRegistry::new(),
            cache: TabCache::new(),
            editor: EditorState::default(),
            mode: SwitchMode::Idle,
            variables: BTreeMap::new(),
        }
    }

    /// The saved collection.
    #[must_use]
    pub const fn store(&self) -> &CollectionStore<P> {
        &self.store
    }

    /// Mutable access to the saved collection for sidebar operations that
    /// do not involve tabs (folder renames, moves, copies).
    pub const fn store_mut(&mut self) -> &mut CollectionStore<P> {
        &mut self.store
    }

    /// The live editor state.
    #[must_use]
    pub const fn editor(&self) -> &EditorState {
        &self.editor
    }

    /// Open tabs in display order.
    #[must_use]
    pub fn tabs(&self) -> &[Tab] {
        self.registry.tabs()
    }

    /// The active tab, if any.
    #[must_use]
    pub fn active_tab(&self) -> Option<&Tab> {
        self.registry.active()
    }

    /// A tab's cached editor snapshot.
    #[must_use]
    pub fn tab_editor_state(&self, tab_id: &str) -> Option<&TabEditorState> {
        self.cache.editor_state(tab_id)
    }

    /// A tab's cached call outcome.
    #[must_use]
    pub fn tab_response(&self, tab_id: &str) -> Option<&TabResponse> {
        self.cache.response(tab_id)
    }

    /// Variables extracted from responses so far.
    #[must_use]
    pub const fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    // === Tab lifecycle ===

    /// Opens a fresh blank tab and activates it. Returns the tab id.
    pub fn open_blank_tab(&mut self) -> String {
        let tab = self.registry.open_tab(None);
        // Explicit empty lists, not absent ones, so the fresh tab does not
        // inherit whatever the editor happened to show.
        self.cache.update_editor_state(
            &tab.tab_id,
            TabEditorState {
                body: Some(Vec::new()),
                params: Some(Vec::new()),
                ..Default::default()
            },
        );
        self.registry.switch_to(&tab.tab_id);
        self.reconcile_active();
        tab.tab_id
    }

    /// Loads a saved request from the sidebar.
    ///
    /// If a tab already references the request, that tab is activated; at
    /// most one tab exists per saved request. Otherwise, a dirty active tab gates
    /// the load behind a discard confirmation; declining aborts the whole
    /// operation with no state change.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the request is absent.
    pub fn open_saved_request(
        &mut self,
        request_id: &str,
        prompt: &impl ConfirmPrompt,
    ) -> StoreResult<()> {
        if let Some(existing) = self.registry.find_by_request(request_id) {
            let tab_id = existing.tab_id.clone();
            self.registry.switch_to(&tab_id);
            self.reconcile_active();
            return Ok(());
        }

        let saved = self
            .store
            .request(request_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(request_id.to_string()))?;

        let active_is_dirty = self.registry.active().is_some_and(|tab| tab.is_dirty);
        if active_is_dirty && !prompt.confirm(DISCARD_PROMPT) {
            return Ok(());
        }

        let tab = self.registry.open_tab(Some(request_id));
        self.cache
            .update_editor_state(&tab.tab_id, snapshot_of(&saved));
        self.registry.switch_to(&tab.tab_id);
        self.reconcile_active();
        Ok(())
    }

    /// Activates a tab by id and reconciles the editor and response panel.
    pub fn activate_tab(&mut self, tab_id: &str) {
        if self.registry.switch_to(tab_id) {
            self.reconcile_active();
        }
    }

    /// Cyclically activates the next tab.
    pub fn next_tab(&mut self) {
        if self.registry.next_tab().is_some() {
            self.reconcile_active();
        }
    }

    /// Cyclically activates the previous tab.
    pub fn prev_tab(&mut self) {
        if self.registry.prev_tab().is_some() {
            self.reconcile_active();
        }
    }

    /// Moves `moved_id` to `over_id`'s position. Order only; the active
    /// tab and the editor are untouched.
    pub fn reorder_tabs(&mut self, moved_id: &str, over_id: &str) {
        self.registry.reorder(moved_id, over_id);
    }

    /// Closes a tab and drops its caches. The collection is untouched.
    pub fn close_tab(&mut self, tab_id: &str) {
        if !self.registry.contains(tab_id) {
            return;
        }
        let was_active = self.registry.active_id() == Some(tab_id);
        self.registry.close_tab(tab_id);
        self.cache.remove(tab_id);

        if was_active {
            if self.registry.active_id().is_some() {
                self.reconcile_active();
            } else {
                self.editor.reset();
            }
        }
    }

    // === Field edits ===

    /// Sets the URL on the live editor and the active tab's snapshot.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.editor.url = url.into();
        let partial = TabEditorState {
            url: Some(self.editor.url.clone()),
            ..Default::default()
        };
        self.cache_on_active(partial);
    }

    /// Sets the method on the live editor and the active tab's snapshot.
    pub fn set_method(&mut self, method: impl Into<String>) {
        self.editor.method = method.into();
        let partial = TabEditorState {
            method: Some(self.editor.method.clone()),
            ..Default::default()
        };
        self.cache_on_active(partial);
    }

    /// Sets the save-name on the live editor and the active tab's snapshot.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.editor.name = name.into();
        let partial = TabEditorState {
            name_for_save: Some(self.editor.name.clone()),
            ..Default::default()
        };
        self.cache_on_active(partial);
    }

    /// Replaces the header list on the live editor and the active tab's
    /// snapshot.
    pub fn set_headers(&mut self, headers: Vec<KeyValuePair>) {
        self.editor.headers = headers;
        let partial = TabEditorState {
            headers: Some(self.editor.headers.clone()),
            ..Default::default()
        };
        self.cache_on_active(partial);
    }

    /// Replaces the body list on the live editor and the active tab's
    /// snapshot.
    pub fn set_body(&mut self, body: Vec<KeyValuePair>) {
        self.editor.body = body;
        let partial = TabEditorState {
            body: Some(self.editor.body.clone()),
            ..Default::default()
        };
        self.cache_on_active(partial);
    }

    /// Replaces the parameter list on the live editor and the active tab's
    /// snapshot.
    pub fn set_params(&mut self, params: Vec<KeyValuePair>) {
        self.editor.params = params;
        let partial = TabEditorState {
            params: Some(self.editor.params.clone()),
            ..Default::default()
        };
        self.cache_on_active(partial);
    }

    /// Sets the extraction rules on the live editor and the active tab's
    /// snapshot.
    pub fn set_variable_extraction(&mut self, extraction: VariableExtraction) {
        self.editor.variable_extraction = Some(extraction.clone());
        let partial = TabEditorState {
            variable_extraction: Some(extraction),
            ..Default::default()
        };
        self.cache_on_active(partial);
    }

    // === Send ===

    /// Captures the initiating tab id and the wire request for a send.
    ///
    /// The pair must be handed back to [`Self::record_outcome`] when the
    /// transport resolves, so the result lands on the tab that issued it
    /// even if the user has switched away meanwhile.
    #[must_use]
    pub fn prepare_send(&self) -> Option<(String, RequestSpec)> {
        let tab_id = self.registry.active_id()?.to_string();
        Some((tab_id, self.editor.request_spec()))
    }

    /// Files a transport outcome against the tab that issued the call.
    ///
    /// A late outcome for a closed tab is silently discarded. The response
    /// panel is only updated when the issuing tab is still active.
    pub fn record_outcome(
        &mut self,
        tab_id: &str,
        outcome: Result<ResponseData, TransportFailure>,
        response_time: Duration,
    ) {
        if self.mode == SwitchMode::Switching {
            return;
        }
        if !self.registry.contains(tab_id) {
            debug!(tab_id, "discarding response for closed tab");
            return;
        }
        if let Ok(response) = &outcome {
            self.run_extraction(tab_id, response);
        }
        let tab_response = TabResponse {
            outcome,
            response_time,
        };
        if self.registry.active_id() == Some(tab_id) {
            self.editor.response = Some(tab_response.clone());
        }
        self.cache.save_response(tab_id, tab_response);
    }

    /// Prepares, executes, and records a send in one step.
    ///
    /// Convenience for flows where nothing else happens while the call is
    /// in flight; concurrent flows drive `prepare_send`/`record_outcome`
    /// themselves.
    pub async fn send_active(&mut self, transport: &impl Transport) {
        let Some((tab_id, spec)) = self.prepare_send() else {
            return;
        };
        let started = Instant::now();
        let outcome = transport.execute(&spec).await;
        self.record_outcome(&tab_id, outcome, started.elapsed());
    }

    // === Save / delete ===

    /// Saves the active tab's draft into the collection.
    ///
    /// Updates the bound request, or adds a new one and binds the tab to
    /// it. Either way the tab comes out clean.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the bound request has vanished
    /// from the store.
    pub fn save_active(&mut self) -> StoreResult<()> {
        let Some(tab_id) = self.registry.active_id().map(ToString::to_string) else {
            return Ok(());
        };

        match self.editor.active_request_id.clone() {
            Some(request_id) => {
                self.store
                    .update_request(&request_id, patch_from(&self.editor))?;
            }
            None => {
                let request_id = self.store.add_request(self.editor.to_saved_request(None));
                self.editor.active_request_id = Some(request_id.clone());
                self.registry.bind_request(&tab_id, &request_id);
            }
        }

        // The snapshot now equals the saved baseline.
        self.cache.update_editor_state(&tab_id, self.editor.snapshot());
        self.registry.set_dirty(&tab_id, false);
        Ok(())
    }

    /// Deletes a saved request and closes any tab that references it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the request is absent.
    pub fn delete_request(&mut self, request_id: &str) -> StoreResult<()> {
        self.store.delete_request(request_id)?;
        self.close_tab_for_request(request_id);
        Ok(())
    }

    /// Deletes a folder subtree and closes tabs for every request in it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the folder is absent.
    pub fn delete_folder(&mut self, folder_id: &str) -> StoreResult<()> {
        let doomed = self.store.descendant_request_ids(folder_id)?;
        self.store.delete_folder_recursive(folder_id)?;
        for request_id in doomed {
            self.close_tab_for_request(&request_id);
        }
        Ok(())
    }

    // === Import ===

    /// Seeds the active draft from a cURL command.
    ///
    /// The command is parsed in full before anything is applied; a parse
    /// error leaves the draft untouched.
    ///
    /// # Errors
    ///
    /// Returns the parser's [`CurlParseError`] for unparseable input.
    pub fn import_curl(
        &mut self,
        input: &str,
        importer: &impl CurlImporter,
    ) -> Result<(), CurlParseError> {
        let parsed = importer.parse(input)?;
        self.set_method(parsed.method);
        self.set_url(parsed.url);
        self.set_headers(parsed.headers);
        self.set_body(parsed.body);
        self.set_params(parsed.params);
        Ok(())
    }

    // === Internals ===

    /// Merges a partial snapshot into the active tab's cache and refreshes
    /// its dirty flag. No-op while a switch is being applied or when no tab
    /// is active.
    fn cache_on_active(&mut self, partial: TabEditorState) {
        if self.mode == SwitchMode::Switching {
            return;
        }
        let Some(tab_id) = self.registry.active_id().map(ToString::to_string) else {
            return;
        };
        self.cache.update_editor_state(&tab_id, partial);
        self.refresh_dirty(&tab_id);
    }

    /// Rebuilds the editor and response panel for the active tab, as one
    /// synchronous unit under the `Switching` guard.
    fn reconcile_active(&mut self) {
        let Some(tab) = self.registry.active().cloned() else {
            return;
        };
        self.mode = SwitchMode::Switching;

        match tab.request_id.as_deref().and_then(|id| self.store.request(id)).cloned() {
            Some(saved) => {
                // Saved baseline first; cached edits win field-by-field.
                self.editor.load(&saved);
                if let Some(snapshot) = self.cache.editor_state(&tab.tab_id).cloned() {
                    self.editor.apply_snapshot(&snapshot);
                } else {
                    self.cache
                        .update_editor_state(&tab.tab_id, snapshot_of(&saved));
                }
            }
            None => {
                self.editor.reset();
                if let Some(snapshot) = self.cache.editor_state(&tab.tab_id).cloned() {
                    self.editor.apply_snapshot(&snapshot);
                }
            }
        }

        // Restore the tab's last-seen outcome, or clear the panel.
        self.editor.response = self.cache.response(&tab.tab_id).cloned();

        self.mode = SwitchMode::Idle;
    }

    /// Recomputes a tab's dirty flag from its snapshot and baseline.
    fn refresh_dirty(&mut self, tab_id: &str) {
        let Some(tab) = self.registry.get(tab_id) else {
            return;
        };
        let snapshot = self.cache.editor_state(tab_id);
        let dirty = match tab.request_id.as_deref() {
            Some(request_id) => self
                .store
                .request(request_id)
                .is_some_and(|saved| differs_from_saved(snapshot, saved)),
            None => differs_from_blank(snapshot),
        };
        self.registry.set_dirty(tab_id, dirty);
    }

    fn close_tab_for_request(&mut self, request_id: &str) {
        if let Some(tab) = self.registry.find_by_request(request_id) {
            let tab_id = tab.tab_id.clone();
            self.close_tab(&tab_id);
        }
    }

    /// Runs the issuing tab's extraction rules over a successful response.
    fn run_extraction(&mut self, tab_id: &str, response: &ResponseData) {
        let extraction = self
            .cache
            .editor_state(tab_id)
            .and_then(|snapshot| snapshot.variable_extraction.clone())
            .or_else(|| {
                self.registry
                    .get(tab_id)
                    .and_then(|tab| tab.request_id.as_deref())
                    .and_then(|id| self.store.request(id))
                    .and_then(|saved| saved.variable_extraction.clone())
            });
        let Some(extraction) = extraction else {
            return;
        };
        for (name, value) in extraction.extract(&response.body) {
            debug!(name, "extracted variable from response");
            self.variables.insert(name, value);
        }
    }
}

/// Full snapshot of a saved request's fields.
fn snapshot_of(saved: &SavedRequest) -> TabEditorState {
    TabEditorState {
        method: Some(saved.method.clone()),
        url: Some(saved.url.clone()),
        name_for_save: Some(saved.name.clone()),
        headers: Some(saved.headers.clone()),
        body: Some(saved.body.clone()),
        params: Some(saved.params.clone()),
        variable_extraction: saved.variable_extraction.clone(),
    }
}

/// Patch carrying every editor field, for an in-place save.
fn patch_from(editor: &EditorState) -> RequestPatch {
    RequestPatch {
        name: Some(editor.name.clone()),
        method: Some(editor.method.clone()),
        url: Some(editor.url.clone()),
        headers: Some(editor.headers.clone()),
        body: Some(editor.body.clone()),
        params: Some(editor.params.clone()),
        variable_extraction: editor.variable_extraction.clone(),
    }
}

/// Whether a snapshot's set fields deviate from the saved baseline.
/// Key-value lists compare by content; row ids are regenerated on copy.
fn differs_from_saved(snapshot: Option<&TabEditorState>, saved: &SavedRequest) -> bool {
    let Some(snapshot) = snapshot else {
        return false;
    };
    snapshot.method.as_ref().is_some_and(|m| *m != saved.method)
        || snapshot.url.as_ref().is_some_and(|u| *u != saved.url)
        || snapshot
            .name_for_save
            .as_ref()
            .is_some_and(|n| *n != saved.name)
        || snapshot
            .headers
            .as_ref()
            .is_some_and(|h| !key_value::content_eq(h, &saved.headers))
        || snapshot
            .body
            .as_ref()
            .is_some_and(|b| !key_value::content_eq(b, &saved.body))
        || snapshot
            .params
            .as_ref()
            .is_some_and(|p| !key_value::content_eq(p, &saved.params))
        || snapshot
            .variable_extraction
            .as_ref()
            .is_some_and(|x| Some(x) != saved.variable_extraction.as_ref())
}

/// Whether a snapshot's set fields deviate from the blank-tab defaults.
fn differs_from_blank(snapshot: Option<&TabEditorState>) -> bool {
    let Some(snapshot) = snapshot else {
        return false;
    };
    let defaults = EditorState::default();
    snapshot.method.as_ref().is_some_and(|m| *m != defaults.method)
        || snapshot.url.as_ref().is_some_and(|u| !u.is_empty())
        || snapshot
            .name_for_save
            .as_ref()
            .is_some_and(|n| n != UNTITLED_NAME)
        || snapshot
            .headers
            .as_ref()
            .is_some_and(|h| !key_value::content_eq(h, &defaults.headers))
        || snapshot.body.as_ref().is_some_and(|b| !b.is_empty())
        || snapshot.params.as_ref().is_some_and(|p| !p.is_empty())
        || snapshot
            .variable_extraction
            .as_ref()
            .is_some_and(|x| *x != VariableExtraction::default())
}
