//! End-to-end tests over the workbench with real file persistence.

use std::cell::Cell;
use std::time::Duration;

use pretty_assertions::assert_eq;
use relay_application::Workbench;
use relay_application::ports::{ConfirmPrompt, Transport};
use relay_domain::{
    ExtractionRule, KeyValuePair, RequestSpec, ResponseData, SavedFolder, SavedRequest,
    TransportFailure, VariableExtraction,
};
use relay_infrastructure::{CurlCommandParser, JsonFileStore};
use tempfile::TempDir;

/// Transport double returning a canned outcome.
struct MockTransport {
    outcome: Result<ResponseData, TransportFailure>,
}

impl MockTransport {
    fn responding(body: &str) -> Self {
        Self {
            outcome: Ok(ResponseData {
                status: 200,
                status_text: "OK".to_string(),
                headers: Vec::new(),
                body: body.to_string(),
                size: body.len(),
            }),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            outcome: Err(TransportFailure::message(message)),
        }
    }
}

impl Transport for MockTransport {
    async fn execute(&self, _spec: &RequestSpec) -> Result<ResponseData, TransportFailure> {
        self.outcome.clone()
    }
}

/// Prompt double with a fixed answer and a call counter.
struct FixedPrompt {
    answer: bool,
    asked: Cell<usize>,
}

impl FixedPrompt {
    const fn answering(answer: bool) -> Self {
        Self {
            answer,
            asked: Cell::new(0),
        }
    }
}

impl ConfirmPrompt for FixedPrompt {
    fn confirm(&self, _message: &str) -> bool {
        self.asked.set(self.asked.get() + 1);
        self.answer
    }
}

fn workbench_in(dir: &TempDir) -> Workbench<JsonFileStore> {
    Workbench::new(JsonFileStore::new(dir.path().join("collection.json")))
}

#[test]
fn test_collection_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let request_id = {
        let mut workbench = workbench_in(&dir);
        let folder_id = workbench.store_mut().add_folder(SavedFolder::new("Work"));
        workbench.store_mut().add_request(
            SavedRequest::new("Ping")
                .with_url("https://api.test/ping")
                .with_folder(folder_id),
        )
    };

    let workbench = workbench_in(&dir);
    let reloaded = workbench.store().request(&request_id).unwrap();
    assert_eq!(reloaded.name, "Ping");
    assert_eq!(reloaded.url, "https://api.test/ping");
    assert!(reloaded.folder_id.is_some());
    assert_eq!(workbench.store().folder_count(), 1);
}

#[test]
fn test_move_request_to_root_persists() {
    let dir = tempfile::tempdir().unwrap();

    let request_id = {
        let mut workbench = workbench_in(&dir);
        let folder_id = workbench.store_mut().add_folder(SavedFolder::new("Work"));
        let request_id = workbench
            .store_mut()
            .add_request(SavedRequest::new("Ping").with_folder(folder_id));
        workbench.store_mut().move_request(&request_id, None).unwrap();
        request_id
    };

    let workbench = workbench_in(&dir);
    assert!(workbench.store().request(&request_id).unwrap().folder_id.is_none());
    let folder = workbench.store().folders().next().unwrap();
    assert!(folder.request_ids.is_empty());
}

#[test]
fn test_one_tab_per_saved_request() {
    let dir = tempfile::tempdir().unwrap();
    let mut workbench = workbench_in(&dir);
    let id = workbench
        .store_mut()
        .add_request(SavedRequest::new("Ping").with_url("https://api.test/ping"));

    let prompt = FixedPrompt::answering(true);
    workbench.open_saved_request(&id, &prompt).unwrap();
    workbench.open_saved_request(&id, &prompt).unwrap();
    workbench.open_blank_tab();
    workbench.open_saved_request(&id, &prompt).unwrap();

    let bound: Vec<_> = workbench
        .tabs()
        .iter()
        .filter(|tab| tab.request_id.as_deref() == Some(id.as_str()))
        .collect();
    assert_eq!(bound.len(), 1);
    assert_eq!(workbench.tabs().len(), 2);
}

#[test]
fn test_unsaved_edits_survive_tab_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut workbench = workbench_in(&dir);
    let id = workbench
        .store_mut()
        .add_request(SavedRequest::new("Ping").with_url("https://saved.test"));

    let prompt = FixedPrompt::answering(true);
    workbench.open_saved_request(&id, &prompt).unwrap();
    let saved_tab = workbench.active_tab().unwrap().tab_id.clone();
    workbench.set_url("https://edited.test");
    assert!(workbench.active_tab().unwrap().is_dirty);

    workbench.open_blank_tab();
    assert_eq!(workbench.editor().url, "");

    workbench.activate_tab(&saved_tab);
    assert_eq!(workbench.editor().url, "https://edited.test");
    assert!(workbench.active_tab().unwrap().is_dirty);

    // The file still holds the saved URL; edits live only in the tab.
    let fresh = workbench_in(&dir);
    assert_eq!(fresh.store().request(&id).unwrap().url, "https://saved.test");
}

#[test]
fn test_save_clears_dirty_and_writes_through() {
    let dir = tempfile::tempdir().unwrap();
    let mut workbench = workbench_in(&dir);
    let id = workbench
        .store_mut()
        .add_request(SavedRequest::new("Ping").with_url("https://saved.test"));

    let prompt = FixedPrompt::answering(true);
    workbench.open_saved_request(&id, &prompt).unwrap();
    workbench.set_url("https://edited.test");
    workbench.save_active().unwrap();

    assert!(!workbench.active_tab().unwrap().is_dirty);
    let fresh = workbench_in(&dir);
    assert_eq!(fresh.store().request(&id).unwrap().url, "https://edited.test");
}

#[test]
fn test_declined_discard_keeps_draft() {
    let dir = tempfile::tempdir().unwrap();
    let mut workbench = workbench_in(&dir);
    let id = workbench
        .store_mut()
        .add_request(SavedRequest::new("Ping").with_url("https://api.test"));

    workbench.open_blank_tab();
    workbench.set_url("https://draft.test");

    let decline = FixedPrompt::answering(false);
    workbench.open_saved_request(&id, &decline).unwrap();

    assert_eq!(decline.asked.get(), 1);
    assert_eq!(workbench.tabs().len(), 1);
    assert_eq!(workbench.editor().url, "https://draft.test");
}

#[tokio::test]
async fn test_send_shows_response_on_active_tab() {
    let dir = tempfile::tempdir().unwrap();
    let mut workbench = workbench_in(&dir);
    workbench.open_blank_tab();
    workbench.set_url("https://api.test/ping");

    let transport = MockTransport::responding(r#"{"ok":true}"#);
    workbench.send_active(&transport).await;

    let response = workbench.editor().response.as_ref().unwrap();
    let data = response.outcome.as_ref().unwrap();
    assert_eq!(data.status, 200);
    assert_eq!(data.body, r#"{"ok":true}"#);
}

#[tokio::test]
async fn test_failure_outcome_is_shown_too() {
    let dir = tempfile::tempdir().unwrap();
    let mut workbench = workbench_in(&dir);
    workbench.open_blank_tab();
    workbench.set_url("https://down.test");

    let transport = MockTransport::failing("connection refused");
    workbench.send_active(&transport).await;

    let response = workbench.editor().response.as_ref().unwrap();
    assert!(response.outcome.is_err());
}

#[test]
fn test_late_outcome_lands_on_issuing_tab() {
    let dir = tempfile::tempdir().unwrap();
    let mut workbench = workbench_in(&dir);
    let first = workbench.open_blank_tab();
    workbench.set_url("https://slow.test");

    let (issuing_tab, _spec) = workbench.prepare_send().unwrap();

    // The user switches to a new tab while the call is in flight.
    let second = workbench.open_blank_tab();
    workbench.record_outcome(
        &issuing_tab,
        Ok(ResponseData {
            status: 200,
            status_text: "OK".to_string(),
            headers: Vec::new(),
            body: "late".to_string(),
            size: 4,
        }),
        Duration::from_millis(250),
    );

    assert!(workbench.editor().response.is_none());
    assert!(workbench.tab_response(&second).is_none());
    let cached = workbench.tab_response(&first).unwrap();
    assert_eq!(cached.outcome.as_ref().unwrap().body, "late");
    assert_eq!(cached.response_time, Duration::from_millis(250));
}

#[test]
fn test_delete_folder_cascades_into_open_tabs() {
    let dir = tempfile::tempdir().unwrap();
    let mut workbench = workbench_in(&dir);

    let work = workbench.store_mut().add_folder(SavedFolder::new("Work"));
    let inner = workbench
        .store_mut()
        .add_folder(SavedFolder::new("Inner").with_parent(work.clone()));
    let ping = workbench
        .store_mut()
        .add_request(SavedRequest::new("Ping").with_folder(inner.clone()));
    let other = workbench
        .store_mut()
        .add_request(SavedRequest::new("Other").with_url("https://other.test"));

    let prompt = FixedPrompt::answering(true);
    workbench.open_saved_request(&ping, &prompt).unwrap();
    workbench.open_saved_request(&other, &prompt).unwrap();

    workbench.delete_folder(&work).unwrap();

    assert!(workbench.store().folder(&work).is_none());
    assert!(workbench.store().folder(&inner).is_none());
    assert!(workbench.store().request(&ping).is_none());
    assert!(workbench.store().request(&other).is_some());
    assert_eq!(workbench.tabs().len(), 1);
    assert_eq!(
        workbench.tabs()[0].request_id.as_deref(),
        Some(other.as_str())
    );
}

#[test]
fn test_variable_extraction_from_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let mut workbench = workbench_in(&dir);
    let tab = workbench.open_blank_tab();
    workbench.set_variable_extraction(VariableExtraction {
        enabled: true,
        rules: vec![ExtractionRule::new("session", "auth.token")],
    });

    workbench.record_outcome(
        &tab,
        Ok(ResponseData {
            status: 200,
            status_text: "OK".to_string(),
            headers: Vec::new(),
            body: r#"{"auth":{"token":"s3cr3t"}}"#.to_string(),
            size: 27,
        }),
        Duration::ZERO,
    );

    assert_eq!(
        workbench.variables().get("session").map(String::as_str),
        Some("s3cr3t")
    );
}

#[test]
fn test_curl_import_fills_the_draft() {
    let dir = tempfile::tempdir().unwrap();
    let mut workbench = workbench_in(&dir);
    workbench.open_blank_tab();

    let parser = CurlCommandParser::new();
    workbench
        .import_curl(
            r#"curl -H 'Accept: application/json' -d '{"q":"rust"}' 'https://api.test/search?page=2'"#,
            &parser,
        )
        .unwrap();

    assert_eq!(workbench.editor().method, "POST");
    assert_eq!(workbench.editor().url, "https://api.test/search");
    assert_eq!(workbench.editor().params.len(), 1);
    assert_eq!(workbench.editor().headers.len(), 1);
    assert_eq!(workbench.editor().body[0].key_name, "q");
    assert!(workbench.active_tab().unwrap().is_dirty);
}

#[test]
fn test_copy_folder_deep_copies_with_fresh_ids() {
    let dir = tempfile::tempdir().unwrap();
    let mut workbench = workbench_in(&dir);

    let work = workbench.store_mut().add_folder(SavedFolder::new("Work"));
    workbench
        .store_mut()
        .add_request(SavedRequest::new("Ping").with_folder(work.clone()));

    let copy_id = workbench.store_mut().copy_folder(&work).unwrap();
    let copy = workbench.store().folder(&copy_id).unwrap();

    assert_eq!(copy.name, "Work copy");
    assert_ne!(copy.id, work);
    assert_eq!(copy.request_ids.len(), 1);
    assert_ne!(
        copy.request_ids[0],
        workbench.store().folder(&work).unwrap().request_ids[0]
    );
    assert_eq!(workbench.store().request_count(), 2);
}

fn kv(key: &str, value: &str) -> KeyValuePair {
    KeyValuePair::new(key, value)
}

#[test]
fn test_header_edit_dirty_ignores_row_ids() {
    let dir = tempfile::tempdir().unwrap();
    let mut workbench = workbench_in(&dir);
    let id = workbench.store_mut().add_request(
        SavedRequest::new("Ping").with_header("Accept", "*/*"),
    );

    let prompt = FixedPrompt::answering(true);
    workbench.open_saved_request(&id, &prompt).unwrap();

    // Same content, fresh row ids: not dirty.
    workbench.set_headers(vec![kv("Accept", "*/*")]);
    assert!(!workbench.active_tab().unwrap().is_dirty);

    // Changed value: dirty.
    workbench.set_headers(vec![kv("Accept", "application/json")]);
    assert!(workbench.active_tab().unwrap().is_dirty);
}
