//! Saved collection records: requests, folders, and the persisted envelope.

use serde::{Deserialize, Serialize};

use crate::extraction::VariableExtraction;
use crate::id::generate_id;
use crate::key_value::KeyValuePair;

/// A saved HTTP request belonging to the collection.
///
/// Identity is `id`, generated at creation and immutable thereafter. The
/// record is owned exclusively by the collection store and mutated only
/// through its update operations. Missing fields are back-filled with
/// defaults on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRequest {
    /// Unique identifier.
    #[serde(default = "generate_id")]
    pub id: String,

    /// Human-readable request name.
    #[serde(default)]
    pub name: String,

    /// HTTP method. Stored as text so imported commands keep custom verbs.
    #[serde(default = "default_method")]
    pub method: String,

    /// Request URL without the query string; parameters live in `params`.
    #[serde(default)]
    pub url: String,

    /// Request headers.
    #[serde(default)]
    pub headers: Vec<KeyValuePair>,

    /// Request body fields, sent as a JSON object of the enabled rows.
    #[serde(default)]
    pub body: Vec<KeyValuePair>,

    /// URL query parameters.
    #[serde(default)]
    pub params: Vec<KeyValuePair>,

    /// Rules for pulling values out of successful responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_extraction: Option<VariableExtraction>,

    /// Owning folder, or `None` for a root-level request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl SavedRequest {
    /// Creates a new GET request with a generated id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            method: default_method(),
            url: String::new(),
            headers: Vec::new(),
            body: Vec::new(),
            params: Vec::new(),
            variable_extraction: None,
            folder_id: None,
        }
    }

    /// Sets the URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Places the request in a folder.
    #[must_use]
    pub fn with_folder(mut self, folder_id: impl Into<String>) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    /// Adds a header row.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(KeyValuePair::new(key, value));
        self
    }
}

/// A folder organizing saved requests into a tree.
///
/// Folders with `parent_folder_id = None` are roots. `request_ids` and
/// `sub_folder_ids` mirror the children's back-references; each child has at
/// most one parent at a time and the tree contains no cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFolder {
    /// Unique identifier.
    #[serde(default = "generate_id")]
    pub id: String,

    /// Human-readable folder name.
    #[serde(default)]
    pub name: String,

    /// Parent folder, or `None` for a root folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_folder_id: Option<String>,

    /// Requests directly inside this folder.
    #[serde(default)]
    pub request_ids: Vec<String>,

    /// Folders directly inside this folder.
    #[serde(default)]
    pub sub_folder_ids: Vec<String>,
}

impl SavedFolder {
    /// Creates a new empty root folder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            parent_folder_id: None,
            request_ids: Vec::new(),
            sub_folder_ids: Vec::new(),
        }
    }

    /// Sets the parent folder.
    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_folder_id = Some(parent_id.into());
        self
    }
}

/// One record in the persisted collection array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CollectionRecord {
    /// A saved request.
    Request(SavedRequest),
    /// A folder.
    Folder(SavedFolder),
}

impl CollectionRecord {
    /// Returns the ID of this record.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Request(r) => &r.id,
            Self::Folder(f) => &f.id,
        }
    }

    /// Returns the name of this record.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Request(r) => &r.name,
            Self::Folder(f) => &f.name,
        }
    }

    /// Returns the request, if this record is one.
    #[must_use]
    pub const fn as_request(&self) -> Option<&SavedRequest> {
        match self {
            Self::Request(r) => Some(r),
            Self::Folder(_) => None,
        }
    }

    /// Returns the folder, if this record is one.
    #[must_use]
    pub const fn as_folder(&self) -> Option<&SavedFolder> {
        match self {
            Self::Request(_) => None,
            Self::Folder(f) => Some(f),
        }
    }
}
