//! Saved collection store: the persisted set of requests and folders.
//!
//! The store owns the flat record list and is the only writer to it. Every
//! mutating operation persists the entire collection through the
//! [`CollectionPersistence`] port after the in-memory update; a failed write
//! is logged and does not undo the mutation.

use relay_domain::{
    CollectionRecord, KeyValuePair, SavedFolder, SavedRequest, VariableExtraction, generate_id,
};
use tracing::warn;

use crate::error::{StoreError, StoreResult};
use crate::ports::CollectionPersistence;

/// Partial update for a saved request; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct RequestPatch {
    /// New name.
    pub name: Option<String>,
    /// New HTTP method.
    pub method: Option<String>,
    /// New URL.
    pub url: Option<String>,
    /// Replacement header list.
    pub headers: Option<Vec<KeyValuePair>>,
    /// Replacement body list.
    pub body: Option<Vec<KeyValuePair>>,
    /// Replacement parameter list.
    pub params: Option<Vec<KeyValuePair>>,
    /// Replacement extraction rules.
    pub variable_extraction: Option<VariableExtraction>,
}

/// Partial update for a folder. Reparenting goes through `move_folder`.
#[derive(Debug, Clone, Default)]
pub struct FolderPatch {
    /// New name.
    pub name: Option<String>,
}

/// In-memory collection backed by a persistence collaborator.
pub struct CollectionStore<P: CollectionPersistence> {
    records: Vec<CollectionRecord>,
    persistence: P,
}

impl<P: CollectionPersistence> CollectionStore<P> {
    /// Loads the collection from the persistence collaborator.
    ///
    /// A load failure starts with an empty collection; the error is logged.
    pub fn new(persistence: P) -> Self {
        let records = persistence.load().unwrap_or_else(|error| {
            warn!(%error, "collection load failed, starting empty");
            Vec::new()
        });
        Self {
            records,
            persistence,
        }
    }

    /// All records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[CollectionRecord] {
        &self.records
    }

    /// Looks up a saved request by id.
    #[must_use]
    pub fn request(&self, id: &str) -> Option<&SavedRequest> {
        self.records
            .iter()
            .filter_map(CollectionRecord::as_request)
            .find(|request| request.id == id)
    }

    /// Looks up a folder by id.
    #[must_use]
    pub fn folder(&self, id: &str) -> Option<&SavedFolder> {
        self.records
            .iter()
            .filter_map(CollectionRecord::as_folder)
            .find(|folder| folder.id == id)
    }

    /// All saved requests in insertion order.
    pub fn requests(&self) -> impl Iterator<Item = &SavedRequest> {
        self.records
            .iter()
            .filter_map(CollectionRecord::as_request)
    }

    /// All folders in insertion order.
    pub fn folders(&self) -> impl Iterator<Item = &SavedFolder> {
        self.records.iter().filter_map(CollectionRecord::as_folder)
    }

    /// Number of saved requests.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests().count()
    }

    /// Number of folders.
    #[must_use]
    pub fn folder_count(&self) -> usize {
        self.folders().count()
    }

    // === Request operations ===

    /// Adds a request with a freshly generated id and returns the id.
    ///
    /// A `folder_id` pointing at a missing folder is cleared, placing the
    /// request at the collection root.
    pub fn add_request(&mut self, mut request: SavedRequest) -> String {
        request.id = generate_id();
        let id = request.id.clone();
        if let Some(folder_id) = request.folder_id.clone() {
            if let Some(folder) = self.folder_mut(&folder_id) {
                folder.request_ids.push(id.clone());
            } else {
                request.folder_id = None;
            }
        }
        self.records.push(CollectionRecord::Request(request));
        self.persist();
        id
    }

    /// Merges `patch` into the matching request.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is absent.
    pub fn update_request(&mut self, id: &str, patch: RequestPatch) -> StoreResult<()> {
        let request = self
            .request_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if let Some(name) = patch.name {
            request.name = name;
        }
        if let Some(method) = patch.method {
            request.method = method;
        }
        if let Some(url) = patch.url {
            request.url = url;
        }
        if let Some(headers) = patch.headers {
            request.headers = headers;
        }
        if let Some(body) = patch.body {
            request.body = body;
        }
        if let Some(params) = patch.params {
            request.params = params;
        }
        if let Some(extraction) = patch.variable_extraction {
            request.variable_extraction = Some(extraction);
        }
        self.persist();
        Ok(())
    }

    /// Removes a request. Open tabs are not touched; that cleanup belongs
    /// to the workbench.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is absent.
    pub fn delete_request(&mut self, id: &str) -> StoreResult<()> {
        let folder_id = self
            .request(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?
            .folder_id
            .clone();
        if let Some(folder_id) = folder_id {
            Self::detach_request(&mut self.records, &folder_id, id);
        }
        self.records.retain(|record| record.id() != id);
        self.persist();
        Ok(())
    }

    /// Duplicates a request with a fresh id and a " copy" name suffix,
    /// inserted into the same folder right after the original. Returns the
    /// new id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is absent.
    pub fn copy_request(&mut self, id: &str) -> StoreResult<String> {
        let source_index = self
            .records
            .iter()
            .position(|record| record.as_request().is_some_and(|r| r.id == id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let Some(source) = self.records[source_index].as_request() else {
            return Err(StoreError::NotFound(id.to_string()));
        };

        let mut copy = source.clone();
        copy.id = generate_id();
        copy.name = format!("{} copy", copy.name);
        let copy_id = copy.id.clone();

        if let Some(folder_id) = copy.folder_id.clone() {
            if let Some(folder) = self.folder_mut(&folder_id) {
                folder.request_ids.push(copy_id.clone());
            }
        }
        self.records
            .insert(source_index + 1, CollectionRecord::Request(copy));
        self.persist();
        Ok(copy_id)
    }

    /// Reparents a request; `None` moves it to the collection root.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the request or the target folder
    /// is absent.
    pub fn move_request(&mut self, id: &str, new_folder_id: Option<&str>) -> StoreResult<()> {
        let old_folder_id = self
            .request(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?
            .folder_id
            .clone();
        if let Some(target) = new_folder_id {
            if self.folder(target).is_none() {
                return Err(StoreError::NotFound(target.to_string()));
            }
        }

        if let Some(old) = old_folder_id {
            Self::detach_request(&mut self.records, &old, id);
        }
        if let Some(target) = new_folder_id {
            if let Some(folder) = self.folder_mut(target) {
                folder.request_ids.push(id.to_string());
            }
        }
        if let Some(request) = self.request_mut(id) {
            request.folder_id = new_folder_id.map(ToString::to_string);
        }
        self.persist();
        Ok(())
    }

    // === Folder operations ===

    /// Adds a folder with a freshly generated id and returns the id.
    ///
    /// A `parent_folder_id` pointing at a missing folder is cleared, making
    /// the new folder a root.
    pub fn add_folder(&mut self, mut folder: SavedFolder) -> String {
        folder.id = generate_id();
        folder.request_ids.clear();
        folder.sub_folder_ids.clear();
        let id = folder.id.clone();
        if let Some(parent_id) = folder.parent_folder_id.clone() {
            if let Some(parent) = self.folder_mut(&parent_id) {
                parent.sub_folder_ids.push(id.clone());
            } else {
                folder.parent_folder_id = None;
            }
        }
        self.records.push(CollectionRecord::Folder(folder));
        self.persist();
        id
    }

    /// Merges `patch` into the matching folder.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is absent.
    pub fn update_folder(&mut self, id: &str, patch: FolderPatch) -> StoreResult<()> {
        let folder = self
            .folder_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if let Some(name) = patch.name {
            folder.name = name;
        }
        self.persist();
        Ok(())
    }

    /// Deletes a folder and everything inside it, transitively.
    ///
    /// All-or-nothing: the doomed set is computed up front and removed in a
    /// single pass, followed by one persist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is absent.
    pub fn delete_folder_recursive(&mut self, id: &str) -> StoreResult<()> {
        let parent_id = self
            .folder(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?
            .parent_folder_id
            .clone();

        let mut doomed = vec![id.to_string()];
        doomed.extend(self.descendant_folder_ids(id));
        let mut doomed_requests = Vec::new();
        for folder_id in &doomed {
            if let Some(folder) = self.folder(folder_id) {
                doomed_requests.extend(folder.request_ids.iter().cloned());
            }
        }
        doomed.extend(doomed_requests);

        if let Some(parent_id) = parent_id {
            Self::detach_folder(&mut self.records, &parent_id, id);
        }
        self.records
            .retain(|record| !doomed.iter().any(|d| d == record.id()));
        self.persist();
        Ok(())
    }

    /// Deep-clones a folder subtree with fresh ids, preserving relative
    /// structure, inserted as a sibling with a " copy" name suffix. Returns
    /// the new folder's id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is absent.
    pub fn copy_folder(&mut self, id: &str) -> StoreResult<String> {
        let parent_id = self
            .folder(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?
            .parent_folder_id
            .clone();

        let mut clones = Vec::new();
        let Some(new_id) = self.clone_subtree(id, parent_id.clone(), &mut clones) else {
            return Err(StoreError::NotFound(id.to_string()));
        };
        for record in &mut clones {
            if let CollectionRecord::Folder(folder) = record {
                if folder.id == new_id {
                    folder.name = format!("{} copy", folder.name);
                }
            }
        }

        if let Some(parent_id) = parent_id {
            if let Some(parent) = self.folder_mut(&parent_id) {
                parent.sub_folder_ids.push(new_id.clone());
            }
        }
        self.records.extend(clones);
        self.persist();
        Ok(new_id)
    }

    /// Reparents a folder; `None` makes it a root.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the folder or the target is
    /// absent, or [`StoreError::CyclicMove`] if the target lies inside the
    /// folder's own subtree (itself included).
    pub fn move_folder(&mut self, id: &str, new_parent_id: Option<&str>) -> StoreResult<()> {
        let old_parent_id = self
            .folder(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?
            .parent_folder_id
            .clone();
        if let Some(target) = new_parent_id {
            if self.folder(target).is_none() {
                return Err(StoreError::NotFound(target.to_string()));
            }
            if target == id || self.descendant_folder_ids(id).iter().any(|d| d == target) {
                return Err(StoreError::CyclicMove(id.to_string()));
            }
        }

        if let Some(old) = old_parent_id {
            Self::detach_folder(&mut self.records, &old, id);
        }
        if let Some(target) = new_parent_id {
            if let Some(parent) = self.folder_mut(target) {
                parent.sub_folder_ids.push(id.to_string());
            }
        }
        if let Some(folder) = self.folder_mut(id) {
            folder.parent_folder_id = new_parent_id.map(ToString::to_string);
        }
        self.persist();
        Ok(())
    }

    /// Ids of all requests inside a folder's subtree, the folder's own
    /// requests included. Used by the workbench for tab cleanup before a
    /// recursive delete.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the folder is absent.
    pub fn descendant_request_ids(&self, folder_id: &str) -> StoreResult<Vec<String>> {
        if self.folder(folder_id).is_none() {
            return Err(StoreError::NotFound(folder_id.to_string()));
        }
        let mut folder_ids = vec![folder_id.to_string()];
        folder_ids.extend(self.descendant_folder_ids(folder_id));
        let mut request_ids = Vec::new();
        for fid in &folder_ids {
            if let Some(folder) = self.folder(fid) {
                request_ids.extend(folder.request_ids.iter().cloned());
            }
        }
        Ok(request_ids)
    }

    // === Internals ===

    fn request_mut(&mut self, id: &str) -> Option<&mut SavedRequest> {
        self.records.iter_mut().find_map(|record| match record {
            CollectionRecord::Request(request) if request.id == id => Some(request),
            _ => None,
        })
    }

    fn folder_mut(&mut self, id: &str) -> Option<&mut SavedFolder> {
        self.records.iter_mut().find_map(|record| match record {
            CollectionRecord::Folder(folder) if folder.id == id => Some(folder),
            _ => None,
        })
    }

    fn detach_request(records: &mut [CollectionRecord], folder_id: &str, request_id: &str) {
        for record in records.iter_mut() {
            if let CollectionRecord::Folder(folder) = record {
                if folder.id == folder_id {
                    folder.request_ids.retain(|rid| rid != request_id);
                }
            }
        }
    }

    fn detach_folder(records: &mut [CollectionRecord], parent_id: &str, folder_id: &str) {
        for record in records.iter_mut() {
            if let CollectionRecord::Folder(folder) = record {
                if folder.id == parent_id {
                    folder.sub_folder_ids.retain(|fid| fid != folder_id);
                }
            }
        }
    }

    /// Ids of all folders strictly below `id`, depth-first.
    fn descendant_folder_ids(&self, id: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack: Vec<String> = self
            .folder(id)
            .map(|folder| folder.sub_folder_ids.clone())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            if let Some(folder) = self.folder(&next) {
                stack.extend(folder.sub_folder_ids.iter().cloned());
            }
            out.push(next);
        }
        out
    }

    /// Recursively clones `source_id`'s subtree into `out`, returning the
    /// clone's id. Children are cloned before their parent is pushed so the
    /// parent's child lists are complete.
    fn clone_subtree(
        &self,
        source_id: &str,
        new_parent: Option<String>,
        out: &mut Vec<CollectionRecord>,
    ) -> Option<String> {
        let source = self.folder(source_id)?;
        let mut clone = SavedFolder {
            id: generate_id(),
            name: source.name.clone(),
            parent_folder_id: new_parent,
            request_ids: Vec::new(),
            sub_folder_ids: Vec::new(),
        };
        let new_id = clone.id.clone();

        for request_id in &source.request_ids {
            if let Some(request) = self.request(request_id) {
                let mut request_clone = request.clone();
                request_clone.id = generate_id();
                request_clone.folder_id = Some(new_id.clone());
                clone.request_ids.push(request_clone.id.clone());
                out.push(CollectionRecord::Request(request_clone));
            }
        }
        for child_id in source.sub_folder_ids.clone() {
            if let Some(child_clone_id) = self.clone_subtree(&child_id, Some(new_id.clone()), out)
            {
                clone.sub_folder_ids.push(child_clone_id);
            }
        }
        out.push(CollectionRecord::Folder(clone));
        Some(new_id)
    }

    fn persist(&self) {
        if let Err(error) = self.persistence.save(&self.records) {
            warn!(%error, "collection persist failed");
        }
    }
}
