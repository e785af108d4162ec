//! Relay Application - Core state machines and ports
//!
//! This crate holds the saved-request collection store, the tab registry,
//! the per-tab editor/response caches, the live editor state, and the
//! workbench that keeps them synchronized. External collaborators
//! (persistence, transport, cURL parsing, confirmation prompts) are modeled
//! as port traits implemented by the infrastructure layer.

pub mod editor;
pub mod error;
pub mod ports;
pub mod store;
pub mod tabs;
pub mod workbench;

#[cfg(test)]
mod test_support;

pub use editor::{EditorState, UNTITLED_NAME};
pub use error::{StoreError, StoreResult};
pub use store::{CollectionStore, FolderPatch, RequestPatch};
pub use tabs::{Tab, TabCache, TabEditorState, TabRegistry, TabResponse};
pub use workbench::{SwitchMode, Workbench};
