//! Open-tab bookkeeping: the ordered registry and the per-tab caches.

mod cache;
mod registry;

pub use cache::{TabCache, TabEditorState, TabResponse};
pub use registry::{Tab, TabRegistry};
