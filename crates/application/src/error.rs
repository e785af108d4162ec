//! Application error types

use thiserror::Error;

/// Errors surfaced by collection store operations.
///
/// These are recovered at the boundary where they occur; none of them may
/// leave the registry or the store in an inconsistent state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The referenced id is absent from the collection.
    #[error("not found: {0}")]
    NotFound(String),

    /// A folder move would make the folder its own ancestor.
    #[error("cyclic move: folder {0} cannot be moved into its own subtree")]
    CyclicMove(String),
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
