//! Collection persistence port.

use relay_domain::CollectionRecord;
use thiserror::Error;

/// Error type for persistence operations.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Reading or writing the backing store failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored collection could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Port for loading and saving the full collection.
///
/// The store issues one full-collection `save` after every mutation:
/// synchronous, at-least-once, no batching or transactional grouping.
/// Write failures are the adapter's to report; the store logs them and
/// keeps the in-memory mutation.
pub trait CollectionPersistence {
    /// Loads the persisted collection.
    ///
    /// A missing backing store loads as an empty collection; records with
    /// missing fields are back-filled with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the store exists but cannot be read or parsed.
    fn load(&self) -> Result<Vec<CollectionRecord>, PersistenceError>;

    /// Persists the full collection, replacing the previous contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be encoded or written.
    fn save(&self, records: &[CollectionRecord]) -> Result<(), PersistenceError>;
}
