//! Single-file JSON collection store.

use std::fs;
use std::path::{Path, PathBuf};

use relay_application::ports::{CollectionPersistence, PersistenceError};
use relay_domain::CollectionRecord;
use tracing::debug;

use crate::serialization::{from_json, to_json_stable};

/// Stores the whole collection as one pretty-printed JSON file.
///
/// A missing file reads as an empty collection, so first launch needs no
/// setup step. Saves create the parent directory if needed and rewrite the
/// file whole.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CollectionPersistence for JsonFileStore {
    fn load(&self) -> Result<Vec<CollectionRecord>, PersistenceError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no collection file, starting empty");
                return Ok(Vec::new());
            }
            Err(error) => return Err(PersistenceError::Io(error)),
        };
        from_json(&contents).map_err(|error| PersistenceError::Serialization(error.to_string()))
    }

    fn save(&self, records: &[CollectionRecord]) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = to_json_stable(&records)
            .map_err(|error| PersistenceError::Serialization(error.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
