//! Shared doubles for unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use relay_domain::CollectionRecord;

use crate::ports::{CollectionPersistence, ConfirmPrompt, PersistenceError};

/// In-memory persistence double shared between the store under test and the
/// assertions.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    inner: Rc<RefCell<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    records: Vec<CollectionRecord>,
    save_count: usize,
}

impl MemoryPersistence {
    /// Pre-seeds the persisted records.
    pub fn seed(records: Vec<CollectionRecord>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                records,
                save_count: 0,
            })),
        }
    }

    /// Last persisted records.
    pub fn saved(&self) -> Vec<CollectionRecord> {
        self.inner.borrow().records.clone()
    }

    /// Number of `save` calls observed.
    pub fn save_count(&self) -> usize {
        self.inner.borrow().save_count
    }
}

impl CollectionPersistence for MemoryPersistence {
    fn load(&self) -> Result<Vec<CollectionRecord>, PersistenceError> {
        Ok(self.inner.borrow().records.clone())
    }

    fn save(&self, records: &[CollectionRecord]) -> Result<(), PersistenceError> {
        let mut inner = self.inner.borrow_mut();
        inner.records = records.to_vec();
        inner.save_count += 1;
        Ok(())
    }
}

/// Prompt double with a fixed answer and a call counter.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answer: bool,
    asked: Cell<usize>,
}

impl ScriptedPrompt {
    /// A prompt that answers `answer` every time.
    pub const fn answering(answer: bool) -> Self {
        Self {
            answer,
            asked: Cell::new(0),
        }
    }

    /// Number of times the prompt was shown.
    pub fn asked(&self) -> usize {
        self.asked.get()
    }
}

impl ConfirmPrompt for ScriptedPrompt {
    fn confirm(&self, _message: &str) -> bool {
        self.asked.set(self.asked.get() + 1);
        self.answer
    }
}
