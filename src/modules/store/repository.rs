use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Record '{0}' not found")]
    NotFound(String),

    #[error("Record '{0}' already exists")]
    AlreadyExists(String),

    #[error("Record '{key}' changed concurrently: expected version {expected}, found {actual}")]
    VersionConflict { key: String, expected: u64, actual: u64 },

    #[error("Failed to acquire store lock")]
    LockPoisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Anything the engine persists under a string key.
pub trait Entity: Clone + Send + Sync + 'static {
    fn key(&self) -> &str;
}

/// A stored entity together with its optimistic-concurrency version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Versioned<E> {
    pub version: u64,
    pub entity: E,
}

impl<E> Versioned<E> {
    pub fn new(entity: E) -> Self {
        Self { version: 1, entity }
    }

    pub fn into_inner(self) -> E {
        self.entity
    }
}

/// Storage-agnostic access used by the profile aggregator and the session ledger.
///
/// `conditional_update` applies `mutator` only if the stored version still equals
/// `expected_version`; the check and the write happen atomically.
pub trait Repository<E: Entity>: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<Versioned<E>>>;

    fn create(&self, entity: E) -> StoreResult<Versioned<E>>;

    fn conditional_update(
        &self,
        key: &str,
        expected_version: u64,
        mutator: &dyn Fn(&E) -> E,
    ) -> StoreResult<Versioned<E>>;

    fn list(&self) -> StoreResult<Vec<Versioned<E>>>;
}
