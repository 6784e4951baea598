use std::collections::HashMap;
use std::sync::Mutex;

use super::repository::{Entity, Repository, StoreError, StoreResult, Versioned};

/// Process-local repository keyed by entity key.
pub struct InMemoryRepository<E: Entity> {
    records: Mutex<HashMap<String, Versioned<E>>>,
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> StoreResult<usize> {
        let records = self.records.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    pub fn remove(&self, key: &str) -> StoreResult<Option<E>> {
        let mut records = self.records.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.remove(key).map(Versioned::into_inner))
    }

    pub fn clear(&self) -> StoreResult<()> {
        let mut records = self.records.lock().map_err(|_| StoreError::LockPoisoned)?;
        records.clear();
        Ok(())
    }
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    fn get(&self, key: &str) -> StoreResult<Option<Versioned<E>>> {
        let records = self.records.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.get(key).cloned())
    }

    fn create(&self, entity: E) -> StoreResult<Versioned<E>> {
        let mut records = self.records.lock().map_err(|_| StoreError::LockPoisoned)?;
        let key = entity.key().to_string();

        if records.contains_key(&key) {
            return Err(StoreError::AlreadyExists(key));
        }

        let stored = Versioned::new(entity);
        records.insert(key, stored.clone());

        Ok(stored)
    }

    fn conditional_update(
        &self,
        key: &str,
        expected_version: u64,
        mutator: &dyn Fn(&E) -> E,
    ) -> StoreResult<Versioned<E>> {
        let mut records = self.records.lock().map_err(|_| StoreError::LockPoisoned)?;
        let current = records
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;

        if current.version != expected_version {
            return Err(StoreError::VersionConflict {
                key: key.to_string(),
                expected: expected_version,
                actual: current.version,
            });
        }

        current.entity = mutator(&current.entity);
        current.version += 1;

        Ok(current.clone())
    }

    fn list(&self) -> StoreResult<Vec<Versioned<E>>> {
        let records = self.records.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.values().cloned().collect())
    }
}
