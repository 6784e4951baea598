use std::sync::atomic::{AtomicU32, Ordering};

use crate::modules::profile::UserProfile;
use crate::modules::store::{InMemoryRepository, Repository, StoreError, StoreResult, Versioned};

/// Profile repository whose conditional updates lose the race a set number of times.
pub struct ConflictingRepository {
    inner: InMemoryRepository<UserProfile>,
    failures_left: AtomicU32,
    update_attempts: AtomicU32,
}

impl ConflictingRepository {
    pub fn new() -> Self {
        Self::failing_times(u32::MAX)
    }

    pub fn failing_times(failures: u32) -> Self {
        Self {
            inner: InMemoryRepository::new(),
            failures_left: AtomicU32::new(failures),
            update_attempts: AtomicU32::new(0),
        }
    }

    pub fn update_attempts(&self) -> u32 {
        self.update_attempts.load(Ordering::SeqCst)
    }
}

impl Repository<UserProfile> for ConflictingRepository {
    fn get(&self, key: &str) -> StoreResult<Option<Versioned<UserProfile>>> {
        self.inner.get(key)
    }

    fn create(&self, entity: UserProfile) -> StoreResult<Versioned<UserProfile>> {
        self.inner.create(entity)
    }

    fn conditional_update(
        &self,
        key: &str,
        expected_version: u64,
        mutator: &dyn Fn(&UserProfile) -> UserProfile,
    ) -> StoreResult<Versioned<UserProfile>> {
        self.update_attempts.fetch_add(1, Ordering::SeqCst);

        let remaining = self.failures_left.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_left.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::VersionConflict {
                key: key.to_string(),
                expected: expected_version,
                actual: expected_version + 1,
            });
        }

        self.inner.conditional_update(key, expected_version, mutator)
    }

    fn list(&self) -> StoreResult<Vec<Versioned<UserProfile>>> {
        self.inner.list()
    }
}

pub struct TestProfileData;

impl TestProfileData {
    pub fn test_user_id() -> String {
        format!("test-user-{}", uuid::Uuid::new_v4())
    }

    pub fn profile_with_completion(user_id: &str, avg_completion: f64) -> UserProfile {
        UserProfile {
            avg_completion,
            total_sessions: 4,
            ..UserProfile::new(user_id)
        }
    }
}
