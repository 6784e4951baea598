use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use super::aggregator::{apply_feedback, ProfileFeedback, UserProfile};
use crate::error::{EngineError, EngineResult};
use crate::modules::store::{Repository, StoreError, Versioned};

/// Applies feedback to stored profiles, one writer per user at a time.
///
/// A per-user lock serializes writers inside this process; the versioned
/// conditional update catches writers that bypass it, and is retried up to
/// `max_retries` times.
pub struct ProfileService {
    repository: Arc<dyn Repository<UserProfile>>,
    user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    max_retries: u32,
}

impl ProfileService {
    pub fn new(repository: Arc<dyn Repository<UserProfile>>, max_retries: u32) -> Self {
        Self {
            repository,
            user_locks: Mutex::new(HashMap::new()),
            max_retries: max_retries.max(1),
        }
    }

    pub fn get(&self, user_id: &str) -> EngineResult<Option<UserProfile>> {
        Ok(self.repository.get(user_id)?.map(Versioned::into_inner))
    }

    pub fn record_feedback(&self, user_id: &str, feedback: &ProfileFeedback) -> EngineResult<UserProfile> {
        let lock = self.user_lock(user_id)?;
        let result = match lock.lock() {
            Ok(_guard) => self.apply_with_retries(user_id, feedback),
            Err(_) => Err(EngineError::Internal(format!("Profile lock for '{}' poisoned", user_id))),
        };
        self.release_user_lock(user_id, lock);
        result
    }

    /// Number of users that currently hold an entry in the lock table.
    pub fn tracked_locks(&self) -> usize {
        self.user_locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }

    fn apply_with_retries(&self, user_id: &str, feedback: &ProfileFeedback) -> EngineResult<UserProfile> {
        for attempt in 1..=self.max_retries {
            let current = match self.load_or_create(user_id) {
                Ok(current) => current,
                Err(StoreError::AlreadyExists(_)) => {
                    warn!(user_id, attempt, "Profile created concurrently, retrying");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            match self
                .repository
                .conditional_update(user_id, current.version, &|profile: &UserProfile| apply_feedback(profile, feedback))
            {
                Ok(updated) => {
                    info!(
                        user_id,
                        total_sessions = updated.entity.total_sessions,
                        avg_completion = updated.entity.avg_completion,
                        avg_rating = updated.entity.avg_rating,
                        "Profile updated"
                    );
                    return Ok(updated.entity);
                }
                Err(StoreError::VersionConflict { expected, actual, .. }) => {
                    warn!(user_id, attempt, expected, actual, "Profile version conflict, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(EngineError::Conflict(format!(
            "Profile for '{}' kept changing after {} attempts",
            user_id, self.max_retries
        )))
    }

    fn load_or_create(&self, user_id: &str) -> Result<Versioned<UserProfile>, StoreError> {
        match self.repository.get(user_id)? {
            Some(existing) => Ok(existing),
            None => self.repository.create(UserProfile::new(user_id)),
        }
    }

    fn user_lock(&self, user_id: &str) -> EngineResult<Arc<Mutex<()>>> {
        let mut locks = self
            .user_locks
            .lock()
            .map_err(|_| EngineError::Internal("Profile lock table poisoned".to_string()))?;
        Ok(locks.entry(user_id.to_string()).or_default().clone())
    }

    /// Drops the table entry once no other writer holds a handle to it.
    fn release_user_lock(&self, user_id: &str, lock: Arc<Mutex<()>>) {
        let Ok(mut locks) = self.user_locks.lock() else {
            return;
        };
        // The table and `lock` itself account for two handles.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(user_id);
        }
    }
}
