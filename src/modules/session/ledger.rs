use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::record::{FeedbackSubmission, Session, SessionState};
use crate::error::{EngineError, EngineResult};
use crate::modules::emotion::{CanonicalEmotion, ModalityResults};
use crate::modules::profile::{ProfileFeedback, ProfileService, UserProfile};
use crate::modules::recommendation::YogaPlan;
use crate::modules::store::{Repository, StoreError, Versioned};

/// Result of a successful close.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedSession {
    pub session: Session,
    pub profile: UserProfile,
}

/// Owns session lifecycles and guarantees each session feeds its owner's
/// profile at most once.
pub struct SessionLedger {
    sessions: Arc<dyn Repository<Session>>,
    profiles: Arc<ProfileService>,
    max_retries: u32,
}

impl SessionLedger {
    pub fn new(sessions: Arc<dyn Repository<Session>>, profiles: Arc<ProfileService>, max_retries: u32) -> Self {
        Self {
            sessions,
            profiles,
            max_retries: max_retries.max(1),
        }
    }

    pub fn open(
        &self,
        user_id: &str,
        emotion: CanonicalEmotion,
        modality_results: ModalityResults,
        plan: YogaPlan,
    ) -> EngineResult<Session> {
        if user_id.trim().is_empty() {
            return Err(EngineError::Validation("userId is required to start a session".to_string()));
        }

        let session = Session::new(user_id, emotion, modality_results, plan);
        let stored = self.sessions.create(session)?;

        info!(
            session_id = %stored.entity.id,
            user_id,
            %emotion,
            total_duration = stored.entity.total_duration,
            "Session opened"
        );

        Ok(stored.entity)
    }

    pub fn get(&self, session_id: &str) -> EngineResult<Session> {
        Ok(self.load(session_id)?.entity)
    }

    /// Marks a session as being performed. Repeating the call is harmless.
    pub fn begin(&self, session_id: &str, user_id: &str) -> EngineResult<Session> {
        for _ in 0..self.max_retries {
            let stored = self.load(session_id)?;
            check_owner(&stored.entity, user_id)?;

            match stored.entity.state {
                SessionState::Active => return Ok(stored.entity),
                SessionState::Closed => {
                    return Err(EngineError::Conflict(format!("Session '{}' is already closed", session_id)))
                }
                SessionState::Created => {}
            }

            match self
                .sessions
                .conditional_update(session_id, stored.version, &|s: &Session| s.activated())
            {
                Ok(updated) => {
                    info!(session_id, user_id, "Session started");
                    return Ok(updated.entity);
                }
                Err(StoreError::VersionConflict { .. }) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(EngineError::Conflict(format!("Session '{}' kept changing", session_id)))
    }

    /// Records feedback and folds it into the owner's profile exactly once.
    ///
    /// The not-closed → closed transition is a compare-and-set, so concurrent
    /// duplicates see `Conflict`. If the profile update fails afterwards the
    /// session stays closed and the error is returned.
    pub fn close(&self, submission: &FeedbackSubmission) -> EngineResult<ClosedSession> {
        submission.validate()?;
        let session_id = submission.session_id.as_str();

        let closed = self.close_record(submission)?;
        info!(
            session_id,
            user_id = %closed.user_id,
            completed = closed.completed,
            completion_ratio = closed.completion_ratio,
            rating = closed.rating,
            "Session closed"
        );

        let feedback = ProfileFeedback {
            completion_ratio: closed.completion_ratio,
            rating: closed.rating,
            emotion: closed.emotion,
        };

        let profile = self.profiles.record_feedback(&closed.user_id, &feedback).map_err(|e| {
            error!(session_id, user_id = %closed.user_id, error = %e, "Closed session could not update profile");
            e
        })?;

        Ok(ClosedSession { session: closed, profile })
    }

    pub fn sessions_for_user(&self, user_id: &str) -> EngineResult<Vec<Session>> {
        let mut sessions: Vec<Session> = self
            .sessions
            .list()?
            .into_iter()
            .map(Versioned::into_inner)
            .filter(|s| s.user_id == user_id)
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    fn close_record(&self, submission: &FeedbackSubmission) -> EngineResult<Session> {
        let session_id = submission.session_id.as_str();

        for attempt in 1..=self.max_retries {
            let stored = self.load(session_id)?;
            check_owner(&stored.entity, &submission.user_id)?;

            if stored.entity.is_closed() {
                return Err(EngineError::Conflict(format!("Session '{}' is already closed", session_id)));
            }

            let ended_at = Utc::now();
            match self
                .sessions
                .conditional_update(session_id, stored.version, &|s: &Session| s.closed(submission, ended_at))
            {
                Ok(updated) => return Ok(updated.entity),
                Err(StoreError::VersionConflict { .. }) => {
                    warn!(session_id, attempt, "Session changed while closing, re-checking");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(EngineError::Conflict(format!("Session '{}' kept changing", session_id)))
    }

    fn load(&self, session_id: &str) -> EngineResult<Versioned<Session>> {
        self.sessions
            .get(session_id)?
            .ok_or_else(|| EngineError::NotFound(format!("Session '{}' not found", session_id)))
    }
}

fn check_owner(session: &Session, user_id: &str) -> EngineResult<()> {
    if session.user_id != user_id {
        return Err(EngineError::Authorization(format!(
            "Session '{}' does not belong to user '{}'",
            session.id, user_id
        )));
    }
    Ok(())
}
