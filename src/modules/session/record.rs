use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::modules::emotion::{CanonicalEmotion, ModalityResults};
use crate::modules::profile::MAX_RATING;
use crate::modules::recommendation::{PlannedPose, YogaPlan};
use crate::modules::store::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Created,
    Active,
    Closed,
}

/// One detect → plan → perform → feedback cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub emotion: CanonicalEmotion,
    #[serde(default)]
    pub modality_results: ModalityResults,
    pub yoga_plan: Vec<PlannedPose>,
    pub total_duration: u32,
    pub state: SessionState,
    pub completed: bool,
    pub completion_ratio: f64,
    /// 0 until feedback is recorded.
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(user_id: impl Into<String>, emotion: CanonicalEmotion, modality_results: ModalityResults, plan: YogaPlan) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            emotion,
            modality_results,
            total_duration: plan.total_duration,
            yoga_plan: plan.poses,
            state: SessionState::Created,
            completed: false,
            completion_ratio: 0.0,
            rating: 0.0,
            created_at: Utc::now(),
            ended_at: None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }

    pub fn activated(&self) -> Session {
        Session {
            state: SessionState::Active,
            ..self.clone()
        }
    }

    pub fn closed(&self, feedback: &FeedbackSubmission, ended_at: DateTime<Utc>) -> Session {
        Session {
            state: SessionState::Closed,
            completed: feedback.completed,
            completion_ratio: feedback.completion_ratio,
            rating: feedback.rating,
            ended_at: Some(ended_at),
            ..self.clone()
        }
    }
}

impl Entity for Session {
    fn key(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    pub session_id: String,
    pub user_id: String,
    pub completed: bool,
    pub completion_ratio: f64,
    #[serde(default)]
    pub rating: f64,
}

impl FeedbackSubmission {
    pub fn validate(&self) -> EngineResult<()> {
        if self.session_id.trim().is_empty() {
            return Err(EngineError::Validation("sessionId is required".to_string()));
        }
        if self.user_id.trim().is_empty() {
            return Err(EngineError::Validation("userId is required".to_string()));
        }
        if !self.completion_ratio.is_finite() || !(0.0..=1.0).contains(&self.completion_ratio) {
            return Err(EngineError::Validation(format!(
                "completionRatio must be between 0 and 1, got {}",
                self.completion_ratio
            )));
        }
        if !self.rating.is_finite() || !(0.0..=MAX_RATING).contains(&self.rating) {
            return Err(EngineError::Validation(format!(
                "rating must be between 0 and {}, got {}",
                MAX_RATING, self.rating
            )));
        }
        Ok(())
    }
}
