use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::modules::emotion::{clamp_confidence, CanonicalEmotion};
use crate::modules::store::Entity;

pub const MAX_RATING: f64 = 5.0;

/// Running per-user statistics; averages are kept without storing history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub total_sessions: u64,
    pub avg_completion: f64,
    pub avg_rating: f64,
    pub emotion_stats: BTreeMap<CanonicalEmotion, u64>,
}

impl UserProfile {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            total_sessions: 0,
            avg_completion: 0.0,
            avg_rating: 0.0,
            emotion_stats: CanonicalEmotion::ALL.into_iter().map(|e| (e, 0)).collect(),
        }
    }

    pub fn emotion_count(&self, emotion: CanonicalEmotion) -> u64 {
        self.emotion_stats.get(&emotion).copied().unwrap_or(0)
    }
}

impl Entity for UserProfile {
    fn key(&self) -> &str {
        &self.user_id
    }
}

/// The part of a finalized session that feeds the profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileFeedback {
    pub completion_ratio: f64,
    pub rating: f64,
    pub emotion: CanonicalEmotion,
}

/// Folds one finalized session into the profile.
///
/// Uses the pre-increment session count `n`, so after any sequence of calls the
/// averages equal the arithmetic mean of every value contributed.
pub fn apply_feedback(profile: &UserProfile, feedback: &ProfileFeedback) -> UserProfile {
    let n = profile.total_sessions as f64;
    let next = profile.total_sessions + 1;
    let next_f = next as f64;

    let completion = clamp_confidence(feedback.completion_ratio);
    let rating = if feedback.rating.is_nan() { 0.0 } else { feedback.rating.clamp(0.0, MAX_RATING) };

    let mut emotion_stats = profile.emotion_stats.clone();
    *emotion_stats.entry(feedback.emotion).or_insert(0) += 1;

    UserProfile {
        user_id: profile.user_id.clone(),
        total_sessions: next,
        avg_completion: (profile.avg_completion * n + completion) / next_f,
        avg_rating: (profile.avg_rating * n + rating) / next_f,
        emotion_stats,
    }
}
