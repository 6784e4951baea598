use serde::{Deserialize, Serialize};
use tracing::debug;

use super::poses::{base_plan, Intensity, PoseSpec};
use crate::config::PersonalizationConfig;
use crate::modules::emotion::CanonicalEmotion;
use crate::modules::profile::UserProfile;

/// A pose scaled for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedPose {
    pub id: String,
    pub duration: u32,
    pub intensity: Intensity,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YogaPlan {
    pub poses: Vec<PlannedPose>,
    pub total_duration: u32,
}

impl YogaPlan {
    pub fn new(poses: Vec<PlannedPose>) -> Self {
        let total_duration = poses.iter().map(|p| p.duration).sum();
        Self { poses, total_duration }
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecommendationPersonalizer {
    config: PersonalizationConfig,
}

impl RecommendationPersonalizer {
    pub fn new(config: PersonalizationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PersonalizationConfig {
        &self.config
    }

    /// Strict bands: values equal to either edge keep the base duration.
    pub fn duration_multiplier(&self, avg_completion: f64) -> f64 {
        if avg_completion < self.config.low_completion {
            self.config.low_multiplier
        } else if avg_completion > self.config.high_completion {
            self.config.high_multiplier
        } else {
            1.0
        }
    }

    pub fn recommend(&self, emotion: CanonicalEmotion, profile: &UserProfile) -> YogaPlan {
        self.recommend_for_completion(emotion, profile.avg_completion)
    }

    pub fn recommend_for_completion(&self, emotion: CanonicalEmotion, avg_completion: f64) -> YogaPlan {
        let multiplier = self.duration_multiplier(avg_completion);
        debug!(%emotion, avg_completion, multiplier, "Personalizing plan");

        YogaPlan::new(base_plan(emotion).iter().map(|spec| scale(spec, multiplier)).collect())
    }
}

fn scale(spec: &PoseSpec, multiplier: f64) -> PlannedPose {
    let duration = (spec.base_duration_sec as f64 * multiplier).round().max(1.0) as u32;

    PlannedPose {
        id: spec.id.to_string(),
        duration,
        intensity: spec.intensity,
    }
}
