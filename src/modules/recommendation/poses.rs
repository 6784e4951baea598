use serde::{Deserialize, Serialize};

use crate::modules::emotion::CanonicalEmotion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoseSpec {
    pub id: &'static str,
    pub base_duration_sec: u32,
    pub intensity: Intensity,
}

const fn pose(id: &'static str, base_duration_sec: u32, intensity: Intensity) -> PoseSpec {
    PoseSpec {
        id,
        base_duration_sec,
        intensity,
    }
}

const CALM: &[PoseSpec] = &[
    pose("balasana", 60, Intensity::Low),
    pose("sukhasana", 90, Intensity::Low),
];

const HAPPY: &[PoseSpec] = &[
    pose("vrikshasana", 60, Intensity::Medium),
    pose("tadasana", 45, Intensity::Low),
];

const SAD: &[PoseSpec] = &[
    pose("setu_bandha", 60, Intensity::Medium),
    pose("balasana", 60, Intensity::Low),
];

const ANGRY: &[PoseSpec] = &[
    pose("uttanasana", 45, Intensity::Medium),
    pose("pranayama", 120, Intensity::Low),
];

const FEARFUL: &[PoseSpec] = &[pose("legs_up_wall", 120, Intensity::Low)];

const NEUTRAL: &[PoseSpec] = &[pose("sukhasana", 60, Intensity::Low)];

/// Dedicated plan for `emotion`, if it has one.
pub fn dedicated_plan(emotion: CanonicalEmotion) -> Option<&'static [PoseSpec]> {
    match emotion {
        CanonicalEmotion::Calm => Some(CALM),
        CanonicalEmotion::Happy => Some(HAPPY),
        CanonicalEmotion::Sad => Some(SAD),
        CanonicalEmotion::Angry => Some(ANGRY),
        CanonicalEmotion::Fearful => Some(FEARFUL),
        CanonicalEmotion::Neutral => Some(NEUTRAL),
        CanonicalEmotion::Stressed | CanonicalEmotion::Surprised => None,
    }
}

/// Base plan for `emotion`, falling back to the neutral plan. Never empty.
pub fn base_plan(emotion: CanonicalEmotion) -> &'static [PoseSpec] {
    dedicated_plan(emotion).filter(|plan| !plan.is_empty()).unwrap_or(NEUTRAL)
}

/// Checks the static table once at startup.
pub fn validate_pose_table() -> Result<(), String> {
    if NEUTRAL.is_empty() {
        return Err("Neutral plan must not be empty".to_string());
    }

    for emotion in CanonicalEmotion::ALL {
        for spec in base_plan(emotion) {
            if spec.base_duration_sec == 0 {
                return Err(format!("Pose '{}' for {} has zero duration", spec.id, emotion));
            }
        }
    }

    Ok(())
}
