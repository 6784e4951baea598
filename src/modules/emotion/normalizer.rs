use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The closed set every classifier label is mapped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalEmotion {
    Happy,
    Sad,
    Angry,
    Fearful,
    Stressed,
    Calm,
    Surprised,
    Neutral,
}

impl CanonicalEmotion {
    pub const ALL: [CanonicalEmotion; 8] = [
        CanonicalEmotion::Happy,
        CanonicalEmotion::Sad,
        CanonicalEmotion::Angry,
        CanonicalEmotion::Fearful,
        CanonicalEmotion::Stressed,
        CanonicalEmotion::Calm,
        CanonicalEmotion::Surprised,
        CanonicalEmotion::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalEmotion::Happy => "happy",
            CanonicalEmotion::Sad => "sad",
            CanonicalEmotion::Angry => "angry",
            CanonicalEmotion::Fearful => "fearful",
            CanonicalEmotion::Stressed => "stressed",
            CanonicalEmotion::Calm => "calm",
            CanonicalEmotion::Surprised => "surprised",
            CanonicalEmotion::Neutral => "neutral",
        }
    }
}

impl Default for CanonicalEmotion {
    fn default() -> Self {
        CanonicalEmotion::Neutral
    }
}

impl fmt::Display for CanonicalEmotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

lazy_static! {
    static ref SYNONYMS: HashMap<&'static str, CanonicalEmotion> = {
        use CanonicalEmotion::*;

        let entries = [
            ("happy", Happy),
            ("happiness", Happy),
            ("fun", Happy),
            ("love", Happy),
            ("enthusiasm", Happy),
            ("sad", Sad),
            ("sadness", Sad),
            ("empty", Sad),
            ("boredom", Sad),
            ("angry", Angry),
            ("anger", Angry),
            ("hate", Angry),
            ("disgust", Angry),
            ("fearful", Fearful),
            ("fear", Fearful),
            ("stressed", Stressed),
            ("worry", Stressed),
            ("anxious", Stressed),
            ("calm", Calm),
            ("relief", Calm),
            ("peaceful", Calm),
            ("surprised", Surprised),
            ("surprise", Surprised),
            ("neutral", Neutral),
        ];

        entries.into_iter().collect()
    };
}

/// Maps an arbitrary classifier label onto [`CanonicalEmotion`].
///
/// Total: absent, empty and unknown labels all map to `Neutral`.
pub fn normalize(raw_label: Option<&str>) -> CanonicalEmotion {
    let key = match raw_label {
        Some(label) => label.trim().to_lowercase(),
        None => return CanonicalEmotion::Neutral,
    };

    SYNONYMS.get(key.as_str()).copied().unwrap_or(CanonicalEmotion::Neutral)
}
