use serde::{Deserialize, Serialize};
use std::fmt;

use super::normalizer::{normalize, CanonicalEmotion};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Voice,
    Text,
    Face,
}

impl Modality {
    /// Accumulation order of the weighted blend; earlier wins ties.
    pub const REGISTRATION_ORDER: [Modality; 3] = [Modality::Voice, Modality::Text, Modality::Face];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Voice => "voice",
            Modality::Text => "text",
            Modality::Face => "face",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier output before normalization, as returned over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPrediction {
    #[serde(default, alias = "label")]
    pub emotion: Option<String>,
    #[serde(default, alias = "score")]
    pub confidence: f64,
}

impl RawPrediction {
    pub fn new(emotion: impl Into<String>, confidence: f64) -> Self {
        Self {
            emotion: Some(emotion.into()),
            confidence,
        }
    }
}

/// Clamps a classifier confidence into [0, 1]; NaN counts as no confidence.
pub fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        return 0.0;
    }
    confidence.clamp(0.0, 1.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalityResult {
    pub modality: Modality,
    pub emotion: CanonicalEmotion,
    pub confidence: f64,
}

impl ModalityResult {
    pub fn new(modality: Modality, emotion: CanonicalEmotion, confidence: f64) -> Self {
        Self {
            modality,
            emotion,
            confidence: clamp_confidence(confidence),
        }
    }

    pub fn from_raw(modality: Modality, raw: &RawPrediction) -> Self {
        Self::new(modality, normalize(raw.emotion.as_deref()), raw.confidence)
    }
}

/// The per-modality results available for one detection, any of which may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModalityResults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<ModalityResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<ModalityResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face: Option<ModalityResult>,
}

impl ModalityResults {
    pub fn get(&self, modality: Modality) -> Option<&ModalityResult> {
        match modality {
            Modality::Voice => self.voice.as_ref(),
            Modality::Text => self.text.as_ref(),
            Modality::Face => self.face.as_ref(),
        }
    }

    pub fn set(&mut self, result: ModalityResult) {
        match result.modality {
            Modality::Voice => self.voice = Some(result),
            Modality::Text => self.text = Some(result),
            Modality::Face => self.face = Some(result),
        }
    }

    /// Present results in registration order.
    pub fn present(&self) -> impl Iterator<Item = &ModalityResult> {
        Modality::REGISTRATION_ORDER
            .into_iter()
            .filter_map(move |modality| self.get(modality))
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }
}
