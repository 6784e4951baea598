use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use super::modality::{Modality, ModalityResult, ModalityResults};
use super::normalizer::CanonicalEmotion;
use crate::config::FusionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionStrategy {
    FaceOverride,
    TextOverride,
    WeightedFusion,
    NoInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionResult {
    #[serde(rename = "final_emotion")]
    pub emotion: CanonicalEmotion,
    pub confidence: f64,
    #[serde(rename = "fusion_strategy")]
    pub strategy: FusionStrategy,
    pub modalities_used: BTreeSet<Modality>,
}

impl FusionResult {
    fn new(
        emotion: CanonicalEmotion,
        confidence: f64,
        strategy: FusionStrategy,
        modalities_used: impl IntoIterator<Item = Modality>,
    ) -> Self {
        Self {
            emotion,
            confidence: round_confidence(confidence),
            strategy,
            modalities_used: modalities_used.into_iter().collect(),
        }
    }

    pub fn no_input() -> Self {
        Self::new(CanonicalEmotion::Neutral, 0.0, FusionStrategy::NoInput, [])
    }
}

fn round_confidence(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Reconciles up to three modality results into one emotion.
///
/// Rules are applied in order: face override, text override, weighted blend,
/// and `no_input` when nothing is present. Pure and deterministic.
#[derive(Debug, Clone, Default)]
pub struct FusionEngine {
    config: FusionConfig,
}

impl FusionEngine {
    pub fn new(config: FusionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    pub fn fuse(
        &self,
        voice: Option<&ModalityResult>,
        text: Option<&ModalityResult>,
        face: Option<&ModalityResult>,
    ) -> FusionResult {
        let voice = voice.map(|r| Self::sanitized(r, Modality::Voice));
        let text = text.map(|r| Self::sanitized(r, Modality::Text));
        let face = face.map(|r| Self::sanitized(r, Modality::Face));

        if let Some(face) = face.as_ref().filter(|f| f.confidence >= self.config.overrides.face) {
            debug!(emotion = %face.emotion, confidence = face.confidence, "Face override");
            return FusionResult::new(face.emotion, face.confidence, FusionStrategy::FaceOverride, [Modality::Face]);
        }

        if let Some(text) = text.as_ref().filter(|t| t.confidence >= self.config.overrides.text) {
            debug!(emotion = %text.emotion, confidence = text.confidence, "Text override");
            return FusionResult::new(text.emotion, text.confidence, FusionStrategy::TextOverride, [Modality::Text]);
        }

        // Insertion-ordered so the first registered emotion wins ties.
        let mut scores: Vec<(CanonicalEmotion, f64)> = Vec::with_capacity(3);
        let mut used = Vec::with_capacity(3);

        for result in [voice, text, face].into_iter().flatten() {
            let contribution = result.confidence * self.config.weights.weight(result.modality);
            match scores.iter_mut().find(|(emotion, _)| *emotion == result.emotion) {
                Some((_, score)) => *score += contribution,
                None => scores.push((result.emotion, contribution)),
            }
            used.push(result.modality);
        }

        let mut winner: Option<(CanonicalEmotion, f64)> = None;
        for &(emotion, score) in &scores {
            match winner {
                Some((_, best)) if score <= best => {}
                _ => winner = Some((emotion, score)),
            }
        }

        match winner {
            Some((emotion, score)) => {
                debug!(%emotion, score, modalities = used.len(), "Weighted fusion");
                FusionResult::new(emotion, score, FusionStrategy::WeightedFusion, used)
            }
            None => FusionResult::no_input(),
        }
    }

    pub fn fuse_results(&self, results: &ModalityResults) -> FusionResult {
        self.fuse(results.voice.as_ref(), results.text.as_ref(), results.face.as_ref())
    }

    /// Re-clamps confidence and pins the modality to the slot it was passed in.
    fn sanitized(result: &ModalityResult, modality: Modality) -> ModalityResult {
        ModalityResult::new(modality, result.emotion, result.confidence)
    }
}
