use futures_util::future::join3;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::client::{ClassifierInput, EmotionClassifier, HttpClassifier};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::modules::emotion::{FusionEngine, FusionResult, Modality, ModalityResult, ModalityResults};

/// Raw media captured for one detection. Voice and text classifiers both read
/// the audio clip; the face classifier reads the image.
#[derive(Debug, Clone, Default)]
pub struct DetectionRequest {
    pub audio: Option<ClassifierInput>,
    pub image: Option<ClassifierInput>,
}

impl DetectionRequest {
    fn input_for(&self, modality: Modality) -> Option<&ClassifierInput> {
        match modality {
            Modality::Voice | Modality::Text => self.audio.as_ref(),
            Modality::Face => self.image.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    #[serde(flatten)]
    pub results: ModalityResults,
    #[serde(rename = "final")]
    pub fusion: FusionResult,
}

/// Calls every configured classifier concurrently and fuses what comes back.
///
/// A classifier that errors or exceeds the timeout is treated as an absent
/// modality; if all of them fail the fusion is `no_input`.
pub struct MultimodalDetector {
    voice: Option<Arc<dyn EmotionClassifier>>,
    text: Option<Arc<dyn EmotionClassifier>>,
    face: Option<Arc<dyn EmotionClassifier>>,
    fusion: FusionEngine,
    timeout: Duration,
}

impl MultimodalDetector {
    pub fn new(fusion: FusionEngine, timeout: Duration) -> Self {
        Self {
            voice: None,
            text: None,
            face: None,
            fusion,
            timeout,
        }
    }

    pub fn from_config(config: &EngineConfig) -> EngineResult<Self> {
        let timeout = Duration::from_millis(config.classifiers.timeout_ms);
        let mut detector = Self::new(FusionEngine::new(config.fusion.clone()), timeout);

        let endpoints = [
            (Modality::Voice, &config.classifiers.voice_url),
            (Modality::Text, &config.classifiers.text_url),
            (Modality::Face, &config.classifiers.face_url),
        ];

        for (modality, url) in endpoints {
            if let Some(url) = url {
                detector = detector.with_classifier(Arc::new(HttpClassifier::new(modality, url.as_str(), timeout)?));
            }
        }

        Ok(detector)
    }

    /// Registers `classifier` in the slot of its own modality, replacing any previous one.
    pub fn with_classifier(mut self, classifier: Arc<dyn EmotionClassifier>) -> Self {
        match classifier.modality() {
            Modality::Voice => self.voice = Some(classifier),
            Modality::Text => self.text = Some(classifier),
            Modality::Face => self.face = Some(classifier),
        }
        self
    }

    pub fn configured_modalities(&self) -> Vec<Modality> {
        Modality::REGISTRATION_ORDER
            .into_iter()
            .filter(|m| self.slot(*m).is_some())
            .collect()
    }

    pub async fn detect(&self, request: &DetectionRequest) -> Detection {
        let (voice, text, face) = join3(
            self.run(Modality::Voice, request),
            self.run(Modality::Text, request),
            self.run(Modality::Face, request),
        )
        .await;

        let results = ModalityResults { voice, text, face };
        let fusion = self.fusion.fuse_results(&results);

        info!(
            emotion = %fusion.emotion,
            confidence = fusion.confidence,
            strategy = ?fusion.strategy,
            "Multimodal detection finished"
        );

        Detection { results, fusion }
    }

    fn slot(&self, modality: Modality) -> Option<&Arc<dyn EmotionClassifier>> {
        match modality {
            Modality::Voice => self.voice.as_ref(),
            Modality::Text => self.text.as_ref(),
            Modality::Face => self.face.as_ref(),
        }
    }

    async fn run(&self, modality: Modality, request: &DetectionRequest) -> Option<ModalityResult> {
        let classifier = self.slot(modality)?;
        let input = request.input_for(modality)?;

        match tokio::time::timeout(self.timeout, classifier.classify(input)).await {
            Ok(Ok(raw)) => Some(ModalityResult::from_raw(modality, &raw)),
            Ok(Err(e)) => {
                warn!(%modality, error = %e, "Classifier failed, treating modality as absent");
                None
            }
            Err(_) => {
                warn!(%modality, timeout_ms = self.timeout.as_millis() as u64, "Classifier timed out, treating modality as absent");
                None
            }
        }
    }
}
