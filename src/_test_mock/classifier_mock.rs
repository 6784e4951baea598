use async_trait::async_trait;
use std::time::Duration;

use crate::error::{EngineError, EngineResult};
use crate::modules::classifier::{ClassifierInput, EmotionClassifier};
use crate::modules::emotion::{Modality, RawPrediction};

/// Classifier that answers with a canned prediction, optionally after a delay.
pub struct StaticClassifier {
    modality: Modality,
    response: EngineResult<RawPrediction>,
    delay: Option<Duration>,
}

impl StaticClassifier {
    pub fn new(modality: Modality, label: &str, confidence: f64) -> Self {
        Self {
            modality,
            response: Ok(RawPrediction::new(label, confidence)),
            delay: None,
        }
    }

    pub fn failing(modality: Modality) -> Self {
        Self {
            modality,
            response: Err(EngineError::Upstream(format!("Mock {} classifier error", modality))),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl EmotionClassifier for StaticClassifier {
    fn modality(&self) -> Modality {
        self.modality
    }

    async fn classify(&self, _input: &ClassifierInput) -> EngineResult<RawPrediction> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone()
    }
}
