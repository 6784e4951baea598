use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::modules::emotion::{Modality, RawPrediction};

/// Payload handed to a modality classifier (an audio clip or an image).
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierInput {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl ClassifierInput {
    pub fn new(bytes: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.into(),
        }
    }

    pub fn audio(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(bytes, "audio/wav")
    }

    pub fn image(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(bytes, "image/jpeg")
    }
}

/// An external, modality-specific emotion classifier.
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    fn modality(&self) -> Modality;

    async fn classify(&self, input: &ClassifierInput) -> EngineResult<RawPrediction>;
}

/// Classifier reached over HTTP; expects a JSON body with
/// `emotion`/`confidence` (or `label`/`score`).
pub struct HttpClassifier {
    client: Client,
    modality: Modality,
    url: String,
}

impl HttpClassifier {
    pub fn new(modality: Modality, url: impl Into<String>, timeout: Duration) -> EngineResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            modality,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl EmotionClassifier for HttpClassifier {
    fn modality(&self) -> Modality {
        self.modality
    }

    async fn classify(&self, input: &ClassifierInput) -> EngineResult<RawPrediction> {
        debug!(modality = %self.modality, url = %self.url, bytes = input.bytes.len(), "Calling classifier");

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, input.content_type.as_str())
            .body(input.bytes.clone())
            .send()
            .await
            .map_err(|e| EngineError::Upstream(format!("{} classifier request failed: {}", self.modality, e)))?;

        if !response.status().is_success() {
            return Err(EngineError::Upstream(format!(
                "{} classifier returned HTTP {}",
                self.modality,
                response.status()
            )));
        }

        response
            .json::<RawPrediction>()
            .await
            .map_err(|e| EngineError::Upstream(format!("{} classifier sent an invalid response: {}", self.modality, e)))
    }
}
