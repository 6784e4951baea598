use async_trait::async_trait;
use mockall::mock;

use mindease_engine::modules::classifier::{ClassifierInput, DetectionRequest, EmotionClassifier};
use mindease_engine::modules::emotion::{Modality, RawPrediction};
use mindease_engine::{EngineError, EngineResult};

mock! {
    pub Classifier {}

    #[async_trait]
    impl EmotionClassifier for Classifier {
        fn modality(&self) -> Modality;
        async fn classify(&self, input: &ClassifierInput) -> EngineResult<RawPrediction>;
    }
}

impl MockClassifier {
    /// Classifier for `modality` that always answers `label` with `confidence`.
    pub fn answering(modality: Modality, label: &'static str, confidence: f64) -> Self {
        let mut mock = MockClassifier::new();
        mock.expect_modality().return_const(modality);
        mock.expect_classify()
            .returning(move |_| Ok(RawPrediction::new(label, confidence)));
        mock
    }

    pub fn unavailable(modality: Modality) -> Self {
        let mut mock = MockClassifier::new();
        mock.expect_modality().return_const(modality);
        mock.expect_classify()
            .returning(move |_| Err(EngineError::Upstream(format!("{} classifier offline", modality))));
        mock
    }
}

pub struct TestDetectionData;

impl TestDetectionData {
    pub fn full_request() -> DetectionRequest {
        DetectionRequest {
            audio: Some(ClassifierInput::audio(vec![0u8; 64])),
            image: Some(ClassifierInput::image(vec![0u8; 64])),
        }
    }

    pub fn audio_only() -> DetectionRequest {
        DetectionRequest {
            audio: Some(ClassifierInput::audio(vec![0u8; 64])),
            image: None,
        }
    }
}
