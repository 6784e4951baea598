use std::sync::{Arc, OnceLock};
use tracing::info;

use super::{feedback_service, fusion_service, recommendation_service};
use crate::api::types::{FeedbackResponse, FusionInput, FusionOutput, RecommendationRequest, RecommendationResponse};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::modules::classifier::{Detection, DetectionRequest, MultimodalDetector};
use crate::modules::emotion::FusionEngine;
use crate::modules::profile::{ProfileService, UserProfile};
use crate::modules::recommendation::{validate_pose_table, RecommendationPersonalizer};
use crate::modules::session::{FeedbackSubmission, Session, SessionLedger};
use crate::modules::store::{InMemoryRepository, Repository};

pub static ENGINE: OnceLock<Engine> = OnceLock::new();

/// Everything one process needs to fuse, personalize and record sessions.
pub struct Engine {
    config: EngineConfig,
    fusion: FusionEngine,
    personalizer: RecommendationPersonalizer,
    detector: MultimodalDetector,
    profiles: Arc<ProfileService>,
    ledger: SessionLedger,
}

impl Engine {
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        Self::with_repositories(
            config,
            Arc::new(InMemoryRepository::<UserProfile>::new()),
            Arc::new(InMemoryRepository::<Session>::new()),
        )
    }

    pub fn with_repositories(
        config: EngineConfig,
        profiles: Arc<dyn Repository<UserProfile>>,
        sessions: Arc<dyn Repository<Session>>,
    ) -> EngineResult<Self> {
        config.validate()?;
        validate_pose_table().map_err(EngineError::Config)?;

        let retries = config.store.max_update_retries;
        let profiles = Arc::new(ProfileService::new(profiles, retries));
        let ledger = SessionLedger::new(sessions, profiles.clone(), retries);

        Ok(Self {
            fusion: FusionEngine::new(config.fusion.clone()),
            personalizer: RecommendationPersonalizer::new(config.personalization.clone()),
            detector: MultimodalDetector::from_config(&config)?,
            profiles,
            ledger,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn fusion(&self) -> &FusionEngine {
        &self.fusion
    }

    pub fn personalizer(&self) -> &RecommendationPersonalizer {
        &self.personalizer
    }

    pub fn profiles(&self) -> &ProfileService {
        &self.profiles
    }

    pub fn ledger(&self) -> &SessionLedger {
        &self.ledger
    }

    pub async fn detect(&self, request: &DetectionRequest) -> Detection {
        self.detector.detect(request).await
    }

    pub fn fuse(&self, input: &FusionInput) -> FusionOutput {
        fusion_service::fuse_input(self, input)
    }

    pub fn recommend(&self, request: &RecommendationRequest) -> EngineResult<RecommendationResponse> {
        recommendation_service::recommend(self, request)
    }

    pub fn begin_session(&self, session_id: &str, user_id: &str) -> EngineResult<Session> {
        self.ledger.begin(session_id, user_id)
    }

    pub fn submit_feedback(&self, request: &FeedbackSubmission) -> EngineResult<FeedbackResponse> {
        feedback_service::submit_feedback(self, request)
    }

    pub fn profile(&self, user_id: &str) -> EngineResult<UserProfile> {
        self.profiles
            .get(user_id)?
            .ok_or_else(|| EngineError::NotFound(format!("Profile for user '{}' not found", user_id)))
    }
}

pub fn initialize_engine(config: EngineConfig) -> EngineResult<&'static Engine> {
    let engine = Engine::new(config)?;

    ENGINE
        .set(engine)
        .map_err(|_| EngineError::Conflict("Engine already initialized".to_string()))?;

    let engine = shared_engine()?;
    info!(
        max_update_retries = engine.config.store.max_update_retries,
        classifiers = engine.detector.configured_modalities().len(),
        "Engine initialized"
    );
    Ok(engine)
}

pub fn shared_engine() -> EngineResult<&'static Engine> {
    ENGINE
        .get()
        .ok_or_else(|| EngineError::Internal("Engine not initialized. Call initialize_engine first.".to_string()))
}
