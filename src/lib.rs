pub mod config;
pub mod error;
pub mod modules;
pub mod api;
pub mod utils;

#[cfg(test)]
mod _test_mock;

pub use config::{EngineConfig, FusionConfig, ModalityWeights, PersonalizationConfig};
pub use error::{EngineError, EngineResult};
pub use modules::emotion::{normalize, CanonicalEmotion, FusionEngine, FusionResult, FusionStrategy, Modality, ModalityResult};
pub use modules::profile::{apply_feedback, ProfileService, UserProfile};
pub use modules::recommendation::{RecommendationPersonalizer, YogaPlan};
pub use modules::session::{FeedbackSubmission, Session, SessionLedger, SessionState};
pub use api::Engine;
