use mindease_engine::api::RecommendationRequest;
use mindease_engine::{Engine, EngineConfig, FeedbackSubmission};

pub fn test_user_id() -> String {
    format!("test-user-{}", uuid::Uuid::new_v4())
}

pub struct TestSessionData;

impl TestSessionData {
    pub fn engine() -> Engine {
        Engine::new(EngineConfig::default()).expect("default config is valid")
    }

    pub fn request(user_id: &str, emotion: &str) -> RecommendationRequest {
        RecommendationRequest {
            user_id: Some(user_id.to_string()),
            emotion: Some(emotion.to_string()),
            ..RecommendationRequest::default()
        }
    }

    /// Opens a session through the recommendation path and returns its id.
    pub fn open(engine: &Engine, user_id: &str, emotion: &str) -> String {
        engine
            .recommend(&Self::request(user_id, emotion))
            .expect("recommendation succeeds")
            .session_id
    }

    pub fn feedback(session_id: &str, user_id: &str, completion_ratio: f64, rating: f64) -> FeedbackSubmission {
        FeedbackSubmission {
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            completed: completion_ratio >= 1.0,
            completion_ratio,
            rating,
        }
    }
}
