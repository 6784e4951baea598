pub mod types;
pub mod services;
pub mod endpoints;

pub use types::{ApiResult, FeedbackRequest, FeedbackResponse, FusionInput, FusionOutput, RecommendationRequest, RecommendationResponse};
pub use services::engine_service::Engine;
pub use endpoints::*;
