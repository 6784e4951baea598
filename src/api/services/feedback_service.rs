use super::engine_service::Engine;
use crate::api::types::FeedbackResponse;
use crate::error::EngineResult;
use crate::modules::session::FeedbackSubmission;

pub fn submit_feedback(engine: &Engine, request: &FeedbackSubmission) -> EngineResult<FeedbackResponse> {
    engine.ledger().close(request)?;
    Ok(FeedbackResponse::ok())
}
