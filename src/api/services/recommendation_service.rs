use tracing::info;

use super::engine_service::Engine;
use super::fusion_service::modality_results;
use super::validation_service::require_non_empty;
use crate::api::types::{RecommendationRequest, RecommendationResponse};
use crate::error::{EngineError, EngineResult};
use crate::modules::emotion::{clamp_confidence, normalize, ModalityResults};

/// Picks the completion rate that drives duration scaling: an explicit hint
/// from the request, else the stored profile, else the configured default.
fn effective_completion(engine: &Engine, user_id: &str, request: &RecommendationRequest) -> EngineResult<f64> {
    if let Some(hint) = request.user_profile.as_ref().and_then(|p| p.avg_completion) {
        if !hint.is_finite() {
            return Err(EngineError::Validation("userProfile.avg_completion must be a number".to_string()));
        }
        return Ok(clamp_confidence(hint));
    }

    Ok(match engine.profiles().get(user_id)? {
        Some(profile) => profile.avg_completion,
        None => engine.config().personalization.default_completion,
    })
}

pub fn recommend(engine: &Engine, request: &RecommendationRequest) -> EngineResult<RecommendationResponse> {
    let user_id = require_non_empty(request.user_id.as_deref(), "userId is required to start a yoga session")?;

    let emotion = normalize(request.emotion.as_deref());
    let completion = effective_completion(engine, user_id, request)?;
    let plan = engine.personalizer().recommend_for_completion(emotion, completion);

    let modalities = request
        .modalities
        .as_ref()
        .map(modality_results)
        .unwrap_or_else(ModalityResults::default);

    let session = engine.ledger().open(user_id, emotion, modalities, plan)?;

    info!(
        session_id = %session.id,
        user_id,
        %emotion,
        avg_completion = completion,
        poses = session.yoga_plan.len(),
        "Plan recommended"
    );

    Ok(RecommendationResponse {
        session_id: session.id,
        emotion: emotion.to_string(),
        yoga_plan: session.yoga_plan,
        total_duration: session.total_duration,
    })
}
