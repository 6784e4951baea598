use tracing::debug;

use super::engine_service::Engine;
use crate::api::types::FusionInput;
use crate::modules::emotion::{FusionResult, Modality, ModalityResult, ModalityResults};

/// Normalizes and clamps posted classifier outputs at the boundary.
pub fn modality_results(input: &FusionInput) -> ModalityResults {
    let mut results = ModalityResults::default();

    let slots = [
        (Modality::Voice, &input.voice),
        (Modality::Text, &input.text),
        (Modality::Face, &input.face),
    ];

    for (modality, raw) in slots {
        if let Some(raw) = raw {
            results.set(ModalityResult::from_raw(modality, raw));
        }
    }

    results
}

pub fn fuse_input(engine: &Engine, input: &FusionInput) -> FusionResult {
    let results = modality_results(input);
    let fused = engine.fusion().fuse_results(&results);
    debug!(emotion = %fused.emotion, strategy = ?fused.strategy, "Fused posted modalities");
    fused
}
