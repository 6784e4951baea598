pub mod normalizer;
pub mod modality;
pub mod fusion;

pub use fusion::{FusionEngine, FusionResult, FusionStrategy};
pub use modality::{clamp_confidence, Modality, ModalityResult, ModalityResults, RawPrediction};
pub use normalizer::{normalize, CanonicalEmotion};
