pub mod client;
pub mod detector;

pub use client::{ClassifierInput, EmotionClassifier, HttpClassifier};
pub use detector::{Detection, DetectionRequest, MultimodalDetector};
