use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::modules::emotion::Modality;

pub type Weight = f64;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalityWeights {
    pub voice: Weight,
    pub text: Weight,
    pub face: Weight,
}

impl ModalityWeights {
    pub fn new(voice: Weight, text: Weight, face: Weight) -> Self {
        Self { voice, text, face }
    }

    pub fn weight(&self, modality: Modality) -> Weight {
        match modality {
            Modality::Voice => self.voice,
            Modality::Text => self.text,
            Modality::Face => self.face,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let weights = [("voice", self.voice), ("text", self.text), ("face", self.face)];

        for (name, value) in weights {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!(
                    "Fusion weight '{}' has value {}, but must be between 0.0 and 1.0",
                    name, value
                ));
            }
        }

        let sum = self.voice + self.text + self.face;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(format!("Fusion weights must sum to 1.0, got {}", sum));
        }

        Ok(())
    }
}

impl Default for ModalityWeights {
    fn default() -> Self {
        Self::new(0.20, 0.35, 0.45)
    }
}

/// Confidence at or above which a single modality decides the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideThresholds {
    pub face: f64,
    pub text: f64,
}

impl OverrideThresholds {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [("face", self.face), ("text", self.text)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!(
                    "Override threshold '{}' has value {}, but must be between 0.0 and 1.0",
                    name, value
                ));
            }
        }
        Ok(())
    }
}

impl Default for OverrideThresholds {
    fn default() -> Self {
        Self { face: 0.85, text: 0.80 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    pub weights: ModalityWeights,
    pub overrides: OverrideThresholds,
}

impl FusionConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.weights.validate()?;
        self.overrides.validate()
    }
}

/// Completion bands used to scale pose durations.
///
/// Both band edges are strict: a value equal to `low_completion` or
/// `high_completion` keeps the base durations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalizationConfig {
    pub low_completion: f64,
    pub high_completion: f64,
    pub low_multiplier: f64,
    pub high_multiplier: f64,
    /// Completion assumed for users without any recorded feedback.
    pub default_completion: f64,
}

impl PersonalizationConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("low_completion", self.low_completion),
            ("high_completion", self.high_completion),
            ("default_completion", self.default_completion),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!(
                    "Personalization '{}' has value {}, but must be between 0.0 and 1.0",
                    name, value
                ));
            }
        }

        if self.low_completion >= self.high_completion {
            return Err(format!(
                "low_completion ({}) must be below high_completion ({})",
                self.low_completion, self.high_completion
            ));
        }

        if self.low_multiplier <= 0.0 || self.high_multiplier <= 0.0 {
            return Err("Duration multipliers must be positive".to_string());
        }

        Ok(())
    }
}

impl Default for PersonalizationConfig {
    fn default() -> Self {
        Self {
            low_completion: 0.6,
            high_completion: 0.85,
            low_multiplier: 0.7,
            high_multiplier: 1.1,
            default_completion: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub max_update_retries: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { max_update_retries: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub voice_url: Option<String>,
    pub text_url: Option<String>,
    pub face_url: Option<String>,
    pub timeout_ms: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            voice_url: None,
            text_url: None,
            face_url: None,
            timeout_ms: 60_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub fusion: FusionConfig,
    pub personalization: PersonalizationConfig,
    pub store: StoreConfig,
    pub classifiers: ClassifierConfig,
    pub logging: LoggingConfig,
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> EngineResult<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> EngineResult<()> {
        self.fusion.validate().map_err(EngineError::Config)?;
        self.personalization.validate().map_err(EngineError::Config)?;

        if self.store.max_update_retries == 0 {
            return Err(EngineError::Config("store.max_update_retries must be at least 1".to_string()));
        }

        if self.classifiers.timeout_ms == 0 {
            return Err(EngineError::Config("classifiers.timeout_ms must be positive".to_string()));
        }

        Ok(())
    }
}
