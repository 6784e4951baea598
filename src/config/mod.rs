pub mod engine_config;

pub use engine_config::{
    ClassifierConfig, EngineConfig, FusionConfig, LoggingConfig, ModalityWeights, OverrideThresholds,
    PersonalizationConfig, StoreConfig,
};
