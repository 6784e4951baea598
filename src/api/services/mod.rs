pub mod engine_service;
pub mod feedback_service;
pub mod fusion_service;
pub mod recommendation_service;
pub mod validation_service;

pub use engine_service::*;
pub use feedback_service::*;
pub use fusion_service::*;
pub use recommendation_service::*;
pub use validation_service::*;
