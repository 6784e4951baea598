pub mod aggregator;
pub mod service;

pub use aggregator::{apply_feedback, ProfileFeedback, UserProfile, MAX_RATING};
pub use service::ProfileService;
