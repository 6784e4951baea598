pub mod poses;
pub mod personalizer;

pub use personalizer::{PlannedPose, RecommendationPersonalizer, YogaPlan};
pub use poses::{base_plan, validate_pose_table, Intensity, PoseSpec};
