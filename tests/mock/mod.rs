pub mod classifier_mock;
pub mod session_mock;

pub use classifier_mock::{MockClassifier, TestDetectionData};
pub use session_mock::{test_user_id, TestSessionData};
