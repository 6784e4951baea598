pub mod classifier_mock;
pub mod store_mock;
