pub mod dataset;
pub mod logging;

pub use dataset::session_feature_rows;
pub use logging::init_logging;
