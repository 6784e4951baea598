pub mod classifier;
pub mod emotion;
pub mod profile;
pub mod recommendation;
pub mod session;
pub mod store;
