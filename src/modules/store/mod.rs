pub mod repository;
pub mod memory;

pub use memory::InMemoryRepository;
pub use repository::{Entity, Repository, StoreError, StoreResult, Versioned};
