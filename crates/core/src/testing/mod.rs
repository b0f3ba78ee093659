//! Test doubles shared by unit and integration tests.

mod memory_store;
mod mock_extractor;

pub use memory_store::MemoryStore;
pub use mock_extractor::MockExtractor;
