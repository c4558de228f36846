//! Record loading and in-memory storage.

pub mod json_fixtures;
pub mod memory_store;

pub use json_fixtures::JsonFixtureSource;
pub use memory_store::InMemoryStore;
