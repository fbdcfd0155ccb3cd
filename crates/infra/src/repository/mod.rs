//! Lead persistence boundary.
//!
//! Storage-agnostic: the service composes the trait, tests and dev use the
//! in-memory snapshot store.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryLeadRepository;
pub use r#trait::{LeadRepository, RepositoryError};
