// ============================================================================
// Store Module
// Store implementations backing the repository and transaction traits
// ============================================================================

mod memory;

pub use memory::{InMemoryStore, InMemoryTransaction};
