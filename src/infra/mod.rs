//! Infrastructure adapters implementing the resolver traits.

pub mod memory;

pub use memory::InMemoryRegistry;
