//! Concrete [`Repository`](crate::storage::Repository) backends.

pub mod hashmap;

pub use hashmap::HashMapRepository;
