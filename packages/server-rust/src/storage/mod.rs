//! Storage layer for the ordering backend.
//!
//! - [`Repository`]: the per-entity key-value contract the services depend on
//! - [`entity`]: stored shapes for menu items, orders, and order statuses
//! - [`engines`]: concrete backends ([`HashMapRepository`])
//! - [`factory`]: builds and seeds the full [`Repositories`] set

pub mod engines;
pub mod entity;
pub mod factory;
pub mod repository;
#[cfg(test)]
pub(crate) mod testing;

pub use engines::HashMapRepository;
pub use entity::{MenuItem, Order, OrderStatus};
pub use factory::{default_menu, Repositories};
pub use repository::{Entity, Repository, RepositoryError, RepositoryKey};
