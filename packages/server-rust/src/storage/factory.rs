//! Construction of the repository set used by the services.
//!
//! [`Repositories`] is the storage half of the composition root: it builds
//! one repository per entity type and seeds the menu. Services receive the
//! individual `Arc<dyn Repository<_>>` handles, never the concrete backend,
//! so a durable backend can replace [`HashMapRepository`] here alone.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::storage::engines::HashMapRepository;
use crate::storage::entity::{MenuItem, Order, OrderStatus};
use crate::storage::repository::{Repository, RepositoryError};

/// The catalog served when no other menu is supplied.
#[must_use]
pub fn default_menu() -> Vec<MenuItem> {
    vec![
        MenuItem::new("YM1", "Yummy Noodles", Decimal::new(199, 2), 11),
        MenuItem::new("YM2", "Special Yummy Noodles", Decimal::new(299, 2), 12),
        MenuItem::new("YM3", "Low cal Yummy Noodles", Decimal::new(399, 2), 13),
    ]
}

/// Shared handles to every repository.
#[derive(Clone)]
pub struct Repositories {
    pub menu_items: Arc<dyn Repository<MenuItem>>,
    pub orders: Arc<dyn Repository<Order>>,
    pub order_statuses: Arc<dyn Repository<OrderStatus>>,
}

impl Repositories {
    /// Builds in-memory repositories with the given menu and no orders.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::BlankKey`] if a menu item has a blank id.
    pub fn in_memory(menu: impl IntoIterator<Item = MenuItem>) -> Result<Self, RepositoryError> {
        Ok(Self {
            menu_items: Arc::new(HashMapRepository::seeded(menu)?),
            orders: Arc::new(HashMapRepository::<Order>::new()),
            order_statuses: Arc::new(HashMapRepository::<OrderStatus>::new()),
        })
    }
}
