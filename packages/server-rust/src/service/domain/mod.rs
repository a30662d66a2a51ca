//! Domain services.
//!
//! Each service exposes plain synchronous methods taking and returning events,
//! implements `ManagedService` for lifecycle, and implements
//! `tower::Service<Operation>` on `Arc<Self>` for pipeline dispatch.

pub mod menu;
pub mod order;

pub use menu::MenuService;
pub use order::{OrderKeyGenerator, OrderService, RandomKeyGenerator};

use crate::storage::RepositoryError;

/// Failures surfaced by the domain services.
///
/// Lookups that find nothing are not errors; they come back as `found: false`
/// or empty collections on the response event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A repository rejected a write. Passed through unchanged.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    /// Every generated order key was already taken.
    #[error("could not issue a unique order key after {attempts} attempts")]
    KeyCollision { attempts: u32 },
}
