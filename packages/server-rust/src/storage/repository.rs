//! Repository contract shared by every stored entity type.
//!
//! Defines [`Repository`], the only storage surface the services see. One
//! instance exists per entity type (menu items, orders, order statuses), each
//! shared as `Arc<dyn Repository<E>>`. All operations are synchronous: the
//! in-memory backend never blocks beyond a single map access.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use uuid::Uuid;

/// Identifier type usable as a repository key.
pub trait RepositoryKey: Clone + Eq + Hash + Display + Debug + Send + Sync + 'static {
    /// Whether this key is the empty/null identifier, which may never be stored.
    fn is_blank(&self) -> bool;
}

impl RepositoryKey for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl RepositoryKey for Uuid {
    fn is_blank(&self) -> bool {
        self.is_nil()
    }
}

/// A value stored in a [`Repository`], addressable by its own key.
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    type Key: RepositoryKey;

    /// Short label used in errors and log fields (e.g. `"order"`).
    const KIND: &'static str;

    fn key(&self) -> &Self::Key;
}

/// Errors raised by repository writes.
///
/// These are programming faults, not lookups that came up empty: a missing
/// entry is reported as `None`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("{kind} identifier must not be blank")]
    BlankKey { kind: &'static str },
}

/// Key-value store for a single entity type.
///
/// Writes to the same store are serialized per key; reads run concurrently
/// with each other and with writes to other keys. `find_all` returns an owned
/// snapshot that later writes never touch.
pub trait Repository<E: Entity>: Send + Sync {
    /// Insert or overwrite by `entity.key()`. Returns the previous value, if any.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::BlankKey`] if the entity's key is blank.
    fn save(&self, entity: E) -> Result<Option<E>, RepositoryError>;

    /// Remove the entry for `key`, returning it. Absent keys are a no-op.
    ///
    /// When several callers delete the same key at once, exactly one of them
    /// gets the removed entry back.
    fn delete(&self, key: &E::Key) -> Option<E>;

    /// Exact lookup. `None` when no entry exists.
    fn find_by_id(&self, key: &E::Key) -> Option<E>;

    /// Snapshot of every entry, in no particular order.
    fn find_all(&self) -> Vec<E>;

    /// Check if a key exists without cloning the entity.
    fn contains_key(&self, key: &E::Key) -> bool;

    /// Number of stored entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
